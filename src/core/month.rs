use chrono::{Datelike, NaiveDate};

/// Pure view state for month navigation: a year/month pointer the calendar
/// surface steps backward and forward, independent of the event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
}

impl Default for MonthView {
    fn default() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }
}

impl MonthView {
    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .unwrap_or(date);
        Self { first }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn prev(&mut self) {
        self.first = self
            .first
            .checked_sub_months(chrono::Months::new(1))
            .unwrap_or(self.first);
    }

    pub fn next(&mut self) {
        self.first = self
            .first
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(self.first);
    }

    pub fn days_in_month(&self) -> u32 {
        let next_first = self
            .first
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(self.first);
        (next_first - self.first).num_days() as u32
    }

    /// Empty leading cells before day 1 in a Sunday-first week grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Header label, e.g. "March 2025".
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    /// Dates of the month in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let first = self.first;
        (0..self.days_in_month()).map(move |offset| first + chrono::Duration::days(offset as i64))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}
