use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A date-scoped event. The `date` field is the grouping key for per-day
/// lookup; `time` is optional display detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub created: NaiveDateTime,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            date,
            time: None,
            created: chrono::Local::now().naive_local(),
        }
    }

    pub fn time_label(&self) -> String {
        match self.time {
            Some(time) => time.format("%H:%M").to_string(),
            None => "All day".to_string(),
        }
    }
}
