use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::core::event::CalendarEvent;
use crate::storage::Storage;
use crate::store::StoreError;

const CALENDAR_EVENTS_KEY: &str = "calendarEvents";

/// Owner of the persisted event list.
#[derive(Debug)]
pub struct CalendarStore {
    storage: Storage,
    events: Vec<CalendarEvent>,
}

/// Mutable-field replacement for an existing event.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<Option<NaiveTime>>,
}

impl CalendarStore {
    pub fn load(storage: Storage) -> Self {
        let events = storage.load_list(CALENDAR_EVENTS_KEY);
        Self { storage, events }
    }

    fn persist(&self) {
        self.storage.save_list(CALENDAR_EVENTS_KEY, &self.events);
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Create an event on `date`. Rejects titles that trim to empty.
    pub fn add(
        &mut self,
        date: NaiveDate,
        title: &str,
        time: Option<NaiveTime>,
        description: &str,
    ) -> Result<CalendarEvent, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let mut event = CalendarEvent::new(title, date);
        event.time = time;
        event.description = description.trim().to_string();
        self.events.push(event.clone());
        self.persist();
        log::info!("Added event '{}' on {}", event.title, event.date);
        Ok(event)
    }

    /// Replace the matching event's mutable fields. Returns whether it was
    /// found; a missing id is a no-op.
    pub fn update(&mut self, id: Uuid, patch: EventPatch) -> Result<bool, StoreError> {
        let title = match patch.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(StoreError::EmptyTitle);
                }
                Some(title)
            }
            None => None,
        };

        let Some(event) = self.events.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        if let Some(title) = title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description.trim().to_string();
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(time) = patch.time {
            event.time = time;
        }
        self.persist();
        Ok(true)
    }

    /// Remove the matching event if present.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn find(&self, id: Uuid) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// All events on the given day, in list order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// Events dated on or after `from`, ascending by date and truncated to
    /// `limit`. Events sharing a date keep their insertion order.
    pub fn upcoming(&self, from: NaiveDate, limit: usize) -> Vec<&CalendarEvent> {
        let mut upcoming: Vec<&CalendarEvent> =
            self.events.iter().filter(|e| e.date >= from).collect();
        upcoming.sort_by_key(|e| e.date);
        upcoming.truncate(limit);
        upcoming
    }
}
