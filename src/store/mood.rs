use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::core::mood::{Drawing, Mood, MoodEntry};
use crate::storage::Storage;

const MOOD_ENTRIES_KEY: &str = "moodEntries";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to decode drawing: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("failed to write drawing: {0}")]
    Io(#[from] std::io::Error),
}

/// Owner of the persisted mood journal, newest entry first.
#[derive(Debug)]
pub struct MoodStore {
    storage: Storage,
    entries: Vec<MoodEntry>,
}

impl MoodStore {
    pub fn load(storage: Storage) -> Self {
        let entries = storage.load_list(MOOD_ENTRIES_KEY);
        Self { storage, entries }
    }

    fn persist(&self) {
        self.storage.save_list(MOOD_ENTRIES_KEY, &self.entries);
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    /// Record a mood with the drawing snapshot captured at save time.
    /// Entries are prepended and never mutated afterwards.
    pub fn save_entry(&mut self, mood: Mood, drawing: Drawing) -> MoodEntry {
        let entry = MoodEntry::new(mood, drawing);
        self.entries.insert(0, entry.clone());
        self.persist();
        log::info!("Recorded {} mood entry", mood.as_str());
        entry
    }

    /// Remove the matching entry if present.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn find(&self, id: Uuid) -> Option<&MoodEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The `n` most recent entries, for the dashboard preview.
    pub fn recent(&self, n: usize) -> &[MoodEntry] {
        &self.entries[..self.entries.len().min(n)]
    }

    /// Materialize an entry's drawing as a PNG file in `dir`, named by mood
    /// and date. Returns the written path.
    pub fn export_drawing(&self, entry: &MoodEntry, dir: &Path) -> Result<PathBuf, ExportError> {
        let bytes = entry.drawing.png_bytes()?;
        let path = dir.join(entry.export_file_name());
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}
