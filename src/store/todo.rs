use uuid::Uuid;

use crate::core::task::{Priority, PriorityFilter, StatusFilter, Task};
use crate::storage::Storage;
use crate::store::StoreError;

const TODOS_KEY: &str = "todos";

/// Owner of the persisted task list.
#[derive(Debug)]
pub struct TodoStore {
    storage: Storage,
    tasks: Vec<Task>,
}

/// Mutable-field replacement for an existing task.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub priority: Option<Priority>,
}

impl TodoStore {
    pub fn load(storage: Storage) -> Self {
        let tasks = storage.load_list(TODOS_KEY);
        Self { storage, tasks }
    }

    fn persist(&self) {
        self.storage.save_list(TODOS_KEY, &self.tasks);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Prepend a new pending task. Rejects titles that trim to empty.
    pub fn add(&mut self, title: &str, priority: Priority) -> Result<Task, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let task = Task::new(title, priority);
        self.tasks.insert(0, task.clone());
        self.persist();
        log::info!("Added task '{}'", task.title);
        Ok(task)
    }

    /// Flip completion for the matching task. Returns whether it was found.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.persist();
        true
    }

    /// Replace the matching task's mutable fields. Returns whether it was
    /// found; a missing id is a no-op.
    pub fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<bool, StoreError> {
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

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        self.persist();
        Ok(true)
    }

    /// Remove the matching task if present.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Remove all completed tasks in one pass; returns how many went away.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.persist();
            log::info!("Cleared {} completed tasks", removed);
        }
        removed
    }

    /// Filtered view: both predicates combined with AND, source order kept.
    pub fn view(&self, status: StatusFilter, priority: PriorityFilter) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| status.matches(t) && priority.matches(t))
            .collect()
    }

    /// The `n` most recently added tasks, for the dashboard preview.
    pub fn recent(&self, n: usize) -> &[Task] {
        &self.tasks[..self.tasks.len().min(n)]
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, TodoStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TodoStore::load(Storage::new(dir.path()));
        (dir, store)
    }

    #[test]
    fn add_prepends_and_matches_input() {
        let (_dir, mut store) = store();
        store.add("First", Priority::Low).unwrap();
        let task = store.add("Buy milk", Priority::Medium).unwrap();

        assert_eq!(store.total_count(), 2);
        assert_eq!(store.tasks()[0].id, task.id);
        assert_eq!(store.tasks()[0].title, "Buy milk");
        assert_eq!(store.tasks()[0].priority, Priority::Medium);
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn add_trims_and_rejects_empty_titles() {
        let (_dir, mut store) = store();
        assert_eq!(store.add("   ", Priority::High), Err(StoreError::EmptyTitle));
        assert_eq!(store.total_count(), 0);

        let task = store.add("  padded  ", Priority::High).unwrap();
        assert_eq!(task.title, "padded");
    }

    #[test]
    fn toggle_twice_restores_original_state() {
        let (_dir, mut store) = store();
        let task = store.add("Flip me", Priority::Low).unwrap();

        assert!(store.toggle(task.id));
        assert!(store.tasks()[0].completed);
        assert!(store.toggle(task.id));
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn toggle_unknown_id_is_a_noop() {
        let (_dir, mut store) = store();
        store.add("Keep me", Priority::Low).unwrap();
        assert!(!store.toggle(Uuid::new_v4()));
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn update_replaces_mutable_fields() {
        let (_dir, mut store) = store();
        let task = store.add("Old title", Priority::Low).unwrap();

        let found = store
            .update(
                task.id,
                TaskPatch {
                    title: Some("New title".to_string()),
                    priority: Some(Priority::High),
                },
            )
            .unwrap();
        assert!(found);
        assert_eq!(store.tasks()[0].title, "New title");
        assert_eq!(store.tasks()[0].priority, Priority::High);

        let found = store.update(Uuid::new_v4(), TaskPatch::default()).unwrap();
        assert!(!found);
    }

    #[test]
    fn update_rejects_empty_title_without_mutating() {
        let (_dir, mut store) = store();
        let task = store.add("Keep", Priority::Low).unwrap();
        let result = store.update(
            task.id,
            TaskPatch {
                title: Some("  ".to_string()),
                priority: None,
            },
        );
        assert_eq!(result, Err(StoreError::EmptyTitle));
        assert_eq!(store.tasks()[0].title, "Keep");
    }

    #[test]
    fn remove_deletes_only_the_matching_task() {
        let (_dir, mut store) = store();
        let a = store.add("a", Priority::Low).unwrap();
        store.add("b", Priority::Low).unwrap();

        assert!(store.remove(a.id));
        assert!(!store.remove(a.id));
        assert_eq!(store.total_count(), 1);
        assert_eq!(store.tasks()[0].title, "b");
    }

    #[test]
    fn clear_completed_reports_prior_completed_count() {
        let (_dir, mut store) = store();
        let a = store.add("a", Priority::Low).unwrap();
        store.add("b", Priority::Low).unwrap();
        let c = store.add("c", Priority::Low).unwrap();
        store.toggle(a.id);
        store.toggle(c.id);

        assert_eq!(store.completed_count(), 2);
        assert_eq!(store.clear_completed(), 2);
        assert_eq!(store.completed_count(), 0);
        assert_eq!(store.total_count(), 1);
        assert_eq!(store.clear_completed(), 0);
    }

    #[test]
    fn view_applies_both_predicates_and_keeps_order() {
        let (_dir, mut store) = store();
        let high_done = store.add("high done", Priority::High).unwrap();
        store.add("low pending", Priority::Low).unwrap();
        store.add("high pending", Priority::High).unwrap();
        store.toggle(high_done.id);

        let view = store.view(StatusFilter::Pending, PriorityFilter::Only(Priority::High));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title, "high pending");

        let all = store.view(StatusFilter::All, PriorityFilter::All);
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["high pending", "low pending", "high done"]);
    }

    #[test]
    fn scenario_add_toggle_clear() {
        let (_dir, mut store) = store();
        let task = store.add("Buy milk", Priority::Medium).unwrap();
        assert_eq!(store.total_count(), 1);
        assert!(!store.tasks()[0].completed);

        store.toggle(task.id);
        assert!(store.tasks()[0].completed);

        assert_eq!(store.clear_completed(), 1);
        assert_eq!(store.total_count(), 0);
    }

    #[test]
    fn mutations_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TodoStore::load(Storage::new(dir.path()));
        let task = store.add("Persist me", Priority::High).unwrap();
        store.toggle(task.id);

        let reloaded = TodoStore::load(Storage::new(dir.path()));
        assert_eq!(reloaded.total_count(), 1);
        assert_eq!(reloaded.tasks()[0].id, task.id);
        assert!(reloaded.tasks()[0].completed);
    }

    #[test]
    fn recent_returns_newest_first() {
        let (_dir, mut store) = store();
        for title in ["a", "b", "c", "d"] {
            store.add(title, Priority::Low).unwrap();
        }
        let titles: Vec<&str> = store.recent(3).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["d", "c", "b"]);
    }
}
