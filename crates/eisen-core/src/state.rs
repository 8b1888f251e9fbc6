//! Quadrant State
//!
//! The client-side projection of all active tasks, partitioned by quadrant.
//! Every key is always present. These are the pure operations the sync layer
//! composes into optimistic updates and rollbacks; they never touch the
//! network.

use serde::{Deserialize, Serialize};

use crate::quadrant::QuadrantKey;
use crate::task::Task;

/// All active tasks keyed by quadrant, ordered by creation within each.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantsState {
    pub urgent_important: Vec<Task>,
    pub not_urgent_important: Vec<Task>,
    pub urgent_not_important: Vec<Task>,
    pub not_urgent_not_important: Vec<Task>,
}

impl QuadrantsState {
    pub fn tasks(&self, key: QuadrantKey) -> &Vec<Task> {
        match key {
            QuadrantKey::UrgentImportant => &self.urgent_important,
            QuadrantKey::NotUrgentImportant => &self.not_urgent_important,
            QuadrantKey::UrgentNotImportant => &self.urgent_not_important,
            QuadrantKey::NotUrgentNotImportant => &self.not_urgent_not_important,
        }
    }

    pub fn tasks_mut(&mut self, key: QuadrantKey) -> &mut Vec<Task> {
        match key {
            QuadrantKey::UrgentImportant => &mut self.urgent_important,
            QuadrantKey::NotUrgentImportant => &mut self.not_urgent_important,
            QuadrantKey::UrgentNotImportant => &mut self.urgent_not_important,
            QuadrantKey::NotUrgentNotImportant => &mut self.not_urgent_not_important,
        }
    }

    /// Append a task to the end of a quadrant's sequence.
    pub fn push_task(&mut self, key: QuadrantKey, task: Task) {
        self.tasks_mut(key).push(task);
    }

    /// Remove a task from a quadrant, returning its index and value.
    ///
    /// The pair is the rollback snapshot for an optimistic move: reinserting
    /// at the captured index restores the exact pre-move sequence.
    pub fn take_task(&mut self, key: QuadrantKey, id: &str) -> Option<(usize, Task)> {
        let tasks = self.tasks_mut(key);
        let idx = tasks.iter().position(|t| t.id == id)?;
        Some((idx, tasks.remove(idx)))
    }

    /// Insert a task at `index`, clamped to the sequence length.
    pub fn insert_task_at(&mut self, key: QuadrantKey, index: usize, task: Task) {
        let tasks = self.tasks_mut(key);
        let index = index.min(tasks.len());
        tasks.insert(index, task);
    }

    /// Remove a task by id. Returns whether anything was removed.
    pub fn remove_task(&mut self, key: QuadrantKey, id: &str) -> bool {
        let tasks = self.tasks_mut(key);
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        tasks.len() != before
    }

    /// Replace the text of a task in place, preserving its position.
    pub fn set_task_text(&mut self, key: QuadrantKey, id: &str, text: &str) -> bool {
        match self.tasks_mut(key).iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.text = text.to_owned();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: QuadrantKey, id: &str) -> bool {
        self.tasks(key).iter().any(|t| t.id == id)
    }

    /// Ids of all active tasks across every quadrant.
    pub fn active_ids(&self) -> Vec<&str> {
        QuadrantKey::ALL
            .iter()
            .flat_map(|key| self.tasks(*key).iter().map(|t| t.id.as_str()))
            .collect()
    }

    pub fn total_len(&self) -> usize {
        QuadrantKey::ALL.iter().map(|key| self.tasks(*key).len()).sum()
    }
}
