//! Task Repository
//!
//! SQLite-backed gateway over the single `tasks` table, split into two
//! logical partitions by `completed_at`: NULL rows are active, non-NULL rows
//! are archived. State-conditional mutations (complete-only-if-active,
//! purge-only-if-archived) are expressed as single conditional writes whose
//! affected-row count signals "no matching row" - never as read-then-write.

use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use eisen_core::{ArchivedTask, QuadrantKey, QuadrantsState, Task};

/// A raw row of the `tasks` table, either partition.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: String,
    pub text: String,
    pub quadrant: String,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

/// SQLite implementation of the task persistence gateway.
#[derive(Clone)]
pub struct TaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TaskRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// All active tasks partitioned by quadrant, creation order within each.
    /// Rows with an unrecognized quadrant value are skipped.
    pub async fn list_active(&self) -> rusqlite::Result<QuadrantsState> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, text, quadrant, created_at FROM tasks
             WHERE completed_at IS NULL ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(2)?,
                Task { id: row.get(0)?, text: row.get(1)?, created_at: row.get(3)? },
            ))
        })?;

        let mut state = QuadrantsState::default();
        for row in rows {
            let (quadrant, task) = row?;
            if let Some(key) = QuadrantKey::from_str(&quadrant) {
                state.push_task(key, task);
            }
        }
        Ok(state)
    }

    /// All archived tasks, most recently completed first.
    pub async fn list_archived(&self) -> rusqlite::Result<Vec<ArchivedTask>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, text, quadrant, created_at, completed_at FROM tasks
             WHERE completed_at IS NOT NULL ORDER BY completed_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(2)?,
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut archived = Vec::new();
        for row in rows {
            let (quadrant, id, text, created_at, completed_at) = row?;
            if let Some(key) = QuadrantKey::from_str(&quadrant) {
                archived.push(ArchivedTask { id, text, quadrant: key, created_at, completed_at });
            }
        }
        Ok(archived)
    }

    /// Fetch one row by id, regardless of partition.
    pub async fn get(&self, id: &str) -> rusqlite::Result<Option<TaskRow>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, text, quadrant, created_at, completed_at FROM tasks WHERE id = ?1",
            params![id],
            |row| {
                Ok(TaskRow {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    quadrant: row.get(2)?,
                    created_at: row.get(3)?,
                    completed_at: row.get(4)?,
                })
            },
        )
        .optional()
    }

    pub async fn insert(
        &self,
        id: &str,
        text: &str,
        quadrant: QuadrantKey,
        created_at: i64,
    ) -> rusqlite::Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO tasks (id, text, quadrant, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, text, quadrant.as_str(), created_at],
        )?;
        Ok(())
    }

    /// Update an active task's text. False when no active row matched.
    pub async fn update_text(&self, id: &str, text: &str) -> rusqlite::Result<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE tasks SET text = ?1 WHERE id = ?2 AND completed_at IS NULL",
            params![text, id],
        )?;
        Ok(changed > 0)
    }

    /// Move an active task to another quadrant. False when no active row
    /// matched.
    pub async fn update_quadrant(&self, id: &str, quadrant: QuadrantKey) -> rusqlite::Result<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE tasks SET quadrant = ?1 WHERE id = ?2 AND completed_at IS NULL",
            params![quadrant.as_str(), id],
        )?;
        Ok(changed > 0)
    }

    /// Archive a task, only if it is still active. The predicate makes
    /// double-completion a no-op for the loser of the race.
    pub async fn complete(&self, id: &str, completed_at: i64) -> rusqlite::Result<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE tasks SET completed_at = ?1 WHERE id = ?2 AND completed_at IS NULL",
            params![completed_at, id],
        )?;
        Ok(changed > 0)
    }

    /// Delete an active task.
    pub async fn delete(&self, id: &str) -> rusqlite::Result<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND completed_at IS NULL",
            params![id],
        )?;
        Ok(changed > 0)
    }

    /// Permanently purge an archived task. False for unknown or
    /// still-active ids.
    pub async fn delete_archived(&self, id: &str) -> rusqlite::Result<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND completed_at IS NOT NULL",
            params![id],
        )?;
        Ok(changed > 0)
    }
}
