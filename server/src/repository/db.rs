//! Database Connection and Setup
//!
//! Manages the SQLite connection and schema migrations.

use std::path::Path;

use rusqlite::Connection;

/// Open (or create) the task database and bring the schema up to date.
pub fn init_db(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// In-memory database for tests.
pub fn init_memory_db() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let query = format!("PRAGMA table_info({table})");
    let mut stmt = conn.prepare(&query)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            quadrant TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
        [],
    )?;

    // Archive migration: completed_at marks a task archived (NULL = active).
    if !column_exists(conn, "tasks", "completed_at")? {
        conn.execute("ALTER TABLE tasks ADD COLUMN completed_at INTEGER", [])?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed_at)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_db_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.db");

        let conn = init_db(&path).expect("first open");
        conn.execute(
            "INSERT INTO tasks (id, text, quadrant, created_at) VALUES ('a', 't', 'urgentImportant', 1)",
            [],
        )
        .expect("insert");
        drop(conn);

        // Reopening re-runs migrations against the existing schema.
        let conn = init_db(&path).expect("second open");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
        assert!(column_exists(&conn, "tasks", "completed_at").expect("pragma"));
    }
}
