//! Repository Layer
//!
//! SQLite persistence gateway for tasks.

mod db;
mod task_repo;

#[cfg(test)]
mod tests;

pub use db::{init_db, init_memory_db};
pub use task_repo::{TaskRepository, TaskRow};
