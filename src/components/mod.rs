//! UI Components

mod archive;
mod matrix;
mod quadrant_card;
mod task_item;
mod toast;

pub use archive::ArchivePage;
pub use matrix::{DragPayload, MatrixGrid, TaskDrag};
pub use toast::ToastView;
