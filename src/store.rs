//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The quadrant
//! cache is mutated only through the sync layer's operations, never
//! directly by rendering components.

use leptos::prelude::*;
use reactive_stores::Store;

use eisen_core::{ArchivedTask, QuadrantsState};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Active tasks, partitioned by quadrant - the client-side mirror of
    /// the server table
    pub quadrants: QuadrantsState,
    /// Completed tasks, loaded on demand for the archive view
    pub archived: Vec<ArchivedTask>,
    /// True until the first task fetch settles
    pub loading: bool,
    /// Last mutation/fetch error, shown in the global banner
    pub error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self { loading: true, ..Default::default() }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}
