//! Task Sync Layer
//!
//! Single source of truth for the UI's view of task state. All store
//! mutation goes through [`TaskSync`]: it reconciles local state with
//! server confirmations, rolls optimistic moves back on failure, handles
//! the CSRF acquire/retry protocol, supersedes stale list fetches, and
//! broadcasts cross-tab invalidation.
//!
//! Only the list fetch is cancellable. Mutations, once sent, complete or
//! fail; each mutator's rollback reverses only its own snapshot, so one
//! failed mutation can't clobber a concurrent unrelated one.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AbortController, BroadcastChannel};

use eisen_core::{QuadrantKey, UpdateTaskRequest};

use crate::api::{self, ApiError, CsrfCache};
use crate::store::{AppState, AppStateStoreFields, AppStore};

/// Cross-tab invalidation channel. The payload is a content-free marker;
/// any receipt means "re-fetch from the server", never data to merge.
const SYNC_CHANNEL: &str = "eisen-tasks";

#[derive(Clone, Copy)]
pub struct TaskSync {
    store: AppStore,
    csrf: CsrfCache,
    /// Controller of the in-flight list fetch, if any
    inflight: StoredValue<Option<AbortController>, LocalStorage>,
    channel: StoredValue<Option<BroadcastChannel>, LocalStorage>,
}

/// Create the store and sync handle and provide both via context.
pub fn provide_task_sync() -> TaskSync {
    let store = AppStore::new(AppState::new());
    provide_context(store);

    let sync = TaskSync {
        store,
        csrf: CsrfCache::new(),
        inflight: StoredValue::new_local(None),
        channel: StoredValue::new_local(None),
    };

    // Other tabs' mutations invalidate our cache wholesale.
    if let Ok(channel) = BroadcastChannel::new(SYNC_CHANNEL) {
        let on_message = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |_ev| {
            spawn_local(async move {
                sync.refetch().await;
            });
        });
        channel.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();
        sync.channel.set_value(Some(channel));
    }

    provide_context(sync);
    sync
}

pub fn use_task_sync() -> TaskSync {
    expect_context::<TaskSync>()
}

impl TaskSync {
    /// Initial load: CSRF prefetch and task fetch run concurrently.
    pub async fn load(&self) {
        let csrf = self.csrf;
        spawn_local(async move {
            csrf.prefetch().await;
        });
        self.refetch().await;
    }

    /// Fetch the task list, superseding (aborting) any fetch still in
    /// flight so only the newest fetch can populate state.
    pub async fn refetch(&self) {
        let controller = AbortController::new().ok();
        let signal = controller.as_ref().map(|c| c.signal());

        let mut previous = None;
        self.inflight.update_value(|slot| {
            previous = std::mem::replace(slot, controller);
        });
        if let Some(previous) = previous {
            previous.abort();
        }

        match api::fetch_tasks(signal.as_ref()).await {
            Ok(quadrants) => {
                self.store.quadrants().set(quadrants);
                self.store.error().set(None);
                self.store.loading().set(false);
            }
            // Superseded: the newer fetch owns loading and error state.
            Err(ApiError::Aborted) => {}
            Err(err) => {
                self.store.error().set(Some(err.to_string()));
                self.store.loading().set(false);
            }
        }
    }

    /// Create a task. Not optimistic: the id comes from the server, so the
    /// entry is appended only once the response arrives.
    pub async fn add_task(&self, quadrant: QuadrantKey, text: &str) -> Result<(), ApiError> {
        self.store.error().set(None);
        match api::create_task(&self.csrf, quadrant, text).await {
            Ok(task) => {
                self.store.quadrants().write().push_task(quadrant, task);
                self.broadcast();
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    pub async fn delete_task(&self, quadrant: QuadrantKey, id: &str) -> Result<(), ApiError> {
        self.store.error().set(None);
        match api::delete_task(&self.csrf, id).await {
            Ok(()) => {
                self.store.quadrants().write().remove_task(quadrant, id);
                self.broadcast();
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Rename a task in place, preserving its position.
    pub async fn edit_task(
        &self,
        quadrant: QuadrantKey,
        id: &str,
        text: &str,
    ) -> Result<(), ApiError> {
        self.store.error().set(None);
        let request = UpdateTaskRequest { text: Some(text.to_owned()), quadrant: None };
        match api::update_task(&self.csrf, id, &request).await {
            Ok(()) => {
                self.store.quadrants().write().set_task_text(quadrant, id, text);
                self.broadcast();
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Archive a task. The archived list is a separate fetch, so success
    /// only removes the entry from the active quadrant.
    pub async fn complete_task(&self, quadrant: QuadrantKey, id: &str) -> Result<(), ApiError> {
        self.store.error().set(None);
        match api::complete_task(&self.csrf, id).await {
            Ok(()) => {
                self.store.quadrants().write().remove_task(quadrant, id);
                self.broadcast();
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Move a task between quadrants - the one optimistic path. The splice
    /// happens before the network call; on failure it is reversed from the
    /// snapshot taken at splice time, never from re-derived state, so
    /// concurrent moves can't compound a rollback error.
    pub async fn move_task(
        &self,
        id: &str,
        source: QuadrantKey,
        target: QuadrantKey,
    ) -> Result<(), ApiError> {
        if source == target {
            return Ok(());
        }

        let snapshot = {
            let quadrants_field = self.store.quadrants();
            let mut quadrants = quadrants_field.write();
            match quadrants.take_task(source, id) {
                Some((index, task)) => {
                    quadrants.push_task(target, task.clone());
                    Some((index, task))
                }
                None => None,
            }
        };
        let Some((index, task)) = snapshot else {
            return Ok(());
        };

        self.store.error().set(None);
        let request = UpdateTaskRequest {
            text: None,
            quadrant: Some(target.as_str().to_owned()),
        };
        match api::update_task(&self.csrf, id, &request).await {
            Ok(()) => {
                // Local state already matches the server; just tell other
                // tabs.
                self.broadcast();
                Ok(())
            }
            Err(err) => {
                // Rollback before surfacing the error: reverse the exact
                // splice at its original index.
                {
                    let quadrants_field = self.store.quadrants();
                    let mut quadrants = quadrants_field.write();
                    quadrants.remove_task(target, id);
                    quadrants.insert_task_at(source, index, task);
                }
                self.fail(err)
            }
        }
    }

    pub async fn load_archived(&self) {
        match api::fetch_archived().await {
            Ok(archived) => {
                self.store.archived().set(archived);
                self.store.error().set(None);
            }
            Err(err) => {
                self.store.error().set(Some(err.to_string()));
            }
        }
    }

    pub async fn purge_archived(&self, id: &str) -> Result<(), ApiError> {
        self.store.error().set(None);
        match api::purge_archived(&self.csrf, id).await {
            Ok(()) => {
                self.store.archived().write().retain(|t| t.id != id);
                self.broadcast();
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Record the error for the banner and propagate it for local
    /// handling (e.g. keeping an edit field open).
    fn fail(&self, err: ApiError) -> Result<(), ApiError> {
        self.store.error().set(Some(err.to_string()));
        Err(err)
    }

    fn broadcast(&self) {
        self.channel.with_value(|channel| {
            if let Some(channel) = channel {
                let _ = channel.post_message(&JsValue::from_str("sync"));
            }
        });
    }
}
