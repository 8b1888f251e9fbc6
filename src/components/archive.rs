//! Archive Page Component
//!
//! Read-only list of completed tasks, newest first, with per-entry
//! permanent deletion behind an inline confirm.

use leptos::prelude::*;
use leptos::task::spawn_local;

use eisen_core::ArchivedTask;

use super::quadrant_card::quadrant_copy;
use crate::context::{use_app_context, ToastKind};
use crate::store::{use_app_store, AppStateStoreFields};
use crate::sync::use_task_sync;

fn format_completed(ms: i64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ms as f64));
    date.to_locale_string("default", &wasm_bindgen::JsValue::UNDEFINED).into()
}

#[component]
pub fn ArchivePage() -> impl IntoView {
    let store = use_app_store();
    let sync = use_task_sync();

    Effect::new(move |_| {
        spawn_local(async move {
            sync.load_archived().await;
        });
    });

    view! {
        <div class="archive-page">
            <h2>"Archive"</h2>
            <Show
                when=move || !store.archived().read().is_empty()
                fallback=|| view! { <p class="archive-empty">"No completed tasks yet."</p> }
            >
                <ul class="archive-list">
                    <For
                        each=move || store.archived().get()
                        key=|task| task.id.clone()
                        children=move |task| view! { <ArchiveEntry task=task /> }
                    />
                </ul>
            </Show>
        </div>
    }
}

#[component]
fn ArchiveEntry(task: ArchivedTask) -> impl IntoView {
    let sync = use_task_sync();
    let ctx = use_app_context();

    let id = StoredValue::new(task.id.clone());
    let (confirm_delete, set_confirm_delete) = signal(false);
    let (title, _) = quadrant_copy(task.quadrant);
    let completed = format_completed(task.completed_at);

    let purge = move || {
        spawn_local(async move {
            match sync.purge_archived(&id.get_value()).await {
                Ok(()) => ctx.notify("Task deleted", ToastKind::Success),
                Err(_) => ctx.notify("Failed to delete task", ToastKind::Error),
            }
        });
    };

    view! {
        <li class="archive-entry">
            <span class="archive-text">{task.text.clone()}</span>
            <span class="archive-meta">
                <span class="archive-quadrant">{title}</span>
                <span class="archive-date">{completed}</span>
            </span>
            <Show
                when=move || confirm_delete.get()
                fallback=move || {
                    view! {
                        <button
                            class="delete-btn"
                            title="Delete permanently"
                            on:click=move |_| set_confirm_delete.set(true)
                        >
                            "\u{00D7}"
                        </button>
                    }
                }
            >
                <span class="delete-confirm">
                    <span class="delete-confirm-text">"Delete forever?"</span>
                    <button
                        class="confirm-btn"
                        on:click=move |_| {
                            set_confirm_delete.set(false);
                            purge();
                        }
                    >
                        "\u{2713}"
                    </button>
                    <button class="cancel-btn" on:click=move |_| set_confirm_delete.set(false)>
                        "\u{2717}"
                    </button>
                </span>
            </Show>
        </li>
    }
}
