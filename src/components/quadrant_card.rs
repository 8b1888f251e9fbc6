//! Quadrant Card Component
//!
//! One cell of the matrix: header, task list, inline add form, and drop
//! target behavior. The pointer entering the card while a drag is active
//! makes it the candidate drop target.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragmove::{make_on_target_mouseenter, make_on_target_mouseleave};
use wasm_bindgen::JsCast;

use eisen_core::{QuadrantKey, Task};

use super::matrix::TaskDrag;
use super::task_item::TaskItem;
use crate::store::{use_app_store, AppStateStoreFields};
use crate::sync::use_task_sync;

// Keyed on every mutable field, so an in-place rename replaces the row
// instead of retaining a stale child for the unchanged id.
fn row_key(task: &Task) -> (String, String) {
    (task.id.clone(), task.text.clone())
}

pub(super) fn quadrant_copy(quadrant: QuadrantKey) -> (&'static str, &'static str) {
    match quadrant {
        QuadrantKey::UrgentImportant => ("Do first", "Urgent and important"),
        QuadrantKey::NotUrgentImportant => ("Schedule", "Important, not urgent"),
        QuadrantKey::UrgentNotImportant => ("Delegate", "Urgent, not important"),
        QuadrantKey::NotUrgentNotImportant => ("Eliminate", "Neither urgent nor important"),
    }
}

#[component]
pub fn QuadrantCard(quadrant: QuadrantKey) -> impl IntoView {
    let store = use_app_store();
    let sync = use_task_sync();
    let dnd = expect_context::<TaskDrag>();

    let (title, description) = quadrant_copy(quadrant);
    let tasks = Memo::new(move |_| store.quadrants().get().tasks(quadrant).clone());

    let (new_text, set_new_text) = signal(String::new());

    let add_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get();
        if text.trim().is_empty() {
            return;
        }
        spawn_local(async move {
            // On failure the input keeps its text for another attempt.
            if sync.add_task(quadrant, &text).await.is_ok() {
                set_new_text.set(String::new());
            }
        });
    };

    let is_drop_target = move || {
        dnd.dragging_read.get().is_some() && dnd.drop_target_read.get() == Some(quadrant)
    };

    view! {
        <section
            class=move || {
                let mut class = format!("quadrant quadrant-{quadrant}");
                if is_drop_target() {
                    class.push_str(" drop-active");
                }
                class
            }
            on:mouseenter=make_on_target_mouseenter(dnd, quadrant)
            on:mouseleave=make_on_target_mouseleave(dnd)
        >
            <header class="quadrant-header">
                <h2>{title}</h2>
                <p class="quadrant-description">{description}</p>
                <span class="quadrant-count">{move || tasks.get().len()}</span>
            </header>

            <ul class="task-list">
                <For
                    each=move || tasks.get()
                    key=row_key
                    children=move |task| view! { <TaskItem quadrant=quadrant task=task /> }
                />
            </ul>

            <form class="add-task-form" on:submit=add_task>
                <input
                    type="text"
                    placeholder="Add a task..."
                    prop:value=move || new_text.get()
                    on:input=move |ev| {
                        let target = ev.target().unwrap();
                        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                        set_new_text.set(input.value());
                    }
                />
                <button type="submit">"Add"</button>
            </form>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_key_changes_on_rename() {
        let task = Task { id: "a".into(), text: "before".into(), created_at: 1 };
        let renamed = Task { text: "after".into(), ..task.clone() };
        assert_ne!(row_key(&task), row_key(&renamed));
        assert_eq!(row_key(&task), row_key(&task.clone()));
    }
}
