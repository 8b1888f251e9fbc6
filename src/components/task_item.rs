//! Task Item Component
//!
//! One draggable task row with inline edit, complete, and delete-confirm
//! actions. The edit field stays open when the rename fails so the user
//! doesn't lose their input.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragmove::make_on_mousedown;
use wasm_bindgen::JsCast;

use eisen_core::{QuadrantKey, Task};

use super::matrix::{DragPayload, TaskDrag};
use crate::context::{use_app_context, ToastKind};
use crate::sync::use_task_sync;

#[component]
pub fn TaskItem(quadrant: QuadrantKey, task: Task) -> impl IntoView {
    let sync = use_task_sync();
    let ctx = use_app_context();
    let dnd = expect_context::<TaskDrag>();

    let id = StoredValue::new(task.id.clone());
    let text = StoredValue::new(task.text.clone());

    let (editing, set_editing) = signal(false);
    let (edit_text, set_edit_text) = signal(String::new());
    let (confirm_delete, set_confirm_delete) = signal(false);

    let on_mousedown = make_on_mousedown(dnd, DragPayload { task: task.clone(), source: quadrant });

    let being_dragged = move || {
        dnd.dragging_read
            .get()
            .is_some_and(|payload| payload.task.id == id.get_value())
    };

    let start_edit = move |_| {
        set_edit_text.set(text.get_value());
        set_editing.set(true);
    };

    let submit_edit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let new_text = edit_text.get();
        if new_text.trim().is_empty() {
            return;
        }
        spawn_local(async move {
            // Keep the edit field open on failure.
            if sync.edit_task(quadrant, &id.get_value(), &new_text).await.is_ok() {
                set_editing.set(false);
            }
        });
    };

    let complete = move |_| {
        spawn_local(async move {
            match sync.complete_task(quadrant, &id.get_value()).await {
                Ok(()) => ctx.notify("Task completed", ToastKind::Success),
                Err(_) => ctx.notify("Failed to complete task", ToastKind::Error),
            }
        });
    };

    let delete = move || {
        spawn_local(async move {
            if sync.delete_task(quadrant, &id.get_value()).await.is_err() {
                ctx.notify("Failed to delete task", ToastKind::Error);
            }
        });
    };

    view! {
        <li
            class=move || {
                if being_dragged() { "task-item dragging" } else { "task-item" }
            }
            on:mousedown=on_mousedown
        >
            <Show
                when=move || editing.get()
                fallback=move || {
                    view! {
                        <span class="task-text">{move || text.get_value()}</span>
                        <span class="task-actions">
                            <button class="complete-btn" title="Complete" on:click=complete>
                                "\u{2713}"
                            </button>
                            <button class="edit-btn" title="Edit" on:click=start_edit>
                                "\u{270E}"
                            </button>
                            <Show when=move || !confirm_delete.get()>
                                <button
                                    class="delete-btn"
                                    title="Delete"
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        set_confirm_delete.set(true);
                                    }
                                >
                                    "\u{00D7}"
                                </button>
                            </Show>
                            <Show when=move || confirm_delete.get()>
                                <span class="delete-confirm">
                                    <span class="delete-confirm-text">"Delete?"</span>
                                    <button
                                        class="confirm-btn"
                                        on:click=move |ev| {
                                            ev.stop_propagation();
                                            set_confirm_delete.set(false);
                                            delete();
                                        }
                                    >
                                        "\u{2713}"
                                    </button>
                                    <button
                                        class="cancel-btn"
                                        on:click=move |ev| {
                                            ev.stop_propagation();
                                            set_confirm_delete.set(false);
                                        }
                                    >
                                        "\u{2717}"
                                    </button>
                                </span>
                            </Show>
                        </span>
                    }
                }
            >
                <form class="edit-task-form" on:submit=submit_edit>
                    <input
                        type="text"
                        prop:value=move || edit_text.get()
                        on:input=move |ev| {
                            let target = ev.target().unwrap();
                            let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                            set_edit_text.set(input.value());
                        }
                    />
                    <button type="submit">"Save"</button>
                    <button type="button" on:click=move |_| set_editing.set(false)>
                        "Cancel"
                    </button>
                </form>
            </Show>
        </li>
    }
}
