//! Matrix Grid Component
//!
//! The 2x2 quadrant layout with axis labels, drag-and-drop wiring, and the
//! drag overlay that follows the pointer.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragmove::{bind_global_mouseup, create_drag_signals, DragSignals};

use eisen_core::{QuadrantKey, Task};

use super::quadrant_card::QuadrantCard;
use crate::context::{use_app_context, ToastKind};
use crate::store::{use_app_store, AppStateStoreFields};
use crate::sync::use_task_sync;

/// Drag payload: the full task plus where it came from, so the overlay can
/// render without a lookup and the drop handler knows the source.
#[derive(Clone, Debug, PartialEq)]
pub struct DragPayload {
    pub task: Task,
    pub source: QuadrantKey,
}

pub type TaskDrag = DragSignals<DragPayload, QuadrantKey>;

#[component]
pub fn MatrixGrid() -> impl IntoView {
    let sync = use_task_sync();
    let store = use_app_store();
    let ctx = use_app_context();

    let dnd: TaskDrag = create_drag_signals();
    provide_context(dnd);

    bind_global_mouseup(dnd, move |payload: DragPayload, target: Option<QuadrantKey>| {
        // No target: dropped outside every quadrant, gesture cancelled.
        let Some(target) = target else { return };
        // Dropped back where it started: no network call, no notification.
        if target == payload.source {
            return;
        }
        spawn_local(async move {
            match sync.move_task(&payload.task.id, payload.source, target).await {
                Ok(()) => ctx.notify("Task moved", ToastKind::Success),
                Err(_) => ctx.notify("Failed to move task", ToastKind::Error),
            }
        });
    });

    let loading = move || store.loading().get();

    view! {
        <Show
            when=move || !loading()
            fallback=|| view! { <div class="matrix-loading">"Loading tasks..."</div> }
        >
            <div class="matrix-wrap">
                <span class="axis-label axis-vertical">"Important"</span>
                <span class="axis-label axis-urgent">"Urgent"</span>
                <span class="axis-label axis-not-urgent">"Not urgent"</span>

                <div class="matrix-grid">
                    {QuadrantKey::ALL
                        .into_iter()
                        .map(|quadrant| view! { <QuadrantCard quadrant=quadrant /> })
                        .collect_view()}
                </div>
            </div>
        </Show>

        // Drag overlay following the pointer
        {move || {
            dnd.dragging_read.get().map(|payload| {
                let x = dnd.pointer_x_read.get() + 10;
                let y = dnd.pointer_y_read.get() + 10;
                view! {
                    <div
                        class="drag-overlay"
                        style=format!("position:fixed;left:{x}px;top:{y}px;pointer-events:none;")
                    >
                        {payload.task.text.clone()}
                    </div>
                }
            })
        }}
    }
}
