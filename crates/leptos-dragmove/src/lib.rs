//! Leptos Drag-Move Utilities
//!
//! Pointer-driven drag-and-drop for Leptos using mouse events.
//! Uses a movement threshold to distinguish click from drag, and lets drop
//! targets register themselves under the pointer via mouseenter/mouseleave,
//! so the pointer position (not bounding-box overlap) decides the candidate
//! target.
//!
//! Generic over a drag payload `P` (captured in full at drag start, so an
//! overlay can render it without a lookup) and a drop-target identity `T`.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

/// DnD state signals.
///
/// `Idle -> Pending (mousedown) -> Dragging (moved past threshold)
/// -> mouseup (dropped on target / dropped outside) -> Idle`.
pub struct DragSignals<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
{
    pub dragging_read: ReadSignal<Option<P>>,
    pub dragging_write: WriteSignal<Option<P>>,
    pub drop_target_read: ReadSignal<Option<T>>,
    pub drop_target_write: WriteSignal<Option<T>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending payload (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<P>>,
    pub pending_write: WriteSignal<Option<P>>,
    /// Start position for movement detection
    pub start_x_read: ReadSignal<i32>,
    pub start_x_write: WriteSignal<i32>,
    pub start_y_read: ReadSignal<i32>,
    pub start_y_write: WriteSignal<i32>,
    /// Live pointer position while dragging, for overlay placement
    pub pointer_x_read: ReadSignal<i32>,
    pub pointer_x_write: WriteSignal<i32>,
    pub pointer_y_read: ReadSignal<i32>,
    pub pointer_y_write: WriteSignal<i32>,
}

impl<P, T> Clone for DragSignals<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, T> Copy for DragSignals<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
{
}

pub fn create_drag_signals<P, T>() -> DragSignals<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
{
    let (dragging_read, dragging_write) = signal(None::<P>);
    let (drop_target_read, drop_target_write) = signal(None::<T>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None::<P>);
    let (start_x_read, start_x_write) = signal(0i32);
    let (start_y_read, start_y_write) = signal(0i32);
    let (pointer_x_read, pointer_x_write) = signal(0i32);
    let (pointer_y_read, pointer_y_write) = signal(0i32);
    DragSignals {
        dragging_read,
        dragging_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_read,
        pending_write,
        start_x_read,
        start_x_write,
        start_y_read,
        start_y_write,
        pointer_x_read,
        pointer_x_write,
        pointer_y_read,
        pointer_y_write,
    }
}

/// End drag operation
pub fn end_drag<P, T>(dnd: &DragSignals<P, T>)
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
{
    dnd.dragging_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_write.set(None);
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable elements.
/// Records the pending payload with the start position.
pub fn make_on_mousedown<P, T>(dnd: DragSignals<P, T>, payload: P) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() == 0 {
            // Ignore if target is input or button
            if let Some(target) = ev.target() {
                if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
                if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            }
            // Record pending drag with position
            dnd.pending_write.set(Some(payload.clone()));
            dnd.start_x_write.set(ev.client_x());
            dnd.start_y_write.set(ev.client_y());
        }
    }
}

/// Create mousemove handler for document - starts drag once moved past the
/// threshold, and keeps the pointer position current for the overlay.
///
/// The listener is removed when the binding reactive owner is disposed, so a
/// remounted binder never leaves a stale closure reading disposed signals.
fn bind_global_mousemove<P, T>(dnd: DragSignals<P, T>)
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_read.get_untracked();

        // If we have a pending drag and haven't started dragging yet
        if pending.is_some() && dnd.dragging_read.get_untracked().is_none() {
            let start_x = dnd.start_x_read.get_untracked();
            let start_y = dnd.start_y_read.get_untracked();
            let dx = (ev.client_x() - start_x).abs();
            let dy = (ev.client_y() - start_y).abs();

            // Start dragging if moved beyond threshold
            if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                dnd.dragging_write.set(pending);
            }
        }

        if dnd.dragging_read.get_untracked().is_some() {
            dnd.pointer_x_write.set(ev.client_x());
            dnd.pointer_y_write.set(ev.client_y());
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        }
    }
    // The cleanup callback owns the closure, keeping it alive exactly as
    // long as the listener is attached. `SendWrapper` satisfies
    // `on_cleanup`'s `Send + Sync` bound; cleanup runs on the same
    // (only) thread that created the closure.
    let on_mousemove = send_wrapper::SendWrapper::new(on_mousemove);
    on_cleanup(move || {
        if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
            let _ = doc.remove_event_listener_with_callback(
                "mousemove",
                on_mousemove.as_ref().unchecked_ref(),
            );
        }
    });
}

/// Create mouseenter handler for a drop target. The pointer entering the
/// target's container makes it the candidate target.
pub fn make_on_target_mouseenter<P, T>(dnd: DragSignals<P, T>, target: T) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.drop_target_write.set(Some(target));
        }
    }
}

/// Create mouseleave handler for a drop target.
pub fn make_on_target_mouseleave<P, T>(dnd: DragSignals<P, T>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection.
///
/// `on_drop` fires only for a real drag (not a plain click); a `None` target
/// means the payload was dropped outside every registered target and the
/// caller should treat the gesture as cancelled.
///
/// Both document listeners are detached when the caller's reactive owner is
/// disposed, so a component that binds on mount can unmount and remount
/// without stacking handlers.
pub fn bind_global_mouseup<P, T, F>(dnd: DragSignals<P, T>, on_drop: F)
where
    P: Clone + Send + Sync + 'static,
    T: Copy + PartialEq + Send + Sync + 'static,
    F: Fn(P, Option<T>) + Clone + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging = dnd.dragging_read.get_untracked();
        let drop_target = dnd.drop_target_read.get_untracked();

        // Clear pending state first
        dnd.pending_write.set(None);

        // If we were actually dragging (not just clicking)
        if let Some(payload) = dragging {
            end_drag(&dnd);
            on_drop(payload, drop_target);
        } else {
            // Not dragging - just end any pending state
            end_drag(&dnd);
            // Click event will fire naturally on the element
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        }
    }
    let on_mouseup = send_wrapper::SendWrapper::new(on_mouseup);
    on_cleanup(move || {
        if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
            let _ = doc.remove_event_listener_with_callback(
                "mouseup",
                on_mouseup.as_ref().unchecked_ref(),
            );
        }
    });

    // Also bind global mousemove
    bind_global_mousemove(dnd);
}
