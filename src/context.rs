//! Application Context
//!
//! Shared UI signals provided via Leptos Context API: the active view and
//! transient toast notifications.

use leptos::prelude::*;
use leptos::task::spawn_local;

/// Which top-level view is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Matrix,
    Archive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

const TOAST_DISMISS_MS: u32 = 3000;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub view: ReadSignal<AppView>,
    set_view: WriteSignal<AppView>,
    toast: RwSignal<Option<Toast>>,
    /// Monotonic toast id so a late dismiss timer can't clear a newer toast
    toast_seq: StoredValue<u32>,
}

impl AppContext {
    pub fn new() -> Self {
        let (view, set_view) = signal(AppView::Matrix);
        Self {
            view,
            set_view,
            toast: RwSignal::new(None),
            toast_seq: StoredValue::new(0),
        }
    }

    pub fn show_view(&self, view: AppView) {
        self.set_view.set(view);
    }

    pub fn current_toast(&self) -> ReadSignal<Option<Toast>> {
        self.toast.read_only()
    }

    /// Show a toast and auto-dismiss it after a few seconds.
    pub fn notify(&self, message: impl Into<String>, kind: ToastKind) {
        let seq = self.toast_seq.get_value().wrapping_add(1);
        self.toast_seq.set_value(seq);
        self.toast.set(Some(Toast { message: message.into(), kind }));

        let toast = self.toast;
        let toast_seq = self.toast_seq;
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(TOAST_DISMISS_MS).await;
            if toast_seq.get_value() == seq {
                toast.set(None);
            }
        });
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
