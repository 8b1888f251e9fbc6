//! Toast Component
//!
//! Renders the current notification from the app context, if any.

use leptos::prelude::*;

use crate::context::{use_app_context, ToastKind};

#[component]
pub fn ToastView() -> impl IntoView {
    let ctx = use_app_context();
    let toast = ctx.current_toast();

    view! {
        <Show when=move || toast.read().is_some()>
            <div class=move || {
                match toast.read().as_ref().map(|t| t.kind) {
                    Some(ToastKind::Error) => "toast toast-error",
                    _ => "toast toast-success",
                }
            }>
                {move || toast.read().as_ref().map(|t| t.message.clone())}
            </div>
        </Show>
    }
}
