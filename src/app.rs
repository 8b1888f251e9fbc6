//! App Root Component
//!
//! Provides the shared context and sync layer, kicks off the initial load,
//! and switches between the matrix and archive views.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{ArchivePage, MatrixGrid, ToastView};
use crate::context::{use_app_context, AppContext, AppView};
use crate::store::{use_app_store, AppStateStoreFields};
use crate::sync::provide_task_sync;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext::new());
    let sync = provide_task_sync();

    Effect::new(move |_| {
        spawn_local(async move {
            sync.load().await;
        });
    });

    let ctx = use_app_context();
    let store = use_app_store();

    view! {
        <div class="app">
            <header class="app-header">
                <h1>"Eisenhower Matrix"</h1>
                <nav class="view-switch">
                    <button
                        class=move || {
                            if ctx.view.get() == AppView::Matrix { "active" } else { "" }
                        }
                        on:click=move |_| ctx.show_view(AppView::Matrix)
                    >
                        "Matrix"
                    </button>
                    <button
                        class=move || {
                            if ctx.view.get() == AppView::Archive { "active" } else { "" }
                        }
                        on:click=move |_| ctx.show_view(AppView::Archive)
                    >
                        "Archive"
                    </button>
                </nav>
            </header>

            <Show when=move || store.error().read().is_some()>
                <div class="error-banner">
                    {move || store.error().get().unwrap_or_default()}
                </div>
            </Show>

            <main>
                <Show
                    when=move || ctx.view.get() == AppView::Matrix
                    fallback=|| view! { <ArchivePage /> }
                >
                    <MatrixGrid />
                </Show>
            </main>

            <ToastView />
        </div>
    }
}
