use leptos::*;

const BUTTON_CLASS: &str = "text-white hover:text-gray-200 hover:bg-white/10 rounded-full p-2 transition-colors disabled:opacity-40 disabled:pointer-events-none";

#[component]
fn MinusIcon() -> impl IntoView {
    view! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
            <line x1="5" y1="12" x2="19" y2="12"/>
        </svg>
    }
}

#[component]
fn PlusIcon() -> impl IntoView {
    view! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
            <line x1="12" y1="5" x2="12" y2="19"/>
            <line x1="5" y1="12" x2="19" y2="12"/>
        </svg>
    }
}

#[component]
fn FitIcon() -> impl IntoView {
    view! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
            <polyline points="15 3 21 3 21 9"/>
            <polyline points="9 21 3 21 3 15"/>
            <line x1="21" y1="3" x2="14" y2="10"/>
            <line x1="3" y1="21" x2="10" y2="14"/>
        </svg>
    }
}

/// Toolbar with zoom out, zoom percentage, zoom in and fit.
#[component]
pub fn ZoomControls(
    /// Rounded zoom percentage, `None` until an image is laid out
    zoom_percent: Signal<Option<i32>>,
    on_zoom_out: Callback<()>,
    on_zoom_in: Callback<()>,
    on_fit: Callback<()>,
) -> impl IntoView {
    let disabled = move || zoom_percent.get().is_none();

    view! {
        <div class="flex items-center gap-1 rounded-full bg-black/50 backdrop-blur-sm px-2 py-1">
            <button
                class=BUTTON_CLASS
                on:click=move |_| on_zoom_out.call(())
                disabled=disabled
                title="Zoom out"
            >
                <MinusIcon />
            </button>
            <span class="w-14 text-center text-sm tabular-nums text-white">
                {move || match zoom_percent.get() {
                    Some(percent) => format!("{}%", percent),
                    None => "-".to_string(),
                }}
            </span>
            <button
                class=BUTTON_CLASS
                on:click=move |_| on_zoom_in.call(())
                disabled=disabled
                title="Zoom in"
            >
                <PlusIcon />
            </button>
            <button
                class=BUTTON_CLASS
                on:click=move |_| on_fit.call(())
                disabled=disabled
                title="Fit to view"
            >
                <FitIcon />
            </button>
        </div>
    }
}
