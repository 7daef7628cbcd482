use imgview_core::{ViewerConfig, ViewerVariant};
use leptos::*;
use leptos_meta::*;

use crate::components::ImageViewer;

const SAMPLE_IMAGE_URL: &str = "assets/sample.jpg";

/// Read a query parameter from the current page URL.
fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get(name)
}

fn variant_from_query() -> ViewerVariant {
    match query_param("variant").as_deref() {
        Some("overlay") => ViewerVariant::Overlay,
        _ => ViewerVariant::Image,
    }
}

/// Preset for the requested variant, optionally overridden by `?config=<json>`.
/// A bad override is logged and ignored.
fn load_viewer_config() -> ViewerConfig {
    let variant = variant_from_query();
    let preset = ViewerConfig::for_variant(variant);

    let Some(json) = query_param("config") else {
        return preset;
    };

    match ViewerConfig::from_json(&json) {
        Ok(config) => {
            log::info!("Using viewer config override: {:?}", config);
            config
        }
        Err(err) => {
            log::warn!(
                "Ignoring viewer config override ({}), using {:?} preset",
                err,
                variant
            );
            preset
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = load_viewer_config();
    let initial_src = query_param("src").unwrap_or_else(|| SAMPLE_IMAGE_URL.to_string());

    let (src, set_src) = create_signal(initial_src);
    let (is_open, set_is_open) = create_signal(true);

    let on_close = Callback::new(move |_: ()| {
        log::debug!("Viewer closed");
        set_is_open.set(false);
    });

    view! {
        <Title text="Image Viewer" />
        <div class="flex flex-col w-screen h-screen bg-neutral-900 text-white">
            <header class="flex items-center gap-2 px-4 py-3 bg-black/50">
                <input
                    type="text"
                    class="flex-1 rounded bg-white/10 px-3 py-1 text-sm"
                    prop:value=move || src.get()
                    on:change=move |ev| {
                        set_src.set(event_target_value(&ev));
                        set_is_open.set(true);
                    }
                />
                <Show when=move || !is_open.get()>
                    <button
                        class="rounded px-3 py-1 text-sm hover:bg-white/10"
                        on:click=move |_| set_is_open.set(true)
                    >
                        "Open"
                    </button>
                </Show>
            </header>
            <main class="flex-1 p-4">
                <Show when=move || is_open.get()>
                    <ImageViewer
                        src=Signal::derive(move || src.get())
                        config=config.clone()
                        on_close=on_close
                    />
                </Show>
            </main>
        </div>
    }
}
