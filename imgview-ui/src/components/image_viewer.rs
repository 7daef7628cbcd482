use imgview_core::{ViewerConfig, ViewerEngine};
use leptos::*;

use crate::components::ZoomControls;
use crate::hooks::{use_escape_key, use_viewer_interaction, ViewerInteraction};

#[component]
pub fn ImageViewer(
    /// Image URL to display
    #[prop(into)]
    src: Signal<String>,
    /// Zoom bounds and gesture tuning
    config: ViewerConfig,
    #[prop(optional, into)] alt: String,
    /// Fired when Escape is pressed
    #[prop(optional)]
    on_close: Option<Callback<()>>,
) -> impl IntoView {
    let engine = create_rw_signal(ViewerEngine::new(config));
    let container_ref = create_node_ref::<html::Div>();
    let image_ref = create_node_ref::<html::Img>();

    let ViewerInteraction { is_interacting } =
        use_viewer_interaction(container_ref, image_ref, engine);

    if let Some(on_close) = on_close {
        use_escape_key(move || on_close.call(()));
    }

    // A new source has no layout until it loads
    create_effect(move |previous: Option<String>| {
        let current = src.get();
        if previous.is_some_and(|previous| previous != current) {
            engine.update(|e| e.clear_content());
        }
        current
    });

    let transform = move || {
        engine
            .with(|e| e.css_transform())
            .unwrap_or_else(|| "none".to_string())
    };
    let visibility = move || {
        if engine.with(|e| e.is_ready()) {
            "visible"
        } else {
            "hidden"
        }
    };
    let cursor = move || {
        if is_interacting.get() {
            "grabbing"
        } else {
            "grab"
        }
    };

    let zoom_percent = Signal::derive(move || engine.with(|e| e.zoom_percent()));
    let on_zoom_out = Callback::new(move |_: ()| engine.update(|e| e.zoom_out()));
    let on_zoom_in = Callback::new(move |_: ()| engine.update(|e| e.zoom_in()));
    let on_fit = Callback::new(move |_: ()| engine.update(|e| e.reset()));

    view! {
        <div class="relative w-full h-full">
            <div
                node_ref=container_ref
                class="relative w-full h-full min-h-[240px] overflow-hidden bg-black rounded select-none"
                style:touch-action="none"
                style:cursor=cursor
            >
                <img
                    node_ref=image_ref
                    src=move || src.get()
                    alt=alt
                    draggable="false"
                    class="absolute left-0 top-0 max-w-none pointer-events-none"
                    style:transform-origin="0 0"
                    style:transform=transform
                    style:visibility=visibility
                />
            </div>
            // Outside the gesture container so pointer capture never swallows clicks
            <div class="absolute bottom-3 left-1/2 -translate-x-1/2">
                <ZoomControls
                    zoom_percent=zoom_percent
                    on_zoom_out=on_zoom_out
                    on_zoom_in=on_zoom_in
                    on_fit=on_fit
                />
            </div>
        </div>
    }
}
