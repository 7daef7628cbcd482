use imgview_core::{GestureMode, PointerId, ViewerEngine};
use leptos::*;
use leptos_use::{use_element_size, UseElementSizeReturn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Element, EventTarget, HtmlImageElement};

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// Handle returned by the viewer interaction hook.
///
/// Engine updates happen inside the hook; the handle only exposes derived state.
pub struct ViewerInteraction {
    /// True while a drag or pinch is in progress
    pub is_interacting: Signal<bool>,
}

/// Listeners attached by hand, detached together on cleanup.
struct ListenerSet {
    target: EventTarget,
    listeners: Vec<(&'static str, Listener)>,
}

impl ListenerSet {
    fn new(target: EventTarget) -> Self {
        Self {
            target,
            listeners: Vec::new(),
        }
    }

    fn add(&mut self, event: &'static str, listener: Listener) {
        let result = self
            .target
            .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
        self.keep(event, listener, result);
    }

    /// Wheel listeners must be non-passive so `prevent_default` stops page scroll.
    fn add_non_passive(&mut self, event: &'static str, listener: Listener) {
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let result = self
            .target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                listener.as_ref().unchecked_ref(),
                &options,
            );
        self.keep(event, listener, result);
    }

    fn keep(&mut self, event: &'static str, listener: Listener, result: Result<(), JsValue>) {
        match result {
            Ok(()) => self.listeners.push((event, listener)),
            Err(err) => log::warn!("Failed to add {} listener: {:?}", event, err),
        }
    }

    fn detach(self) {
        for (event, listener) in &self.listeners {
            let _ = self
                .target
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
        }
    }
}

fn listener<F>(handler: F) -> Listener
where
    F: FnMut(web_sys::Event) + 'static,
{
    Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>)
}

/// Touch and pen contacts always count; a mouse only drags with its primary button.
fn is_primary_press(pointer_type: &str, button: i16) -> bool {
    pointer_type != "mouse" || button == 0
}

/// Client coordinates relative to the element's top-left corner.
fn local_point(element: &Element, client_x: i32, client_y: i32) -> (f64, f64) {
    let rect = element.get_bounding_client_rect();
    (client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

/// Push the image's natural size into the engine, sampling the container first
/// so the fit uses its current dimensions.
fn sync_content_size(
    image: &HtmlImageElement,
    container: Option<&Element>,
    engine: RwSignal<ViewerEngine>,
) {
    let (width, height) = (image.natural_width(), image.natural_height());
    if width == 0 || height == 0 {
        log::warn!("Image {} loaded without a natural size", image.src());
        return;
    }

    let viewport = container.map(|el| {
        let rect = el.get_bounding_client_rect();
        (rect.width(), rect.height())
    });

    engine.update(|e| {
        if let Some((vw, vh)) = viewport {
            e.set_viewport_size(vw, vh);
        }
        e.set_content_size(width as f64, height as f64);
    });
}

/// Gesture wiring for an image viewer.
///
/// Feeds pointer, wheel, container resize and image load events from the DOM
/// into `engine`. Pointer and wheel listeners live on the container and are
/// removed when the owning scope is cleaned up.
pub fn use_viewer_interaction(
    container_ref: NodeRef<html::Div>,
    image_ref: NodeRef<html::Img>,
    engine: RwSignal<ViewerEngine>,
) -> ViewerInteraction {
    let is_interacting =
        Signal::derive(move || engine.with(|e| e.gesture_mode() != GestureMode::Idle));

    // Container resize → refit
    let UseElementSizeReturn { width, height } = use_element_size(container_ref);
    create_effect(move |_| {
        let (w, h) = (width.get(), height.get());
        engine.update(|e| e.set_viewport_size(w, h));
    });

    // Pointer and wheel input
    create_effect(move |_| {
        let Some(container_el) = container_ref.get() else {
            return;
        };
        let container = container_el.unchecked_ref::<Element>().clone();
        let mut set = ListenerSet::new(container.clone().into());

        let target = container.clone();
        set.add(
            "pointerdown",
            listener(move |ev| {
                let Some(ev) = ev.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                if !is_primary_press(&ev.pointer_type(), ev.button()) {
                    return;
                }
                ev.prevent_default();
                let _ = target.set_pointer_capture(ev.pointer_id());
                let (x, y) = local_point(&target, ev.client_x(), ev.client_y());
                engine.update(|e| e.pointer_down(PointerId(ev.pointer_id()), x, y));
            }),
        );

        let target = container.clone();
        set.add(
            "pointermove",
            listener(move |ev| {
                let Some(ev) = ev.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                let id = PointerId(ev.pointer_id());
                // Hover moves with no button pressed are not ours to track
                if engine.with_untracked(|e| e.gesture_mode() == GestureMode::Idle) {
                    return;
                }
                let (x, y) = local_point(&target, ev.client_x(), ev.client_y());
                engine.update(|e| e.pointer_move(id, x, y));
            }),
        );

        set.add(
            "pointerup",
            listener(move |ev| {
                let Some(ev) = ev.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                let id = PointerId(ev.pointer_id());
                let timestamp = ev.time_stamp();
                engine.update(|e| {
                    if let Some(tap) = e.pointer_up(id) {
                        e.tap(tap.x(), tap.y(), timestamp);
                    }
                });
            }),
        );

        set.add(
            "pointercancel",
            listener(move |ev| {
                if let Some(ev) = ev.dyn_ref::<web_sys::PointerEvent>() {
                    engine.update(|e| e.pointer_cancel(PointerId(ev.pointer_id())));
                }
            }),
        );

        // A mouse leaving the container ends its drag
        set.add(
            "pointerleave",
            listener(move |ev| {
                let Some(ev) = ev.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                if ev.pointer_type() == "mouse" {
                    engine.update(|e| e.pointer_cancel(PointerId(ev.pointer_id())));
                }
            }),
        );

        let target = container.clone();
        set.add_non_passive(
            "wheel",
            listener(move |ev| {
                let Some(ev) = ev.dyn_ref::<web_sys::WheelEvent>() else {
                    return;
                };
                ev.prevent_default();
                let (x, y) = local_point(&target, ev.client_x(), ev.client_y());
                engine.update(|e| e.wheel(ev.delta_y(), x, y));
            }),
        );

        on_cleanup(move || set.detach());
    });

    // Image load → content size
    create_effect(move |_| {
        let Some(image_el) = image_ref.get() else {
            return;
        };
        let image = image_el.unchecked_ref::<HtmlImageElement>().clone();
        let mut set = ListenerSet::new(image.clone().into());

        let loaded = image.clone();
        set.add(
            "load",
            listener(move |_| {
                let container = container_ref
                    .get_untracked()
                    .map(|el| el.unchecked_ref::<Element>().clone());
                sync_content_size(&loaded, container.as_ref(), engine);
            }),
        );

        let failed = image.clone();
        set.add(
            "error",
            listener(move |_| {
                log::warn!("Failed to load image {}", failed.src());
                engine.update(|e| e.clear_content());
            }),
        );

        // Cached images can finish loading before the listener is attached
        if image.complete() && image.natural_width() > 0 {
            let container = container_ref
                .get_untracked()
                .map(|el| el.unchecked_ref::<Element>().clone());
            sync_content_size(&image, container.as_ref(), engine);
        }

        on_cleanup(move || set.detach());
    });

    ViewerInteraction { is_interacting }
}
