use leptos::*;

/// Calls `on_escape` whenever Escape is pressed anywhere in the window.
/// The listener belongs to the calling scope and is removed when it is disposed.
pub fn use_escape_key<F>(on_escape: F)
where
    F: Fn() + 'static,
{
    let _ = leptos_use::use_event_listener(
        leptos_use::use_window(),
        leptos::ev::keydown,
        move |ev| {
            if ev.key() == "Escape" {
                on_escape();
            }
        },
    );
}
