use super::keys::is_dismiss_key;
use crate::overlay;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Escape closes the RSVP modal while it is open.
pub fn wire_escape_to_close(window: &web::Window, document: &web::Document) {
    let document = document.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if is_dismiss_key(&ev.key()) && !overlay::is_hidden(&document) {
            overlay::hide(&document);
        }
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
