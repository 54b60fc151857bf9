use crate::constants::{RSVP_OVERLAY_ID, RSVP_TRIGGER_SELECTOR};
use crate::overlay;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Every `#rsvp` link opens the modal instead of navigating.
pub fn wire_rsvp_triggers(document: &web::Document) {
    let Ok(links) = document.query_selector_all(RSVP_TRIGGER_SELECTOR) else {
        return;
    };
    for i in 0..links.length() {
        let Some(link) = links.get(i) else { continue };
        let doc = document.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            ev.prevent_default();
            overlay::show(&doc);
        }) as Box<dyn FnMut(_)>);
        _ = link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    log::debug!("[rsvp] wired {} trigger links", links.length());
}

/// Clicking the dimmed backdrop, not the dialog inside it, closes the modal.
pub fn wire_backdrop_click(document: &web::Document) {
    let Some(backdrop) = document.get_element_by_id(RSVP_OVERLAY_ID) else {
        return;
    };
    let doc = document.clone();
    let target_el = backdrop.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let on_backdrop = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .is_some_and(|t| t == target_el);
        if on_backdrop {
            overlay::hide(&doc);
        }
    }) as Box<dyn FnMut(_)>);
    _ = backdrop.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
