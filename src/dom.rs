use crate::constants::{COMPACT_VIEWPORT_MAX_WIDTH, REDUCED_MOTION_QUERY, SITE_ROOT_ID};
use crate::core::MotionConfig;
use crate::frame::RootScope;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// `false` when `matchMedia` is missing or rejects the query.
pub fn media_matches(window: &web::Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .map(|m| m.matches())
        .unwrap_or(false)
}

/// Read the motion signals once; the engine keeps them for its lifetime.
pub fn motion_config(window: &web::Window) -> MotionConfig {
    let width = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(COMPACT_VIEWPORT_MAX_WIDTH);
    MotionConfig {
        is_compact_viewport: width < COMPACT_VIEWPORT_MAX_WIDTH,
        reduced_motion: media_matches(window, REDUCED_MOTION_QUERY),
    }
}

/// The site container when present, otherwise the whole document.
pub fn site_root(document: &web::Document) -> RootScope {
    match document.get_element_by_id(SITE_ROOT_ID) {
        Some(el) => RootScope::Element(el),
        None => RootScope::Document(document.clone()),
    }
}

#[inline]
pub fn input_by_id(document: &web::Document, id: &str) -> Option<web::HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<web::HtmlInputElement>().ok())
}
