use crate::constants::{
    PREV_OVERFLOW_ATTR, RSVP_ERROR_ID, RSVP_FORM_ID, RSVP_NAME_ID, RSVP_OVERLAY_ID,
    RSVP_SUBMIT_ID, RSVP_THANKS_ID, SUBMITTING_LABEL, SUBMIT_LABEL,
};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn set_visible(el: &web::Element, visible: bool) {
    let cl = el.class_list();
    if visible {
        _ = cl.remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    } else {
        _ = cl.add_1("hidden");
        _ = el.set_attribute("style", "display:none");
    }
}

/// Open the RSVP modal on the form view and lock page scrolling.
pub fn show(document: &web::Document) {
    let Some(el) = document.get_element_by_id(RSVP_OVERLAY_ID) else {
        log::warn!("[rsvp] missing #{}", RSVP_OVERLAY_ID);
        return;
    };
    if !is_hidden(document) {
        return;
    }
    show_form(document);
    set_visible(&el, true);
    lock_scroll(document);
    if let Some(first) = document
        .get_element_by_id(RSVP_NAME_ID)
        .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
    {
        _ = first.focus();
    }
}

/// Close the modal, reset the thanks view and restore page scrolling.
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(RSVP_OVERLAY_ID) {
        set_visible(&el, false);
    }
    show_form(document);
    unlock_scroll(document);
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    if let Some(el) = document.get_element_by_id(RSVP_OVERLAY_ID) {
        if el.class_list().contains("hidden") {
            return true;
        }
        return el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false);
    }
    true
}

pub fn show_form(document: &web::Document) {
    if let Some(form) = document.get_element_by_id(RSVP_FORM_ID) {
        set_visible(&form, true);
    }
    if let Some(thanks) = document.get_element_by_id(RSVP_THANKS_ID) {
        set_visible(&thanks, false);
    }
}

pub fn show_thanks(document: &web::Document) {
    if let Some(form) = document.get_element_by_id(RSVP_FORM_ID) {
        set_visible(&form, false);
    }
    if let Some(thanks) = document.get_element_by_id(RSVP_THANKS_ID) {
        set_visible(&thanks, true);
    }
}

/// Show `message` in the alert box, or clear it with `None`.
pub fn set_error(document: &web::Document, message: Option<&str>) {
    if let Some(el) = document.get_element_by_id(RSVP_ERROR_ID) {
        match message {
            Some(m) => {
                el.set_text_content(Some(m));
                set_visible(&el, true);
            }
            None => {
                el.set_text_content(None);
                set_visible(&el, false);
            }
        }
    }
}

pub fn set_sending(document: &web::Document, sending: bool) {
    if let Some(btn) = document
        .get_element_by_id(RSVP_SUBMIT_ID)
        .and_then(|e| e.dyn_into::<web::HtmlButtonElement>().ok())
    {
        btn.set_disabled(sending);
        btn.set_text_content(Some(if sending { SUBMITTING_LABEL } else { SUBMIT_LABEL }));
    }
}

fn root_html(document: &web::Document) -> Option<web::HtmlElement> {
    document
        .document_element()
        .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
}

fn lock_scroll(document: &web::Document) {
    if let Some(html) = root_html(document) {
        if html.has_attribute(PREV_OVERFLOW_ATTR) {
            return;
        }
        let style = html.style();
        let prev = style.get_property_value("overflow").unwrap_or_default();
        _ = html.set_attribute(PREV_OVERFLOW_ATTR, &prev);
        _ = style.set_property("overflow", "hidden");
    }
}

fn unlock_scroll(document: &web::Document) {
    if let Some(html) = root_html(document) {
        let Some(prev) = html.get_attribute(PREV_OVERFLOW_ATTR) else {
            return;
        };
        let style = html.style();
        if prev.is_empty() {
            _ = style.remove_property("overflow");
        } else {
            _ = style.set_property("overflow", &prev);
        }
        _ = html.remove_attribute(PREV_OVERFLOW_ATTR);
    }
}
