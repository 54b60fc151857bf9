use crate::constants::{
    DEFAULT_SUBMIT_ERROR, RSVP_API_PATH, RSVP_ATTENDANCE_NAME, RSVP_CLOSE_ID, RSVP_DRIVER_ID,
    RSVP_FORM_ID, RSVP_GUESTS_ID, RSVP_NAME_ID, RSVP_SUBMIT_ID, RSVP_THANKS_CLOSE_ID,
};
use crate::core::rsvp::{
    parse_body, validate, RelayOutcome, RelayPayload, RelayResponse, RsvpError,
};
use crate::dom;
use crate::events::{keyboard, pointer};
use crate::overlay;
use js_sys::{Function, Promise, Reflect};
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// POST a JSON body with the global `fetch`, so it works in a window or a
/// worker.
async fn post_json(url: &str, body: &str) -> anyhow::Result<web::Response> {
    let headers = web::Headers::new().map_err(js_err)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_err)?;
    let init = web::RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(body));
    let request = web::Request::new_with_str_and_init(url, &init).map_err(js_err)?;

    let global = js_sys::global();
    let fetch: Function = Reflect::get(&global, &JsValue::from_str("fetch"))
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("fetch is not available"))?;
    let promise: Promise = fetch
        .call1(&global, &request)
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("fetch did not return a promise"))?;
    let resp = JsFuture::from(promise).await.map_err(js_err)?;
    resp.dyn_into::<web::Response>()
        .map_err(|_| anyhow::anyhow!("fetch did not resolve to a Response"))
}

// ---------------- Relay ----------------

async fn forward(endpoint: Option<String>, body: &str) -> Result<(), RsvpError> {
    let endpoint = endpoint
        .filter(|e| !e.trim().is_empty())
        .ok_or(RsvpError::MissingEndpoint)?;
    let submission = parse_body(body)?;
    let received_at = String::from(js_sys::Date::new_0().to_iso_string());
    let payload = RelayPayload::new(submission, received_at);
    let json = serde_json::to_string(&payload).map_err(|e| {
        log::error!("[rsvp] could not encode payload: {e}");
        RsvpError::Unexpected
    })?;
    // One attempt; the endpoint's own reply is not inspected.
    post_json(&endpoint, &json).await.map_err(|e| {
        log::error!("[rsvp] relay transport failed: {e:?}");
        RsvpError::Unexpected
    })?;
    Ok(())
}

/// Validate a raw RSVP body and forward it to `endpoint`.
pub async fn relay(endpoint: Option<String>, body: &str) -> RelayOutcome {
    let result = forward(endpoint, body).await;
    match &result {
        Ok(()) => log::info!("[rsvp] relayed submission"),
        Err(e) => log::warn!("[rsvp] relay rejected: {e}"),
    }
    RelayOutcome::from_result(result)
}

// ---------------- Form ----------------

fn checked_attendance(document: &web::Document) -> Option<String> {
    let selector = format!("input[name=\"{}\"]:checked", RSVP_ATTENDANCE_NAME);
    document
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<web::HtmlInputElement>().ok())
        .map(|i| i.value())
}

/// Collect the form fields in the same loose shape the relay accepts.
fn read_form(document: &web::Document) -> Value {
    let name = dom::input_by_id(document, RSVP_NAME_ID)
        .map(|i| i.value())
        .unwrap_or_default();
    let guests = dom::input_by_id(document, RSVP_GUESTS_ID)
        .map(|i| i.value_as_number())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0);
    let driver = dom::input_by_id(document, RSVP_DRIVER_ID)
        .map(|i| i.checked())
        .unwrap_or(false);
    let user_agent = web::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default();
    json!({
        "name": name,
        "additionalGuests": guests,
        "bringingDriver": driver,
        "attendance": checked_attendance(document).unwrap_or_default(),
        "userAgent": user_agent,
    })
}

async fn send(document: &web::Document) -> Result<(), String> {
    let submission = validate(&read_form(document)).map_err(|e| e.to_string())?;
    let body = serde_json::to_string(&submission).map_err(|e| e.to_string())?;
    let resp = post_json(RSVP_API_PATH, &body).await.map_err(|e| {
        log::error!("[rsvp] submit failed: {e:?}");
        DEFAULT_SUBMIT_ERROR.to_string()
    })?;
    if resp.ok() {
        return Ok(());
    }
    let text = match resp.text() {
        Ok(p) => JsFuture::from(p).await.ok().and_then(|v| v.as_string()),
        Err(_) => None,
    };
    let message = text
        .and_then(|t| serde_json::from_str::<RelayResponse>(&t).ok())
        .and_then(|r| r.error)
        .unwrap_or_else(|| DEFAULT_SUBMIT_ERROR.to_string());
    Err(message)
}

async fn submit(document: web::Document) {
    overlay::set_sending(&document, true);
    overlay::set_error(&document, None);
    match send(&document).await {
        Ok(()) => {
            log::info!("[rsvp] submitted");
            overlay::show_thanks(&document);
        }
        Err(msg) => overlay::set_error(&document, Some(&msg)),
    }
    overlay::set_sending(&document, false);
}

fn is_sending(document: &web::Document) -> bool {
    document
        .get_element_by_id(RSVP_SUBMIT_ID)
        .and_then(|e| e.dyn_into::<web::HtmlButtonElement>().ok())
        .is_some_and(|b| b.disabled())
}

/// Hook the modal's triggers, dismissal paths and form submission.
pub fn wire(window: &web::Window, document: &web::Document) {
    pointer::wire_rsvp_triggers(document);
    pointer::wire_backdrop_click(document);
    keyboard::wire_escape_to_close(window, document);

    for id in [RSVP_CLOSE_ID, RSVP_THANKS_CLOSE_ID] {
        let doc = document.clone();
        dom::add_click_listener(document, id, move || overlay::hide(&doc));
    }

    let Some(form) = document.get_element_by_id(RSVP_FORM_ID) else {
        log::warn!("[rsvp] missing #{}", RSVP_FORM_ID);
        return;
    };
    let doc = document.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        ev.prevent_default();
        if is_sending(&doc) {
            return;
        }
        spawn_local(submit(doc.clone()));
    }) as Box<dyn FnMut(_)>);
    _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
    closure.forget();
}
