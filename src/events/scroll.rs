use web_sys as web;

/// Register a listener that can never call `preventDefault`.
pub fn add_passive_listener(target: &web::EventTarget, kind: &str, callback: &js_sys::Function) {
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(true);
    if let Err(e) = target
        .add_event_listener_with_callback_and_add_event_listener_options(kind, callback, &opts)
    {
        log::warn!("[events] could not listen for {kind}: {:?}", e);
    }
}

pub fn remove_listener(target: &web::EventTarget, kind: &str, callback: &js_sys::Function) {
    _ = target.remove_event_listener_with_callback(kind, callback);
}
