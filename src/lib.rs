#![cfg(target_arch = "wasm32")]
use crate::core::MotionConfig;
use js_sys::{Object, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod overlay;
mod rsvp;
mod smooth;

/// A mounted parallax engine. Dropping or destroying it releases everything
/// the engine registered with the browser.
#[wasm_bindgen]
pub struct ParallaxHandle {
    engine: Rc<RefCell<frame::WebEngine>>,
}

#[wasm_bindgen]
impl ParallaxHandle {
    pub fn destroy(&self) {
        match self.engine.try_borrow_mut() {
            Ok(mut e) => e.teardown(),
            Err(_) => log::warn!("[parallax] destroy skipped: engine is busy"),
        }
    }

    /// Number of tracked elements; 0 while the engine is busy.
    #[wasm_bindgen(getter)]
    pub fn tracked(&self) -> usize {
        self.engine.try_borrow().map(|e| e.tracked_len()).unwrap_or(0)
    }

    #[wasm_bindgen(getter)]
    pub fn enhanced(&self) -> bool {
        self.engine.try_borrow().map(|e| e.is_enhanced()).unwrap_or(false)
    }
}

impl Drop for ParallaxHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Mount a parallax engine on `root` (or the whole document).
#[wasm_bindgen]
pub fn mount_parallax(
    root: Option<web::Element>,
    is_compact_viewport: bool,
    reduced_motion: bool,
) -> Result<ParallaxHandle, JsValue> {
    let scope = match root {
        Some(el) => frame::RootScope::Element(el),
        None => dom::window_document()
            .map(frame::RootScope::Document)
            .ok_or_else(|| JsValue::from_str("no document"))?,
    };
    let config = MotionConfig {
        is_compact_viewport,
        reduced_motion,
    };
    let engine = frame::mount(scope, config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(ParallaxHandle { engine })
}

/// Validate and forward an RSVP body. Resolves to `{ status, body }`.
#[wasm_bindgen]
pub async fn relay_rsvp(endpoint: Option<String>, body: String) -> JsValue {
    let outcome = rsvp::relay(endpoint, &body).await;
    let obj = Object::new();
    _ = Reflect::set(&obj, &"status".into(), &JsValue::from(outcome.status));
    _ = Reflect::set(&obj, &"body".into(), &JsValue::from_str(&outcome.body()));
    obj.into()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("wedding-web starting");

    spawn_local(async move {
        if let Err(e) = init() {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let config = dom::motion_config(&window);
    log::info!(
        "[parallax] compact={} reduced_motion={}",
        config.is_compact_viewport,
        config.reduced_motion
    );
    let engine = frame::mount(dom::site_root(&document), config)?;
    // The page-level engine lives as long as the page.
    std::mem::forget(engine);

    rsvp::wire(&window, &document);
    Ok(())
}
