use crate::core::{DriverError, ScrollDriver, SmoothOptions};
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(module = "/js/smooth_scroll.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = acquireLenis)]
    async fn acquire_lenis(options: JsValue) -> Result<JsValue, JsValue>;
}

/// Lenis-backed eased scrolling.
pub struct LenisDriver {
    instance: JsValue,
    raf: Function,
    destroy: Option<Function>,
}

impl ScrollDriver for LenisDriver {
    fn advance(&mut self, time_ms: f64) {
        _ = self.raf.call1(&self.instance, &JsValue::from_f64(time_ms));
    }

    fn release(&mut self) {
        if let Some(destroy) = self.destroy.take() {
            if let Err(e) = destroy.call0(&self.instance) {
                log::warn!("[parallax] lenis destroy failed: {:?}", e);
            }
        }
    }

    fn is_enhanced(&self) -> bool {
        true
    }
}

fn lenis_options(opts: SmoothOptions) -> JsValue {
    let obj = Object::new();
    _ = Reflect::set(&obj, &"lerp".into(), &JsValue::from_f64(opts.lerp));
    _ = Reflect::set(&obj, &"smoothWheel".into(), &JsValue::from_bool(opts.smooth_wheel));
    _ = Reflect::set(
        &obj,
        &"wheelMultiplier".into(),
        &JsValue::from_f64(opts.wheel_multiplier),
    );
    obj.into()
}

fn method(instance: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(instance, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

/// Try to load and construct Lenis. Any failure is reported as unavailable.
pub async fn acquire(opts: SmoothOptions) -> Result<Box<dyn ScrollDriver>, DriverError> {
    let instance = acquire_lenis(lenis_options(opts))
        .await
        .map_err(|e| DriverError::Unavailable(format!("{:?}", e)))?;
    let destroy = method(&instance, "destroy");
    let Some(raf) = method(&instance, "raf") else {
        if let Some(d) = destroy {
            _ = d.call0(&instance);
        }
        return Err(DriverError::Unavailable("instance has no raf()".into()));
    };
    log::info!("[parallax] smooth scrolling enabled");
    Ok(Box::new(LenisDriver {
        instance,
        raf,
        destroy,
    }))
}
