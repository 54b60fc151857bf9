use crate::core::constants::{SPEED_ATTRIBUTE, SPEED_SELECTOR};
use crate::core::{translate3d, MotionConfig, ParallaxEngine, ParallaxHost, Trackable};
use crate::events::scroll;
use crate::smooth;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type WebEngine = ParallaxEngine<WebHost>;

/// Where trackable elements are looked up.
#[derive(Clone)]
pub enum RootScope {
    Document(web::Document),
    Element(web::Element),
}

impl RootScope {
    fn query_all(&self, selector: &str) -> Option<web::NodeList> {
        match self {
            RootScope::Document(d) => d.query_selector_all(selector).ok(),
            RootScope::Element(e) => e.query_selector_all(selector).ok(),
        }
    }
}

/// Inline style of an HTML or SVG element.
fn inline_style(el: &web::Element) -> Option<web::CssStyleDeclaration> {
    if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
        Some(html.style())
    } else {
        el.dyn_ref::<web::SvgElement>().map(|svg| svg.style())
    }
}

impl Trackable for web::Element {
    fn speed_attribute(&self) -> Option<String> {
        self.get_attribute(SPEED_ATTRIBUTE)
    }

    fn apply_translation(&self, px: f64) {
        let transform = translate3d(px);
        match inline_style(self) {
            Some(style) => {
                _ = style.set_property("transform", &transform);
                _ = style.set_property("will-change", "transform");
            }
            // MathML and other namespaces without an inline style object
            None => {
                let css = format!("transform: {transform}; will-change: transform;");
                _ = self.set_attribute("style", &css);
            }
        }
    }
}

/// Browser side of the engine: rAF, passive listeners and the re-scan timer.
pub struct WebHost {
    window: web::Window,
    root: RootScope,
    on_frame: Option<Closure<dyn FnMut(f64)>>,
    on_scroll: Option<Closure<dyn FnMut()>>,
    on_resize: Option<Closure<dyn FnMut()>>,
    on_rescan: Option<Closure<dyn FnMut()>>,
    frame_id: Option<i32>,
    rescan_id: Option<i32>,
    listening: bool,
}

impl WebHost {
    pub fn new(window: web::Window, root: RootScope) -> Self {
        Self {
            window,
            root,
            on_frame: None,
            on_scroll: None,
            on_resize: None,
            on_rescan: None,
            frame_id: None,
            rescan_id: None,
            listening: false,
        }
    }

    /// Build the callbacks. They hold a weak handle so dropping the engine
    /// drops them too.
    fn wire(engine: &Rc<RefCell<WebEngine>>) {
        let weak = Rc::downgrade(engine);

        let w = weak.clone();
        let on_frame = Closure::wrap(Box::new(move |time_ms: f64| {
            with_engine(&w, |e| {
                e.host_mut().frame_id = None;
                e.on_frame(time_ms);
            });
        }) as Box<dyn FnMut(f64)>);

        let w = weak.clone();
        let on_scroll = Closure::wrap(Box::new(move || {
            with_engine(&w, |e| {
                e.on_scroll();
            });
        }) as Box<dyn FnMut()>);

        let w = weak.clone();
        let on_resize = Closure::wrap(Box::new(move || {
            with_engine(&w, |e| {
                e.on_resize();
            });
        }) as Box<dyn FnMut()>);

        let w = weak;
        let on_rescan = Closure::wrap(Box::new(move || {
            with_engine(&w, |e| {
                e.host_mut().rescan_id = None;
                e.on_rescan();
            });
        }) as Box<dyn FnMut()>);

        let mut e = engine.borrow_mut();
        let host = e.host_mut();
        host.on_frame = Some(on_frame);
        host.on_scroll = Some(on_scroll);
        host.on_resize = Some(on_resize);
        host.on_rescan = Some(on_rescan);
    }
}

fn with_engine(weak: &Weak<RefCell<WebEngine>>, f: impl FnOnce(&mut WebEngine)) {
    if let Some(engine) = weak.upgrade() {
        // A callback can land while the engine is already borrowed by a
        // synchronous caller; skipping it is harmless, the next tick repaints.
        if let Ok(mut e) = engine.try_borrow_mut() {
            f(&mut e);
        }
    }
}

impl ParallaxHost for WebHost {
    type Element = web::Element;

    fn scan(&self) -> Vec<web::Element> {
        let Some(list) = self.root.query_all(SPEED_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<web::Element>().ok())
            .collect()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn listen(&mut self) {
        if self.listening {
            return;
        }
        if let Some(cb) = &self.on_scroll {
            scroll::add_passive_listener(&self.window, "scroll", cb.as_ref().unchecked_ref());
        }
        if let Some(cb) = &self.on_resize {
            scroll::add_passive_listener(&self.window, "resize", cb.as_ref().unchecked_ref());
        }
        self.listening = true;
    }

    fn unlisten(&mut self) {
        if !self.listening {
            return;
        }
        if let Some(cb) = &self.on_scroll {
            scroll::remove_listener(&self.window, "scroll", cb.as_ref().unchecked_ref());
        }
        if let Some(cb) = &self.on_resize {
            scroll::remove_listener(&self.window, "resize", cb.as_ref().unchecked_ref());
        }
        self.listening = false;
    }

    fn schedule_rescan(&mut self, delay_ms: i32) {
        self.cancel_rescan();
        if let Some(cb) = &self.on_rescan {
            self.rescan_id = self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    cb.as_ref().unchecked_ref(),
                    delay_ms,
                )
                .ok();
        }
    }

    fn cancel_rescan(&mut self) {
        if let Some(id) = self.rescan_id.take() {
            self.window.clear_timeout_with_handle(id);
        }
    }

    fn request_frame(&mut self) {
        if self.frame_id.is_some() {
            return;
        }
        if let Some(cb) = &self.on_frame {
            self.frame_id = self
                .window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .ok();
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.frame_id.take() {
            _ = self.window.cancel_animation_frame(id);
        }
    }
}

/// Create, wire and start an engine for `root`. Smooth-scroll acquisition
/// resolves in the background; the frame loop starts when it does.
pub fn mount(root: RootScope, config: MotionConfig) -> anyhow::Result<Rc<RefCell<WebEngine>>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let engine = Rc::new(RefCell::new(ParallaxEngine::new(
        WebHost::new(window, root),
        config,
    )));
    WebHost::wire(&engine);
    engine.borrow_mut().start();
    log::info!(
        "[parallax] mounted: elements={} scale={}",
        engine.borrow().tracked_len(),
        engine.borrow().motion_scale()
    );

    let weak = Rc::downgrade(&engine);
    spawn_local(async move {
        let probe = smooth::acquire(config.smooth_options()).await;
        match weak.upgrade() {
            Some(engine) => engine.borrow_mut().attach_driver(probe),
            None => {
                if let Ok(mut late) = probe {
                    late.release();
                }
            }
        }
    });
    Ok(engine)
}
