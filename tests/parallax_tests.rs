// Host-side tests for the parallax engine.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod parallax {
    include!("../src/core/parallax.rs");
}

use parallax::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone)]
struct FakeElement {
    speed: Option<String>,
    writes: Rc<RefCell<Vec<f64>>>,
}

impl FakeElement {
    fn new(speed: Option<&str>) -> Self {
        Self {
            speed: speed.map(str::to_string),
            writes: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn last(&self) -> Option<f64> {
        self.writes.borrow().last().copied()
    }

    fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl Trackable for FakeElement {
    fn speed_attribute(&self) -> Option<String> {
        self.speed.clone()
    }

    fn apply_translation(&self, px: f64) {
        self.writes.borrow_mut().push(px);
    }
}

#[derive(Default)]
struct Page {
    scroll_y: Cell<f64>,
    elements: RefCell<Vec<FakeElement>>,
}

impl Page {
    fn with_speeds(speeds: &[&str]) -> (Rc<Page>, Vec<FakeElement>) {
        let els: Vec<FakeElement> = speeds.iter().map(|s| FakeElement::new(Some(s))).collect();
        let page = Rc::new(Page::default());
        *page.elements.borrow_mut() = els.clone();
        (page, els)
    }

    fn mount(&self, el: FakeElement) {
        self.elements.borrow_mut().push(el);
    }

    fn scroll_to(&self, y: f64) {
        self.scroll_y.set(y);
    }
}

struct FakeHost {
    page: Rc<Page>,
    listening: bool,
    rescan_delay: Option<i32>,
    frame_pending: bool,
    frame_requests: usize,
}

impl FakeHost {
    fn new(page: Rc<Page>) -> Self {
        Self {
            page,
            listening: false,
            rescan_delay: None,
            frame_pending: false,
            frame_requests: 0,
        }
    }

    fn is_quiet(&self) -> bool {
        !self.listening && self.rescan_delay.is_none() && !self.frame_pending
    }
}

impl ParallaxHost for FakeHost {
    type Element = FakeElement;

    fn scan(&self) -> Vec<FakeElement> {
        self.page.elements.borrow().clone()
    }

    fn scroll_y(&self) -> f64 {
        self.page.scroll_y.get()
    }

    fn listen(&mut self) {
        self.listening = true;
    }

    fn unlisten(&mut self) {
        self.listening = false;
    }

    fn schedule_rescan(&mut self, delay_ms: i32) {
        self.rescan_delay = Some(delay_ms);
    }

    fn cancel_rescan(&mut self) {
        self.rescan_delay = None;
    }

    fn request_frame(&mut self) {
        self.frame_pending = true;
        self.frame_requests += 1;
    }

    fn cancel_frame(&mut self) {
        self.frame_pending = false;
    }
}

#[derive(Clone, Default)]
struct DriverLog {
    advances: Rc<Cell<u32>>,
    releases: Rc<Cell<u32>>,
}

struct FakeDriver(DriverLog);

impl ScrollDriver for FakeDriver {
    fn advance(&mut self, _time_ms: f64) {
        self.0.advances.set(self.0.advances.get() + 1);
    }

    fn release(&mut self) {
        self.0.releases.set(self.0.releases.get() + 1);
    }

    fn is_enhanced(&self) -> bool {
        true
    }
}

fn engine_for(page: &Rc<Page>, config: MotionConfig) -> ParallaxEngine<FakeHost> {
    ParallaxEngine::new(FakeHost::new(page.clone()), config)
}

fn unavailable() -> Result<Box<dyn ScrollDriver>, DriverError> {
    Err(DriverError::Unavailable("not loaded".into()))
}

/// Deliver the pending animation frame, as the browser would.
fn tick(engine: &mut ParallaxEngine<FakeHost>, time_ms: f64) -> usize {
    assert!(engine.host().frame_pending, "no frame was requested");
    engine.host_mut().frame_pending = false;
    engine.on_frame(time_ms)
}

fn fire_rescan(engine: &mut ParallaxEngine<FakeHost>) -> usize {
    assert_eq!(engine.host_mut().rescan_delay.take(), Some(50));
    engine.on_rescan()
}

const DESKTOP: MotionConfig = MotionConfig {
    is_compact_viewport: false,
    reduced_motion: false,
};

#[test]
fn motion_scale_follows_signals() {
    let cases = [
        (false, false, 1.0),
        (true, false, 0.4),
        (false, true, 0.0),
        (true, true, 0.0),
    ];
    for (compact, reduced, expected) in cases {
        let cfg = MotionConfig {
            is_compact_viewport: compact,
            reduced_motion: reduced,
        };
        assert_eq!(cfg.motion_scale(), expected, "compact={compact} reduced={reduced}");
    }
}

#[test]
fn smooth_options_depend_on_viewport() {
    let compact = MotionConfig {
        is_compact_viewport: true,
        reduced_motion: false,
    }
    .smooth_options();
    assert_eq!(compact.lerp, 0.12);
    assert_eq!(compact.wheel_multiplier, 0.6);
    assert!(compact.smooth_wheel);

    let desktop = DESKTOP.smooth_options();
    assert_eq!(desktop.lerp, 0.1);
    assert_eq!(desktop.wheel_multiplier, 0.9);
}

#[test]
fn parse_speed_behaves_like_parse_float() {
    assert_eq!(parse_speed(Some("0.06")), 0.06);
    assert_eq!(parse_speed(Some("-0.12")), -0.12);
    assert_eq!(parse_speed(Some("  +0.1")), 0.1);
    assert_eq!(parse_speed(Some("0.1px")), 0.1);
    assert_eq!(parse_speed(Some(".5")), 0.5);
    assert_eq!(parse_speed(Some("1e-1")), 0.1);
    assert_eq!(parse_speed(Some("2e")), 2.0);
    assert_eq!(parse_speed(Some("1.5.2")), 1.5);
}

#[test]
fn malformed_speeds_are_zero() {
    for raw in ["", "abc", "-", ".", "px0.1", "NaN", "Infinity"] {
        assert_eq!(parse_speed(Some(raw)), 0.0, "raw={raw:?}");
    }
    assert_eq!(parse_speed(None), 0.0);
}

#[test]
fn translate_is_pure_vertical_3d() {
    assert_eq!(translate3d(-12.0), "translate3d(0, -12px, 0)");
    assert_eq!(translate3d(2.5), "translate3d(0, 2.5px, 0)");
    // zero displacement never prints a negative zero
    assert_eq!(translate3d(offset_px(100.0, -0.1, 0.0)), "translate3d(0, 0px, 0)");
}

#[test]
fn start_paints_once_at_rest() {
    let (page, els) = Page::with_speeds(&["0.1", "-0.2"]);
    let mut engine = engine_for(&page, DESKTOP);
    engine.start();

    assert_eq!(engine.phase(), Phase::Running);
    assert_eq!(engine.tracked_len(), 2);
    assert!(engine.host().listening);
    assert_eq!(engine.host().rescan_delay, Some(50));
    for el in &els {
        assert_eq!(el.write_count(), 1);
        assert_eq!(el.last(), Some(0.0));
    }
    // frame loop waits for the acquisition result
    assert!(!engine.host().frame_pending);
}

#[test]
fn three_elements_scroll_to_100() {
    let (page, els) = Page::with_speeds(&["-0.12", "0.06", "0.1"]);
    let mut engine = engine_for(&page, DESKTOP);
    engine.start();
    engine.attach_driver(unavailable());
    assert!(!engine.is_enhanced());

    page.scroll_to(100.0);
    assert_eq!(tick(&mut engine, 16.0), 3);
    let got: Vec<f64> = els.iter().map(|e| e.last().unwrap()).collect();
    assert_eq!(got, vec![-12.0, 6.0, 10.0]);

    let before: Vec<usize> = els.iter().map(FakeElement::write_count).collect();
    assert_eq!(tick(&mut engine, 32.0), 0);
    let after: Vec<usize> = els.iter().map(FakeElement::write_count).collect();
    assert_eq!(before, after);
    // the loop keeps itself alive
    assert!(engine.host().frame_pending);
}

#[test]
fn translation_is_linear_in_offset() {
    let speeds = ["-0.08", "0.06", "-0.12", "0.04", "0.02"];
    let (page, els) = Page::with_speeds(&speeds);
    let cfg = MotionConfig {
        is_compact_viewport: true,
        reduced_motion: false,
    };
    let mut engine = engine_for(&page, cfg);
    engine.start();
    engine.attach_driver(unavailable());

    let mut t = 0.0;
    for y in [3.0, 17.5, 250.0, 999.0, 0.0, 1234.25] {
        page.scroll_to(y);
        t += 16.0;
        tick(&mut engine, t);
        for (el, s) in els.iter().zip(speeds) {
            let s: f64 = s.parse().unwrap();
            assert_eq!(el.last(), Some(offset_px(y, s, 0.4)));
        }
    }
}

#[test]
fn reduced_motion_pins_everything_to_zero() {
    let (page, els) = Page::with_speeds(&["-0.12", "0.06", "0.1"]);
    let cfg = MotionConfig {
        is_compact_viewport: true,
        reduced_motion: true,
    };
    let mut engine = engine_for(&page, cfg);
    assert_eq!(engine.motion_scale(), 0.0);
    engine.start();
    engine.attach_driver(unavailable());

    for y in [1.0, 480.0, 12_000.0] {
        page.scroll_to(y);
        engine.on_scroll();
        tick(&mut engine, y);
    }
    for el in &els {
        assert!(el.writes.borrow().iter().all(|px| *px == 0.0));
    }
    assert_eq!(engine.motion_scale(), 0.0);
}

#[test]
fn scroll_and_resize_update_only_on_change() {
    let (page, els) = Page::with_speeds(&["0.5"]);
    let mut engine = engine_for(&page, DESKTOP);
    engine.start();

    page.scroll_to(40.0);
    assert_eq!(engine.on_scroll(), 1);
    assert_eq!(els[0].last(), Some(20.0));

    // resize without scroll movement
    assert_eq!(engine.on_resize(), 0);
    assert_eq!(engine.on_scroll(), 0);

    page.scroll_to(10.0);
    assert_eq!(engine.on_resize(), 1);
    assert_eq!(els[0].last(), Some(5.0));
    assert_eq!(els[0].write_count(), 3);
}

#[test]
fn rescan_tracks_late_mounts_and_repaints() {
    let (page, els) = Page::with_speeds(&["0.1"]);
    let mut engine = engine_for(&page, DESKTOP);
    engine.start();
    page.scroll_to(200.0);
    engine.on_scroll();

    let late = FakeElement::new(Some("-0.06"));
    page.mount(late.clone());
    assert_eq!(fire_rescan(&mut engine), 2);
    assert_eq!(engine.tracked_len(), 2);
    assert_eq!(late.last(), Some(offset_px(200.0, -0.06, 1.0)));
    // forced even though the offset did not move
    assert_eq!(els[0].write_count(), 3);

    // nothing is picked up after the one re-scan
    let too_late = FakeElement::new(Some("0.3"));
    page.mount(too_late.clone());
    page.scroll_to(300.0);
    engine.on_scroll();
    assert_eq!(too_late.write_count(), 0);
    assert_eq!(engine.tracked_len(), 2);
}

#[test]
fn malformed_element_speed_stays_put() {
    let page = Rc::new(Page::default());
    let broken = FakeElement::new(Some("fast"));
    let missing = FakeElement::new(None);
    page.mount(broken.clone());
    page.mount(missing.clone());
    let mut engine = engine_for(&page, DESKTOP);
    engine.start();
    page.scroll_to(500.0);
    engine.on_scroll();
    assert_eq!(broken.last(), Some(0.0));
    assert_eq!(missing.last(), Some(0.0));
}

#[test]
fn every_marked_element_is_tracked_whatever_its_kind() {
    // svg groups and html blocks both carry the speed attribute
    let page = Rc::new(Page::default());
    let block = FakeElement::new(Some("0.1"));
    let svg_group = FakeElement::new(Some("-0.06"));
    let zero_speed = FakeElement::new(Some("0"));
    page.mount(block.clone());
    page.mount(svg_group.clone());
    page.mount(zero_speed.clone());

    let mut engine = engine_for(&page, DESKTOP);
    engine.start();
    assert_eq!(engine.tracked_len(), 3);
    page.scroll_to(100.0);
    assert_eq!(engine.on_scroll(), 3);
    assert_eq!(block.last(), Some(10.0));
    assert_eq!(svg_group.last(), Some(-6.0));
    assert_eq!(zero_speed.last(), Some(0.0));
}

#[test]
fn teardown_releases_everything_and_is_idempotent() {
    let (page, els) = Page::with_speeds(&["0.1"]);
    let mut engine = engine_for(&page, DESKTOP);
    let log = DriverLog::default();
    engine.start();
    engine.attach_driver(Ok(Box::new(FakeDriver(log.clone()))));
    assert!(engine.is_enhanced());
    page.scroll_to(10.0);
    tick(&mut engine, 16.0);

    engine.teardown();
    assert_eq!(engine.phase(), Phase::TornDown);
    assert!(engine.host().is_quiet());
    assert_eq!(log.releases.get(), 1);

    engine.teardown();
    assert!(engine.host().is_quiet());
    assert_eq!(log.releases.get(), 1);

    // late callbacks are ignored
    let writes = els[0].write_count();
    page.scroll_to(99.0);
    assert_eq!(engine.on_scroll(), 0);
    assert_eq!(engine.on_resize(), 0);
    assert_eq!(engine.on_rescan(), 0);
    assert_eq!(engine.on_frame(50.0), 0);
    assert_eq!(els[0].write_count(), writes);
    assert!(engine.host().is_quiet());
}

#[test]
fn teardown_before_acquisition_resolves() {
    let (page, _els) = Page::with_speeds(&["0.1"]);
    let mut engine = engine_for(&page, DESKTOP);
    engine.start();
    engine.teardown();
    assert!(engine.host().is_quiet());

    let log = DriverLog::default();
    engine.attach_driver(Ok(Box::new(FakeDriver(log.clone()))));
    assert_eq!(log.releases.get(), 1);
    assert_eq!(engine.host().frame_requests, 0);
    assert!(engine.host().is_quiet());
    assert!(!engine.is_enhanced());

    engine.attach_driver(unavailable());
    engine.teardown();
    assert!(engine.host().is_quiet());
}

#[test]
fn teardown_before_start_is_harmless() {
    let (page, els) = Page::with_speeds(&["0.1"]);
    let mut engine = engine_for(&page, DESKTOP);
    engine.teardown();
    engine.start();
    assert_eq!(engine.phase(), Phase::TornDown);
    assert!(engine.host().is_quiet());
    assert_eq!(els[0].write_count(), 0);
}

#[test]
fn driver_attached_before_start_begins_loop_on_start() {
    let (page, _els) = Page::with_speeds(&["0.1"]);
    let mut engine = engine_for(&page, DESKTOP);
    engine.attach_driver(unavailable());
    assert!(!engine.host().frame_pending);
    engine.start();
    assert!(engine.host().frame_pending);
}

#[test]
fn enhanced_and_passthrough_paint_the_same() {
    let speeds = ["-0.12", "0.06", "0.1", "-0.04"];
    let (page_a, els_a) = Page::with_speeds(&speeds);
    let (page_b, els_b) = Page::with_speeds(&speeds);
    let log = DriverLog::default();

    let mut enhanced = engine_for(&page_a, DESKTOP);
    enhanced.start();
    enhanced.attach_driver(Ok(Box::new(FakeDriver(log.clone()))));
    let mut plain = engine_for(&page_b, DESKTOP);
    plain.start();
    plain.attach_driver(unavailable());

    let trace = [0.0, 0.0, 12.0, 12.0, 48.5, 120.0, 119.0, 119.0, 640.0];
    for (i, y) in trace.iter().enumerate() {
        let t = i as f64 * 16.0;
        page_a.scroll_to(*y);
        page_b.scroll_to(*y);
        assert_eq!(tick(&mut enhanced, t), tick(&mut plain, t));
    }
    for (a, b) in els_a.iter().zip(&els_b) {
        assert_eq!(*a.writes.borrow(), *b.writes.borrow());
    }
    assert_eq!(log.advances.get(), trace.len() as u32);
}

#[test]
fn select_driver_falls_back_on_error() {
    assert!(!select_driver(unavailable()).is_enhanced());
    let log = DriverLog::default();
    assert!(select_driver(Ok(Box::new(FakeDriver(log)))).is_enhanced());
}
