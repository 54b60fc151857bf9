// Scroll-synchronized parallax engine.
//
// The engine maps the page scroll offset to a vertical translation for every
// element that declares a speed coefficient. It knows nothing about the
// browser: element discovery, listeners, timers and frame scheduling are
// reached through [`ParallaxHost`], and the optional smooth-scroll layer is a
// [`ScrollDriver`]. The web frontend supplies real implementations; tests
// feed synthetic ticks.

use super::constants::{
    MOTION_SCALE_COMPACT, MOTION_SCALE_FULL, MOTION_SCALE_REDUCED, RESCAN_DELAY_MS,
    SMOOTH_LERP_COMPACT, SMOOTH_LERP_FULL, SMOOTH_WHEEL_MULTIPLIER_COMPACT,
    SMOOTH_WHEEL_MULTIPLIER_FULL,
};
use thiserror::Error;

/// Motion signals supplied by the caller at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionConfig {
    pub is_compact_viewport: bool,
    pub reduced_motion: bool,
}

impl MotionConfig {
    /// Multiplier applied to every element's displacement.
    pub fn motion_scale(&self) -> f64 {
        if self.reduced_motion {
            MOTION_SCALE_REDUCED
        } else if self.is_compact_viewport {
            MOTION_SCALE_COMPACT
        } else {
            MOTION_SCALE_FULL
        }
    }

    pub fn smooth_options(&self) -> SmoothOptions {
        if self.is_compact_viewport {
            SmoothOptions {
                lerp: SMOOTH_LERP_COMPACT,
                smooth_wheel: true,
                wheel_multiplier: SMOOTH_WHEEL_MULTIPLIER_COMPACT,
            }
        } else {
            SmoothOptions {
                lerp: SMOOTH_LERP_FULL,
                smooth_wheel: true,
                wheel_multiplier: SMOOTH_WHEEL_MULTIPLIER_FULL,
            }
        }
    }
}

/// Options handed to the smooth-scroll library when it is acquired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothOptions {
    pub lerp: f64,
    pub smooth_wheel: bool,
    pub wheel_multiplier: f64,
}

/// Read a speed coefficient the way `parseFloat` does: the longest numeric
/// prefix wins, anything else is zero.
pub fn parse_speed(raw: Option<&str>) -> f64 {
    let s = match raw {
        Some(s) => s.trim_start(),
        None => return 0.0,
    };
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut best = None;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                best = Some(end + 1);
            }
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                if matches!(bytes.get(end + 1), Some(b'+' | b'-')) {
                    end += 1;
                }
            }
            _ => break,
        }
        end += 1;
    }
    best.and_then(|n| s[..n].parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Vertical displacement in device pixels for one element.
#[inline]
pub fn offset_px(scroll_y: f64, speed: f64, motion_scale: f64) -> f64 {
    let px = scroll_y * speed * motion_scale;
    // -0 would print as "-0px"
    if px == 0.0 {
        0.0
    } else {
        px
    }
}

#[inline]
pub fn translate3d(px: f64) -> String {
    format!("translate3d(0, {}px, 0)", px)
}

/// A visual node carrying a speed coefficient.
pub trait Trackable {
    /// Raw value of the speed attribute, if present.
    fn speed_attribute(&self) -> Option<String>;
    /// Write the vertical translation and the `will-change` hint.
    fn apply_translation(&self, px: f64);
}

/// Smooth-scroll capability. The passthrough implementation does nothing and
/// lets the host's raw scroll offset through.
pub trait ScrollDriver {
    /// Step eased scrolling for the frame at `time_ms`.
    fn advance(&mut self, time_ms: f64);
    fn release(&mut self);
    fn is_enhanced(&self) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct Passthrough;

impl ScrollDriver for Passthrough {
    fn advance(&mut self, _time_ms: f64) {}
    fn release(&mut self) {}
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("smooth scroll unavailable: {0}")]
    Unavailable(String),
}

/// Choose the driver for an engine from the acquisition probe.
pub fn select_driver(probe: Result<Box<dyn ScrollDriver>, DriverError>) -> Box<dyn ScrollDriver> {
    match probe {
        Ok(driver) => driver,
        Err(e) => {
            log::info!("[parallax] {e}; using passthrough scrolling");
            Box::new(Passthrough)
        }
    }
}

/// Everything the engine needs from its runtime.
///
/// Hosts must tolerate `unlisten`, `cancel_rescan` and `cancel_frame` when
/// nothing is registered.
pub trait ParallaxHost {
    type Element: Trackable;

    /// Enumerate trackable elements inside the root scope.
    fn scan(&self) -> Vec<Self::Element>;
    fn scroll_y(&self) -> f64;
    /// Attach passive scroll and resize listeners.
    fn listen(&mut self);
    fn unlisten(&mut self);
    fn schedule_rescan(&mut self, delay_ms: i32);
    fn cancel_rescan(&mut self);
    fn request_frame(&mut self);
    fn cancel_frame(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Created,
    Running,
    TornDown,
}

struct Tracked<E> {
    element: E,
    speed: f64,
}

pub struct ParallaxEngine<H: ParallaxHost> {
    host: H,
    items: Vec<Tracked<H::Element>>,
    motion_scale: f64,
    last_y: Option<f64>,
    driver: Option<Box<dyn ScrollDriver>>,
    phase: Phase,
}

impl<H: ParallaxHost> ParallaxEngine<H> {
    pub fn new(host: H, config: MotionConfig) -> Self {
        Self {
            host,
            items: Vec::new(),
            motion_scale: config.motion_scale(),
            last_y: None,
            driver: None,
            phase: Phase::Created,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn motion_scale(&self) -> f64 {
        self.motion_scale
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tracked_len(&self) -> usize {
        self.items.len()
    }

    pub fn is_enhanced(&self) -> bool {
        self.driver.as_ref().is_some_and(|d| d.is_enhanced())
    }

    /// Scan the root scope, attach listeners, arm the delayed re-scan and
    /// paint once.
    pub fn start(&mut self) {
        if self.phase != Phase::Created {
            return;
        }
        self.phase = Phase::Running;
        self.retrack();
        self.host.listen();
        self.host.schedule_rescan(RESCAN_DELAY_MS);
        log::debug!(
            "[parallax] tracking {} elements, scale={}",
            self.items.len(),
            self.motion_scale
        );
        self.force_update();
        if self.driver.is_some() {
            self.host.request_frame();
        }
    }

    /// Install the outcome of smooth-scroll acquisition and start the frame
    /// loop. A driver arriving after teardown is released on the spot.
    pub fn attach_driver(&mut self, probe: Result<Box<dyn ScrollDriver>, DriverError>) {
        if self.phase == Phase::TornDown {
            if let Ok(mut late) = probe {
                late.release();
            }
            return;
        }
        if let Some(mut old) = self.driver.take() {
            old.release();
        }
        self.driver = Some(select_driver(probe));
        if self.phase == Phase::Running {
            self.host.request_frame();
        }
    }

    /// Per-frame callback. Returns the number of elements written.
    pub fn on_frame(&mut self, time_ms: f64) -> usize {
        if self.phase != Phase::Running {
            return 0;
        }
        if let Some(driver) = self.driver.as_mut() {
            driver.advance(time_ms);
        }
        let written = self.update();
        self.host.request_frame();
        written
    }

    pub fn on_scroll(&mut self) -> usize {
        if self.phase != Phase::Running {
            return 0;
        }
        self.update()
    }

    pub fn on_resize(&mut self) -> usize {
        if self.phase != Phase::Running {
            return 0;
        }
        self.update()
    }

    /// Delayed re-scan: re-enumerate elements and repaint unconditionally.
    pub fn on_rescan(&mut self) -> usize {
        if self.phase != Phase::Running {
            return 0;
        }
        self.retrack();
        log::debug!("[parallax] re-scan found {} elements", self.items.len());
        self.force_update()
    }

    /// Release listeners, timers, the frame request and the driver.
    pub fn teardown(&mut self) {
        if self.phase == Phase::TornDown {
            return;
        }
        self.phase = Phase::TornDown;
        self.host.unlisten();
        self.host.cancel_rescan();
        self.host.cancel_frame();
        if let Some(mut driver) = self.driver.take() {
            driver.release();
        }
        self.items.clear();
    }

    fn retrack(&mut self) {
        self.items = self
            .host
            .scan()
            .into_iter()
            .map(|element| {
                let speed = parse_speed(element.speed_attribute().as_deref());
                Tracked { element, speed }
            })
            .collect();
    }

    fn force_update(&mut self) -> usize {
        self.last_y = None;
        self.update()
    }

    fn update(&mut self) -> usize {
        let y = self.host.scroll_y();
        if self.last_y == Some(y) {
            return 0;
        }
        for item in &self.items {
            item.element
                .apply_translation(offset_px(y, item.speed, self.motion_scale));
        }
        self.last_y = Some(y);
        self.items.len()
    }
}
