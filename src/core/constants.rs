// Engine tuning constants shared by the parallax core and the web host.

// Element discovery
pub const SPEED_ATTRIBUTE: &str = "data-speed";
pub const SPEED_SELECTOR: &str = "[data-speed]";

// Motion scale per viewport class
pub const MOTION_SCALE_FULL: f64 = 1.0;
pub const MOTION_SCALE_COMPACT: f64 = 0.4; // phones move less
pub const MOTION_SCALE_REDUCED: f64 = 0.0;

// One-shot re-scan after start, picks up late-mounted nodes
pub const RESCAN_DELAY_MS: i32 = 50;

// Smooth-scroll (Lenis) tuning
pub const SMOOTH_LERP_COMPACT: f64 = 0.12;
pub const SMOOTH_LERP_FULL: f64 = 0.1;
pub const SMOOTH_WHEEL_MULTIPLIER_COMPACT: f64 = 0.6;
pub const SMOOTH_WHEEL_MULTIPLIER_FULL: f64 = 0.9;
