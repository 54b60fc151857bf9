/// DOM hooks and browser-side tuning for the invitation page.
///
/// Element ids here must match the static markup.
// Parallax root; the whole document is scanned when absent
pub const SITE_ROOT_ID: &str = "site-root";

// Motion signals
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const COMPACT_VIEWPORT_MAX_WIDTH: f64 = 768.0; // px, exclusive

// RSVP modal
pub const RSVP_TRIGGER_SELECTOR: &str = "a[href=\"#rsvp\"]";
pub const RSVP_OVERLAY_ID: &str = "rsvp-overlay";
pub const RSVP_FORM_ID: &str = "rsvp-form";
pub const RSVP_CLOSE_ID: &str = "rsvp-close";
pub const RSVP_THANKS_ID: &str = "rsvp-thanks";
pub const RSVP_THANKS_CLOSE_ID: &str = "rsvp-thanks-close";
pub const RSVP_ERROR_ID: &str = "rsvp-error";
pub const RSVP_SUBMIT_ID: &str = "rsvp-submit";

// RSVP form fields
pub const RSVP_NAME_ID: &str = "rsvp-name";
pub const RSVP_GUESTS_ID: &str = "rsvp-guests";
pub const RSVP_DRIVER_ID: &str = "rsvp-driver";
pub const RSVP_ATTENDANCE_NAME: &str = "attendance";

// RSVP submission
pub const RSVP_API_PATH: &str = "/api/rsvp";
pub const SUBMIT_LABEL: &str = "Submit";
pub const SUBMITTING_LABEL: &str = "Submitting...";
pub const DEFAULT_SUBMIT_ERROR: &str = "Submission failed";

// Marker used to restore the page overflow after the modal closes
pub const PREV_OVERFLOW_ATTR: &str = "data-prev-overflow";
