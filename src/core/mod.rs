pub mod constants;
pub mod parallax;
pub mod rsvp;

pub use parallax::*;
