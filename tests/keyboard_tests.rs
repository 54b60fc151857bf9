// Host-side tests for pure keyboard functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod keys {
    include!("../src/events/keys.rs");
}

use keys::*;

#[test]
fn escape_dismisses_the_modal() {
    assert!(is_dismiss_key("Escape"));
    // legacy Edge/IE key name
    assert!(is_dismiss_key("Esc"));
}

#[test]
fn other_keys_do_not_dismiss() {
    for key in ["Enter", " ", "Tab", "escape", "ESC", "e", "Backspace", ""] {
        assert!(!is_dismiss_key(key), "key={key:?}");
    }
}
