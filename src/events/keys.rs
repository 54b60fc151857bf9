// Pure key predicates, kept free of web-sys so they can be tested on the host.

#[inline]
pub fn is_dismiss_key(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}
