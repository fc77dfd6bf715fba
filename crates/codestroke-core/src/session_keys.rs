//! Session key conventions.
//!
//! Pure string functions. These define the keys the engine writes into
//! the host's session-scoped key/value store.

/// The single active-encounter record. One browsing session owns it.
pub const ACTIVE_ENCOUNTER: &str = "codestroke/encounter";

/// Map a key to a file name that is safe on every platform.
pub fn file_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    name.push_str(".json");
    name
}
