//! Environment variable utilities
//!
//! Runtime configuration is read through these helpers. An empty value is
//! treated the same as an unset variable.
//!
//! Build-time flags are NOT read here: the build resolver needs strict
//! parsing where an unrecognized value is an error, not a default.

use std::str::FromStr;

/// Raw value of `key`, `None` when unset, empty or not unicode.
#[inline]
fn env_raw(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse `key` as `T`, falling back to `default` when unset or unparsable.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Boolean switch. `1|true|yes|on` and `0|false|no|off` (any case) are
/// recognized; anything else yields `default`.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match env_raw(key).map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

/// `Some(T)` if `key` is set and parses.
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env_raw(key).and_then(|v| v.trim().parse().ok())
}

#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    env_raw(key).unwrap_or_else(|| default.to_string())
}

/// Set to a non-empty value.
#[inline]
pub fn env_is_set(key: &str) -> bool {
    env_raw(key).is_some()
}
