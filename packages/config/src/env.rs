// ABOUTME: Typed environment variable lookups with defaults
// ABOUTME: Invalid values fall back to the default and are logged, never fatal

use std::str::FromStr;

use tracing::warn;

/// Read a string variable, falling back to `default` when unset or blank
pub fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

/// Read and parse a variable, falling back to `default` when unset or invalid
pub fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid value for {}: {:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// Read an optional secret; blank values count as unset
pub fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
