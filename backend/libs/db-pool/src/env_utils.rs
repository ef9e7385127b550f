//! Environment variable parsing utilities
//!
//! Missing and unparsable values are treated differently: a missing optional variable
//! falls back to its default, while a present-but-invalid value is reported so that a
//! typo in deployment config does not silently become the default.

use std::str::FromStr;

/// Parse an optional environment variable, falling back to `default` when unset
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_or("SERVER_PORT", 3001)?;
/// ```
pub fn parse_env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Failed to parse {}='{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Read a required, non-empty environment variable
pub fn require_env(key: &str) -> Result<String, String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(format!("{} environment variable is empty", key)),
        Err(_) => Err(format!("{} environment variable not set", key)),
    }
}
