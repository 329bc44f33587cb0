//! Environment variable names used by this crate for convenient
//! configuration of the layout from a service's environment.
//!
//! These are purely helpers; the mapper itself only sees a
//! [`LayoutConfig`](crate::config::LayoutConfig) and an [`OverrideSource`].

/// Whether location info is rendered (`true`/`false`, default `true`).
pub const LOGSTASH_LAYOUT_LOCATION_INFO_ENV: &str = "LOGSTASH_LAYOUT_LOCATION_INFO";

/// Per-instance static user fields, `key:value,key:value`.
pub const LOGSTASH_LAYOUT_USER_FIELDS_ENV: &str = "LOGSTASH_LAYOUT_USER_FIELDS";

/// Process-wide user-field override, read on every formatted event.
pub const LOGSTASH_LAYOUT_USER_FIELDS_OVERRIDE_ENV: &str = "LOGSTASH_LAYOUT_USER_FIELDS_OVERRIDE";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean environment variable; unrecognised values yield `default`.
pub fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Named lookup for the process-wide user-field override.
///
/// Queried on every formatted event, never cached, so the override may be
/// changed between log calls.
pub trait OverrideSource: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads overrides from the process environment.
#[derive(Clone, Debug, Default)]
pub struct EnvOverride;

impl OverrideSource for EnvOverride {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> OverrideSource for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}
