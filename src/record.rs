use std::collections::BTreeMap;

/// A single log event as captured by the host logging framework.
///
/// The layout treats it as read-only input; every optional datum that is
/// `None` (or an empty context map) is simply left out of the output.
#[derive(Debug, Clone, Default)]
pub struct LogEvent {
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_millis: i64,
    pub level: String,
    pub thread_name: String,
    pub logger_name: String,
    /// Current nested diagnostic context, root first.
    pub diagnostic_stack: Option<String>,
    pub context_map: BTreeMap<String, serde_json::Value>,
    pub throwable: Option<ThrowableInfo>,
    pub call_site: Option<CallSite>,
}

#[derive(Debug, Clone, Default)]
pub struct ThrowableInfo {
    pub class_name: Option<String>,
    pub message: Option<String>,
    pub formatted_trace: Option<Vec<String>>,
}

/// Location of the logging statement, when captured upstream.
#[derive(Debug, Clone, Default)]
pub struct CallSite {
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
    pub class_name: Option<String>,
    pub method_name: Option<String>,
}

/// Placeholder used by frameworks for a location component they could not
/// determine. Treated the same as `None`.
pub const UNAVAILABLE: &str = "?";

impl CallSite {
    pub fn file(&self) -> Option<&str> {
        available(self.file_name.as_deref())
    }

    pub fn class(&self) -> Option<&str> {
        available(self.class_name.as_deref())
    }

    pub fn method(&self) -> Option<&str> {
        available(self.method_name.as_deref())
    }
}

fn available(value: Option<&str>) -> Option<&str> {
    value.filter(|v| *v != UNAVAILABLE)
}
