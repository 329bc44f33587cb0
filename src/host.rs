/// Host name emitted when the local host cannot be resolved.
pub const UNKNOWN_HOST: &str = "unknown-host";

/// Source of the host identity stamped on every document.
///
/// Resolved once per mapper; implementations must not fail; they fall back
/// to a sentinel instead.
pub trait HostContextProvider: Send + Sync {
    fn resolve(&self) -> String;
}

/// Resolves the host name from the operating system.
#[derive(Clone, Debug, Default)]
pub struct SystemHost;

impl HostContextProvider for SystemHost {
    fn resolve(&self) -> String {
        match hostname::get() {
            Ok(name) => {
                let name = name.to_string_lossy().into_owned();
                if name.is_empty() {
                    tracing::warn!("system returned an empty host name, using {UNKNOWN_HOST}");
                    UNKNOWN_HOST.to_string()
                } else {
                    name
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "host name resolution failed, using {UNKNOWN_HOST}");
                UNKNOWN_HOST.to_string()
            }
        }
    }
}

/// Fixed host name, for tests and for hosts that already know their identity.
#[derive(Clone, Debug)]
pub struct StaticHost(pub String);

impl HostContextProvider for StaticHost {
    fn resolve(&self) -> String {
        self.0.clone()
    }
}
