use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::layer::LogstashLayer;
use crate::mapper::EventMapper;
use crate::schema::SchemaVersion;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the globally installed logstash layer.
///
/// **Fields**
/// - `schema`: wire schema rendered on stdout.
/// - `layout`: shared, runtime-mutable layout settings. Keep a clone of
///   the `Arc` to toggle location info or user fields later.
/// - `enable_console`: if `true`, a human readable
///   `tracing_subscriber::fmt::Layer` on stderr is stacked on top.
#[derive(Clone, Debug)]
pub struct InitConfig {
    pub schema: SchemaVersion,
    pub layout: Arc<LayoutConfig>,
    pub enable_console: bool,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            schema: SchemaVersion::V1,
            layout: Arc::new(LayoutConfig::default()),
            enable_console: false,
        }
    }
}

/// Install the logstash layer as the global `tracing` subscriber.
///
/// **Returns**
/// - `Ok(())` once the subscriber is installed.
/// - `Err(LayoutError::Install)` if a global subscriber already exists.
pub fn init_logstash_tracing_with_config(config: InitConfig) -> Result<()> {
    let mapper = EventMapper::new(config.schema, config.layout);
    let layer = LogstashLayer::new(mapper);

    // Both variants need their own concrete subscriber type.
    let installed = if config.enable_console {
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    };
    installed.map_err(|e| LayoutError::Install(e.to_string()))
}

/// Install a V1 layout configured from `LOGSTASH_LAYOUT_*` variables.
pub fn init_logstash_tracing() -> Result<Arc<LayoutConfig>> {
    let layout = Arc::new(LayoutConfig::from_env()?);
    init_logstash_tracing_with_config(InitConfig {
        layout: Arc::clone(&layout),
        ..InitConfig::default()
    })?;
    Ok(layout)
}
