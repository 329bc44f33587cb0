use crate::config::LayoutConfig;
use crate::env::{EnvOverride, OverrideSource, LOGSTASH_LAYOUT_USER_FIELDS_OVERRIDE_ENV};
use crate::error::Result;
use crate::host::{HostContextProvider, SystemHost};
use crate::record::{LogEvent, ThrowableInfo};
use crate::schema::{SchemaVersion, TIMESTAMP_KEY, VERSION_KEY};
use crate::timestamp::format_timestamp;
use crate::user_fields::{layer_user_fields, parse_user_fields_lenient};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Renders [`LogEvent`]s as single-line logstash JSON documents.
///
/// One mapper renders one [`SchemaVersion`]. The host name is resolved once
/// at construction; everything else (location info flag, user fields, the
/// override channel) is read fresh on every [`format`](Self::format) call.
/// Each call builds its document from scratch, so a mapper can be shared
/// across threads without locking.
///
/// **Caveat (V1):** user fields are written last. A user field named like a
/// fixed key (`message`, `@timestamp`, ...) replaces that key's value.
pub struct EventMapper {
    schema: SchemaVersion,
    hostname: String,
    config: Arc<LayoutConfig>,
    overrides: Arc<dyn OverrideSource>,
    override_name: String,
}

impl EventMapper {
    /// Create a mapper resolving the host from the system and reading the
    /// user-field override from the process environment.
    pub fn new(schema: SchemaVersion, config: Arc<LayoutConfig>) -> Self {
        Self::with_parts(schema, config, &SystemHost, Arc::new(EnvOverride))
    }

    /// Create a mapper with explicit host and override collaborators.
    pub fn with_parts(
        schema: SchemaVersion,
        config: Arc<LayoutConfig>,
        host: &dyn HostContextProvider,
        overrides: Arc<dyn OverrideSource>,
    ) -> Self {
        Self {
            schema,
            hostname: host.resolve(),
            config,
            overrides,
            override_name: LOGSTASH_LAYOUT_USER_FIELDS_OVERRIDE_ENV.to_string(),
        }
    }

    /// Look the override up under `name` instead of the default variable.
    pub fn with_override_name(mut self, name: impl Into<String>) -> Self {
        self.override_name = name.into();
        self
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn config(&self) -> &Arc<LayoutConfig> {
        &self.config
    }

    pub fn location_info(&self) -> bool {
        self.config.location_info()
    }

    pub fn set_location_info(&self, enabled: bool) {
        self.config.set_location_info(enabled);
    }

    /// Exceptions are rendered into the document, never left to the caller.
    pub fn ignores_throwable(&self) -> bool {
        false
    }

    /// Render `event` as one JSON object followed by a single `\n`.
    pub fn format(&self, event: &LogEvent) -> Result<String> {
        let mut doc = Map::new();
        doc.insert(self.schema.host_key().into(), Value::from(self.hostname.as_str()));
        doc.insert(self.schema.message_key().into(), Value::from(event.message.as_str()));
        doc.insert(TIMESTAMP_KEY.into(), Value::from(format_timestamp(event.timestamp_millis)));
        if let Some(version) = self.schema.version_marker() {
            doc.insert(VERSION_KEY.into(), Value::from(version));
        }

        let fields = self.event_fields(event);
        match self.schema.fields_bucket() {
            Some(bucket) => {
                doc.insert(bucket.into(), Value::Object(fields));
            }
            None => doc.extend(fields),
        }

        if self.schema.supports_user_fields() {
            for (key, value) in self.user_fields() {
                doc.insert(key, Value::String(value));
            }
        }

        let mut line = serde_json::to_string(&Value::Object(doc))?;
        line.push('\n');
        Ok(line)
    }

    /// Per-event fields shared by both schemas; only key names differ.
    fn event_fields(&self, event: &LogEvent) -> Map<String, Value> {
        let mut fields = Map::new();

        if let Some(throwable) = &event.throwable {
            fields.insert("exception".into(), Value::Object(exception_fields(throwable)));
        }

        if self.config.location_info() {
            if let Some(site) = &event.call_site {
                put(&mut fields, "file", site.file());
                put(&mut fields, "line_number", site.line_number);
                put(&mut fields, "class", site.class());
                put(&mut fields, "method", site.method());
            }
        }

        fields.insert(self.schema.logger_key().into(), Value::from(event.logger_name.as_str()));
        if !event.context_map.is_empty() {
            let mdc: Map<String, Value> = event
                .context_map
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            fields.insert("mdc".into(), Value::Object(mdc));
        }
        put(&mut fields, "ndc", event.diagnostic_stack.as_deref());
        fields.insert("level".into(), Value::from(event.level.as_str()));
        fields.insert(self.schema.thread_key().into(), Value::from(event.thread_name.as_str()));
        fields
    }

    /// Configured user fields with the current override layered on top.
    fn user_fields(&self) -> crate::user_fields::UserFields {
        let configured = self.config.parsed_user_fields();
        match self.overrides.lookup(&self.override_name) {
            Some(raw) if !raw.is_empty() => {
                layer_user_fields(&configured, &parse_user_fields_lenient(&raw))
            }
            _ => configured,
        }
    }
}

impl std::fmt::Debug for EventMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventMapper")
            .field("schema", &self.schema)
            .field("hostname", &self.hostname)
            .field("config", &self.config)
            .field("override_name", &self.override_name)
            .finish()
    }
}

fn exception_fields(throwable: &ThrowableInfo) -> Map<String, Value> {
    let mut exception = Map::new();
    put(&mut exception, "exception_class", throwable.class_name.as_deref());
    put(&mut exception, "exception_message", throwable.message.as_deref());
    if let Some(trace) = &throwable.formatted_trace {
        exception.insert("stacktrace".into(), Value::from(trace.join("\n")));
    }
    exception
}

fn put<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}
