/// Wire-schema revision a mapper renders.
///
/// The same extracted data is laid out differently per version:
///
/// | concern            | V0               | V1            |
/// |--------------------|------------------|---------------|
/// | host key           | `@source_host`   | `source_host` |
/// | message key        | `@message`       | `message`     |
/// | event fields       | nested `@fields` | top level     |
/// | logger / thread    | `loggerName` / `threadName` | `logger_name` / `thread_name` |
/// | `@version` marker  | no               | `"1"`         |
/// | static user fields | no               | yes           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVersion {
    V0,
    #[default]
    V1,
}

pub const TIMESTAMP_KEY: &str = "@timestamp";
pub const VERSION_KEY: &str = "@version";
pub const FIELDS_KEY: &str = "@fields";

impl SchemaVersion {
    pub fn host_key(self) -> &'static str {
        match self {
            SchemaVersion::V0 => "@source_host",
            SchemaVersion::V1 => "source_host",
        }
    }

    pub fn message_key(self) -> &'static str {
        match self {
            SchemaVersion::V0 => "@message",
            SchemaVersion::V1 => "message",
        }
    }

    pub fn logger_key(self) -> &'static str {
        match self {
            SchemaVersion::V0 => "loggerName",
            SchemaVersion::V1 => "logger_name",
        }
    }

    pub fn thread_key(self) -> &'static str {
        match self {
            SchemaVersion::V0 => "threadName",
            SchemaVersion::V1 => "thread_name",
        }
    }

    /// Key under which event fields are nested, or `None` when flattened.
    pub fn fields_bucket(self) -> Option<&'static str> {
        match self {
            SchemaVersion::V0 => Some(FIELDS_KEY),
            SchemaVersion::V1 => None,
        }
    }

    /// Literal value of the `@version` marker, if the schema carries one.
    pub fn version_marker(self) -> Option<&'static str> {
        match self {
            SchemaVersion::V0 => None,
            SchemaVersion::V1 => Some("1"),
        }
    }

    pub fn supports_user_fields(self) -> bool {
        matches!(self, SchemaVersion::V1)
    }
}
