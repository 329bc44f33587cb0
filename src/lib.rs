//! Render log events as logstash-style single-line JSON.
//!
//! [`EventMapper`] turns a [`LogEvent`] into a V0 (`@fields`-nested) or V1
//! (flattened, `@version: "1"`) document. [`LogstashLayer`] feeds it from
//! `tracing`.

pub mod error;
pub mod record;
pub mod timestamp;
pub mod host;
pub mod user_fields;
pub mod env;
pub mod config;
pub mod schema;
pub mod mapper;
pub mod layer;
pub mod init;

pub use config::{LayoutConfig, LayoutOptions};
pub use error::{LayoutError, Result};
pub use layer::LogstashLayer;
pub use mapper::EventMapper;
pub use record::{CallSite, LogEvent, ThrowableInfo};
pub use schema::SchemaVersion;
