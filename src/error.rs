/// Error type returned by layout configuration and formatting.
///
/// Missing event data is never an error: absent values are omitted from
/// the rendered document. Only configuration problems and the (practically
/// unreachable) serialization failure surface here.
#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    /// A user-field token did not contain a `key:value` separator.
    #[error("malformed user field `{token}`: expected `key:value`")]
    MalformedUserField { token: String },

    #[error("failed to serialize log event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to install global subscriber: {0}")]
    Install(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
