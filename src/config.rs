use crate::env::{
    env_flag, env_or, LOGSTASH_LAYOUT_LOCATION_INFO_ENV, LOGSTASH_LAYOUT_USER_FIELDS_ENV,
};
use crate::error::Result;
use crate::user_fields::{parse_user_fields, UserFields};
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pre-parsed layout options, as handed over by the host's config system.
///
/// **Fields**
/// - `location_info`: render `file`, `line_number`, `class` and `method`.
///   Defaults to `true` for backwards compatibility.
/// - `user_fields`: static `key:value,key:value` fields for V1 documents.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutOptions {
    pub location_info: bool,
    pub user_fields: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            location_info: true,
            user_fields: String::new(),
        }
    }
}

struct UserFieldsState {
    raw: String,
    parsed: UserFields,
}

/// Runtime-mutable layout configuration shared by one or more mappers.
///
/// Every setter takes effect on the next formatted event; nothing is
/// snapshotted by the mapper.
pub struct LayoutConfig {
    location_info: AtomicBool,
    user_fields: RwLock<UserFieldsState>,
}

impl LayoutConfig {
    /// Build a config from options, validating the user-field spec.
    pub fn from_options(options: &LayoutOptions) -> Result<Self> {
        let parsed = parse_user_fields(&options.user_fields)?;
        Ok(Self {
            location_info: AtomicBool::new(options.location_info),
            user_fields: RwLock::new(UserFieldsState {
                raw: options.user_fields.clone(),
                parsed,
            }),
        })
    }

    /// Build a config from `LOGSTASH_LAYOUT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_options(&LayoutOptions {
            location_info: env_flag(LOGSTASH_LAYOUT_LOCATION_INFO_ENV, true),
            user_fields: env_or(LOGSTASH_LAYOUT_USER_FIELDS_ENV, ""),
        })
    }

    pub fn location_info(&self) -> bool {
        self.location_info.load(Ordering::Relaxed)
    }

    pub fn set_location_info(&self, enabled: bool) {
        self.location_info.store(enabled, Ordering::Relaxed);
        tracing::debug!(enabled, "layout location info updated");
    }

    /// The user-field spec exactly as last configured.
    pub fn user_fields(&self) -> String {
        self.user_fields.read().raw.clone()
    }

    pub(crate) fn parsed_user_fields(&self) -> UserFields {
        self.user_fields.read().parsed.clone()
    }

    /// Replace the user-field spec.
    ///
    /// A malformed spec is rejected and the previous fields stay in effect.
    pub fn set_user_fields(&self, spec: &str) -> Result<()> {
        let parsed = parse_user_fields(spec)?;
        let count = parsed.len();
        *self.user_fields.write() = UserFieldsState {
            raw: spec.to_string(),
            parsed,
        };
        tracing::debug!(count, "layout user fields updated");
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            location_info: AtomicBool::new(true),
            user_fields: RwLock::new(UserFieldsState {
                raw: String::new(),
                parsed: UserFields::new(),
            }),
        }
    }
}

impl std::fmt::Debug for LayoutConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutConfig")
            .field("location_info", &self.location_info())
            .field("user_fields", &self.user_fields())
            .finish()
    }
}
