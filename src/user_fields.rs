use crate::error::{LayoutError, Result};
use std::collections::BTreeMap;

/// Static extra fields injected at the top level of V1 documents.
pub type UserFields = BTreeMap<String, String>;

/// Parse a `key1:value1,key2:value2` specification.
///
/// Tokens are split on `,`, then each token on its first `:`. Keys and
/// values are taken verbatim. Trailing commas are ignored and an empty
/// specification yields no fields; any other token without a `:` is rejected.
pub fn parse_user_fields(spec: &str) -> Result<UserFields> {
    let mut fields = UserFields::new();
    let spec = spec.trim_end_matches(',');
    if spec.is_empty() {
        return Ok(fields);
    }
    for token in spec.split(',') {
        let (key, value) = token
            .split_once(':')
            .ok_or_else(|| LayoutError::MalformedUserField { token: token.to_string() })?;
        fields.insert(key.to_string(), value.to_string());
    }
    Ok(fields)
}

/// Like [`parse_user_fields`] but skips malformed tokens.
///
/// Used for the override channel, which is read on every event and so has
/// no configuration step at which to reject bad input.
pub fn parse_user_fields_lenient(spec: &str) -> UserFields {
    spec.split(',')
        .filter_map(|token| token.split_once(':'))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Layer `overrides` on top of `base`; on a key conflict the override wins.
pub fn layer_user_fields(base: &UserFields, overrides: &UserFields) -> UserFields {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
