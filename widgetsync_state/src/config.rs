// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronization settings shared by the page and post-back passes.

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// How [`PostBack::load_post_data`](crate::postback::PostBack::load_post_data)
/// reports changes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataChangedPolicy {
    /// Never report a change, whatever was written.
    #[default]
    Never,
    /// Report a change when at least one option was written.
    OnWrite,
}

/// Settings for one application.
///
/// All fields have defaults, so a partial document is enough:
///
/// ```
/// use widgetsync_state::config::{DataChangedPolicy, SyncConfig};
///
/// let config = SyncConfig::from_json(r#"{ "data_changed": "on_write" }"#).unwrap();
/// assert_eq!(config.data_changed, DataChangedPolicy::OnWrite);
/// assert_eq!(config.state_field, "__widgetStateField");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Request field (and hidden input) carrying the client bundle.
    pub state_field: String,
    /// Client global holding the rendered page payload.
    pub state_variable: String,
    /// Registration key for the script block and submit statement.
    pub script_key: String,
    /// Change reporting policy.
    pub data_changed: DataChangedPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            state_field: "__widgetStateField".to_owned(),
            state_variable: "__widgetState".to_owned(),
            script_key: "widgetsync".to_owned(),
            data_changed: DataChangedPolicy::Never,
        }
    }
}

impl SyncConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, StateError> {
        let config: Self = serde_json::from_str(text).map_err(StateError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that names can be embedded in markup and script.
    pub fn validate(&self) -> Result<(), StateError> {
        for (what, name) in [
            ("state_field", &self.state_field),
            ("state_variable", &self.state_variable),
        ] {
            if !is_identifier(name) {
                return Err(StateError::Config(format!(
                    "{what} `{name}` is not a valid identifier"
                )));
            }
        }
        if self.script_key.is_empty() {
            return Err(StateError::Config("script_key is empty".to_owned()));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
