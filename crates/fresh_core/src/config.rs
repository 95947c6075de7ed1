//! Story configuration and library options.

use crate::error::{FreshError, Result};
use crate::types::UserSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Section key the library options are read from.
pub const OPTIONS_SECTION: &str = "fresh";

/// Default section key holding the user templates.
pub const DEFAULT_USERS_SECTION: &str = "escalus_users";

/// Configuration handed to stories.
///
/// An ordered mapping of section names to values. User templates live in one
/// section as a table of `role -> { username = ..., ... }`; provisioning
/// collaborators may add any other sections (session data, server-assigned
/// ids) when they enrich a config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryConfig {
    sections: Map<String, Value>,
}

impl StoryConfig {
    /// Creates an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FreshError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| FreshError::ConfigError(format!("failed to parse config: {}", e)))
    }

    /// Returns a section value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.sections.get(key)
    }

    /// Sets a section value, replacing any previous one in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.sections.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns true if the section is present.
    pub fn contains(&self, key: &str) -> bool {
        self.sections.contains_key(key)
    }

    /// Reads the user templates stored under `section`, in document order.
    ///
    /// # Errors
    ///
    /// Returns `MissingSection` if the section is absent.
    /// Returns `InvalidUserSpec` if the section or one of its entries is not a table.
    pub fn user_specs(&self, section: &str) -> Result<Vec<UserSpec>> {
        let value = self
            .sections
            .get(section)
            .ok_or_else(|| FreshError::MissingSection(section.to_string()))?;

        let table = value.as_object().ok_or_else(|| FreshError::InvalidUserSpec {
            role: section.to_string(),
            reason: "users section must be a table of role -> user fields".into(),
        })?;

        table
            .iter()
            .map(|(role, fields)| match fields {
                Value::Object(fields) => Ok(UserSpec {
                    role: role.clone(),
                    fields: fields.clone(),
                }),
                other => Err(FreshError::InvalidUserSpec {
                    role: role.clone(),
                    reason: format!("expected a table of user fields, got {}", other),
                }),
            })
            .collect()
    }

    /// Returns a copy with `section` replaced by `specs`.
    pub fn with_user_specs(&self, section: &str, specs: &[UserSpec]) -> Self {
        let table: Map<String, Value> = specs
            .iter()
            .map(|spec| (spec.role.clone(), Value::Object(spec.fields.clone())))
            .collect();
        let mut config = self.clone();
        config.set(section, Value::Object(table));
        config
    }
}

/// Library options, read from the `[fresh]` table of a story config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshOptions {
    /// Section holding the user templates (default: `escalus_users`).
    pub users_section: String,

    /// Record created users so `clean()` can delete them (default: true).
    pub track_for_cleanup: bool,
}

impl Default for FreshOptions {
    fn default() -> Self {
        Self {
            users_section: DEFAULT_USERS_SECTION.to_string(),
            track_for_cleanup: true,
        }
    }
}

impl FreshOptions {
    /// Reads options from the config, falling back to defaults when the
    /// `[fresh]` table is absent.
    pub fn from_config(config: &StoryConfig) -> Result<Self> {
        match config.get(OPTIONS_SECTION) {
            None => Ok(Self::default()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                FreshError::ConfigError(format!("invalid [{}] options: {}", OPTIONS_SECTION, e))
            }),
        }
    }
}
