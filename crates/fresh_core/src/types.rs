//! Core data types: user specs, suffixes and clean reports.

use crate::error::{FreshError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field holding the account name inside a user template.
pub const USERNAME_FIELD: &str = "username";

/// A user template: a logical role plus its configuration fields.
///
/// Field order is preserved, so a spec written back into a [`StoryConfig`]
/// reads the same as the template it came from.
///
/// [`StoryConfig`]: crate::StoryConfig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSpec {
    /// Logical role identifier (e.g. `alice`), unique within a spec list.
    pub role: String,
    /// User configuration fields, including `username`.
    pub fields: Map<String, Value>,
}

impl UserSpec {
    /// Creates a spec with a single `username` field.
    pub fn new(role: impl Into<String>, username: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(USERNAME_FIELD.to_string(), Value::String(username.into()));
        Self {
            role: role.into(),
            fields,
        }
    }

    /// Adds a field, keeping insertion order.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Looks up a field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the username.
    ///
    /// # Errors
    ///
    /// Returns `MissingUsernameField` if the spec has no `username` field.
    /// Returns `InvalidUserSpec` if the username is not a string.
    pub fn username(&self) -> Result<&str> {
        match self.fields.get(USERNAME_FIELD) {
            None => Err(FreshError::MissingUsernameField {
                role: self.role.clone(),
            }),
            Some(Value::String(name)) => Ok(name.as_str()),
            Some(other) => Err(FreshError::InvalidUserSpec {
                role: self.role.clone(),
                reason: format!("username must be a string, got {}", other),
            }),
        }
    }

    /// Replaces the username in place.
    ///
    /// `Map::insert` on an existing key keeps the key's position, so the
    /// other fields and their order are untouched.
    pub(crate) fn set_username(&mut self, username: String) {
        self.fields
            .insert(USERNAME_FIELD.to_string(), Value::String(username));
    }
}

/// Unique token appended to base usernames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suffix(String);

impl Suffix {
    /// Wraps an existing token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Suffix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Report from a registry clean sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Number of registry entries removed.
    pub entries_cleaned: usize,
    /// Number of user accounts handed to the deletion collaborator.
    pub users_deleted: usize,
    /// Suffixes of the removed entries.
    pub suffixes: Vec<Suffix>,
}
