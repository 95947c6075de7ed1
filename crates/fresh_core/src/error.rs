//! Error types for fresh_core operations.

use thiserror::Error;

/// Core error type for fresh-user provisioning and cleanup.
#[derive(Error, Debug)]
pub enum FreshError {
    /// Fewer user specs resolved than roles were requested.
    #[error(
        "required users unavailable: requested {requested} role(s), resolved {resolved}{}",
        format_missing(missing)
    )]
    IncompleteProvisioningRequest {
        /// Number of roles the caller asked for
        requested: usize,
        /// Number of fresh specs actually built
        resolved: usize,
        /// Requested roles with no matching user template
        missing: Vec<String>,
    },

    /// A selected user spec has no `username` field.
    #[error("user spec for role '{role}' has no username field")]
    MissingUsernameField {
        /// Role identifier of the offending spec
        role: String,
    },

    /// A user spec is malformed (not a mapping, or a non-textual username).
    #[error("invalid user spec for role '{role}': {reason}")]
    InvalidUserSpec {
        /// Role identifier of the offending spec
        role: String,
        /// Description of what's invalid
        reason: String,
    },

    /// The configured users section is not present in the story config.
    #[error("config section not found: {0}")]
    MissingSection(String),

    /// The provisioning collaborator failed to create accounts.
    #[error("user provisioning failed: {0}")]
    ProvisioningFailed(String),

    /// The provisioning collaborator failed to delete accounts.
    #[error("user deletion failed: {0}")]
    DeletionFailed(String),

    /// One or more tracked entries could not be cleaned up.
    #[error("clean incomplete: {}", format_failures(failures))]
    CleanIncomplete {
        /// Suffix and reason for every entry left behind
        failures: Vec<CleanFailure>,
    },

    /// The registry storage has not been started.
    #[error("registry storage absent: call start() before creating users")]
    StorageAbsent,

    /// A story body reported a failure.
    #[error("story failed: {0}")]
    StoryFailed(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A tracked entry whose accounts could not be deleted during a clean sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanFailure {
    /// Suffix the entry is keyed by.
    pub suffix: String,
    /// Error reported by the deletion collaborator.
    pub reason: String,
}

fn format_missing(missing: &[String]) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!("; missing: {}", missing.join(", "))
    }
}

fn format_failures(failures: &[CleanFailure]) -> String {
    let noun = if failures.len() == 1 { "entry" } else { "entries" };
    let detail = failures
        .iter()
        .map(|f| format!("{}: {}", f.suffix, f.reason))
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} {} failed ({})", failures.len(), noun, detail)
}

impl FreshError {
    /// Shorthand for a story body failure.
    pub fn story(message: impl Into<String>) -> Self {
        Self::StoryFailed(message.into())
    }

    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::IncompleteProvisioningRequest { .. } => {
                Some("Check the role names passed to the story against the users section of the config.")
            }
            Self::MissingUsernameField { .. } => {
                Some("Every user template needs a `username` entry.")
            }
            Self::MissingSection(_) => {
                Some("Add the users section to the story config, or set `fresh.users_section`.")
            }
            Self::StorageAbsent => Some("Call start() from the suite setup hook."),
            Self::CleanIncomplete { .. } => {
                Some("Failed entries are still tracked; run clean() again once the server is reachable.")
            }
            _ => None,
        }
    }
}

/// Convenience Result type for fresh_core operations.
pub type Result<T> = std::result::Result<T, FreshError>;
