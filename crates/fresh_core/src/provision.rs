//! Seams to the collaborators that talk to the server under test.

use crate::config::StoryConfig;
use crate::error::Result;
use crate::types::UserSpec;

/// Creates and deletes user accounts on the server under test.
///
/// Implementations report failures as `FreshError::ProvisioningFailed` or
/// `FreshError::DeletionFailed`; nothing here retries.
pub trait UserProvisioner: Send + Sync {
    /// Creates an account for every spec.
    ///
    /// `config` already carries `specs` in its users section. The returned
    /// config is the one stories run against; implementations may enrich it
    /// with server-assigned data.
    fn create_users(&self, config: &StoryConfig, specs: &[UserSpec]) -> Result<StoryConfig>;

    /// Deletes the account of every spec.
    fn delete_users(&self, config: &StoryConfig, specs: &[UserSpec]) -> Result<()>;
}

impl<P: UserProvisioner + ?Sized> UserProvisioner for std::sync::Arc<P> {
    fn create_users(&self, config: &StoryConfig, specs: &[UserSpec]) -> Result<StoryConfig> {
        (**self).create_users(config, specs)
    }

    fn delete_users(&self, config: &StoryConfig, specs: &[UserSpec]) -> Result<()> {
        (**self).delete_users(config, specs)
    }
}

/// Runs a story body with one connected client per role.
pub trait StoryRunner {
    /// Session handle passed to the story body.
    type Client;

    /// Connects a client for each of `roles` using the users in `config`
    /// and runs `story` with them, in role order.
    fn run<T, F>(&self, config: &StoryConfig, roles: &[&str], story: F) -> Result<T>
    where
        F: FnOnce(Vec<Self::Client>) -> Result<T>;
}
