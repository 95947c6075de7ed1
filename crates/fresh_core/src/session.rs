//! Fresh session facade: entry points for test stories and suite hooks.

use crate::config::{FreshOptions, StoryConfig};
use crate::error::{FreshError, Result};
use crate::provision::{StoryRunner, UserProvisioner};
use crate::registry::Registry;
use crate::specs::{fresh_specs, select_specs};
use crate::suffix::SuffixGenerator;
use crate::types::CleanReport;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Creates uniquely named users per story and tracks them for cleanup.
///
/// One session is built at suite setup and shared (by reference or `Arc`) by
/// every story; all methods take `&self` and are safe to call concurrently.
///
/// ```no_run
/// # use fresh_core::{FreshSession, StoryConfig, UserProvisioner, UserSpec, Result};
/// # struct Server;
/// # impl UserProvisioner for Server {
/// #     fn create_users(&self, c: &StoryConfig, _: &[UserSpec]) -> Result<StoryConfig> { Ok(c.clone()) }
/// #     fn delete_users(&self, _: &StoryConfig, _: &[UserSpec]) -> Result<()> { Ok(()) }
/// # }
/// # fn main() -> Result<()> {
/// let config = StoryConfig::load("story.toml".as_ref())?;
/// let session = FreshSession::from_config(&config, Server)?;
///
/// session.start();
/// let fresh = session.create_users(&config, &["alice", "bob"])?;
/// // ... run stories against `fresh` ...
/// session.clean()?;
/// session.stop();
/// # Ok(())
/// # }
/// ```
pub struct FreshSession<P> {
    provisioner: P,
    registry: Arc<Registry>,
    suffixes: Arc<SuffixGenerator>,
    options: FreshOptions,
}

impl<P: UserProvisioner> FreshSession<P> {
    /// Creates a session with default options and its own registry.
    pub fn new(provisioner: P) -> Self {
        Self {
            provisioner,
            registry: Arc::new(Registry::new()),
            suffixes: SuffixGenerator::shared(),
            options: FreshOptions::default(),
        }
    }

    /// Creates a session with options read from the `[fresh]` table of `config`.
    pub fn from_config(config: &StoryConfig, provisioner: P) -> Result<Self> {
        Ok(Self::new(provisioner).with_options(FreshOptions::from_config(config)?))
    }

    /// Uses `registry` instead of the session's own one.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    /// Uses `suffixes` instead of the process-wide generator.
    pub fn with_suffix_generator(mut self, suffixes: Arc<SuffixGenerator>) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: FreshOptions) -> Self {
        self.options = options;
        self
    }

    /// Registry this session records fresh configs in.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Options in effect for this session.
    pub fn options(&self) -> &FreshOptions {
        &self.options
    }

    /// The account provisioning collaborator.
    pub fn provisioner(&self) -> &P {
        &self.provisioner
    }

    /// Suite setup hook: makes sure the registry storage exists.
    pub fn start(&self) {
        self.registry.ensure_storage_present();
    }

    /// Suite teardown hook: releases the registry storage.
    pub fn stop(&self) {
        self.registry.shutdown();
    }

    /// Deletes every user created through this session's registry.
    pub fn clean(&self) -> Result<CleanReport> {
        self.registry
            .clean(&self.provisioner, &self.options.users_section)
    }

    /// Creates fresh users for `roles` and returns the config to run stories with.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteProvisioningRequest` if a role has no user template.
    /// Returns `StorageAbsent` if tracking is on and `start` was not called.
    /// If the storage is released while provisioning, the new accounts are
    /// deleted again before `StorageAbsent` is returned.
    /// Provisioning errors are passed through unchanged.
    pub fn create_users(&self, config: &StoryConfig, roles: &[&str]) -> Result<StoryConfig> {
        let section = self.options.users_section.as_str();
        let suffix = self.suffixes.next_suffix();
        let specs = fresh_specs(config, section, roles, &suffix)?;

        if specs.len() != roles.len() {
            let missing = select_specs(config.user_specs(section)?, roles).missing;
            return Err(FreshError::IncompleteProvisioningRequest {
                requested: roles.len(),
                resolved: specs.len(),
                missing,
            });
        }

        // Fail before creating accounts nobody could clean up.
        if self.options.track_for_cleanup && !self.registry.is_present() {
            return Err(FreshError::StorageAbsent);
        }

        let staged = config.with_user_specs(section, &specs);
        let fresh = self.provisioner.create_users(&staged, &specs)?;
        info!(suffix = %suffix, users = specs.len(), "created fresh users");

        if self.options.track_for_cleanup {
            if let Err(e) = self.registry.record(suffix.clone(), fresh.clone()) {
                // Storage went away mid-provisioning: nothing could clean these up later.
                warn!(suffix = %suffix, error = %e, "could not track fresh users, deleting them");
                if let Err(rollback) = self.provisioner.delete_users(&fresh, &specs) {
                    warn!(suffix = %suffix, error = %rollback, "failed to delete untracked fresh users");
                }
                return Err(e);
            }
        }
        Ok(fresh)
    }

    /// Creates fresh users for `roles` and runs `story` with one client per role.
    pub fn story<R, T, F>(
        &self,
        config: &StoryConfig,
        roles: &[&str],
        runner: &R,
        story: F,
    ) -> Result<T>
    where
        R: StoryRunner,
        F: FnOnce(Vec<R::Client>) -> Result<T>,
    {
        let fresh = self.create_users(config, roles)?;
        debug!(roles = ?roles, "running story");
        runner.run(&fresh, roles, story)
    }

    /// Like [`story`](Self::story), but the body also receives the fresh
    /// config, so it never has to consult the stale base config.
    pub fn story_with_config<R, T, F>(
        &self,
        config: &StoryConfig,
        roles: &[&str],
        runner: &R,
        story: F,
    ) -> Result<T>
    where
        R: StoryRunner,
        F: FnOnce(&StoryConfig, Vec<R::Client>) -> Result<T>,
    {
        let fresh = self.create_users(config, roles)?;
        debug!(roles = ?roles, "running story with fresh config");
        runner.run(&fresh, roles, |clients| story(&fresh, clients))
    }
}
