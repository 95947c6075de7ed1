//! Registry of provisioned fresh configs, keyed by suffix.
//!
//! Storage lifecycle:
//!
//! ```text
//! Absent --ensure_storage_present--> Present(empty) --record--> Present(n)
//! Present(n) --clean--> Present(empty) --shutdown--> Absent
//! ```
//!
//! Entries are never mutated after insert, so a single mutex over the map is
//! enough: inserts are short and `clean` copies the entries out before talking
//! to the deletion collaborator.

use crate::config::StoryConfig;
use crate::error::{CleanFailure, FreshError, Result};
use crate::provision::UserProvisioner;
use crate::types::{CleanReport, Suffix};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use tracing::{debug, info, warn};

type Storage = Mutex<HashMap<Suffix, StoryConfig>>;

/// Tracks every fresh config created, so its users can be deleted later.
#[derive(Debug, Default)]
pub struct Registry {
    storage: RwLock<Option<Arc<Storage>>>,
}

impl Registry {
    /// Creates a registry with absent storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry, for suites that don't pass one around.
    pub fn global() -> &'static Arc<Registry> {
        static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Registry::new()))
    }

    /// Creates the storage if it does not exist. Idempotent.
    pub fn ensure_storage_present(&self) {
        let mut slot = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            debug!("creating fresh-user registry storage");
            *slot = Some(Arc::new(Mutex::new(HashMap::new())));
        }
    }

    /// Releases the storage. Any tracked entries are dropped without cleanup.
    pub fn shutdown(&self) {
        let mut slot = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(storage) = slot.take() {
            let remaining = lock(&storage).len();
            if remaining > 0 {
                warn!(remaining, "shutting down registry with uncleaned entries");
            } else {
                debug!("fresh-user registry storage released");
            }
        }
    }

    /// Returns true if the storage exists.
    pub fn is_present(&self) -> bool {
        self.current().is_some()
    }

    /// Records the config built with `suffix`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageAbsent` if the storage has not been created.
    pub fn record(&self, suffix: Suffix, config: StoryConfig) -> Result<()> {
        let storage = self.current().ok_or(FreshError::StorageAbsent)?;
        if lock(&storage).insert(suffix.clone(), config).is_some() {
            warn!(suffix = %suffix, "registry entry overwritten");
        }
        Ok(())
    }

    /// Returns the config recorded under `suffix`.
    pub fn get(&self, suffix: &Suffix) -> Option<StoryConfig> {
        self.current()
            .and_then(|storage| lock(&storage).get(suffix).cloned())
    }

    /// Returns the tracked suffixes, sorted.
    pub fn suffixes(&self) -> Vec<Suffix> {
        let mut suffixes: Vec<Suffix> = self
            .current()
            .map(|storage| lock(&storage).keys().cloned().collect())
            .unwrap_or_default();
        suffixes.sort();
        suffixes
    }

    /// Number of tracked entries (0 when storage is absent).
    pub fn len(&self) -> usize {
        self.current().map(|storage| lock(&storage).len()).unwrap_or(0)
    }

    /// Returns true if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deletes the users of every tracked entry and removes the entries.
    ///
    /// Each entry is handled independently: a failed deletion does not stop
    /// the sweep, and the failed entry stays tracked so a later call can
    /// retry it. Absent or empty storage is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CleanIncomplete` listing every entry that could not be deleted.
    pub fn clean(
        &self,
        provisioner: &dyn UserProvisioner,
        users_section: &str,
    ) -> Result<CleanReport> {
        let Some(storage) = self.current() else {
            debug!("clean requested with no registry storage");
            return Ok(CleanReport::default());
        };

        let mut entries: Vec<(Suffix, StoryConfig)> = lock(&storage)
            .iter()
            .map(|(suffix, config)| (suffix.clone(), config.clone()))
            .collect();
        if entries.is_empty() {
            return Ok(CleanReport::default());
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut report = CleanReport::default();
        let mut failures = Vec::new();

        for (suffix, config) in entries {
            let deleted = config
                .user_specs(users_section)
                .and_then(|specs| provisioner.delete_users(&config, &specs).map(|()| specs.len()));

            match deleted {
                Ok(users) => {
                    lock(&storage).remove(&suffix);
                    report.entries_cleaned += 1;
                    report.users_deleted += users;
                    report.suffixes.push(suffix);
                }
                Err(e) => {
                    warn!(suffix = %suffix, error = %e, "failed to delete fresh users");
                    failures.push(CleanFailure {
                        suffix: suffix.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            entries = report.entries_cleaned,
            users = report.users_deleted,
            failed = failures.len(),
            "fresh-user clean sweep finished"
        );

        if failures.is_empty() {
            Ok(report)
        } else {
            Err(FreshError::CleanIncomplete { failures })
        }
    }

    fn current(&self) -> Option<Arc<Storage>> {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn lock(storage: &Storage) -> std::sync::MutexGuard<'_, HashMap<Suffix, StoryConfig>> {
    storage.lock().unwrap_or_else(PoisonError::into_inner)
}
