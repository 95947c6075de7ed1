//! Fresh users for end-to-end protocol test stories.
//!
//! Every story gets its own accounts: user templates from the story config
//! are renamed with a unique suffix, created through a [`UserProvisioner`],
//! and tracked in a [`Registry`] so the suite can delete them afterwards.
//!
//! # Quick Start
//!
//! ```
//! use fresh_core::{FreshSession, Result, StoryConfig, UserProvisioner, UserSpec};
//!
//! struct NoopServer;
//!
//! impl UserProvisioner for NoopServer {
//!     fn create_users(&self, config: &StoryConfig, _specs: &[UserSpec]) -> Result<StoryConfig> {
//!         Ok(config.clone())
//!     }
//!     fn delete_users(&self, _config: &StoryConfig, _specs: &[UserSpec]) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let config = StoryConfig::from_toml_str(
//!     r#"
//!     [escalus_users.alice]
//!     username = "alice"
//!     password = "makota"
//!     "#,
//! )
//! .unwrap();
//!
//! let session = FreshSession::new(NoopServer);
//! session.start();
//!
//! let fresh = session.create_users(&config, &["alice"]).unwrap();
//! let users = fresh.user_specs("escalus_users").unwrap();
//! assert!(users[0].username().unwrap().starts_with("alice"));
//! assert_ne!(users[0].username().unwrap(), "alice");
//!
//! let report = session.clean().unwrap();
//! assert_eq!(report.users_deleted, 1);
//! session.stop();
//! ```

mod config;
mod error;
mod provision;
mod registry;
mod session;
mod specs;
mod suffix;
mod types;

pub use config::{FreshOptions, StoryConfig, DEFAULT_USERS_SECTION, OPTIONS_SECTION};
pub use error::{CleanFailure, FreshError, Result};
pub use provision::{StoryRunner, UserProvisioner};
pub use registry::Registry;
pub use session::FreshSession;
pub use specs::{fresh_specs, freshen, select_specs, SpecSelection};
pub use suffix::{fresh_suffix, SuffixClock, SuffixGenerator, SystemClock};
pub use types::{CleanReport, Suffix, UserSpec, USERNAME_FIELD};
