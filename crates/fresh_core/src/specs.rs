//! Fresh spec building: select user templates by role and rename them.

use crate::config::StoryConfig;
use crate::error::Result;
use crate::types::{Suffix, UserSpec};
use tracing::debug;

/// Outcome of selecting user templates for a list of roles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecSelection {
    /// Matching templates, in the config's order.
    pub found: Vec<UserSpec>,
    /// Requested roles with no template, in request order.
    pub missing: Vec<String>,
}

/// Selects the templates whose role is in `roles`.
///
/// The result follows the order of `all`, not of `roles`. Roles without a
/// template are reported in `missing` rather than failing.
pub fn select_specs<S: AsRef<str>>(all: Vec<UserSpec>, roles: &[S]) -> SpecSelection {
    let missing = roles
        .iter()
        .map(|role| role.as_ref())
        .filter(|role| !all.iter().any(|spec| spec.role == *role))
        .map(str::to_string)
        .collect();

    let found = all
        .into_iter()
        .filter(|spec| roles.iter().any(|role| role.as_ref() == spec.role))
        .collect();

    SpecSelection { found, missing }
}

/// Appends `suffix` to the username of every spec.
///
/// # Errors
///
/// Returns `MissingUsernameField` if a spec has no `username`.
pub fn freshen(specs: Vec<UserSpec>, suffix: &Suffix) -> Result<Vec<UserSpec>> {
    specs
        .into_iter()
        .map(|mut spec| {
            let username = format!("{}{}", spec.username()?, suffix);
            spec.set_username(username);
            Ok(spec)
        })
        .collect()
}

/// Builds fresh user specs for `roles` from the templates in `section`.
///
/// Roles without a template are silently dropped; callers compare the
/// returned length against `roles.len()`.
pub fn fresh_specs<S: AsRef<str>>(
    config: &StoryConfig,
    section: &str,
    roles: &[S],
    suffix: &Suffix,
) -> Result<Vec<UserSpec>> {
    let selection = select_specs(config.user_specs(section)?, roles);
    if !selection.missing.is_empty() {
        debug!(missing = ?selection.missing, "dropping roles without user templates");
    }
    freshen(selection.found, suffix)
}
