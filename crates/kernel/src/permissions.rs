//! Permission evaluation for menu items.
//!
//! Rules are evaluated fresh on every call; session state may change between
//! renders, so nothing is cached.
//!
//! Evaluation order:
//! 1. No rule: visible.
//! 2. Role requirement: a superuser rule denies unless the session user is a
//!    superuser (no session or no user also denies).
//! 3. Condition: evaluated only when a session exists, and its result is
//!    final. Without a session the condition is skipped.

use std::collections::HashMap;
use std::sync::Arc;

use autotemu_sdk::types::{AccessCondition, MenuItem, PermissionRule, Role, Session};
use thiserror::Error;

use crate::modules::{ModuleError, ModuleRegistry};

/// Errors raised while evaluating an access check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A rule names a check that was never registered.
    #[error("access check '{name}' is not registered")]
    Unknown { name: String },

    /// A registered check failed to produce an answer.
    #[error("access check '{name}' failed: {message}")]
    Failed { name: String, message: String },
}

impl CheckError {
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// A named, open-ended visibility check.
///
/// Referenced from manifests as `condition = { type = "check", name = ... }`.
pub trait AccessCheck: Send + Sync {
    /// Name the check is registered under.
    fn name(&self) -> &str;

    /// Decide whether `session` may see the item.
    fn evaluate(&self, session: &Session) -> Result<bool, CheckError>;
}

/// Table of registered access checks, keyed by name.
#[derive(Clone, Default)]
pub struct AccessChecks {
    checks: HashMap<String, Arc<dyn AccessCheck>>,
}

impl AccessChecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(&mut self, check: impl AccessCheck + 'static) {
        let name = check.name().to_string();
        if self.checks.insert(name.clone(), Arc::new(check)).is_some() {
            tracing::warn!(check = %name, "access check replaced");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn AccessCheck>> {
        self.checks.get(name)
    }

    /// Registered check names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.checks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fail if any rule in `registry` names an unregistered check.
    pub fn verify(&self, registry: &ModuleRegistry) -> Result<(), ModuleError> {
        for module in registry.iter() {
            for item in module.menu.items() {
                let Some(AccessCondition::Check { name }) = item
                    .permission
                    .as_ref()
                    .and_then(|rule| rule.condition.as_ref())
                else {
                    continue;
                };

                if !self.checks.contains_key(name) {
                    return Err(ModuleError::unknown_check(
                        &module.id,
                        &item.id,
                        name,
                        &self.names(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for AccessChecks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessChecks")
            .field("checks", &self.names())
            .finish()
    }
}

/// Decide whether `rule` admits `session`.
///
/// Errors from a named check propagate to the caller unchanged.
pub fn is_permitted(
    rule: Option<&PermissionRule>,
    session: Option<&Session>,
    checks: &AccessChecks,
) -> Result<bool, CheckError> {
    let Some(rule) = rule else {
        return Ok(true);
    };

    if rule.require_role == Some(Role::Superuser) && !session.is_some_and(Session::is_superuser) {
        return Ok(false);
    }

    match (&rule.condition, session) {
        (Some(condition), Some(session)) => evaluate_condition(condition, session, checks),
        _ => Ok(true),
    }
}

/// Decide whether `item` is shown to `session`.
///
/// Hidden items are invisible before any rule is consulted.
pub fn is_visible(
    item: &MenuItem,
    session: Option<&Session>,
    checks: &AccessChecks,
) -> Result<bool, CheckError> {
    if item.hidden {
        return Ok(false);
    }
    is_permitted(item.permission.as_ref(), session, checks)
}

fn evaluate_condition(
    condition: &AccessCondition,
    session: &Session,
    checks: &AccessChecks,
) -> Result<bool, CheckError> {
    match condition {
        AccessCondition::Authenticated => Ok(session.user.is_some()),
        AccessCondition::UserIn { ids } => {
            Ok(session.user_id().is_some_and(|id| ids.iter().any(|i| i == id)))
        }
        AccessCondition::Check { name } => {
            let check = checks
                .get(name)
                .ok_or_else(|| CheckError::Unknown { name: name.clone() })?;
            check.evaluate(session)
        }
    }
}
