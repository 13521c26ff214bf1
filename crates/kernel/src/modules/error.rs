//! Module registry error types.
//!
//! Every error names the module (or manifest file) at fault so a bad
//! configuration can be fixed without guessing.

use thiserror::Error;

/// Errors raised while assembling the module registry.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// A descriptor has an empty id.
    #[error("module at position {position} has an empty 'id'")]
    EmptyModuleId { position: usize },

    /// A menu item or group has an empty id.
    #[error("module '{module}': menu entry has an empty 'id'")]
    EmptyMenuId { module: String },

    /// Two descriptors share an id.
    #[error("module '{id}' is registered more than once")]
    DuplicateModule { id: String },

    /// Two menu groups share an id.
    #[error("module '{module}': menu group '{id}' is already declared by module '{first}'")]
    DuplicateGroup {
        module: String,
        id: String,
        first: String,
    },

    /// Two menu items share an id.
    #[error("module '{module}': menu item '{id}' is already declared by module '{first}'")]
    DuplicateItem {
        module: String,
        id: String,
        first: String,
    },

    /// A permission rule names a check nobody registered.
    #[error(
        "module '{module}': menu item '{item}' uses unknown access check '{check}'. Registered checks: {registered}"
    )]
    UnknownCheck {
        module: String,
        item: String,
        check: String,
        registered: String,
    },

    /// A manifest file could not be read.
    #[error("module manifest {path}: failed to read: {details}")]
    ManifestRead { path: String, details: String },

    /// A manifest file is not a valid descriptor.
    #[error("module manifest {path}: failed to parse: {details}")]
    InvalidManifest { path: String, details: String },
}

impl ModuleError {
    /// Create an unknown check error listing the checks that do exist.
    pub fn unknown_check(
        module: impl Into<String>,
        item: impl Into<String>,
        check: impl Into<String>,
        registered: &[&str],
    ) -> Self {
        let registered = if registered.is_empty() {
            "(none)".to_string()
        } else {
            registered.join(", ")
        };
        Self::UnknownCheck {
            module: module.into(),
            item: item.into(),
            check: check.into(),
            registered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_item_names_both_modules() {
        let err = ModuleError::DuplicateItem {
            module: "reports".to_string(),
            id: "menu-users".to_string(),
            first: "users".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("reports"));
        assert!(msg.contains("menu-users"));
        assert!(msg.contains("users"));
    }

    #[test]
    fn unknown_check_lists_registered_checks() {
        let err = ModuleError::unknown_check("billing", "menu-billing", "is_finance", &["is_staff"]);
        let msg = err.to_string();
        assert!(msg.contains("is_finance"));
        assert!(msg.contains("is_staff"));

        let none = ModuleError::unknown_check("billing", "menu-billing", "is_finance", &[]);
        assert!(none.to_string().contains("(none)"));
    }
}
