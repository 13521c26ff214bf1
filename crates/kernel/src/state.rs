//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::modules::{ModuleRegistry, builtin_modules, discover_manifests};
use crate::permissions::AccessChecks;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap. Everything inside is built
/// once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Frozen module registry.
    registry: ModuleRegistry,

    /// Named access checks referenced by permission rules.
    checks: AccessChecks,

    /// Include diagnostic detail in error responses.
    expose_error_detail: bool,
}

impl AppState {
    /// Assemble state from configuration: built-in modules, manifests from
    /// `modules_dir`, and the disabled list.
    pub fn new(config: &Config, checks: AccessChecks) -> Result<Self> {
        let registry = load_registry(config)?;
        Self::from_parts(registry, checks, config.expose_error_detail)
    }

    /// Assemble state from an already built registry.
    ///
    /// Fails if a permission rule names an unregistered check.
    pub fn from_parts(
        registry: ModuleRegistry,
        checks: AccessChecks,
        expose_error_detail: bool,
    ) -> Result<Self> {
        checks
            .verify(&registry)
            .context("module registry references unknown access checks")?;

        info!(
            modules = registry.len(),
            enabled = registry.list_enabled().len(),
            checks = checks.names().len(),
            "module registry ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                registry,
                checks,
                expose_error_detail,
            }),
        })
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.inner.registry
    }

    pub fn checks(&self) -> &AccessChecks {
        &self.inner.checks
    }

    pub fn expose_error_detail(&self) -> bool {
        self.inner.expose_error_detail
    }
}

/// Build the module registry described by `config`.
pub fn load_registry(config: &Config) -> Result<ModuleRegistry> {
    let mut modules = builtin_modules();

    if let Some(dir) = &config.modules_dir {
        let discovered = discover_manifests(dir)
            .with_context(|| format!("failed to load module manifests from {}", dir.display()))?;
        info!(count = discovered.len(), dir = %dir.display(), "module manifests loaded");
        modules.extend(discovered);
    }

    ModuleRegistry::with_disabled(modules, &config.disabled_modules)
        .context("invalid module configuration")
}
