//! Loader for `*.module.toml` manifests.
//!
//! A manifest is a serialized [`ModuleDescriptor`]: module metadata at the
//! top level and the menu contribution under `[menu]`, tagged by `kind`.
//!
//! ```toml
//! id = "reports"
//! name = "Reports"
//! owner = "analytics-team"
//!
//! [menu]
//! kind = "item"
//! id = "menu-reports"
//! label = "Reports"
//! path = "/reports"
//! order = 50
//! ```

use std::path::Path;

use autotemu_sdk::types::ModuleDescriptor;
use tracing::{debug, info};

use super::error::ModuleError;

/// File name suffix that marks a module manifest.
pub const MANIFEST_SUFFIX: &str = ".module.toml";

/// Parse a module descriptor from manifest text.
///
/// `path` is only used to label errors.
pub fn parse_manifest(content: &str, path: &Path) -> Result<ModuleDescriptor, ModuleError> {
    let module: ModuleDescriptor =
        toml::from_str(content).map_err(|e| ModuleError::InvalidManifest {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;

    if module.name.is_empty() {
        return Err(ModuleError::InvalidManifest {
            path: path.display().to_string(),
            details: format!("module '{}' has an empty 'name' field", module.id),
        });
    }

    Ok(module)
}

/// Load every manifest in `dir`, sorted by file name.
///
/// A missing directory yields no modules. Any unreadable or invalid manifest
/// fails the whole load.
pub fn discover_manifests(dir: &Path) -> Result<Vec<ModuleDescriptor>, ModuleError> {
    if !dir.exists() {
        info!(?dir, "modules directory does not exist, nothing to discover");
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ModuleError::ManifestRead {
        path: dir.display().to_string(),
        details: e.to_string(),
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(MANIFEST_SUFFIX))
        })
        .collect();

    paths.sort();

    let mut modules = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|e| ModuleError::ManifestRead {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        let module = parse_manifest(&content, &path)?;
        debug!(module = %module.id, path = %path.display(), "loaded module manifest");
        modules.push(module);
    }

    Ok(modules)
}
