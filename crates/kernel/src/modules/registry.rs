//! Module registry - the frozen, ordered set of module descriptors.
//!
//! The registry is built once at startup and never mutated afterwards, so it
//! can be shared behind an `Arc` by any number of readers.

use std::collections::HashMap;

use autotemu_sdk::types::{ModuleDescriptor, ModuleMenu};
use tracing::{debug, warn};

use super::error::ModuleError;

/// Registry of all module descriptors, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    /// Descriptors in declaration order.
    modules: Vec<ModuleDescriptor>,
    /// Module id -> position in `modules`.
    index: HashMap<String, usize>,
}

impl ModuleRegistry {
    /// Build a registry from descriptors, rejecting empty or duplicate ids.
    ///
    /// Module ids, group ids and item ids must each be unique. Item ids share
    /// one namespace across standalone items and group children.
    pub fn new(modules: Vec<ModuleDescriptor>) -> Result<Self, ModuleError> {
        validate(&modules)?;

        let index = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();

        debug!(modules = modules.len(), "module registry built");

        Ok(Self { modules, index })
    }

    /// Build a registry after forcing the listed module ids to disabled.
    ///
    /// Ids that match no descriptor are logged and ignored.
    pub fn with_disabled(
        mut modules: Vec<ModuleDescriptor>,
        disabled: &[String],
    ) -> Result<Self, ModuleError> {
        for id in disabled {
            match modules.iter_mut().find(|m| &m.id == id) {
                Some(module) => {
                    module.enabled = false;
                    debug!(module = %id, "module disabled by configuration");
                }
                None => warn!(module = %id, "cannot disable unknown module"),
            }
        }

        Self::new(modules)
    }

    /// Enabled descriptors, in declaration order.
    pub fn list_enabled(&self) -> Vec<&ModuleDescriptor> {
        self.modules.iter().filter(|m| m.enabled).collect()
    }

    /// Look up a descriptor by module id.
    pub fn find_by_id(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.index.get(id).and_then(|&i| self.modules.get(i))
    }

    /// Every descriptor, enabled or not, as an owned copy.
    pub fn list_all(&self) -> Vec<ModuleDescriptor> {
        self.modules.clone()
    }

    /// Iterate every descriptor without copying.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter()
    }

    /// Get module count.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Check ids for emptiness and uniqueness, reporting the first offender.
fn validate(modules: &[ModuleDescriptor]) -> Result<(), ModuleError> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(modules.len());
    let mut groups: HashMap<&str, &str> = HashMap::new();
    let mut items: HashMap<&str, &str> = HashMap::new();

    for (position, module) in modules.iter().enumerate() {
        if module.id.is_empty() {
            return Err(ModuleError::EmptyModuleId { position });
        }
        if seen.insert(&module.id, position).is_some() {
            return Err(ModuleError::DuplicateModule {
                id: module.id.clone(),
            });
        }

        if module.menu.id().is_empty() {
            return Err(ModuleError::EmptyMenuId {
                module: module.id.clone(),
            });
        }
        if let ModuleMenu::Group(group) = &module.menu
            && let Some(first) = groups.insert(&group.id, &module.id)
        {
            return Err(ModuleError::DuplicateGroup {
                module: module.id.clone(),
                id: group.id.clone(),
                first: first.to_string(),
            });
        }

        for item in module.menu.items() {
            if item.id.is_empty() {
                return Err(ModuleError::EmptyMenuId {
                    module: module.id.clone(),
                });
            }
            if let Some(first) = items.insert(&item.id, &module.id) {
                return Err(ModuleError::DuplicateItem {
                    module: module.id.clone(),
                    id: item.id.clone(),
                    first: first.to_string(),
                });
            }
        }
    }

    Ok(())
}
