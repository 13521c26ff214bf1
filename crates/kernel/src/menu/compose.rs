//! Menu composer - merges module menus into one ordered, filtered list.

use autotemu_sdk::types::{MenuItem, ModuleMenu, Session};
use serde::Serialize;
use tracing::{debug, trace};

use crate::modules::ModuleRegistry;
use crate::permissions::{AccessChecks, CheckError, is_visible};

/// A group that kept at least one visible item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedGroup {
    pub id: String,
    pub title: String,
    pub order: i32,
    pub default_open: bool,
    /// Visible items, in declaration order.
    pub items: Vec<MenuItem>,
}

/// One top-level entry of the composed menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MenuEntry {
    Item(MenuItem),
    Group(ComposedGroup),
}

impl MenuEntry {
    pub fn id(&self) -> &str {
        match self {
            MenuEntry::Item(item) => &item.id,
            MenuEntry::Group(group) => &group.id,
        }
    }

    /// Sort weight of the entry.
    pub fn order(&self) -> i32 {
        match self {
            MenuEntry::Item(item) => item.order,
            MenuEntry::Group(group) => group.order,
        }
    }
}

/// Composes the menu for a session from a registry and its access checks.
///
/// Composition is a pure function of (registry, checks, session): it
/// allocates a fresh result on every call and mutates nothing.
#[derive(Debug, Clone, Copy)]
pub struct MenuComposer<'a> {
    registry: &'a ModuleRegistry,
    checks: &'a AccessChecks,
}

impl<'a> MenuComposer<'a> {
    pub fn new(registry: &'a ModuleRegistry, checks: &'a AccessChecks) -> Self {
        Self { registry, checks }
    }

    /// Compose the menu visible to `session` (`None` when nobody is signed in
    /// and no session exists at all).
    ///
    /// The first failing access check aborts composition; the caller decides
    /// whether to fall back to an empty menu.
    pub fn compose(&self, session: Option<&Session>) -> Result<Vec<MenuEntry>, CheckError> {
        let modules = self.registry.list_enabled();
        let mut entries = Vec::with_capacity(modules.len());

        for module in modules {
            match &module.menu {
                ModuleMenu::Group(group) => {
                    let items = self.visible_items(&group.items, session)?;
                    if items.is_empty() {
                        trace!(module = %module.id, group = %group.id, "group has no visible items");
                        continue;
                    }
                    entries.push(MenuEntry::Group(ComposedGroup {
                        id: group.id.clone(),
                        title: group.title.clone(),
                        order: group.order,
                        default_open: group.default_open,
                        items,
                    }));
                }
                ModuleMenu::Item(item) => {
                    if is_visible(item, session, self.checks)? {
                        entries.push(MenuEntry::Item(item.clone()));
                    } else {
                        trace!(module = %module.id, item = %item.id, "item not visible");
                    }
                }
            }
        }

        // Stable: equal weights keep registration order.
        entries.sort_by_key(MenuEntry::order);

        debug!(entries = entries.len(), "composed menu");
        Ok(entries)
    }

    fn visible_items(
        &self,
        items: &[MenuItem],
        session: Option<&Session>,
    ) -> Result<Vec<MenuItem>, CheckError> {
        let mut visible = Vec::with_capacity(items.len());
        for item in items {
            if is_visible(item, session, self.checks)? {
                visible.push(item.clone());
            }
        }
        Ok(visible)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use autotemu_sdk::types::{MenuGroup, ModuleDescriptor, PermissionRule};

    fn ids(entries: &[MenuEntry]) -> Vec<&str> {
        entries.iter().map(MenuEntry::id).collect()
    }

    fn superuser_registry() -> ModuleRegistry {
        ModuleRegistry::new(vec![
            ModuleDescriptor::new("a", "A", MenuItem::new("a", "A", "/a").order(10)),
            ModuleDescriptor::new(
                "b",
                "B",
                MenuItem::new("b", "B", "/b")
                    .order(5)
                    .permission(PermissionRule::superuser()),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn regular_user_sees_public_items_only() {
        let registry = superuser_registry();
        let checks = AccessChecks::new();
        let composer = MenuComposer::new(&registry, &checks);

        let entries = composer.compose(Some(&Session::user("u-1"))).unwrap();
        assert_eq!(ids(&entries), vec!["a"]);
    }

    #[test]
    fn superuser_sees_everything_in_order() {
        let registry = superuser_registry();
        let checks = AccessChecks::new();
        let composer = MenuComposer::new(&registry, &checks);

        let entries = composer.compose(Some(&Session::superuser("root"))).unwrap();
        assert_eq!(ids(&entries), vec!["b", "a"]);
    }

    #[test]
    fn empty_groups_are_dropped() {
        let registry = ModuleRegistry::new(vec![ModuleDescriptor::new(
            "admin",
            "Admin",
            MenuGroup::new("group-admin", "Admin")
                .item(MenuItem::new("audit", "Audit", "/admin/audit").hidden())
                .item(
                    MenuItem::new("roles", "Roles", "/admin/roles")
                        .permission(PermissionRule::superuser()),
                ),
        )])
        .unwrap();
        let checks = AccessChecks::new();
        let composer = MenuComposer::new(&registry, &checks);

        assert!(composer.compose(None).unwrap().is_empty());

        let entries = composer.compose(Some(&Session::superuser("root"))).unwrap();
        let [MenuEntry::Group(group)] = entries.as_slice() else {
            panic!("expected a single group, got {entries:?}");
        };
        assert_eq!(group.items.len(), 1);
        assert_eq!(group.items[0].id, "roles");
    }

    #[test]
    fn group_items_keep_declaration_order() {
        let registry = ModuleRegistry::new(vec![ModuleDescriptor::new(
            "g",
            "G",
            MenuGroup::new("group-g", "G")
                .item(MenuItem::new("second", "2", "/g/2").order(2))
                .item(MenuItem::new("first", "1", "/g/1").order(1)),
        )])
        .unwrap();
        let checks = AccessChecks::new();

        let entries = MenuComposer::new(&registry, &checks).compose(None).unwrap();
        let MenuEntry::Group(group) = &entries[0] else {
            panic!("expected a group");
        };
        let order: Vec<_> = group.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["second", "first"]);
    }

    #[test]
    fn serializes_with_type_tag() {
        let registry = superuser_registry();
        let checks = AccessChecks::new();
        let entries = MenuComposer::new(&registry, &checks).compose(None).unwrap();

        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json[0]["type"], "item");
        assert_eq!(json[0]["id"], "a");
    }
}
