//! Autotemu test utilities.
//!
//! Fixture builders for module descriptors and sessions, plus JSON
//! assertion helpers shared by the kernel's integration tests.

use autotemu_sdk::prelude::*;

/// Start a module whose menu is a single item.
///
/// The item id, label and path are derived from `id`.
pub fn test_module(id: &str, order: i32) -> TestModule {
    TestModule {
        id: id.to_string(),
        name: title_case(id),
        menu: ModuleMenu::Item(
            MenuItem::new(id, title_case(id), format!("/{id}")).order(order),
        ),
        enabled: true,
        owner: None,
    }
}

/// Start a module whose menu is an empty group.
///
/// Add entries with [`TestModule::with_item`].
pub fn test_group_module(id: &str, title: &str, order: i32) -> TestModule {
    TestModule {
        id: id.to_string(),
        name: title.to_string(),
        menu: ModuleMenu::Group(MenuGroup::new(id, title).order(order)),
        enabled: true,
        owner: None,
    }
}

/// A module descriptor builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestModule {
    pub id: String,
    pub name: String,
    pub menu: ModuleMenu,
    pub enabled: bool,
    pub owner: Option<String>,
}

impl TestModule {
    /// Set the display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the owning team.
    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    /// Mark the module disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Make the standalone item superuser-only.
    ///
    /// Has no effect on group menus; restrict their items individually.
    pub fn superuser_only(mut self) -> Self {
        if let ModuleMenu::Item(item) = &mut self.menu {
            item.permission = Some(PermissionRule::superuser());
        }
        self
    }

    /// Gate the standalone item behind a condition.
    pub fn with_condition(mut self, condition: AccessCondition) -> Self {
        if let ModuleMenu::Item(item) = &mut self.menu {
            item.permission = Some(PermissionRule::when(condition));
        }
        self
    }

    /// Hide the standalone item.
    pub fn hidden(mut self) -> Self {
        if let ModuleMenu::Item(item) = &mut self.menu {
            item.hidden = true;
        }
        self
    }

    /// Append an item to a group menu.
    ///
    /// Turns a standalone menu into a group when called on one.
    pub fn with_item(mut self, item: MenuItem) -> Self {
        match &mut self.menu {
            ModuleMenu::Group(group) => group.items.push(item),
            ModuleMenu::Item(_) => {
                self.menu = ModuleMenu::Group(MenuGroup::new(&self.id, &self.name).item(item));
            }
        }
        self
    }

    /// Finish the descriptor.
    pub fn build(self) -> ModuleDescriptor {
        let mut module = ModuleDescriptor::new(self.id, self.name, self.menu);
        module.enabled = self.enabled;
        module.owner = self.owner;
        module
    }
}

fn title_case(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A session for an ordinary signed-in user.
pub fn user_session(id: &str) -> Session {
    Session::user(id)
}

/// A session for a superuser.
pub fn superuser_session(id: &str) -> Session {
    Session::superuser(id)
}

/// A session with no user attached.
pub fn anonymous_session() -> Session {
    Session::anonymous()
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{}', got: {}",
            key,
            value
        );
    }

    /// Assert that a JSON value equals expected.
    pub fn json_eq(actual: &Value, expected: &Value) {
        assert_eq!(
            actual,
            expected,
            "JSON mismatch:\nactual: {}\nexpected: {}",
            pretty(actual),
            pretty(expected)
        );
    }

    /// Assert the ids of a rendered navigation list, in order.
    pub fn entry_ids(entries: &Value, expected: &[&str]) {
        let ids: Vec<&str> = entries
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|entry| entry.get("id").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(ids, expected, "navigation mismatch: {}", pretty(entries));
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }

    fn pretty(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}
