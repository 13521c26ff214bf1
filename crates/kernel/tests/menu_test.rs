#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for registry loading and menu composition.
//!
//! These go through the public library API only: configuration in,
//! composed and rendered navigation out.

use std::path::PathBuf;

use autotemu_kernel::config::Config;
use autotemu_kernel::menu::{MenuComposer, MenuEntry, NavEntry, render_navigation};
use autotemu_kernel::modules::{ModuleError, ModuleRegistry};
use autotemu_kernel::permissions::AccessChecks;
use autotemu_kernel::state::{AppState, load_registry};
use autotemu_sdk::types::{AccessCondition, MenuItem, Session};
use autotemu_test_utils::{
    anonymous_session, superuser_session, test_group_module, test_module, user_session,
};
use uuid::Uuid;

fn ids(entries: &[MenuEntry]) -> Vec<&str> {
    entries.iter().map(MenuEntry::id).collect()
}

fn compose(registry: &ModuleRegistry, session: Option<&Session>) -> Vec<MenuEntry> {
    let checks = AccessChecks::new();
    MenuComposer::new(registry, &checks).compose(session).unwrap()
}

/// Scratch directory removed on drop.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!("autotemu-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    fn write(&self, name: &str, content: &str) {
        std::fs::write(self.0.join(name), content).unwrap();
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

// =============================================================================
// Composition scenarios
// =============================================================================

fn two_module_registry() -> ModuleRegistry {
    ModuleRegistry::new(vec![
        test_module("a", 10).build(),
        test_module("b", 5).superuser_only().build(),
    ])
    .unwrap()
}

#[test]
fn regular_user_sees_only_unrestricted_items() {
    let registry = two_module_registry();
    let session = user_session("u1");

    assert_eq!(ids(&compose(&registry, Some(&session))), vec!["a"]);
}

#[test]
fn superuser_sees_everything_in_weight_order() {
    let registry = two_module_registry();
    let session = superuser_session("root");

    assert_eq!(ids(&compose(&registry, Some(&session))), vec!["b", "a"]);
}

#[test]
fn disabled_module_never_appears() {
    let registry = ModuleRegistry::new(vec![
        test_module("a", 10).build(),
        test_module("off", 1).disabled().build(),
    ])
    .unwrap();

    for session in [
        None,
        Some(anonymous_session()),
        Some(user_session("u1")),
        Some(superuser_session("root")),
    ] {
        assert_eq!(ids(&compose(&registry, session.as_ref())), vec!["a"]);
    }
}

#[test]
fn hidden_items_never_appear() {
    let registry = ModuleRegistry::new(vec![
        test_module("shown", 1).build(),
        test_module("ghost", 2).hidden().build(),
        test_module("ghost-admin", 3).hidden().superuser_only().build(),
    ])
    .unwrap();

    let session = superuser_session("root");
    assert_eq!(ids(&compose(&registry, Some(&session))), vec!["shown"]);
    assert_eq!(ids(&compose(&registry, None)), vec!["shown"]);
}

#[test]
fn fully_filtered_group_is_dropped() {
    let registry = ModuleRegistry::new(vec![
        test_group_module("admin", "Admin", 1)
            .with_item(MenuItem::new("a1", "A1", "/admin/a1").hidden())
            .with_item(
                MenuItem::new("a2", "A2", "/admin/a2")
                    .permission(autotemu_sdk::types::PermissionRule::superuser()),
            )
            .build(),
        test_module("home", 2).build(),
    ])
    .unwrap();

    let session = user_session("u1");
    assert_eq!(ids(&compose(&registry, Some(&session))), vec!["home"]);

    let root = superuser_session("root");
    let entries = compose(&registry, Some(&root));
    assert_eq!(ids(&entries), vec!["admin", "home"]);
    match &entries[0] {
        MenuEntry::Group(group) => {
            let children: Vec<_> = group.items.iter().map(|i| i.id.as_str()).collect();
            assert_eq!(children, vec!["a2"]);
        }
        MenuEntry::Item(_) => panic!("expected a group"),
    }
}

#[test]
fn equal_weights_keep_registration_order() {
    let registry = ModuleRegistry::new(vec![
        test_module("z", 50).build(),
        test_module("m", 50).build(),
        test_module("first", 1).build(),
        test_group_module("g", "G", 50)
            .with_item(MenuItem::new("g1", "G1", "/g/1"))
            .build(),
        test_module("a", 50).build(),
    ])
    .unwrap();

    assert_eq!(
        ids(&compose(&registry, None)),
        vec!["first", "z", "m", "g", "a"]
    );
}

#[test]
fn composition_is_idempotent() {
    let registry = ModuleRegistry::new(autotemu_kernel::modules::builtin_modules()).unwrap();
    let session = superuser_session("root");

    let first = compose(&registry, Some(&session));
    let second = compose(&registry, Some(&session));
    assert_eq!(first, second);
}

#[test]
fn conditions_are_skipped_without_a_session() {
    let registry = ModuleRegistry::new(vec![
        test_module("members", 1)
            .with_condition(AccessCondition::Authenticated)
            .build(),
    ])
    .unwrap();

    assert_eq!(ids(&compose(&registry, None)), vec!["members"]);
    assert!(compose(&registry, Some(&anonymous_session())).is_empty());
    assert_eq!(
        ids(&compose(&registry, Some(&user_session("u1")))),
        vec!["members"]
    );
}

#[test]
fn user_in_condition_matches_listed_ids() {
    let registry = ModuleRegistry::new(vec![
        test_module("beta", 1)
            .with_condition(AccessCondition::UserIn {
                ids: vec!["alice".to_string(), "bob".to_string()],
            })
            .build(),
    ])
    .unwrap();

    assert_eq!(
        ids(&compose(&registry, Some(&user_session("bob")))),
        vec!["beta"]
    );
    assert!(compose(&registry, Some(&user_session("carol"))).is_empty());
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn rendered_builtins_for_settings_route() {
    let registry = ModuleRegistry::new(autotemu_kernel::modules::builtin_modules()).unwrap();
    let entries = compose(&registry, Some(&user_session("u1")));
    let nav = render_navigation(&entries, Some("/settings/profile"));

    assert_eq!(nav.len(), 3);
    match &nav[2] {
        NavEntry::Group {
            id,
            expanded,
            items,
            ..
        } => {
            assert_eq!(id, "group-settings");
            assert!(*expanded);
            assert!(items[0].active);
            assert!(!items[1].active);
        }
        NavEntry::Item(_) => panic!("expected the settings group last"),
    }
}

#[test]
fn settings_group_stays_open_on_other_routes() {
    let registry = ModuleRegistry::new(autotemu_kernel::modules::builtin_modules()).unwrap();
    let entries = compose(&registry, Some(&user_session("u1")));

    for route in ["/dashboard", "/settings/profile-x"] {
        let nav = render_navigation(&entries, Some(route));
        match nav.last() {
            Some(NavEntry::Group { id, expanded, items, .. }) => {
                assert_eq!(id, "group-settings");
                assert!(*expanded, "settings collapsed on {route}");
                assert!(items.iter().all(|i| !i.active));
            }
            other => panic!("expected the settings group last, got {other:?}"),
        }
    }
}

#[test]
fn item_is_active_on_sub_routes() {
    let registry = ModuleRegistry::new(autotemu_kernel::modules::builtin_modules()).unwrap();
    let entries = compose(&registry, None);
    let nav = render_navigation(&entries, Some("/items/42/edit"));

    let active: Vec<&str> = nav
        .iter()
        .filter_map(|entry| match entry {
            NavEntry::Item(item) if item.active => Some(item.id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(active, vec!["menu-items"]);
}

// =============================================================================
// Registry loading
// =============================================================================

#[test]
fn duplicate_module_ids_fail_startup() {
    let err = ModuleRegistry::new(vec![
        test_module("dup", 1).build(),
        test_module("dup", 2).with_name("Again").build(),
    ])
    .unwrap_err();

    assert!(matches!(err, ModuleError::DuplicateModule { ref id } if id == "dup"));
}

#[test]
fn unknown_check_fails_state_construction() {
    let registry = ModuleRegistry::new(vec![
        test_module("x", 1)
            .with_condition(AccessCondition::Check {
                name: "not-registered".to_string(),
            })
            .build(),
    ])
    .unwrap();

    let err = AppState::from_parts(registry, AccessChecks::new(), false)
        .err()
        .expect("expected unknown check to be rejected");
    assert!(format!("{err:#}").contains("not-registered"));
}

#[test]
fn config_disables_builtin_modules() {
    let config = Config {
        disabled_modules: vec!["users".to_string(), "no-such-module".to_string()],
        ..Config::default()
    };

    let registry = load_registry(&config).unwrap();
    assert_eq!(registry.len(), 4);
    assert!(!registry.find_by_id("users").unwrap().enabled);

    let root = superuser_session("root");
    let entries = compose(&registry, Some(&root));
    assert!(!ids(&entries).contains(&"menu-users"));
}

#[test]
fn manifests_are_appended_after_builtins() {
    let dir = ScratchDir::new();
    dir.write(
        "b-reports.module.toml",
        r#"
id = "reports"
name = "Reports"
owner = "analytics-team"

[menu]
kind = "item"
id = "menu-reports"
label = "Reports"
path = "/reports"
order = 50
"#,
    );
    dir.write(
        "a-tools.module.toml",
        r#"
id = "tools"
name = "Tools"

[menu]
kind = "group"
id = "group-tools"
title = "Tools"
order = 50

[[menu.items]]
id = "menu-tools-export"
label = "Export"
path = "/tools/export"
"#,
    );
    dir.write("notes.toml", "this is not a manifest");

    let config = Config {
        modules_dir: Some(dir.0.clone()),
        ..Config::default()
    };
    let registry = load_registry(&config).unwrap();

    let all: Vec<_> = registry.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(
        all,
        vec!["dashboard", "items", "settings", "users", "tools", "reports"]
    );

    let entries = compose(&registry, Some(&user_session("u1")));
    assert_eq!(
        ids(&entries),
        vec![
            "menu-dashboard",
            "menu-items",
            "group-tools",
            "menu-reports",
            "group-settings"
        ]
    );
}

#[test]
fn invalid_manifest_names_the_file() {
    let dir = ScratchDir::new();
    dir.write("broken.module.toml", "id = \"broken\"\n");

    let config = Config {
        modules_dir: Some(dir.0.clone()),
        ..Config::default()
    };

    let err = load_registry(&config).unwrap_err();
    assert!(format!("{err:#}").contains("broken.module.toml"));
}

#[test]
fn missing_modules_dir_is_not_an_error() {
    let config = Config {
        modules_dir: Some(std::env::temp_dir().join("autotemu-does-not-exist")),
        ..Config::default()
    };

    assert_eq!(load_registry(&config).unwrap().len(), 4);
}
