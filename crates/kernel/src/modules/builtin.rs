//! Built-in console modules.
//!
//! New features add one constructor here and one line to
//! [`builtin_modules`]; keep both in alphabetical order by module id.

use autotemu_sdk::types::{MenuGroup, MenuItem, ModuleDescriptor, PermissionRule};

/// The console's built-in modules, in registration order.
pub fn builtin_modules() -> Vec<ModuleDescriptor> {
    vec![dashboard(), items(), settings(), users()]
}

fn dashboard() -> ModuleDescriptor {
    ModuleDescriptor::new(
        "dashboard",
        "Dashboard",
        MenuItem::new("menu-dashboard", "Dashboard", "/dashboard")
            .icon("layout-dashboard")
            .order(1),
    )
    .description("System overview and shortcuts")
    .owner("core-team")
}

fn items() -> ModuleDescriptor {
    ModuleDescriptor::new(
        "items",
        "Items",
        MenuItem::new("menu-items", "Items", "/items")
            .icon("package")
            .order(10),
    )
    .description("Create and maintain items")
    .owner("product-team")
}

fn settings() -> ModuleDescriptor {
    ModuleDescriptor::new(
        "settings",
        "Settings",
        MenuGroup::new("group-settings", "Settings")
            .order(100)
            .item(
                MenuItem::new("menu-settings-profile", "Profile", "/settings/profile")
                    .icon("user")
                    .order(1),
            )
            .item(
                MenuItem::new("menu-settings-security", "Security", "/settings/security")
                    .icon("shield")
                    .order(2),
            )
            .item(
                MenuItem::new("menu-settings-danger", "Danger zone", "/settings/danger")
                    .icon("alert-triangle")
                    .order(3),
            ),
    )
    .description("Personal settings and account management")
    .owner("core-team")
}

fn users() -> ModuleDescriptor {
    ModuleDescriptor::new(
        "users",
        "Users",
        MenuItem::new("menu-users", "Users", "/users")
            .icon("users")
            .order(90)
            .permission(PermissionRule::superuser()),
    )
    .description("Manage users and their privileges")
    .owner("admin-team")
}
