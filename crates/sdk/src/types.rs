//! Module, menu, permission and session types.
//!
//! Descriptors are plain data. Build them with the constructors below or
//! deserialize them from a `*.module.toml` manifest; the kernel freezes the
//! full set into a registry at startup.

use serde::{Deserialize, Serialize};

/// Sort weight used when a menu item or group does not declare one.
pub const DEFAULT_ORDER: i32 = 100;

fn default_order() -> i32 {
    DEFAULT_ORDER
}

fn default_true() -> bool {
    true
}

/// Roles a permission rule can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The session user must carry the superuser flag.
    Superuser,
}

/// Attribute condition evaluated after the role check passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessCondition {
    /// The session has a logged-in user.
    Authenticated,
    /// The session user's id is one of `ids`.
    UserIn { ids: Vec<String> },
    /// Delegate to a check registered with the kernel under `name`.
    Check { name: String },
}

/// Visibility rule attached to a menu item.
///
/// An item without a rule is public.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<AccessCondition>,
}

impl PermissionRule {
    /// Rule that only admits superusers.
    pub fn superuser() -> Self {
        Self {
            require_role: Some(Role::Superuser),
            condition: None,
        }
    }

    /// Rule that only evaluates `condition`.
    pub fn when(condition: AccessCondition) -> Self {
        Self {
            require_role: None,
            condition: Some(condition),
        }
    }

    pub fn with_condition(mut self, condition: AccessCondition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// A single navigable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique item id (e.g. "menu-users").
    pub id: String,
    /// Display label.
    pub label: String,
    /// Route path (e.g. "/users").
    pub path: String,
    /// Icon name, mapped to a glyph by the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Sort weight (lower = higher priority).
    #[serde(default = "default_order")]
    pub order: i32,
    /// Hidden items never appear, whatever the permission.
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<PermissionRule>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            path: path.into(),
            icon: None,
            order: DEFAULT_ORDER,
            hidden: false,
            permission: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn permission(mut self, permission: PermissionRule) -> Self {
        self.permission = Some(permission);
        self
    }
}

/// A titled collection of menu items, shown and collapsed as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuGroup {
    pub id: String,
    pub title: String,
    #[serde(default = "default_order")]
    pub order: i32,
    /// Whether the group starts expanded. A route under one of its items
    /// always expands it.
    #[serde(default = "default_true")]
    pub default_open: bool,
    /// Items in declaration order; the composer keeps this order.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl MenuGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order: DEFAULT_ORDER,
            default_open: true,
            items: Vec::new(),
        }
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Start collapsed until one of the group's routes is showing.
    pub fn collapsed(mut self) -> Self {
        self.default_open = false;
        self
    }

    pub fn item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }
}

/// What a module contributes to navigation: one item or one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModuleMenu {
    Item(MenuItem),
    Group(MenuGroup),
}

impl ModuleMenu {
    /// Id of the item or group.
    pub fn id(&self) -> &str {
        match self {
            ModuleMenu::Item(item) => &item.id,
            ModuleMenu::Group(group) => &group.id,
        }
    }

    pub fn order(&self) -> i32 {
        match self {
            ModuleMenu::Item(item) => item.order,
            ModuleMenu::Group(group) => group.order,
        }
    }

    /// Short kind label ("item" or "group").
    pub fn kind(&self) -> &'static str {
        match self {
            ModuleMenu::Item(_) => "item",
            ModuleMenu::Group(_) => "group",
        }
    }

    /// Every item this menu declares, group children included.
    pub fn items(&self) -> &[MenuItem] {
        match self {
            ModuleMenu::Item(item) => std::slice::from_ref(item),
            ModuleMenu::Group(group) => &group.items,
        }
    }
}

impl From<MenuItem> for ModuleMenu {
    fn from(item: MenuItem) -> Self {
        ModuleMenu::Item(item)
    }
}

impl From<MenuGroup> for ModuleMenu {
    fn from(group: MenuGroup) -> Self {
        ModuleMenu::Group(group)
    }
}

/// Static declaration of one console feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Unique module id (e.g. "users").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Team or person that owns the module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Disabled modules contribute nothing to navigation.
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub menu: ModuleMenu,
}

impl ModuleDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, menu: impl Into<ModuleMenu>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            version: None,
            owner: None,
            enabled: true,
            menu: menu.into(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// The logged-in user as seen by the console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

/// Caller session supplied by the authentication layer.
///
/// A session without a user is still a session; "no session at all" is
/// expressed as `Option<&Session>::None` by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl Session {
    /// A session with no logged-in user.
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// A regular (non-superuser) user session.
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            user: Some(SessionUser {
                id: Some(id.into()),
                is_superuser: false,
            }),
        }
    }

    /// A superuser session.
    pub fn superuser(id: impl Into<String>) -> Self {
        Self {
            user: Some(SessionUser {
                id: Some(id.into()),
                is_superuser: true,
            }),
        }
    }

    pub fn is_superuser(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_superuser)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.id.as_deref())
    }
}
