//! Navigation rendering - composed menu to presentation tree.

use serde::Serialize;

use super::compose::MenuEntry;
use autotemu_sdk::types::MenuItem;

/// A rendered navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id: String,
    pub label: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether this link should be highlighted for the current route.
    pub active: bool,
}

/// One top-level entry of the rendered navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavEntry {
    Item(NavItem),
    Group {
        id: String,
        title: String,
        /// Open when one of the group's routes is showing.
        expanded: bool,
        items: Vec<NavItem>,
    },
}

/// Render composed entries against the current route.
///
/// A standalone item is active on its own path and on any sub-path of it.
/// Group children are active only on an exact match. A group is expanded
/// when it opens by default or when the current route lies under one of its
/// children; a matching route never collapses it. With no current route
/// nothing is active.
pub fn render_navigation(entries: &[MenuEntry], current_path: Option<&str>) -> Vec<NavEntry> {
    entries
        .iter()
        .map(|entry| match entry {
            MenuEntry::Item(item) => {
                let active = current_path.is_some_and(|current| is_under(&item.path, current));
                NavEntry::Item(nav_item(item, active))
            }
            MenuEntry::Group(group) => {
                let items = group
                    .items
                    .iter()
                    .map(|item| nav_item(item, current_path == Some(item.path.as_str())))
                    .collect();
                let expanded = group.default_open
                    || current_path.is_some_and(|current| {
                        group.items.iter().any(|i| is_under(&i.path, current))
                    });
                NavEntry::Group {
                    id: group.id.clone(),
                    title: group.title.clone(),
                    expanded,
                    items,
                }
            }
        })
        .collect()
}

fn nav_item(item: &MenuItem, active: bool) -> NavItem {
    NavItem {
        id: item.id.clone(),
        label: item.label.clone(),
        path: item.path.clone(),
        icon: item.icon.clone(),
        active,
    }
}

/// `current` is `path` itself or a route beneath it.
fn is_under(path: &str, current: &str) -> bool {
    current
        .strip_prefix(path)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
