//! CLI command implementations.
//!
//! These commands build the module registry from configuration and inspect
//! it without starting the HTTP server.

use anyhow::{Context, Result};
use autotemu_sdk::types::{Session, SessionUser};

use crate::config::Config;
use crate::menu::{MenuComposer, render_navigation};
use crate::permissions::AccessChecks;
use crate::state::load_registry;

/// List every registered module and its status.
pub fn cmd_modules_list(config: &Config) -> Result<()> {
    let registry = load_registry(config)?;

    if registry.is_empty() {
        println!("No modules registered.");
        return Ok(());
    }

    println!(
        "{:<16} {:<10} {:<16} {:<10} {:<6} {:<6}",
        "MODULE", "VERSION", "OWNER", "STATUS", "MENU", "ORDER"
    );
    println!("{}", "-".repeat(69));

    for module in registry.iter() {
        let status = if module.enabled { "enabled" } else { "disabled" };
        println!(
            "{:<16} {:<10} {:<16} {:<10} {:<6} {}",
            module.id,
            module.version.as_deref().unwrap_or("-"),
            module.owner.as_deref().unwrap_or("-"),
            status,
            module.menu.kind(),
            module.menu.order()
        );
    }

    Ok(())
}

/// Validate the registry and the access checks it references.
pub fn cmd_modules_check(config: &Config, checks: &AccessChecks) -> Result<()> {
    let registry = load_registry(config)?;
    checks
        .verify(&registry)
        .context("module registry references unknown access checks")?;

    println!(
        "OK: {} modules ({} enabled)",
        registry.len(),
        registry.list_enabled().len()
    );
    Ok(())
}

/// Who the `menu` command composes for.
#[derive(Debug, Clone, Default)]
pub struct MenuTarget {
    /// Compose with no session at all.
    pub no_session: bool,
    pub user_id: Option<String>,
    pub superuser: bool,
    /// Route used to mark active entries.
    pub path: Option<String>,
}

impl MenuTarget {
    fn session(&self) -> Option<Session> {
        if self.no_session {
            return None;
        }
        if self.user_id.is_none() && !self.superuser {
            return Some(Session::anonymous());
        }
        Some(Session {
            user: Some(SessionUser {
                id: self.user_id.clone(),
                is_superuser: self.superuser,
            }),
        })
    }
}

/// Print the rendered navigation for a session as JSON.
pub fn cmd_menu(config: &Config, checks: &AccessChecks, target: &MenuTarget) -> Result<()> {
    let registry = load_registry(config)?;
    checks
        .verify(&registry)
        .context("module registry references unknown access checks")?;

    let session = target.session();
    let entries = MenuComposer::new(&registry, checks)
        .compose(session.as_ref())
        .context("menu composition failed")?;
    let nav = render_navigation(&entries, target.path.as_deref());

    let json = serde_json::to_string_pretty(&nav).context("failed to serialize navigation")?;
    println!("{json}");
    Ok(())
}
