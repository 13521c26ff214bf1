//! Module registry for the console's feature modules.
//!
//! Each feature declares one [`ModuleDescriptor`](autotemu_sdk::types::ModuleDescriptor):
//! its identity, whether it is enabled, and the menu item or group it
//! contributes. The full set is assembled once at startup from the
//! built-in list plus any `*.module.toml` manifests, validated, and frozen.

mod builtin;
mod error;
mod manifest;
mod registry;

pub use builtin::builtin_modules;
pub use error::ModuleError;
pub use manifest::{MANIFEST_SUFFIX, discover_manifests, parse_manifest};
pub use registry::ModuleRegistry;
