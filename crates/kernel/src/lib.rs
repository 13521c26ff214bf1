//! Autotemu Console Kernel Library
//!
//! Module registry, permission evaluation, menu composition and the HTTP
//! API of the admin console. The `autotemu` binary wires these together.

pub mod backend_error;
pub mod cli;
pub mod config;
pub mod error;
pub mod menu;
pub mod middleware;
pub mod modules;
pub mod permissions;
pub mod routes;
pub mod state;
