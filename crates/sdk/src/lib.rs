//! Autotemu Console SDK
//!
//! Types shared by the console kernel and the feature modules that plug
//! into it: module descriptors with their menu contribution, permission
//! rules, the caller session, and the unified API response envelope.

pub mod api;
pub mod types;

pub mod prelude {
    pub use crate::api::*;
    pub use crate::types::*;
}
