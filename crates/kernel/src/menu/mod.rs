//! Menu composition and navigation rendering.
//!
//! Composition merges every enabled module's menu contribution into one
//! permission-filtered list ordered by weight:
//! - Hidden items and items the session may not see are dropped
//! - Groups left without items are dropped
//! - Entries are stable-sorted by `order` (ties keep registration order)
//!
//! Rendering turns the composed list into the navigation tree handed to the
//! presentation layer, marking the entries that match the current route.

mod compose;
mod navigation;

pub use compose::{ComposedGroup, MenuComposer, MenuEntry};
pub use navigation::{NavEntry, NavItem, render_navigation};
