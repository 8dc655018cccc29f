//! Input: key names mapped to vessel drive actions.
//!
//! # Invariants
//! - The kernel consumes [`Action`]s, never raw key events.
//! - Releasing any key bound to a vessel zeroes that vessel's whole speed pair.

pub mod action;
pub mod bindings;

pub use action::{Action, apply_action};
pub use bindings::{InputMap, Key, KeyState};
