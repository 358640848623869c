//! Editor input: UI shell events mapped to a shared action set.
//!
//! # Invariants
//! - The session consumes actions, never raw key or pointer events.
//! - Unbound input maps to `Action::Noop`.

pub mod action;
pub mod keys;

pub use action::Action;
pub use keys::map_key;
