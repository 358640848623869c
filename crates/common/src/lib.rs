//! Shared types for the scene editor core.
//!
//! # Invariants
//! - `ObjectId`s are unique for the lifetime of a session.
//! - A `Transform` never carries a scale component below [`MIN_SCALE`].

mod error;
mod transform;
mod types;

pub use error::CommonError;
pub use transform::{Axis, MIN_SCALE, Transform, TransformEdit, TransformField, parse_component};
pub use types::{ObjectId, ObjectKind};
