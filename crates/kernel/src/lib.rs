//! Scene Kernel: the authoritative, ordered scene-object tree.
//!
//! # Invariants
//! - Exactly one copy of every object's transform lives here.
//! - Object ids are unique across roots and all descendants.
//! - Root order is display order and paint order.
//! - All mutations flow through explicit operations and are logged; the log keeps
//!   the most recent mutations only.

pub mod scene;

pub use scene::{
    EVENT_LOG_LIMIT, ObjectMut, ObjectState, Removed, Scene, SceneError, SceneEvent, SceneObject,
    Walk,
};
