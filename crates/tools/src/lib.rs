//! Panel tooling: read-only views of the scene for the hierarchy panel, the
//! inspector and the status bar.
//!
//! # Invariants
//! - Tools never mutate the scene.

mod inspector;

pub use inspector::{HierarchyRow, ObjectInfo, SceneInspector, SceneSummary};
