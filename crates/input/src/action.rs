use serde::{Deserialize, Serialize};
use sceneforge_common::{ObjectId, ObjectKind, TransformEdit};

/// A high-level action the UI shell (toolbar, hierarchy, inspector, keyboard)
/// can ask the editor session to perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Add a new root object of the given kind and select it.
    AddObject(ObjectKind),
    /// Delete the selected object, if any.
    DeleteSelected,
    /// Select an object by id.
    Select(ObjectId),
    /// Clear the selection.
    Deselect,
    /// Set one transform component of the selected object.
    EditTransform(TransformEdit),
    /// Rename the selected object.
    Rename(String),
    /// Undo the last edit.
    Undo,
    /// Redo the last undone edit.
    Redo,
    /// No-op (used for input that isn't bound to anything).
    Noop,
}

impl Action {
    /// Whether performing this action can change the scene.
    pub fn mutates_scene(&self) -> bool {
        matches!(
            self,
            Self::AddObject(_)
                | Self::DeleteSelected
                | Self::EditTransform(_)
                | Self::Rename(_)
                | Self::Undo
                | Self::Redo
        )
    }
}
