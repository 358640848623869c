use sceneforge_common::{Axis, CommonError, ObjectId, ObjectKind, TransformEdit, TransformField};
use sceneforge_input::Action;
use sceneforge_kernel::{Scene, SceneError, SceneObject};

use crate::{Editor, Selection};

/// Errors surfaced by session operations. All are recoverable: the session
/// stays on its last good state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Common(#[from] CommonError),
    #[error("no object is selected")]
    NothingSelected,
}

/// The editor core the UI shell talks to.
///
/// Owns the scene, the selection and the command stack. The selected object
/// is never held separately: [`current_selection`](Self::current_selection)
/// looks it up in the scene, so the inspector and the viewport can never
/// disagree about its transform.
#[derive(Debug)]
pub struct EditorSession {
    scene: Scene,
    selection: Selection,
    editor: Editor,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// A session over the default scene (camera + light), nothing selected.
    pub fn new() -> Self {
        Self::with_scene(Scene::with_defaults())
    }

    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            selection: Selection::Unselected,
            editor: Editor::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Root objects in display order, for the hierarchy panel.
    pub fn list_objects(&self) -> &[SceneObject] {
        self.scene.list()
    }

    /// Add a root object and select it. Cameras cannot be added.
    pub fn add_object(&mut self, kind: ObjectKind) -> Result<SceneObject, SessionError> {
        if kind == ObjectKind::Camera {
            tracing::warn!("refusing to add a camera object");
            return Err(CommonError::InvalidInput("cameras cannot be added".into()).into());
        }
        let object = self.editor.add(&mut self.scene, kind);
        self.selection.select(&self.scene, object.id);
        tracing::info!(id = %object.id.short(), name = %object.name, "object added");
        Ok(object)
    }

    /// Add a child under `parent` and select it.
    pub fn add_child_object(
        &mut self,
        parent: ObjectId,
        kind: ObjectKind,
    ) -> Result<SceneObject, SessionError> {
        if kind == ObjectKind::Camera {
            return Err(CommonError::InvalidInput("cameras cannot be added".into()).into());
        }
        let object = self.editor.add_child(&mut self.scene, parent, kind)?;
        self.selection.select(&self.scene, object.id);
        tracing::info!(id = %object.id.short(), parent = %parent.short(), "child added");
        Ok(object)
    }

    /// Remove the selected object. No-op when nothing is selected.
    pub fn delete_selected(&mut self) -> Option<SceneObject> {
        let id = self.selection.id()?;
        match self.editor.remove(&mut self.scene, id) {
            Ok(removed) => {
                self.selection.clear_on_delete(id);
                tracing::info!(id = %id.short(), "selected object deleted");
                Some(removed.object)
            }
            Err(e) => {
                tracing::warn!("delete failed: {e}");
                self.selection.revalidate(&self.scene);
                None
            }
        }
    }

    /// Select an object. An unknown id leaves the session unselected.
    pub fn select(&mut self, id: ObjectId) -> Result<(), SessionError> {
        if self.selection.select(&self.scene, id) {
            tracing::debug!(id = %id.short(), "selected");
            Ok(())
        } else {
            tracing::warn!(id = %id.short(), "select: object not found");
            Err(SceneError::NotFound(id).into())
        }
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selection.id()
    }

    /// The selected object, looked up in the scene.
    pub fn current_selection(&self) -> Option<&SceneObject> {
        self.selection.resolve(&self.scene)
    }

    /// Set one transform component of the selected object.
    pub fn update_selected_transform(
        &mut self,
        field: TransformField,
        axis: Axis,
        value: f32,
    ) -> Result<SceneObject, SessionError> {
        self.edit_selected(TransformEdit::new(field, axis, value))
    }

    /// Apply an inspector edit to the selected object through the store.
    pub fn edit_selected(&mut self, edit: TransformEdit) -> Result<SceneObject, SessionError> {
        let Some(id) = self.selection.id() else {
            tracing::warn!(field = %edit.field, axis = %edit.axis, "transform edit with nothing selected");
            return Err(SessionError::NothingSelected);
        };
        let updated = self
            .editor
            .update(&mut self.scene, id, |o| *o.transform = edit.apply(*o.transform))
            .inspect_err(|_| self.selection.revalidate(&self.scene))?;
        tracing::debug!(
            id = %id.short(),
            field = %edit.field,
            axis = %edit.axis,
            value = edit.value,
            "transform edited"
        );
        Ok(updated)
    }

    /// Rename the selected object.
    pub fn rename_selected(&mut self, name: &str) -> Result<SceneObject, SessionError> {
        let id = self.selection.id().ok_or(SessionError::NothingSelected)?;
        let name = name.to_string();
        Ok(self
            .editor
            .update(&mut self.scene, id, |o| *o.name = name)?)
    }

    /// Undo the last edit; the selection is dropped if its object vanished.
    pub fn undo(&mut self) -> bool {
        let done = self.editor.undo(&mut self.scene);
        self.selection.revalidate(&self.scene);
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.editor.redo(&mut self.scene);
        self.selection.revalidate(&self.scene);
        done
    }

    /// Perform a shell action.
    pub fn apply(&mut self, action: Action) -> Result<(), SessionError> {
        match action {
            Action::AddObject(kind) => self.add_object(kind).map(|_| ()),
            Action::DeleteSelected => {
                self.delete_selected();
                Ok(())
            }
            Action::Select(id) => self.select(id),
            Action::Deselect => {
                self.deselect();
                Ok(())
            }
            Action::EditTransform(edit) => self.edit_selected(edit).map(|_| ()),
            Action::Rename(name) => self.rename_selected(&name).map(|_| ()),
            Action::Undo => {
                self.undo();
                Ok(())
            }
            Action::Redo => {
                self.redo();
                Ok(())
            }
            Action::Noop => Ok(()),
        }
    }
}
