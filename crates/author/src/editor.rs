use sceneforge_common::{ObjectId, ObjectKind};
use sceneforge_kernel::{ObjectMut, ObjectState, Removed, Scene, SceneError, SceneObject};

/// An editing command that can be applied to the scene and reversed.
///
/// Each command carries enough context to undo itself.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Insert a subtree. Undo = remove it.
    Add {
        object: SceneObject,
        parent: Option<ObjectId>,
        index: usize,
    },
    /// Remove a subtree. Undo = put it back at the same place.
    Remove {
        object: SceneObject,
        parent: Option<ObjectId>,
        index: usize,
    },
    /// Change name and/or transform. Undo = restore old state.
    Update {
        id: ObjectId,
        old: ObjectState,
        new: ObjectState,
    },
}

impl EditCommand {
    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match self {
            Self::Add {
                object,
                parent,
                index,
            } => Self::Remove {
                object: object.clone(),
                parent: *parent,
                index: *index,
            },
            Self::Remove {
                object,
                parent,
                index,
            } => Self::Add {
                object: object.clone(),
                parent: *parent,
                index: *index,
            },
            Self::Update { id, old, new } => Self::Update {
                id: *id,
                old: new.clone(),
                new: old.clone(),
            },
        }
    }
}

/// Command stack with undo/redo over a [`Scene`].
///
/// Every authoring operation is reversible via `undo()` and re-applicable via
/// `redo()`.
#[derive(Debug, Default)]
pub struct Editor {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl Editor {
    /// Create a new editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root object and push to undo stack.
    pub fn add(&mut self, scene: &mut Scene, kind: ObjectKind) -> SceneObject {
        let object = scene.add(kind);
        let index = scene.list().len() - 1;
        self.record(EditCommand::Add {
            object: object.clone(),
            parent: None,
            index,
        });
        object
    }

    /// Add a child object and push to undo stack.
    pub fn add_child(
        &mut self,
        scene: &mut Scene,
        parent: ObjectId,
        kind: ObjectKind,
    ) -> Result<SceneObject, SceneError> {
        let object = scene.add_child(parent, kind)?;
        let index = scene
            .get(parent)
            .map(|p| p.children.len().saturating_sub(1))
            .unwrap_or_default();
        self.record(EditCommand::Add {
            object: object.clone(),
            parent: Some(parent),
            index,
        });
        Ok(object)
    }

    /// Remove an object and push to undo stack.
    pub fn remove(&mut self, scene: &mut Scene, id: ObjectId) -> Result<Removed, SceneError> {
        let removed = scene.remove(id)?;
        self.record(EditCommand::Remove {
            object: removed.object.clone(),
            parent: removed.parent,
            index: removed.index,
        });
        Ok(removed)
    }

    /// Mutate an object in place and push to undo stack.
    ///
    /// Nothing is recorded when the mutation leaves the object unchanged.
    pub fn update<F>(
        &mut self,
        scene: &mut Scene,
        id: ObjectId,
        mutate: F,
    ) -> Result<SceneObject, SceneError>
    where
        F: FnOnce(ObjectMut<'_>),
    {
        let old = scene
            .get(id)
            .map(ObjectState::of)
            .ok_or(SceneError::NotFound(id))?;
        let updated = scene.update(id, mutate)?;
        let new = ObjectState::of(&updated);
        if new != old {
            self.record(EditCommand::Update { id, old, new });
        }
        Ok(updated)
    }

    /// Undo the last edit. Returns true if an operation was undone.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        if let Err(e) = apply_command(scene, &cmd.inverse()) {
            tracing::warn!("undo failed, dropping command: {e}");
            return false;
        }
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the last undone edit. Returns true if an operation was redone.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        if let Err(e) = apply_command(scene, &cmd) {
            tracing::warn!("redo failed, dropping command: {e}");
            return false;
        }
        self.undo_stack.push(cmd);
        true
    }

    /// Number of operations on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn record(&mut self, cmd: EditCommand) {
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
    }
}

fn apply_command(scene: &mut Scene, cmd: &EditCommand) -> Result<(), SceneError> {
    match cmd {
        EditCommand::Add {
            object,
            parent,
            index,
        } => scene.insert(object.clone(), *parent, *index),
        EditCommand::Remove { object, .. } => scene.remove(object.id).map(|_| ()),
        EditCommand::Update { id, new, .. } => scene
            .update(*id, |o| {
                *o.name = new.name.clone();
                *o.transform = new.transform;
            })
            .map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use sceneforge_common::{Axis, TransformField};

    #[test]
    fn add_and_undo() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();

        let cube = editor.add(&mut scene, ObjectKind::Cube);
        assert_eq!(scene.len(), 1);

        assert!(editor.undo(&mut scene));
        assert!(scene.is_empty());
        assert!(scene.get(cube.id).is_none());
    }

    #[test]
    fn add_undo_redo_keeps_id() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();

        let cube = editor.add(&mut scene, ObjectKind::Cube);
        editor.undo(&mut scene);
        editor.redo(&mut scene);
        assert_eq!(scene.len(), 1);
        assert!(scene.get(cube.id).is_some());
    }

    #[test]
    fn remove_and_undo_restores_order() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();

        let a = editor.add(&mut scene, ObjectKind::Cube);
        let b = editor.add(&mut scene, ObjectKind::Sphere);
        let c = editor.add(&mut scene, ObjectKind::Cube);
        editor.remove(&mut scene, b.id).unwrap();
        assert_eq!(scene.len(), 2);

        editor.undo(&mut scene);
        let order: Vec<ObjectId> = scene.list().iter().map(|o| o.id).collect();
        assert_eq!(order, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn update_and_undo() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();

        let cube = editor.add(&mut scene, ObjectKind::Cube);
        editor
            .update(&mut scene, cube.id, |o| {
                *o.transform = o
                    .transform
                    .with_component(TransformField::Position, Axis::X, 10.0);
            })
            .unwrap();
        assert_eq!(scene.get(cube.id).unwrap().transform.position.x, 10.0);

        editor.undo(&mut scene);
        assert_eq!(scene.get(cube.id).unwrap().transform.position, Vec3::ZERO);
    }

    #[test]
    fn unchanged_update_is_not_recorded() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();
        let cube = editor.add(&mut scene, ObjectKind::Cube);
        editor.update(&mut scene, cube.id, |_| {}).unwrap();
        assert_eq!(editor.undo_count(), 1);
    }

    #[test]
    fn nested_add_undo_redo() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();
        let parent = editor.add(&mut scene, ObjectKind::Cube);
        let child = editor
            .add_child(&mut scene, parent.id, ObjectKind::Sphere)
            .unwrap();

        editor.undo(&mut scene);
        assert!(!scene.contains(child.id));
        editor.redo(&mut scene);
        assert_eq!(scene.get(parent.id).unwrap().children[0].id, child.id);
    }

    #[test]
    fn redo_cleared_on_new_edit() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();

        editor.add(&mut scene, ObjectKind::Cube);
        editor.undo(&mut scene);
        assert!(editor.can_redo());

        editor.add(&mut scene, ObjectKind::Cube);
        assert!(!editor.can_redo());
    }

    #[test]
    fn undo_redo_empty_return_false() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();
        assert!(!editor.undo(&mut scene));
        assert!(!editor.redo(&mut scene));
    }

    #[test]
    fn remove_nonexistent_returns_error() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();
        let ghost = ObjectId::new();
        assert_eq!(
            editor.remove(&mut scene, ghost).unwrap_err(),
            SceneError::NotFound(ghost)
        );
        assert!(!editor.can_undo());
    }
}
