use sceneforge_common::ObjectId;
use sceneforge_kernel::{Scene, SceneObject};

/// Selection state machine: nothing, or exactly one live object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(ObjectId),
}

impl Selection {
    pub fn id(&self) -> Option<ObjectId> {
        match self {
            Self::Unselected => None,
            Self::Selected(id) => Some(*id),
        }
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.id() == Some(id)
    }

    /// Select `id` if it resolves to a live object; otherwise fall back to
    /// `Unselected`. Returns whether the id resolved.
    pub fn select(&mut self, scene: &Scene, id: ObjectId) -> bool {
        if scene.contains(id) {
            *self = Self::Selected(id);
            true
        } else {
            *self = Self::Unselected;
            false
        }
    }

    pub fn clear(&mut self) {
        *self = Self::Unselected;
    }

    /// Drop the selection if it points at the object that was just deleted.
    pub fn clear_on_delete(&mut self, deleted: ObjectId) {
        if self.is_selected(deleted) {
            *self = Self::Unselected;
        }
    }

    /// Drop the selection if its object is no longer in `scene`.
    pub fn revalidate(&mut self, scene: &Scene) {
        if let Self::Selected(id) = *self {
            if !scene.contains(id) {
                *self = Self::Unselected;
            }
        }
    }

    /// The selected object as it lives in `scene`.
    pub fn resolve<'a>(&self, scene: &'a Scene) -> Option<&'a SceneObject> {
        self.id().and_then(|id| scene.get(id))
    }
}
