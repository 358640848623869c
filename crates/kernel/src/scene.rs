use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sceneforge_common::{ObjectId, ObjectKind, Transform};

/// One entity in the editable scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub transform: Transform,
    pub children: Vec<SceneObject>,
}

impl SceneObject {
    /// A fresh object with a new id, default transform and no children.
    pub fn new(kind: ObjectKind, name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            kind,
            transform: Transform::default(),
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform.sanitized();
        self
    }

    /// Find this object or one of its descendants by id.
    pub fn find(&self, id: ObjectId) -> Option<&SceneObject> {
        if self.id == id {
            return Some(self);
        }
        find(&self.children, id)
    }

    /// Ids of this object and every descendant, pre-order.
    pub fn subtree_ids(&self) -> Vec<ObjectId> {
        let mut ids = vec![self.id];
        for child in &self.children {
            ids.extend(child.subtree_ids());
        }
        ids
    }
}

/// The editable part of an object handed to [`Scene::update`] mutators.
///
/// Id, kind and children are deliberately out of reach.
pub struct ObjectMut<'a> {
    pub name: &'a mut String,
    pub transform: &'a mut Transform,
}

/// Name and transform of an object at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    pub name: String,
    pub transform: Transform,
}

impl ObjectState {
    pub fn of(object: &SceneObject) -> Self {
        Self {
            name: object.name.clone(),
            transform: object.transform,
        }
    }
}

/// An event record produced by every mutation to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Object was inserted under `parent` (`None` = root).
    Added {
        id: ObjectId,
        kind: ObjectKind,
        parent: Option<ObjectId>,
    },
    /// Object (and its subtree) was removed from `parent` at `index`.
    Removed {
        id: ObjectId,
        parent: Option<ObjectId>,
        index: usize,
    },
    /// Object name or transform changed.
    Updated {
        id: ObjectId,
        old: ObjectState,
        new: ObjectState,
    },
}

/// A subtree taken out of the scene, with enough context to put it back.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub object: SceneObject,
    pub parent: Option<ObjectId>,
    pub index: usize,
}

/// Errors from scene operations. None of them are fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("object {0} not found")]
    NotFound(ObjectId),
    #[error("object {0} already exists in the scene")]
    DuplicateId(ObjectId),
}

/// Number of most recent events the scene keeps; older ones are dropped.
pub const EVENT_LOG_LIMIT: usize = 1024;

/// The authoritative scene.
///
/// Roots are kept in insertion order, which is also the order the hierarchy
/// lists them and the order the viewport paints them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    roots: Vec<SceneObject>,
    /// Most recent mutations, oldest first, at most [`EVENT_LOG_LIMIT`].
    #[serde(skip)]
    event_log: VecDeque<SceneEvent>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// The starting scene of a new editor session: a camera and a light.
    pub fn with_defaults() -> Self {
        let camera = SceneObject::new(ObjectKind::Camera, "Main Camera")
            .with_transform(Transform::at(Vec3::new(0.0, 1.0, -10.0)));
        let light = SceneObject::new(ObjectKind::Light, "Directional Light").with_transform(
            Transform {
                position: Vec3::new(0.0, 3.0, 0.0),
                rotation: Vec3::new(50.0, -30.0, 0.0),
                ..Transform::default()
            },
        );
        Self {
            roots: vec![camera, light],
            event_log: VecDeque::new(),
        }
    }

    /// Root objects in display order.
    pub fn list(&self) -> &[SceneObject] {
        &self.roots
    }

    /// Total number of objects, descendants included.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Look up any object in the tree.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        find(&self.roots, id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Depth-first pre-order traversal yielding `(depth, object)`.
    ///
    /// This is the paint order: a parent is drawn before its children and
    /// later siblings after earlier ones.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self.roots.iter())],
        }
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &VecDeque<SceneEvent> {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.event_log.drain(..).collect()
    }

    fn record(&mut self, event: SceneEvent) {
        if self.event_log.len() == EVENT_LOG_LIMIT {
            self.event_log.pop_front();
        }
        self.event_log.push_back(event);
    }

    /// Append a new object of `kind` to the end of the root sequence.
    pub fn add(&mut self, kind: ObjectKind) -> SceneObject {
        let object = SceneObject::new(kind, self.default_name(kind));
        self.roots.push(object.clone());
        self.record(SceneEvent::Added {
            id: object.id,
            kind,
            parent: None,
        });
        tracing::debug!(id = %object.id.short(), %kind, "added root object");
        object
    }

    /// Append a new object of `kind` as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: ObjectId,
        kind: ObjectKind,
    ) -> Result<SceneObject, SceneError> {
        let object = SceneObject::new(kind, self.default_name(kind));
        let siblings = self.children_mut(Some(parent))?;
        siblings.push(object.clone());
        self.record(SceneEvent::Added {
            id: object.id,
            kind,
            parent: Some(parent),
        });
        tracing::debug!(id = %object.id.short(), parent = %parent.short(), "added child object");
        Ok(object)
    }

    /// Put a subtree back under `parent` at `index` (clamped to the end).
    ///
    /// Rejects the insert if any id in the subtree is already present.
    pub fn insert(
        &mut self,
        object: SceneObject,
        parent: Option<ObjectId>,
        index: usize,
    ) -> Result<(), SceneError> {
        if let Some(dup) = object.subtree_ids().into_iter().find(|id| self.contains(*id)) {
            return Err(SceneError::DuplicateId(dup));
        }
        let id = object.id;
        let kind = object.kind;
        let siblings = self.children_mut(parent)?;
        let index = index.min(siblings.len());
        siblings.insert(index, object);
        self.record(SceneEvent::Added { id, kind, parent });
        Ok(())
    }

    /// Remove an object and its subtree from wherever it sits in the tree.
    pub fn remove(&mut self, id: ObjectId) -> Result<Removed, SceneError> {
        let removed = remove_from(&mut self.roots, None, id).ok_or(SceneError::NotFound(id))?;
        self.record(SceneEvent::Removed {
            id,
            parent: removed.parent,
            index: removed.index,
        });
        tracing::debug!(id = %id.short(), index = removed.index, "removed object");
        Ok(removed)
    }

    /// Mutate an object's name or transform in place.
    ///
    /// The object keeps its position in its parent's child list. Scale is
    /// re-clamped after the mutator runs. Returns a snapshot of the updated
    /// object.
    pub fn update<F>(&mut self, id: ObjectId, mutate: F) -> Result<SceneObject, SceneError>
    where
        F: FnOnce(ObjectMut<'_>),
    {
        let object = find_mut(&mut self.roots, id).ok_or(SceneError::NotFound(id))?;
        let old = ObjectState::of(object);
        mutate(ObjectMut {
            name: &mut object.name,
            transform: &mut object.transform,
        });
        object.transform = object.transform.sanitized();
        let new = ObjectState::of(object);
        let snapshot = object.clone();
        self.record(SceneEvent::Updated { id, old, new });
        Ok(snapshot)
    }

    fn default_name(&self, kind: ObjectKind) -> String {
        format!("{} {}", kind.label(), self.len())
    }

    fn children_mut(
        &mut self,
        parent: Option<ObjectId>,
    ) -> Result<&mut Vec<SceneObject>, SceneError> {
        match parent {
            None => Ok(&mut self.roots),
            Some(pid) => find_mut(&mut self.roots, pid)
                .map(|p| &mut p.children)
                .ok_or(SceneError::NotFound(pid)),
        }
    }
}

/// Pre-order iterator over the whole tree. See [`Scene::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, std::slice::Iter<'a, SceneObject>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a SceneObject);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, iter) = self.stack.last_mut()?;
            match iter.next() {
                Some(object) => {
                    let depth = *depth;
                    if !object.children.is_empty() {
                        self.stack.push((depth + 1, object.children.iter()));
                    }
                    return Some((depth, object));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

fn find(list: &[SceneObject], id: ObjectId) -> Option<&SceneObject> {
    list.iter().find_map(|o| o.find(id))
}

fn find_mut(list: &mut [SceneObject], id: ObjectId) -> Option<&mut SceneObject> {
    for object in list.iter_mut() {
        if object.id == id {
            return Some(object);
        }
        if let Some(found) = find_mut(&mut object.children, id) {
            return Some(found);
        }
    }
    None
}

fn remove_from(
    list: &mut Vec<SceneObject>,
    parent: Option<ObjectId>,
    id: ObjectId,
) -> Option<Removed> {
    if let Some(index) = list.iter().position(|o| o.id == id) {
        let object = list.remove(index);
        return Some(Removed {
            object,
            parent,
            index,
        });
    }
    for object in list.iter_mut() {
        let pid = object.id;
        if let Some(removed) = remove_from(&mut object.children, Some(pid), id) {
            return Some(removed);
        }
    }
    None
}
