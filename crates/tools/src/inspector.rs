use serde::Serialize;
use sceneforge_common::{ObjectId, ObjectKind};
use sceneforge_kernel::Scene;

/// Scene inspector for the editor panels.
///
/// Provides read-only queries against the scene for the hierarchy list, the
/// inspector form and the status bar.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(scene: &Scene, selected: Option<ObjectId>) -> SceneSummary {
        SceneSummary {
            object_count: scene.len(),
            root_count: scene.list().len(),
            selected_name: selected
                .and_then(|id| scene.get(id))
                .map(|o| o.name.clone()),
            pending_events: scene.events().len(),
        }
    }

    /// Flatten the tree into indented rows, pre-order, at any depth.
    pub fn hierarchy(scene: &Scene, selected: Option<ObjectId>) -> Vec<HierarchyRow> {
        scene
            .walk()
            .map(|(depth, object)| HierarchyRow {
                id: object.id,
                name: object.name.clone(),
                kind: object.kind,
                icon: icon_for(object.kind),
                depth,
                selected: selected == Some(object.id),
            })
            .collect()
    }

    /// Inspector data for one object.
    pub fn inspect_object(scene: &Scene, id: ObjectId) -> Option<ObjectInfo> {
        scene.get(id).map(|object| {
            let p = object.transform.position;
            let r = object.transform.rotation;
            let s = object.transform.scale;
            ObjectInfo {
                id,
                name: object.name.clone(),
                kind: object.kind,
                component: component_label(object.kind),
                position: [p.x, p.y, p.z],
                rotation: [r.x, r.y, r.z],
                scale: [s.x, s.y, s.z],
                child_count: object.children.len(),
            }
        })
    }
}

fn icon_for(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Camera => "Camera",
        ObjectKind::Light => "Lightbulb",
        ObjectKind::Cube | ObjectKind::Sphere => "Box",
    }
}

fn component_label(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Cube => "Mesh Renderer",
        ObjectKind::Sphere => "Sphere Collider",
        ObjectKind::Light => "Light Source",
        ObjectKind::Camera => "Camera",
    }
}

/// Summary of scene state for the status bar.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub object_count: usize,
    pub root_count: usize,
    pub selected_name: Option<String>,
    pub pending_events: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} objects ({} roots) selected={}",
            self.object_count,
            self.root_count,
            self.selected_name.as_deref().unwrap_or("-"),
        )
    }
}

/// One line of the hierarchy panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyRow {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub icon: &'static str,
    pub depth: usize,
    pub selected: bool,
}

impl std::fmt::Display for HierarchyRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = if self.selected { ">" } else { " " };
        write!(
            f,
            "{marker}{:indent$}[{}] {}",
            "",
            self.kind,
            self.name,
            indent = self.depth * 2
        )
    }
}

/// Detailed info about a single object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub component: &'static str,
    pub position: [f32; 3],
    /// Degrees.
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub child_count: usize,
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] pos=({:.2}, {:.2}, {:.2}) rot=({:.1}, {:.1}, {:.1}) scale=({:.2}, {:.2}, {:.2})",
            self.name,
            self.id.short(),
            self.position[0],
            self.position[1],
            self.position[2],
            self.rotation[0],
            self.rotation[1],
            self.rotation[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use sceneforge_common::Transform;

    #[test]
    fn summary_default_scene() {
        let scene = Scene::with_defaults();
        let summary = SceneInspector::summary(&scene, None);
        assert_eq!(summary.object_count, 2);
        assert_eq!(summary.root_count, 2);
        assert!(summary.selected_name.is_none());
    }

    #[test]
    fn summary_counts_descendants() {
        let mut scene = Scene::new();
        let root = scene.add(ObjectKind::Cube);
        scene.add_child(root.id, ObjectKind::Sphere).unwrap();
        let summary = SceneInspector::summary(&scene, Some(root.id));
        assert_eq!(summary.object_count, 2);
        assert_eq!(summary.root_count, 1);
        assert_eq!(summary.selected_name.as_deref(), Some("Cube 0"));
        assert_eq!(summary.pending_events, 2);
    }

    #[test]
    fn hierarchy_rows_are_indented_recursively() {
        let mut scene = Scene::with_defaults();
        let cube = scene.add(ObjectKind::Cube);
        let child = scene.add_child(cube.id, ObjectKind::Sphere).unwrap();
        let grandchild = scene.add_child(child.id, ObjectKind::Light).unwrap();

        let rows = SceneInspector::hierarchy(&scene, Some(child.id));
        let depths: Vec<usize> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 0, 0, 1, 2]);
        assert_eq!(rows[0].icon, "Camera");
        assert_eq!(rows[1].icon, "Lightbulb");
        assert!(rows[3].selected);
        assert_eq!(rows[4].id, grandchild.id);
        assert!(format!("{}", rows[4]).contains("    [light]"));
    }

    #[test]
    fn inspect_object_found() {
        let mut scene = Scene::new();
        let cube = scene.add(ObjectKind::Cube);
        scene
            .update(cube.id, |o| *o.transform = Transform::at(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();

        let info = SceneInspector::inspect_object(&scene, cube.id).unwrap();
        assert_eq!(info.position, [1.0, 2.0, 3.0]);
        assert_eq!(info.component, "Mesh Renderer");
        assert!(format!("{info}").contains("pos=(1.00, 2.00, 3.00)"));
    }

    #[test]
    fn inspect_object_not_found() {
        let scene = Scene::new();
        assert!(SceneInspector::inspect_object(&scene, ObjectId::new()).is_none());
    }

    #[test]
    fn summary_display() {
        let scene = Scene::with_defaults();
        let s = format!("{}", SceneInspector::summary(&scene, None));
        assert!(s.contains("2 objects"));
    }
}
