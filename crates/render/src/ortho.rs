use glam::Vec2;
use sceneforge_common::{ObjectId, ObjectKind};
use sceneforge_kernel::Scene;

use crate::backend::{BackendKind, ViewportBackend, drawables};
use crate::config::ViewportConfig;
use crate::frame::{Color, DrawCommand, Frame, Highlight, PaintedObject, Stroke, SurfaceSize};
use crate::picking::pick_top_down;
use crate::projection::OrthoProjector;

/// Pseudo-3D canvas backend: grid, axis lines, flat shapes and labels.
#[derive(Debug, Clone)]
pub struct OrthoBackend {
    config: ViewportConfig,
    /// Degrees, in `0.0..360.0`.
    idle_angle: f32,
}

impl OrthoBackend {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            idle_angle: 0.0,
        }
    }

    pub fn idle_angle(&self) -> f32 {
        self.idle_angle
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    fn draw_grid(&self, frame: &mut Frame) {
        let size = frame.size;
        let center = size.center();
        let spacing = self.config.grid_spacing;
        let count = self.config.grid_count as i32;
        let stroke = Stroke {
            color: Color::GRID,
            width: 1.0,
        };
        for i in -count..=count {
            let x = center.x + i as f32 * spacing;
            let y = center.y + i as f32 * spacing;
            frame.push(DrawCommand::Line {
                from: Vec2::new(x, 0.0),
                to: Vec2::new(x, size.height),
                stroke,
            });
            frame.push(DrawCommand::Line {
                from: Vec2::new(0.0, y),
                to: Vec2::new(size.width, y),
                stroke,
            });
        }
        frame.push(DrawCommand::Line {
            from: Vec2::new(center.x, 0.0),
            to: Vec2::new(center.x, size.height),
            stroke: Stroke {
                color: Color::ACCENT,
                width: 2.0,
            },
        });
        frame.push(DrawCommand::Line {
            from: Vec2::new(0.0, center.y),
            to: Vec2::new(size.width, center.y),
            stroke: Stroke {
                color: Color::TEAL,
                width: 2.0,
            },
        });
    }
}

impl ViewportBackend for OrthoBackend {
    fn render(&self, scene: &Scene, selected: Option<ObjectId>, size: SurfaceSize) -> Frame {
        let _span = tracing::debug_span!("ortho_render", w = size.width, h = size.height).entered();
        let projector = OrthoProjector::new(&self.config, size);
        let mut frame = Frame::new(size);
        frame.push(DrawCommand::Clear {
            color: Color::BACKGROUND,
        });
        self.draw_grid(&mut frame);

        for object in drawables(scene) {
            let t = &object.transform;
            let center = projector.screen_position(t.position);
            let side = projector.screen_size(t.scale);
            let rotation = (t.rotation.y + self.idle_angle).to_radians();
            let highlight = Highlight::resolve(object.id, selected, None);

            match object.kind {
                ObjectKind::Sphere => frame.push(DrawCommand::Circle {
                    center,
                    radius: side / 2.0,
                    fill: Color::TEAL,
                    outline: highlight.outline(Color::ACCENT),
                }),
                _ => frame.push(DrawCommand::Rect {
                    center,
                    size: side,
                    rotation,
                    fill: Color::ACCENT,
                    outline: highlight.outline(Color::TEAL),
                }),
            }
            frame.push(DrawCommand::Label {
                at: Vec2::new(center.x, center.y + side / 2.0 + self.config.label_offset),
                text: object.name.clone(),
                color: Color::WHITE,
            });
            frame.painted.push(PaintedObject {
                id: object.id,
                highlight,
            });
        }

        tracing::debug!(objects = frame.painted.len(), "ortho frame built");
        frame
    }

    fn pick(&self, scene: &Scene, size: SurfaceSize, point: Vec2) -> Option<ObjectId> {
        let projector = OrthoProjector::new(&self.config, size);
        pick_top_down(&drawables(scene), |object| {
            projector
                .silhouette(object)
                .is_some_and(|s| s.contains(point))
        })
    }

    fn advance_idle(&mut self, _scene: &Scene) {
        self.idle_angle = (self.idle_angle + self.config.idle_step_degrees).rem_euclid(360.0);
    }

    fn reset(&mut self) {
        self.idle_angle = 0.0;
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Ortho
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use sceneforge_common::{MIN_SCALE, Transform};

    fn size() -> SurfaceSize {
        SurfaceSize::new(800.0, 600.0)
    }

    fn place(scene: &mut Scene, id: ObjectId, position: Vec3, scale: f32) {
        scene
            .update(id, |o| {
                *o.transform = Transform {
                    position,
                    scale: Vec3::splat(scale),
                    ..Transform::default()
                }
            })
            .unwrap();
    }

    #[test]
    fn default_scene_then_cube_is_pickable_at_its_center() {
        let mut scene = Scene::with_defaults();
        let cube = scene.add(ObjectKind::Cube);
        assert_eq!(scene.len(), 3);
        assert_eq!(cube.transform.position, Vec3::ZERO);

        let backend = OrthoBackend::new(ViewportConfig::default());
        assert_eq!(backend.pick(&scene, size(), size().center()), Some(cube.id));
    }

    #[test]
    fn later_object_wins_overlap() {
        let mut scene = Scene::new();
        let a = scene.add(ObjectKind::Cube);
        let b = scene.add(ObjectKind::Sphere);
        place(&mut scene, a.id, Vec3::ZERO, 2.0);
        place(&mut scene, b.id, Vec3::new(0.2, 0.0, 0.0), 1.0);

        let backend = OrthoBackend::new(ViewportConfig::default());
        let p = Vec2::new(405.0, 300.0);
        assert_eq!(backend.pick(&scene, size(), p), Some(b.id));

        let frame = backend.render(&scene, None, size());
        assert_eq!(frame.paint_order(), vec![a.id, b.id]);
    }

    #[test]
    fn paint_and_pick_orders_agree_with_children() {
        let mut scene = Scene::new();
        let parent = scene.add(ObjectKind::Cube);
        let child = scene.add_child(parent.id, ObjectKind::Cube).unwrap();
        let backend = OrthoBackend::new(ViewportConfig::default());

        let frame = backend.render(&scene, None, size());
        let top = *frame.paint_order().last().unwrap();
        assert_eq!(top, child.id);
        assert_eq!(backend.pick(&scene, size(), size().center()), Some(top));
    }

    #[test]
    fn miss_returns_none() {
        let mut scene = Scene::with_defaults();
        scene.add(ObjectKind::Cube);
        let backend = OrthoBackend::new(ViewportConfig::default());
        assert_eq!(backend.pick(&scene, size(), Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn lights_and_cameras_are_never_picked() {
        let scene = Scene::with_defaults();
        let backend = OrthoBackend::new(ViewportConfig::default());
        for (_, object) in scene.walk() {
            let at = OrthoProjector::new(backend.config(), size())
                .screen_position(object.transform.position);
            assert_eq!(backend.pick(&scene, size(), at), None);
        }
    }

    #[test]
    fn pick_only_returns_live_ids() {
        let mut scene = Scene::with_defaults();
        let cube = scene.add(ObjectKind::Cube);
        let sphere = scene.add(ObjectKind::Sphere);
        place(&mut scene, sphere.id, Vec3::new(2.0, 1.0, 0.0), 1.0);
        scene.remove(cube.id).unwrap();

        let backend = OrthoBackend::new(ViewportConfig::default());
        for x in (0..800).step_by(10) {
            for y in (0..600).step_by(10) {
                if let Some(id) = backend.pick(&scene, size(), Vec2::new(x as f32, y as f32)) {
                    assert!(scene.contains(id));
                    assert_ne!(id, cube.id);
                }
            }
        }
    }

    #[test]
    fn tiny_object_stays_clickable() {
        let mut scene = Scene::new();
        let cube = scene.add(ObjectKind::Cube);
        place(&mut scene, cube.id, Vec3::ZERO, MIN_SCALE);
        let backend = OrthoBackend::new(ViewportConfig::default());
        // 30px minimum side: 14px off centre is still inside.
        assert_eq!(
            backend.pick(&scene, size(), Vec2::new(414.0, 286.0)),
            Some(cube.id)
        );
    }

    #[test]
    fn selected_object_is_outlined() {
        let mut scene = Scene::new();
        let a = scene.add(ObjectKind::Cube);
        let b = scene.add(ObjectKind::Sphere);
        let backend = OrthoBackend::new(ViewportConfig::default());
        let frame = backend.render(&scene, Some(b.id), size());

        assert_eq!(frame.highlight_of(b.id), Some(Highlight::Selected));
        assert_eq!(frame.highlight_of(a.id), Some(Highlight::None));
        let outlined = frame
            .commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::Circle { outline: Some(_), .. }
                        | DrawCommand::Rect { outline: Some(_), .. }
                )
            })
            .count();
        assert_eq!(outlined, 1);
    }

    #[test]
    fn frame_has_grid_axes_and_labels() {
        let mut scene = Scene::with_defaults();
        scene.add(ObjectKind::Cube);
        let backend = OrthoBackend::new(ViewportConfig::default());
        let frame = backend.render(&scene, None, size());

        let lines = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 2 * 41 + 2);
        let labels: Vec<&str> = frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, at, .. } => {
                    assert_eq!(*at, Vec2::new(400.0, 345.0));
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Cube 2"]);
    }

    #[test]
    fn idle_angle_wraps_and_never_touches_the_model() {
        let mut scene = Scene::new();
        let cube = scene.add(ObjectKind::Cube);
        let before = scene.list().to_vec();
        let mut backend = OrthoBackend::new(ViewportConfig::default());
        for _ in 0..1300 {
            backend.advance_idle(&scene);
            assert!((0.0..360.0).contains(&backend.idle_angle()));
        }
        assert!(backend.idle_angle() > 0.0);
        backend.render(&scene, Some(cube.id), size());
        assert_eq!(scene.list(), before.as_slice());

        backend.reset();
        assert_eq!(backend.idle_angle(), 0.0);
    }
}
