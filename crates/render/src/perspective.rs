use std::collections::BTreeMap;

use glam::{Mat4, Vec2, Vec3};
use sceneforge_common::{ObjectId, ObjectKind};
use sceneforge_kernel::{Scene, SceneObject};

use crate::backend::{BackendKind, ViewportBackend, drawables};
use crate::camera::{OrbitCamera, clip_polygon, clip_to_screen, in_depth_range, project_with};
use crate::config::ViewportConfig;
use crate::frame::{Color, DrawCommand, Frame, Highlight, PaintedObject, Stroke, SurfaceSize};
use crate::picking::{pick_top_down, ray_box, ray_sphere};

const AMBIENT: f32 = 0.35;
const GROUND_EXTENT: i32 = 10;

/// Unit cube faces: outward normal and corners, counter-clockwise seen from
/// outside.
const FACES: [(Vec3, [Vec3; 4]); 6] = [
    (
        Vec3::X,
        [
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
        ],
    ),
    (
        Vec3::NEG_X,
        [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ],
    ),
    (
        Vec3::Y,
        [
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ],
    ),
    (
        Vec3::NEG_Y,
        [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(-0.5, -0.5, 0.5),
        ],
    ),
    (
        Vec3::Z,
        [
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ],
    ),
    (
        Vec3::NEG_Z,
        [
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
        ],
    ),
];

/// True perspective backend with an orbit camera.
///
/// Cubes spin while idle. The spin is kept here per object id and folded
/// into the model matrix for both drawing and picking; the scene never sees
/// it.
#[derive(Debug, Clone)]
pub struct PerspectiveBackend {
    config: ViewportConfig,
    camera: OrbitCamera,
    /// Extra yaw per cube, degrees.
    spin: BTreeMap<ObjectId, f32>,
    hovered: Option<ObjectId>,
}

impl PerspectiveBackend {
    pub fn new(config: ViewportConfig) -> Self {
        let camera = OrbitCamera::from_config(&config.camera);
        Self {
            config,
            camera,
            spin: BTreeMap::new(),
            hovered: None,
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    /// Current idle spin of a cube, degrees.
    pub fn spin_of(&self, id: ObjectId) -> f32 {
        self.spin.get(&id).copied().unwrap_or(0.0)
    }

    /// Model matrix used for both drawing and picking.
    fn model_matrix(&self, object: &SceneObject) -> Mat4 {
        let t = &object.transform;
        let spin = match object.kind {
            ObjectKind::Cube => self.spin_of(object.id),
            _ => 0.0,
        };
        Mat4::from_scale_rotation_translation(t.scale, t.rotation_quat(spin), t.position)
    }

    fn draw_ground(&self, frame: &mut Frame, view_projection: Mat4) {
        let stroke = Stroke {
            color: Color::GRID,
            width: 1.0,
        };
        let extent = GROUND_EXTENT as f32;
        for i in -GROUND_EXTENT..=GROUND_EXTENT {
            let v = i as f32;
            let segments = [
                (Vec3::new(v, 0.0, -extent), Vec3::new(v, 0.0, extent)),
                (Vec3::new(-extent, 0.0, v), Vec3::new(extent, 0.0, v)),
            ];
            for (a, b) in segments {
                let (Some(from), Some(to)) = (
                    project_with(view_projection, a, frame.size),
                    project_with(view_projection, b, frame.size),
                ) else {
                    continue;
                };
                frame.push(DrawCommand::Line { from, to, stroke });
            }
        }
    }

    /// What the render pass paints for `object`, or `None` when nothing of it
    /// survives clipping. Picking goes through the same check.
    fn shape(
        &self,
        object: &SceneObject,
        view_projection: Mat4,
        size: SurfaceSize,
    ) -> Option<Shape> {
        match object.kind {
            ObjectKind::Sphere => self.sphere_shape(object, view_projection, size),
            _ => self.cube_shape(object, view_projection, size),
        }
    }

    fn cube_shape(
        &self,
        object: &SceneObject,
        view_projection: Mat4,
        size: SurfaceSize,
    ) -> Option<Shape> {
        let model = self.model_matrix(object);
        let rotation = object.transform.rotation_quat(self.spin_of(object.id));
        let eye = self.camera.eye();
        let to_clip = |corners: [Vec3; 4]| {
            corners.map(|c| view_projection * model.transform_point3(c).extend(1.0))
        };

        // Once the box is cut by the near plane its back faces show through
        // the opening and must be painted too.
        let cut = FACES
            .iter()
            .flat_map(|(_, corners)| to_clip(*corners))
            .any(|c| !in_depth_range(c));

        let mut faces = Vec::with_capacity(if cut { 6 } else { 3 });
        for (normal, corners) in FACES {
            let world_normal = rotation * normal;
            let face_center = model.transform_point3(normal * 0.5);
            let front = world_normal.dot(eye - face_center) > 0.0;
            if !front && !cut {
                continue;
            }
            let clipped = clip_polygon(&to_clip(corners));
            if clipped.len() < 3 {
                continue;
            }
            faces.push(Face {
                normal: world_normal,
                front,
                points: clipped.iter().map(|c| clip_to_screen(*c, size)).collect(),
            });
        }
        if faces.is_empty() {
            return None;
        }
        faces.sort_by_key(|face| face.front);

        let anchor = project_with(view_projection, object.transform.position, size)
            .unwrap_or_else(|| centroid(&faces));
        Some(Shape::Faces { faces, anchor })
    }

    fn sphere_shape(
        &self,
        object: &SceneObject,
        view_projection: Mat4,
        size: SurfaceSize,
    ) -> Option<Shape> {
        let position = object.transform.position;
        let center = project_with(view_projection, position, size)?;
        let right = self.camera.view_matrix().inverse().transform_vector3(Vec3::X);
        let rim = project_with(view_projection, position + right * sphere_radius(object), size)?;
        Some(Shape::Disc {
            center,
            radius: center.distance(rim),
        })
    }

    /// Push the draw commands for a shape and return its label anchor.
    fn paint(
        &self,
        frame: &mut Frame,
        object: &SceneObject,
        shape: Shape,
        to_light: Vec3,
        highlight: Highlight,
    ) -> Vec2 {
        match shape {
            Shape::Faces { faces, anchor } => {
                for face in faces {
                    let brightness = if face.front {
                        AMBIENT + (1.0 - AMBIENT) * face.normal.dot(to_light).max(0.0)
                    } else {
                        AMBIENT
                    };
                    frame.push(DrawCommand::Polygon {
                        points: face.points,
                        fill: Color::ACCENT.shade(brightness),
                        outline: highlight.outline(Color::TEAL),
                    });
                }
                anchor
            }
            Shape::Disc { center, radius } => {
                let toward_eye =
                    (self.camera.eye() - object.transform.position).normalize_or_zero();
                let brightness = AMBIENT + (1.0 - AMBIENT) * toward_eye.dot(to_light).max(0.0);
                frame.push(DrawCommand::Circle {
                    center,
                    radius,
                    fill: Color::TEAL.shade(brightness),
                    outline: highlight.outline(Color::ACCENT),
                });
                center
            }
        }
    }
}

/// One cube face as painted, already clipped and in surface pixels.
#[derive(Debug, Clone)]
struct Face {
    normal: Vec3,
    front: bool,
    points: Vec<Vec2>,
}

#[derive(Debug, Clone)]
enum Shape {
    /// Back faces first.
    Faces { faces: Vec<Face>, anchor: Vec2 },
    Disc { center: Vec2, radius: f32 },
}

fn centroid(faces: &[Face]) -> Vec2 {
    let (sum, count) = faces
        .iter()
        .flat_map(|face| &face.points)
        .fold((Vec2::ZERO, 0.0_f32), |(sum, count), p| (sum + *p, count + 1.0));
    sum / count
}

/// Whether a point along a pick ray is nearer than the far plane.
fn before_far(view_projection: Mat4, point: Vec3) -> bool {
    let clip = view_projection * point.extend(1.0);
    clip.z <= clip.w
}

fn sphere_radius(object: &SceneObject) -> f32 {
    0.5 * object.transform.scale.max_element()
}

/// Direction from surfaces toward the first light in the scene.
fn light_direction(scene: &Scene) -> Vec3 {
    scene
        .walk()
        .find(|(_, object)| object.kind == ObjectKind::Light)
        .map(|(_, light)| -(light.transform.rotation_quat(0.0) * Vec3::NEG_Z))
        .unwrap_or_else(|| Vec3::new(0.4, 1.0, 0.6).normalize())
}

impl ViewportBackend for PerspectiveBackend {
    fn render(&self, scene: &Scene, selected: Option<ObjectId>, size: SurfaceSize) -> Frame {
        let _span =
            tracing::debug_span!("perspective_render", w = size.width, h = size.height).entered();
        let view_projection = self.camera.view_projection(size);
        let to_light = light_direction(scene);
        let mut frame = Frame::new(size);
        frame.push(DrawCommand::Clear {
            color: Color::BACKGROUND,
        });
        self.draw_ground(&mut frame, view_projection);

        for object in drawables(scene) {
            let Some(shape) = self.shape(object, view_projection, size) else {
                tracing::trace!(id = %object.id.short(), "object outside the view");
                continue;
            };
            let highlight = Highlight::resolve(object.id, selected, self.hovered);
            let anchor = self.paint(&mut frame, object, shape, to_light, highlight);
            frame.push(DrawCommand::Label {
                at: Vec2::new(anchor.x, anchor.y + self.config.label_offset * 2.0),
                text: object.name.clone(),
                color: Color::WHITE,
            });
            frame.painted.push(PaintedObject {
                id: object.id,
                highlight,
            });
        }

        tracing::debug!(objects = frame.painted.len(), "perspective frame built");
        frame
    }

    fn pick(&self, scene: &Scene, size: SurfaceSize, point: Vec2) -> Option<ObjectId> {
        let view_projection = self.camera.view_projection(size);
        let ray = self.camera.ray(point, size);
        pick_top_down(&drawables(scene), |object| match self.shape(object, view_projection, size) {
            None => false,
            Some(Shape::Disc { center, radius }) => {
                point.distance(center) <= radius
                    && ray_sphere(&ray, object.transform.position, sphere_radius(object))
                        .is_some_and(|t| before_far(view_projection, ray.at(t)))
            }
            Some(Shape::Faces { .. }) => ray_box(&ray, self.model_matrix(object))
                .is_some_and(|t| before_far(view_projection, ray.at(t))),
        })
    }

    fn hover(&mut self, scene: &Scene, size: SurfaceSize, point: Option<Vec2>) -> Option<ObjectId> {
        self.hovered = point.and_then(|p| self.pick(scene, size, p));
        self.hovered
    }

    fn advance_idle(&mut self, scene: &Scene) {
        let step = self.config.cube_spin_step_degrees;
        let cubes: Vec<ObjectId> = drawables(scene)
            .iter()
            .filter(|o| o.kind == ObjectKind::Cube)
            .map(|o| o.id)
            .collect();
        self.spin.retain(|id, _| cubes.contains(id));
        for id in cubes {
            let angle = self.spin.entry(id).or_insert(0.0);
            *angle = (*angle + step).rem_euclid(360.0);
        }
    }

    fn reset(&mut self) {
        self.spin.clear();
        self.hovered = None;
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Perspective
    }

    fn orbit_camera_mut(&mut self) -> Option<&mut OrbitCamera> {
        Some(&mut self.camera)
    }
}
