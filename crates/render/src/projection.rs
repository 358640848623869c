use glam::{Vec2, Vec3};
use sceneforge_common::ObjectKind;
use sceneforge_kernel::SceneObject;

use crate::config::ViewportConfig;
use crate::frame::SurfaceSize;

/// Pseudo-3D orthographic projection.
///
/// World x maps to screen x; world y and a fraction of world z both lift the
/// object up the screen. Drawing and picking share this type so their
/// positions and sizes never drift apart.
#[derive(Debug, Clone, Copy)]
pub struct OrthoProjector {
    center: Vec2,
    pixels_per_unit: f32,
    min_visible_size: f32,
    depth_factor: f32,
}

impl OrthoProjector {
    pub fn new(config: &ViewportConfig, size: SurfaceSize) -> Self {
        Self {
            center: size.center(),
            pixels_per_unit: config.pixels_per_unit,
            min_visible_size: config.min_visible_size,
            depth_factor: config.depth_factor,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn screen_position(&self, position: Vec3) -> Vec2 {
        let k = self.pixels_per_unit;
        self.center
            + Vec2::new(
                position.x * k,
                -(position.y * k) - position.z * k * self.depth_factor,
            )
    }

    /// On-screen side (cube) or diameter (sphere), never below the minimum.
    pub fn screen_size(&self, scale: Vec3) -> f32 {
        (scale.x * self.pixels_per_unit).max(self.min_visible_size)
    }

    /// The pickable outline of `object`, or `None` for lights and cameras.
    pub fn silhouette(&self, object: &SceneObject) -> Option<Silhouette> {
        let center = self.screen_position(object.transform.position);
        let size = self.screen_size(object.transform.scale);
        match object.kind {
            ObjectKind::Sphere => Some(Silhouette::Circle {
                center,
                radius: size / 2.0,
            }),
            ObjectKind::Cube => Some(Silhouette::Square {
                center,
                half: size / 2.0,
            }),
            ObjectKind::Light | ObjectKind::Camera => None,
        }
    }
}

/// Screen-space hit shape of a drawable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Silhouette {
    Circle { center: Vec2, radius: f32 },
    /// Axis-aligned; the idle in-plane rotation is not applied.
    Square { center: Vec2, half: f32 },
}

impl Silhouette {
    pub fn contains(&self, point: Vec2) -> bool {
        match *self {
            Self::Circle { center, radius } => center.distance(point) <= radius,
            Self::Square { center, half } => {
                let d = (point - center).abs();
                d.x <= half && d.y <= half
            }
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Self::Circle { center, .. } | Self::Square { center, .. } => center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sceneforge_common::{MIN_SCALE, Transform};

    fn projector() -> OrthoProjector {
        OrthoProjector::new(&ViewportConfig::default(), SurfaceSize::new(800.0, 600.0))
    }

    #[test]
    fn origin_maps_to_center() {
        assert_eq!(projector().screen_position(Vec3::ZERO), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn axes_map_per_formula() {
        let p = projector();
        assert_eq!(p.screen_position(Vec3::new(1.0, 0.0, 0.0)), Vec2::new(460.0, 300.0));
        assert_eq!(p.screen_position(Vec3::new(0.0, 1.0, 0.0)), Vec2::new(400.0, 240.0));
        assert_eq!(p.screen_position(Vec3::new(0.0, 0.0, 2.0)), Vec2::new(400.0, 240.0));
    }

    #[test]
    fn on_screen_size_never_below_minimum() {
        let p = projector();
        for sx in [MIN_SCALE, 0.2, 0.49, 0.5, 1.0, 3.0, 100.0] {
            assert!(p.screen_size(Vec3::new(sx, 1.0, 1.0)) >= 30.0, "scale.x = {sx}");
        }
        assert_eq!(p.screen_size(Vec3::ONE), 60.0);
        assert_eq!(p.screen_size(Vec3::splat(MIN_SCALE)), 30.0);
    }

    #[test]
    fn circle_contains_is_inclusive() {
        let s = Silhouette::Circle {
            center: Vec2::ZERO,
            radius: 10.0,
        };
        assert!(s.contains(Vec2::new(10.0, 0.0)));
        assert!(!s.contains(Vec2::new(7.1, 7.1)));
    }

    #[test]
    fn square_ignores_rotation_and_is_axis_aligned() {
        let s = Silhouette::Square {
            center: Vec2::new(100.0, 100.0),
            half: 15.0,
        };
        assert!(s.contains(Vec2::new(114.0, 86.0)));
        assert!(!s.contains(Vec2::new(116.0, 100.0)));
    }

    #[test]
    fn lights_and_cameras_have_no_silhouette() {
        let p = projector();
        let light = SceneObject::new(ObjectKind::Light, "L");
        let camera = SceneObject::new(ObjectKind::Camera, "C");
        assert!(p.silhouette(&light).is_none());
        assert!(p.silhouette(&camera).is_none());
        let sphere = SceneObject::new(ObjectKind::Sphere, "S")
            .with_transform(Transform::at(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(
            p.silhouette(&sphere),
            Some(Silhouette::Circle {
                center: Vec2::new(460.0, 300.0),
                radius: 30.0
            })
        );
    }
}
