use glam::{Mat4, Vec3};
use sceneforge_common::ObjectId;
use sceneforge_kernel::SceneObject;

use crate::camera::Ray;

/// Hit-test drawables from the top of the paint order down.
///
/// `painted` is in paint order (first painted first). The first object whose
/// test passes wins, regardless of how close the pointer is to its centre.
pub fn pick_top_down<F>(painted: &[&SceneObject], mut hit: F) -> Option<ObjectId>
where
    F: FnMut(&SceneObject) -> bool,
{
    painted.iter().rev().find(|object| hit(object)).map(|object| object.id)
}

/// Distance along `ray` to the first intersection with a sphere, if any.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let near = -b - sqrt;
    let far = -b + sqrt;
    if far < 0.0 {
        None
    } else if near >= 0.0 {
        Some(near)
    } else {
        // Origin inside the sphere.
        Some(far)
    }
}

/// Intersect `ray` with the unit cube (`-0.5..=0.5` on each axis) placed in
/// the world by `model`. Returns the ray parameter of the entry point.
pub fn ray_box(ray: &Ray, model: Mat4) -> Option<f32> {
    let inv = model.inverse();
    if !inv.is_finite() {
        return None;
    }
    let origin = inv.transform_point3(ray.origin);
    let direction = inv.transform_vector3(ray.direction);

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < 1.0e-8 {
            if !(-0.5..=0.5).contains(&o) {
                return None;
            }
            continue;
        }
        let t1 = (-0.5 - o) / d;
        let t2 = (0.5 - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use sceneforge_common::ObjectKind;

    fn ray_down_z() -> Ray {
        Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn top_down_returns_last_painted_hit() {
        let a = SceneObject::new(ObjectKind::Cube, "A");
        let b = SceneObject::new(ObjectKind::Cube, "B");
        let painted = vec![&a, &b];
        assert_eq!(pick_top_down(&painted, |_| true), Some(b.id));
        assert_eq!(pick_top_down(&painted, |o| o.id == a.id), Some(a.id));
        assert_eq!(pick_top_down(&painted, |_| false), None);
    }

    #[test]
    fn sphere_hit_and_miss() {
        assert_eq!(ray_sphere(&ray_down_z(), Vec3::ZERO, 1.0), Some(9.0));
        assert_eq!(ray_sphere(&ray_down_z(), Vec3::new(3.0, 0.0, 0.0), 1.0), None);
    }

    #[test]
    fn sphere_behind_origin_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, -10.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(ray_sphere(&ray, Vec3::ZERO, 1.0), None);
    }

    #[test]
    fn box_hit_axis_aligned() {
        let t = ray_box(&ray_down_z(), Mat4::IDENTITY).unwrap();
        assert!((t - 9.5).abs() < 1e-5);
    }

    #[test]
    fn box_respects_rotation() {
        // A ray at x = 0.6 misses the unit cube but hits it once rotated 45
        // degrees about Z (corners reach ~0.707).
        let ray = Ray {
            origin: Vec3::new(0.6, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert!(ray_box(&ray, Mat4::IDENTITY).is_none());
        let rotated = Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4));
        assert!(ray_box(&ray, rotated).is_some());
    }

    #[test]
    fn box_respects_scale() {
        let ray = Ray {
            origin: Vec3::new(1.5, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert!(ray_box(&ray, Mat4::IDENTITY).is_none());
        assert!(ray_box(&ray, Mat4::from_scale(Vec3::splat(4.0))).is_some());
    }
}
