use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::config::CameraConfig;
use crate::frame::SurfaceSize;

const MAX_PITCH: f32 = 89.0_f32 * (std::f32::consts::PI / 180.0);
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 200.0;

/// A world-space ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera orbiting a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Radians around the Y axis, measured from +Z.
    pub yaw: f32,
    /// Radians above the XZ plane.
    pub pitch: f32,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let offset = config.eye - config.target;
        let distance = offset.length().max(MIN_DISTANCE);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self {
            target: config.target,
            distance,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            fov_y: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, size: SurfaceSize) -> Mat4 {
        self.projection_matrix(size.aspect()) * self.view_matrix()
    }

    /// Project a world point to surface pixels. `None` when the point is
    /// behind the camera or outside the depth range.
    pub fn project(&self, point: Vec3, size: SurfaceSize) -> Option<Vec2> {
        project_with(self.view_projection(size), point, size)
    }

    /// The ray through a surface pixel.
    pub fn ray(&self, point: Vec2, size: SurfaceSize) -> Ray {
        let inv = self.view_projection(size).inverse();
        let ndc_x = (point.x / size.width.max(1.0)) * 2.0 - 1.0;
        let ndc_y = 1.0 - (point.y / size.height.max(1.0)) * 2.0;

        let near = inv * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let origin = near.truncate() / near.w;
        let target = far.truncate() / far.w;
        Ray {
            origin,
            direction: (target - origin).normalize_or_zero(),
        }
    }

    /// Rotate around the target by the given angles (radians).
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Multiply the orbit distance; `factor < 1` zooms in.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }
}

pub(crate) fn project_with(view_projection: Mat4, point: Vec3, size: SurfaceSize) -> Option<Vec2> {
    let clip = view_projection * point.extend(1.0);
    in_depth_range(clip).then(|| clip_to_screen(clip, size))
}

/// Whether a clip-space point lies between the near and far planes.
pub(crate) fn in_depth_range(clip: Vec4) -> bool {
    clip.w > 1.0e-6 && clip.z >= 0.0 && clip.z <= clip.w
}

/// Surface pixels of a clip-space point with positive `w`.
pub(crate) fn clip_to_screen(clip: Vec4, size: SurfaceSize) -> Vec2 {
    let ndc = clip.truncate() / clip.w;
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * size.width,
        (1.0 - (ndc.y * 0.5 + 0.5)) * size.height,
    )
}

/// Cut a convex clip-space polygon down to the part between the near and far
/// planes. Every returned vertex satisfies [`in_depth_range`] up to rounding.
pub(crate) fn clip_polygon(polygon: &[Vec4]) -> Vec<Vec4> {
    let near = clip_against(polygon, |v| v.z);
    clip_against(&near, |v| v.w - v.z)
}

fn clip_against(polygon: &[Vec4], distance: impl Fn(Vec4) -> f32) -> Vec<Vec4> {
    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let (d_current, d_next) = (distance(current), distance(next));
        if d_current >= 0.0 {
            out.push(current);
        }
        if (d_current >= 0.0) != (d_next >= 0.0) {
            out.push(current.lerp(next, d_current / (d_current - d_next)));
        }
    }
    out
}
