use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CommonError;

/// Smallest scale component the model will ever store.
pub const MIN_SCALE: f32 = 0.1;

/// Spatial transform: position, rotation (Euler degrees), scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in degrees, applied in Y, X, Z order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// One of the three vector categories of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformField {
    Position,
    Rotation,
    Scale,
}

/// A named component of a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn get(self, v: Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Self::X => v.x = value,
            Self::Y => v.y = value,
            Self::Z => v.z = value,
        }
    }
}

impl Transform {
    /// Build a transform at `position` with identity rotation and unit scale.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Read a single component.
    pub fn component(&self, field: TransformField, axis: Axis) -> f32 {
        axis.get(*self.vector(field))
    }

    /// Return a copy with exactly one component replaced.
    ///
    /// Non-finite values become `0.0`. Scale values are clamped to
    /// [`MIN_SCALE`].
    pub fn with_component(mut self, field: TransformField, axis: Axis, value: f32) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };
        let value = match field {
            TransformField::Scale => value.max(MIN_SCALE),
            _ => value,
        };
        axis.set(self.vector_mut(field), value);
        self
    }

    /// Copy with every component made finite and scale clamped.
    pub fn sanitized(self) -> Self {
        let finite = |v: Vec3| {
            let f = |c: f32| if c.is_finite() { c } else { 0.0 };
            Vec3::new(f(v.x), f(v.y), f(v.z))
        };
        Self {
            position: finite(self.position),
            rotation: finite(self.rotation),
            scale: finite(self.scale).max(Vec3::splat(MIN_SCALE)),
        }
    }

    /// Rotation as a quaternion, with an extra yaw (degrees) folded in.
    pub fn rotation_quat(&self, extra_yaw_degrees: f32) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            (self.rotation.y + extra_yaw_degrees).to_radians(),
            self.rotation.x.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    fn vector(&self, field: TransformField) -> &Vec3 {
        match field {
            TransformField::Position => &self.position,
            TransformField::Rotation => &self.rotation,
            TransformField::Scale => &self.scale,
        }
    }

    fn vector_mut(&mut self, field: TransformField) -> &mut Vec3 {
        match field {
            TransformField::Position => &mut self.position,
            TransformField::Rotation => &mut self.rotation,
            TransformField::Scale => &mut self.scale,
        }
    }
}

/// Parse a numeric field typed by the user. Anything unparsable is `0.0`.
pub fn parse_component(raw: &str) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// A single inspector edit: set `field.axis` to `value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformEdit {
    pub field: TransformField,
    pub axis: Axis,
    pub value: f32,
}

impl TransformEdit {
    pub fn new(field: TransformField, axis: Axis, value: f32) -> Self {
        Self { field, axis, value }
    }

    /// Build an edit from the raw strings an inspector form produces.
    ///
    /// Unknown category or axis names are rejected; an unparsable value
    /// falls back to `0.0`.
    pub fn parse(category: &str, axis: &str, raw_value: &str) -> Result<Self, CommonError> {
        Ok(Self {
            field: category.parse()?,
            axis: axis.parse()?,
            value: parse_component(raw_value),
        })
    }

    pub fn apply(&self, transform: Transform) -> Transform {
        transform.with_component(self.field, self.axis, self.value)
    }
}

impl FromStr for TransformField {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "position" => Ok(Self::Position),
            "rotation" => Ok(Self::Rotation),
            "scale" => Ok(Self::Scale),
            _ => Err(CommonError::InvalidInput(format!("unknown transform field: {s:?}"))),
        }
    }
}

impl FromStr for Axis {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(CommonError::InvalidInput(format!("unknown axis: {s:?}"))),
        }
    }
}

impl fmt::Display for TransformField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        })
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn with_component_changes_only_that_component() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        let moved = t.with_component(TransformField::Position, Axis::Y, 7.5);
        assert_eq!(moved.position, Vec3::new(1.0, 7.5, 3.0));
        assert_eq!(moved.rotation, t.rotation);
        assert_eq!(moved.scale, t.scale);
    }

    #[test]
    fn scale_is_clamped() {
        let t = Transform::default().with_component(TransformField::Scale, Axis::X, -5.0);
        assert_eq!(t.scale.x, MIN_SCALE);
        let t = t.with_component(TransformField::Scale, Axis::Z, 0.0);
        assert_eq!(t.scale.z, MIN_SCALE);
        let t = t.with_component(TransformField::Scale, Axis::Y, 2.5);
        assert_eq!(t.scale.y, 2.5);
    }

    #[test]
    fn non_finite_values_become_zero() {
        let t = Transform::default().with_component(TransformField::Rotation, Axis::X, f32::NAN);
        assert_eq!(t.rotation.x, 0.0);
        let t = t.with_component(TransformField::Scale, Axis::X, f32::INFINITY);
        assert_eq!(t.scale.x, MIN_SCALE);
    }

    #[test]
    fn sanitized_repairs_bad_state() {
        let t = Transform {
            position: Vec3::new(f32::NAN, 1.0, 2.0),
            rotation: Vec3::ZERO,
            scale: Vec3::new(-1.0, 0.0, 3.0),
        }
        .sanitized();
        assert_eq!(t.position, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(t.scale, Vec3::new(MIN_SCALE, MIN_SCALE, 3.0));
    }

    #[test]
    fn parse_component_is_fail_soft() {
        assert_eq!(parse_component("1.25"), 1.25);
        assert_eq!(parse_component("  -3 "), -3.0);
        assert_eq!(parse_component("abc"), 0.0);
        assert_eq!(parse_component(""), 0.0);
        assert_eq!(parse_component("NaN"), 0.0);
        assert_eq!(parse_component("inf"), 0.0);
    }

    #[test]
    fn edit_parse_accepts_inspector_strings() {
        let edit = TransformEdit::parse("Position", "x", "4.5").unwrap();
        assert_eq!(edit, TransformEdit::new(TransformField::Position, Axis::X, 4.5));
        let edit = TransformEdit::parse("scale", "z", "oops").unwrap();
        assert_eq!(edit.value, 0.0);
        assert!(TransformEdit::parse("colour", "x", "1").is_err());
        assert!(TransformEdit::parse("position", "w", "1").is_err());
    }

    #[test]
    fn component_reads_back() {
        let t = Transform::default().with_component(TransformField::Rotation, Axis::Z, 45.0);
        assert_eq!(t.component(TransformField::Rotation, Axis::Z), 45.0);
        assert_eq!(t.component(TransformField::Scale, Axis::X), 1.0);
    }

    #[test]
    fn rotation_quat_identity_for_zero_rotation() {
        let q = Transform::default().rotation_quat(0.0);
        assert!(q.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }
}
