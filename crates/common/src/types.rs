use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::CommonError;

/// Unique identifier for an object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for labels and log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| CommonError::InvalidInput(format!("not an object id: {s:?}")))
    }
}

/// The closed set of object kinds the editor knows about.
///
/// Rendering and picking branch on the kind: only `Cube` and `Sphere` have
/// solid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Cube,
    Sphere,
    Light,
    Camera,
}

impl ObjectKind {
    /// Whether the kind is drawn as solid geometry and can be picked.
    pub fn is_drawable(self) -> bool {
        matches!(self, Self::Cube | Self::Sphere)
    }

    /// Capitalized label used for default object names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cube => "Cube",
            Self::Sphere => "Sphere",
            Self::Light => "Light",
            Self::Camera => "Camera",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cube => "cube",
            Self::Sphere => "sphere",
            Self::Light => "light",
            Self::Camera => "camera",
        })
    }
}

impl FromStr for ObjectKind {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cube" => Ok(Self::Cube),
            "sphere" => Ok(Self::Sphere),
            "light" => Ok(Self::Light),
            "camera" => Ok(Self::Camera),
            _ => Err(CommonError::InvalidInput(format!("unknown object kind: {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_uniqueness() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn object_id_parses_its_display() {
        let id = ObjectId::new();
        let parsed: ObjectId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.short().len(), 8);
    }

    #[test]
    fn object_id_rejects_garbage() {
        assert!("cube-123".parse::<ObjectId>().is_err());
    }

    #[test]
    fn only_cube_and_sphere_are_drawable() {
        assert!(ObjectKind::Cube.is_drawable());
        assert!(ObjectKind::Sphere.is_drawable());
        assert!(!ObjectKind::Light.is_drawable());
        assert!(!ObjectKind::Camera.is_drawable());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Cube".parse::<ObjectKind>().unwrap(), ObjectKind::Cube);
        assert_eq!(" light ".parse::<ObjectKind>().unwrap(), ObjectKind::Light);
        assert!("teapot".parse::<ObjectKind>().is_err());
    }
}
