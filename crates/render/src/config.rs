use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Projection and loop constants for the viewport.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Ortho backend: screen pixels per world unit.
    pub pixels_per_unit: f32,
    /// Ortho backend: smallest on-screen size of a drawable, in pixels.
    pub min_visible_size: f32,
    /// Ortho backend: how much world z lifts an object on screen.
    pub depth_factor: f32,
    /// Idle in-plane rotation added per frame, degrees.
    pub idle_step_degrees: f32,
    pub grid_spacing: f32,
    /// Grid lines drawn on each side of the centre.
    pub grid_count: u32,
    /// Distance from an object's bottom edge to its name label.
    pub label_offset: f32,
    /// Perspective backend: cube spin per frame, degrees.
    pub cube_spin_step_degrees: f32,
    pub camera: CameraConfig,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: 60.0,
            min_visible_size: 30.0,
            depth_factor: 0.5,
            idle_step_degrees: 0.3,
            grid_spacing: 40.0,
            grid_count: 20,
            label_offset: 15.0,
            cube_spin_step_degrees: 0.5,
            camera: CameraConfig::default(),
        }
    }
}

/// Starting pose of the perspective backend's orbit camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(5.0, 5.0, 5.0),
            target: Vec3::ZERO,
            fov_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl ViewportConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        tracing::debug!(path = %path.display(), "viewport config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("pixels_per_unit", self.pixels_per_unit),
            ("grid_spacing", self.grid_spacing),
            ("camera.near", self.camera.near),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        if !(self.min_visible_size.is_finite() && self.min_visible_size >= 0.0) {
            return Err(ConfigError::Invalid(
                "min_visible_size must be >= 0".into(),
            ));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                self.camera.fov_degrees
            )));
        }
        if !(self.camera.far > self.camera.near) {
            return Err(ConfigError::Invalid("camera.far must exceed camera.near".into()));
        }
        if self.camera.eye == self.camera.target {
            return Err(ConfigError::Invalid("camera.eye must differ from camera.target".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let c = ViewportConfig::default();
        assert_eq!(c.pixels_per_unit, 60.0);
        assert_eq!(c.min_visible_size, 30.0);
        assert_eq!(c.depth_factor, 0.5);
        assert_eq!(c.idle_step_degrees, 0.3);
        assert_eq!(c.grid_spacing, 40.0);
        assert_eq!(c.grid_count, 20);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let c = ViewportConfig::from_yaml_str("pixels_per_unit: 80\ncamera:\n  fov_degrees: 70\n")
            .unwrap();
        assert_eq!(c.pixels_per_unit, 80.0);
        assert_eq!(c.min_visible_size, 30.0);
        assert_eq!(c.camera.fov_degrees, 70.0);
        assert_eq!(c.camera.near, 0.1);
    }

    #[test]
    fn json_config() {
        let c = ViewportConfig::from_json_str(r#"{"grid_count": 5, "camera": {"eye": [0, 2, 8]}}"#)
            .unwrap();
        assert_eq!(c.grid_count, 5);
        assert_eq!(c.camera.eye, Vec3::new(0.0, 2.0, 8.0));
    }

    #[test]
    fn rejects_non_positive_scale() {
        let err = ViewportConfig::from_yaml_str("pixels_per_unit: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_fov() {
        assert!(ViewportConfig::from_yaml_str("camera:\n  fov_degrees: 180").is_err());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            ViewportConfig::from_yaml_str("pixels_per_unit: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
