use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use sceneforge_common::{CommonError, ObjectId};
use sceneforge_kernel::{Scene, SceneObject};

use crate::camera::OrbitCamera;
use crate::config::ViewportConfig;
use crate::frame::{Frame, SurfaceSize};
use crate::ortho::OrthoBackend;
use crate::perspective::PerspectiveBackend;

/// Render-and-pick strategy behind the viewport.
///
/// Backends read the scene and never write to it. Anything that animates
/// (idle rotation, cube spin) is backend state and is dropped by `reset`.
pub trait ViewportBackend {
    /// Produce one frame. `size` is never empty here; the viewport skips
    /// empty surfaces before calling.
    fn render(&self, scene: &Scene, selected: Option<ObjectId>, size: SurfaceSize) -> Frame;

    /// Id of the topmost drawable under `point`, if any.
    fn pick(&self, scene: &Scene, size: SurfaceSize, point: Vec2) -> Option<ObjectId>;

    /// Track the pointer for hover highlighting. Returns the hovered id.
    /// Backends without a hover tier ignore this.
    fn hover(&mut self, _scene: &Scene, _size: SurfaceSize, _point: Option<Vec2>) -> Option<ObjectId> {
        None
    }

    /// Advance idle animation by one frame.
    fn advance_idle(&mut self, scene: &Scene);

    /// Forget all animation and hover state.
    fn reset(&mut self);

    fn kind(&self) -> BackendKind;

    /// The orbit camera, for backends that have one.
    fn orbit_camera_mut(&mut self) -> Option<&mut OrbitCamera> {
        None
    }
}

impl<B: ViewportBackend + ?Sized> ViewportBackend for Box<B> {
    fn render(&self, scene: &Scene, selected: Option<ObjectId>, size: SurfaceSize) -> Frame {
        (**self).render(scene, selected, size)
    }

    fn pick(&self, scene: &Scene, size: SurfaceSize, point: Vec2) -> Option<ObjectId> {
        (**self).pick(scene, size, point)
    }

    fn hover(&mut self, scene: &Scene, size: SurfaceSize, point: Option<Vec2>) -> Option<ObjectId> {
        (**self).hover(scene, size, point)
    }

    fn advance_idle(&mut self, scene: &Scene) {
        (**self).advance_idle(scene)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn orbit_camera_mut(&mut self) -> Option<&mut OrbitCamera> {
        (**self).orbit_camera_mut()
    }
}

/// Which projection strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Ortho,
    Perspective,
}

impl BackendKind {
    pub fn build(self, config: ViewportConfig) -> Box<dyn ViewportBackend> {
        match self {
            Self::Ortho => Box::new(OrthoBackend::new(config)),
            Self::Perspective => Box::new(PerspectiveBackend::new(config)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ortho => "ortho",
            Self::Perspective => "perspective",
        })
    }
}

impl FromStr for BackendKind {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ortho" | "2d" => Ok(Self::Ortho),
            "perspective" | "3d" => Ok(Self::Perspective),
            other => Err(CommonError::InvalidInput(format!("unknown backend: {other}"))),
        }
    }
}

/// Cubes and spheres in paint order.
pub(crate) fn drawables(scene: &Scene) -> Vec<&SceneObject> {
    scene
        .walk()
        .map(|(_, object)| object)
        .filter(|object| object.kind.is_drawable())
        .collect()
}
