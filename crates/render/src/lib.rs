//! Rendering Adapter: projects the scene into backend-neutral frames and
//! resolves pointer coordinates back to objects.
//!
//! # Invariants
//! - Renderers never mutate the scene. Idle spin lives in the backend.
//! - Paint order is `Scene::walk()` order; picking tests that order from the
//!   top down, so what is drawn on top is hit first.
//! - Viewport teardown cancels the frame request and the resize listener
//!   together and is idempotent.

mod backend;
mod camera;
mod config;
mod frame;
mod ortho;
mod perspective;
mod picking;
mod projection;
mod sink;
mod viewport;

pub use backend::{BackendKind, ViewportBackend};
pub use camera::{OrbitCamera, Ray};
pub use config::{CameraConfig, ConfigError, ViewportConfig};
pub use frame::{Color, DrawCommand, Frame, Highlight, PaintedObject, Stroke, SurfaceSize};
pub use ortho::OrthoBackend;
pub use perspective::PerspectiveBackend;
pub use picking::{pick_top_down, ray_box, ray_sphere};
pub use projection::{OrthoProjector, Silhouette};
pub use sink::{FrameSink, TextSink};
pub use viewport::{FrameHandle, FrameHost, ListenerHandle, Viewport};
