use glam::Vec2;
use sceneforge_common::{CommonError, ObjectId};
use sceneforge_kernel::Scene;

use crate::backend::ViewportBackend;
use crate::frame::{Frame, SurfaceSize};

/// Token for a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Token for a registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u32);

/// The environment that drives the render loop: the browser's animation
/// frames and window resize events, or a headless stand-in.
pub trait FrameHost {
    /// Schedule one call to the viewport's frame handler.
    fn request_frame(&mut self) -> Result<FrameHandle, CommonError>;

    fn cancel_frame(&mut self, handle: FrameHandle);

    fn subscribe_resize(&mut self) -> Result<ListenerHandle, CommonError>;

    fn unsubscribe_resize(&mut self, handle: ListenerHandle);

    /// Current size of the drawing surface.
    fn surface_size(&self) -> SurfaceSize;
}

/// A mounted viewport: one backend, one host, one render loop.
///
/// The loop is self-rescheduling: each `on_frame` requests the next. The
/// pending frame and the resize listener are held together and released
/// together by `teardown`, which also runs on drop.
pub struct Viewport<B: ViewportBackend, H: FrameHost> {
    backend: B,
    host: H,
    size: SurfaceSize,
    pending: Option<FrameHandle>,
    listener: Option<ListenerHandle>,
    mounted: bool,
    frames_rendered: u64,
    frames_skipped: u64,
}

impl<B: ViewportBackend, H: FrameHost> Viewport<B, H> {
    pub fn new(backend: B, host: H) -> Self {
        let size = host.surface_size();
        Self {
            backend,
            host,
            size,
            pending: None,
            listener: None,
            mounted: false,
            frames_rendered: 0,
            frames_skipped: 0,
        }
    }

    /// Start observing resizes and schedule the first frame. Mounting an
    /// already mounted viewport does nothing.
    pub fn mount(&mut self) -> Result<(), CommonError> {
        if self.mounted {
            return Ok(());
        }
        let listener = self.host.subscribe_resize()?;
        let frame = match self.host.request_frame() {
            Ok(frame) => frame,
            Err(e) => {
                self.host.unsubscribe_resize(listener);
                return Err(e);
            }
        };
        self.listener = Some(listener);
        self.pending = Some(frame);
        self.size = self.host.surface_size();
        self.mounted = true;
        tracing::info!(
            backend = %self.backend.kind(),
            w = self.size.width,
            h = self.size.height,
            "viewport mounted"
        );
        Ok(())
    }

    /// Handle one scheduled frame: render, advance idle animation and
    /// request the next frame.
    ///
    /// An empty surface yields `ResourceUnavailable`; the frame is skipped
    /// and the next one is still requested.
    pub fn on_frame(
        &mut self,
        scene: &Scene,
        selected: Option<ObjectId>,
    ) -> Result<Frame, CommonError> {
        if !self.mounted {
            return Err(CommonError::ResourceUnavailable(
                "viewport is not mounted".into(),
            ));
        }
        self.pending = None;

        let result = if self.size.is_empty() {
            self.frames_skipped += 1;
            tracing::debug!(
                w = self.size.width,
                h = self.size.height,
                "surface not ready, frame skipped"
            );
            Err(CommonError::ResourceUnavailable(format!(
                "surface is {}x{}",
                self.size.width, self.size.height
            )))
        } else {
            let frame = self.backend.render(scene, selected, self.size);
            self.backend.advance_idle(scene);
            self.frames_rendered += 1;
            Ok(frame)
        };

        match self.host.request_frame() {
            Ok(handle) => self.pending = Some(handle),
            Err(e) => tracing::warn!("could not schedule next frame: {e}"),
        }
        result
    }

    /// The surface changed size. The projection centre follows the midpoint.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = SurfaceSize::new(width, height);
        tracing::debug!(w = width, h = height, "viewport resized");
    }

    /// Re-read the size from the host.
    pub fn sync_size(&mut self) {
        let size = self.host.surface_size();
        self.resize(size.width, size.height);
    }

    /// Resolve a click in surface pixels. On a hit, `on_pick` receives the
    /// id; a miss calls nothing.
    pub fn click<F>(&self, point: Vec2, scene: &Scene, on_pick: F) -> Option<ObjectId>
    where
        F: FnOnce(ObjectId),
    {
        if self.size.is_empty() {
            return None;
        }
        let hit = self.backend.pick(scene, self.size, point)?;
        tracing::debug!(id = %hit.short(), x = point.x, y = point.y, "picked");
        on_pick(hit);
        Some(hit)
    }

    /// Pointer moved over (`Some`) or left (`None`) the surface.
    pub fn pointer_move(&mut self, scene: &Scene, point: Option<Vec2>) -> Option<ObjectId> {
        if self.size.is_empty() {
            return None;
        }
        self.backend.hover(scene, self.size, point)
    }

    /// Cancel the pending frame, drop the resize listener and reset idle
    /// state. Safe to call any number of times.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        if let Some(listener) = self.listener.take() {
            self.host.unsubscribe_resize(listener);
        }
        if self.mounted {
            self.backend.reset();
            self.mounted = false;
            tracing::info!(
                rendered = self.frames_rendered,
                skipped = self.frames_skipped,
                "viewport torn down"
            );
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<B: ViewportBackend, H: FrameHost> Drop for Viewport<B, H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrthoBackend, ViewportConfig};
    use glam::Vec3;
    use sceneforge_common::{ObjectKind, Transform};
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct HostLog {
        next: i32,
        live_frames: BTreeSet<i32>,
        live_listeners: BTreeSet<u32>,
        requests: u32,
        cancels: u32,
        subscribes: u32,
        unsubscribes: u32,
        size: (f32, f32),
    }

    #[derive(Clone, Default)]
    struct RecordingHost(Rc<RefCell<HostLog>>);

    impl RecordingHost {
        fn sized(w: f32, h: f32) -> Self {
            let host = Self::default();
            host.0.borrow_mut().size = (w, h);
            host
        }
    }

    impl FrameHost for RecordingHost {
        fn request_frame(&mut self) -> Result<FrameHandle, CommonError> {
            let mut log = self.0.borrow_mut();
            log.next += 1;
            let id = log.next;
            log.live_frames.insert(id);
            log.requests += 1;
            Ok(FrameHandle(id))
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            let mut log = self.0.borrow_mut();
            log.live_frames.remove(&handle.0);
            log.cancels += 1;
        }

        fn subscribe_resize(&mut self) -> Result<ListenerHandle, CommonError> {
            let mut log = self.0.borrow_mut();
            log.subscribes += 1;
            let id = log.subscribes;
            log.live_listeners.insert(id);
            Ok(ListenerHandle(id))
        }

        fn unsubscribe_resize(&mut self, handle: ListenerHandle) {
            let mut log = self.0.borrow_mut();
            log.live_listeners.remove(&handle.0);
            log.unsubscribes += 1;
        }

        fn surface_size(&self) -> SurfaceSize {
            let (w, h) = self.0.borrow().size;
            SurfaceSize::new(w, h)
        }
    }

    fn viewport(host: &RecordingHost) -> Viewport<OrthoBackend, RecordingHost> {
        Viewport::new(OrthoBackend::new(ViewportConfig::default()), host.clone())
    }

    /// Frames fired by the host are the ones still live; simulate the
    /// browser consuming the pending callback.
    fn fire(host: &RecordingHost, vp: &Viewport<OrthoBackend, RecordingHost>) {
        if let Some(handle) = vp.pending_frame() {
            host.0.borrow_mut().live_frames.remove(&handle.0);
        }
    }

    #[test]
    fn mount_subscribes_and_requests_first_frame() {
        let host = RecordingHost::sized(800.0, 600.0);
        let mut vp = viewport(&host);
        vp.mount().unwrap();
        vp.mount().unwrap();
        let log = host.0.borrow();
        assert_eq!(log.subscribes, 1);
        assert_eq!(log.requests, 1);
        assert!(vp.is_mounted());
    }

    #[test]
    fn each_frame_requests_the_next() {
        let host = RecordingHost::sized(800.0, 600.0);
        let mut vp = viewport(&host);
        let scene = Scene::with_defaults();
        vp.mount().unwrap();
        for _ in 0..3 {
            fire(&host, &vp);
            vp.on_frame(&scene, None).unwrap();
        }
        assert_eq!(vp.frames_rendered(), 3);
        assert_eq!(host.0.borrow().requests, 4);
        assert_eq!(host.0.borrow().live_frames.len(), 1);
    }

    #[test]
    fn teardown_releases_frame_and_listener_together() {
        let host = RecordingHost::sized(800.0, 600.0);
        let mut vp = viewport(&host);
        let scene = Scene::new();
        vp.mount().unwrap();
        fire(&host, &vp);
        vp.on_frame(&scene, None).unwrap();

        vp.teardown();
        {
            let log = host.0.borrow();
            assert!(log.live_frames.is_empty());
            assert!(log.live_listeners.is_empty());
            assert_eq!(log.cancels, 1);
            assert_eq!(log.unsubscribes, 1);
        }

        vp.teardown();
        let log = host.0.borrow();
        assert_eq!(log.cancels, 1);
        assert_eq!(log.unsubscribes, 1);
    }

    #[test]
    fn no_frames_after_teardown() {
        let host = RecordingHost::sized(800.0, 600.0);
        let mut vp = viewport(&host);
        let scene = Scene::new();
        vp.mount().unwrap();
        vp.teardown();
        let requests = host.0.borrow().requests;
        assert!(matches!(
            vp.on_frame(&scene, None),
            Err(CommonError::ResourceUnavailable(_))
        ));
        assert_eq!(host.0.borrow().requests, requests);
        assert!(vp.pending_frame().is_none());
    }

    #[test]
    fn drop_tears_down() {
        let host = RecordingHost::sized(800.0, 600.0);
        {
            let mut vp = viewport(&host);
            vp.mount().unwrap();
        }
        let log = host.0.borrow();
        assert!(log.live_frames.is_empty());
        assert!(log.live_listeners.is_empty());
    }

    #[test]
    fn zero_size_frame_is_skipped_then_retried() {
        let host = RecordingHost::sized(0.0, 0.0);
        let mut vp = viewport(&host);
        let scene = Scene::with_defaults();
        vp.mount().unwrap();

        fire(&host, &vp);
        assert!(matches!(
            vp.on_frame(&scene, None),
            Err(CommonError::ResourceUnavailable(_))
        ));
        assert_eq!(vp.frames_skipped(), 1);
        assert!(vp.pending_frame().is_some());

        host.0.borrow_mut().size = (640.0, 480.0);
        vp.sync_size();
        fire(&host, &vp);
        let frame = vp.on_frame(&scene, None).unwrap();
        assert_eq!(frame.size, SurfaceSize::new(640.0, 480.0));
    }

    #[test]
    fn resize_moves_projection_center() {
        let host = RecordingHost::sized(800.0, 600.0);
        let mut vp = viewport(&host);
        let mut scene = Scene::new();
        let cube = scene.add(ObjectKind::Cube);
        vp.mount().unwrap();

        vp.resize(400.0, 200.0);
        assert_eq!(vp.click(Vec2::new(200.0, 100.0), &scene, |_| {}), Some(cube.id));
        assert_eq!(vp.click(Vec2::new(400.0, 300.0), &scene, |_| {}), None);
    }

    #[test]
    fn click_calls_back_only_on_hit() {
        let host = RecordingHost::sized(800.0, 600.0);
        let vp = viewport(&host);
        let mut scene = Scene::with_defaults();
        let sphere = scene.add(ObjectKind::Sphere);
        scene
            .update(sphere.id, |o| *o.transform = Transform::at(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();

        let mut picked = Vec::new();
        vp.click(Vec2::new(460.0, 300.0), &scene, |id| picked.push(id));
        vp.click(Vec2::new(10.0, 10.0), &scene, |id| picked.push(id));
        assert_eq!(picked, vec![sphere.id]);
    }

    #[test]
    fn teardown_resets_idle_state_and_allows_remount() {
        let host = RecordingHost::sized(800.0, 600.0);
        let mut vp = viewport(&host);
        let scene = Scene::new();
        vp.mount().unwrap();
        fire(&host, &vp);
        vp.on_frame(&scene, None).unwrap();
        assert!(vp.backend().idle_angle() > 0.0);

        vp.teardown();
        assert_eq!(vp.backend().idle_angle(), 0.0);

        vp.mount().unwrap();
        assert!(vp.is_mounted());
        assert_eq!(host.0.borrow().live_listeners.len(), 1);
    }
}
