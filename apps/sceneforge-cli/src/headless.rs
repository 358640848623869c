use sceneforge_common::CommonError;
use sceneforge_render::{FrameHandle, FrameHost, ListenerHandle, SurfaceSize};

/// Frame host with no display: frames are run by the caller in a loop.
#[derive(Debug)]
pub struct HeadlessHost {
    size: SurfaceSize,
    next_frame: i32,
    pending: Option<FrameHandle>,
    listening: bool,
}

impl HeadlessHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            next_frame: 0,
            pending: None,
            listening: false,
        }
    }

    /// Whether anything is still scheduled or subscribed.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none() && !self.listening
    }
}

impl FrameHost for HeadlessHost {
    fn request_frame(&mut self) -> Result<FrameHandle, CommonError> {
        self.next_frame += 1;
        let handle = FrameHandle(self.next_frame);
        self.pending = Some(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn subscribe_resize(&mut self) -> Result<ListenerHandle, CommonError> {
        self.listening = true;
        Ok(ListenerHandle(1))
    }

    fn unsubscribe_resize(&mut self, _handle: ListenerHandle) {
        self.listening = false;
    }

    fn surface_size(&self) -> SurfaceSize {
        self.size
    }
}
