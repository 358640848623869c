use std::cell::RefCell;
use std::rc::Rc;

use sceneforge_common::CommonError;
use sceneforge_render::{FrameHandle, FrameHost, ListenerHandle, SurfaceSize};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlCanvasElement, Window};

/// Slot for a JS callback shared between the host and the code that builds
/// the closure.
pub type CallbackSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Drives the viewport from `requestAnimationFrame` and window `resize`.
pub struct BrowserHost {
    window: Window,
    canvas: HtmlCanvasElement,
    on_frame: CallbackSlot,
    on_resize: CallbackSlot,
    next_listener: u32,
}

impl BrowserHost {
    pub fn new(
        window: Window,
        canvas: HtmlCanvasElement,
        on_frame: CallbackSlot,
        on_resize: CallbackSlot,
    ) -> Self {
        Self {
            window,
            canvas,
            on_frame,
            on_resize,
            next_listener: 0,
        }
    }
}

fn unavailable(what: &str) -> CommonError {
    CommonError::ResourceUnavailable(what.to_string())
}

impl FrameHost for BrowserHost {
    fn request_frame(&mut self) -> Result<FrameHandle, CommonError> {
        let slot = self.on_frame.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| unavailable("frame callback not installed"))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|e| unavailable(&format!("requestAnimationFrame failed: {e:?}")))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            tracing::warn!("cancelAnimationFrame failed: {e:?}");
        }
    }

    fn subscribe_resize(&mut self) -> Result<ListenerHandle, CommonError> {
        let slot = self.on_resize.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| unavailable("resize callback not installed"))?;
        self.window
            .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
            .map_err(|e| unavailable(&format!("addEventListener failed: {e:?}")))?;
        self.next_listener += 1;
        Ok(ListenerHandle(self.next_listener))
    }

    fn unsubscribe_resize(&mut self, _handle: ListenerHandle) {
        let slot = self.on_resize.borrow();
        let Some(callback) = slot.as_ref() else {
            return;
        };
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
        {
            tracing::warn!("removeEventListener failed: {e:?}");
        }
    }

    fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }
}

/// Match the canvas backing store to its laid-out size.
pub fn fit_canvas(canvas: &HtmlCanvasElement) -> SurfaceSize {
    let width = canvas.client_width().max(0) as u32;
    let height = canvas.client_height().max(0) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    SurfaceSize::new(width as f32, height as f32)
}
