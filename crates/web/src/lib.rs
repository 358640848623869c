//! Browser bindings for the scene editor core.
//!
//! The UI shell (toolbar, hierarchy, inspector) calls into [`SceneEditor`];
//! the viewport canvas is driven from here with `requestAnimationFrame`.
//!
//! # Invariants
//! - Errors become `JsValue` strings only at this boundary.
//! - `unmount_viewport` cancels the frame loop and the resize listener in the
//!   same call, and is safe to repeat.

mod host;
mod paint;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use sceneforge_author::EditorSession;
use sceneforge_common::{ObjectId, ObjectKind, TransformEdit};
use sceneforge_input::{Action, map_key};
use sceneforge_render::{BackendKind, FrameSink, Viewport, ViewportBackend, ViewportConfig};
use sceneforge_tools::SceneInspector;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub use host::{BrowserHost, CallbackSlot, fit_canvas};
pub use paint::Canvas2dSink;

type WebViewport = Viewport<Box<dyn ViewportBackend>, BrowserHost>;

struct Mounted {
    viewport: Rc<RefCell<WebViewport>>,
    on_frame: CallbackSlot,
    on_resize: CallbackSlot,
}

impl Mounted {
    fn teardown(self) {
        self.viewport.borrow_mut().teardown();
        // Dropping the closures after the loop and listener are released.
        self.on_frame.borrow_mut().take();
        self.on_resize.borrow_mut().take();
    }
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Editor session exposed to JavaScript.
#[wasm_bindgen]
pub struct SceneEditor {
    session: Rc<RefCell<EditorSession>>,
    config: ViewportConfig,
    mounted: Option<Mounted>,
}

impl Default for SceneEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SceneEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SceneEditor {
        SceneEditor {
            session: Rc::new(RefCell::new(EditorSession::new())),
            config: ViewportConfig::default(),
            mounted: None,
        }
    }

    /// Replace the viewport config from a JSON string. Takes effect on the
    /// next mount.
    pub fn configure(&mut self, json: &str) -> Result<(), JsValue> {
        self.config = ViewportConfig::from_json_str(json).map_err(js_err)?;
        Ok(())
    }

    /// Root objects, with children nested, as JSON.
    pub fn list_objects(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.borrow().list_objects()).map_err(js_err)
    }

    /// Flattened hierarchy rows as JSON.
    pub fn hierarchy(&self) -> Result<String, JsValue> {
        let session = self.session.borrow();
        let rows = SceneInspector::hierarchy(session.scene(), session.selected_id());
        serde_json::to_string(&rows).map_err(js_err)
    }

    /// Status bar text.
    pub fn summary(&self) -> String {
        let session = self.session.borrow();
        SceneInspector::summary(session.scene(), session.selected_id()).to_string()
    }

    /// Add a `cube`, `sphere` or `light` and select it. Returns it as JSON.
    pub fn add_object(&mut self, kind: &str) -> Result<String, JsValue> {
        let kind: ObjectKind = kind.parse().map_err(js_err)?;
        let object = self.session.borrow_mut().add_object(kind).map_err(js_err)?;
        serde_json::to_string(&object).map_err(js_err)
    }

    /// Returns whether something was deleted.
    pub fn delete_selected(&mut self) -> bool {
        self.session.borrow_mut().delete_selected().is_some()
    }

    pub fn select(&mut self, id: &str) -> Result<(), JsValue> {
        let id: ObjectId = id.parse().map_err(js_err)?;
        self.session.borrow_mut().select(id).map_err(js_err)
    }

    pub fn deselect(&mut self) {
        self.session.borrow_mut().deselect();
    }

    pub fn selected_id(&self) -> Option<String> {
        self.session.borrow().selected_id().map(|id| id.to_string())
    }

    /// The selected object as JSON, or `null`.
    pub fn current_selection(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.borrow().current_selection()).map_err(js_err)
    }

    /// Inspector edit. `raw` is the text in the field; anything that is not
    /// a number is stored as 0. Returns the updated object as JSON.
    pub fn update_selected_transform(
        &mut self,
        category: &str,
        axis: &str,
        raw: &str,
    ) -> Result<String, JsValue> {
        let edit = TransformEdit::parse(category, axis, raw).map_err(js_err)?;
        let object = self.session.borrow_mut().edit_selected(edit).map_err(js_err)?;
        serde_json::to_string(&object).map_err(js_err)
    }

    pub fn rename_selected(&mut self, name: &str) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .rename_selected(name)
            .map(|_| ())
            .map_err(js_err)
    }

    pub fn undo(&mut self) -> bool {
        self.session.borrow_mut().undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.borrow_mut().redo()
    }

    /// Keyboard shortcut. Returns whether the key was bound.
    pub fn handle_key(&mut self, key: &str, ctrl: bool) -> Result<bool, JsValue> {
        let action = map_key(key, ctrl);
        if action == Action::Noop {
            return Ok(false);
        }
        self.session.borrow_mut().apply(action).map_err(js_err)?;
        Ok(true)
    }

    /// Start drawing into the canvas with the given id. `backend` is
    /// `ortho` or `perspective`. Remounting replaces the previous viewport.
    pub fn mount_viewport(&mut self, canvas_id: &str, backend: &str) -> Result<(), JsValue> {
        let kind: BackendKind = backend.parse().map_err(js_err)?;
        self.unmount_viewport();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("missing canvas #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        fit_canvas(&canvas);

        let on_frame: CallbackSlot = Rc::new(RefCell::new(None));
        let on_resize: CallbackSlot = Rc::new(RefCell::new(None));
        let host = BrowserHost::new(window, canvas.clone(), on_frame.clone(), on_resize.clone());
        let viewport = Rc::new(RefCell::new(Viewport::new(
            kind.build(self.config.clone()),
            host,
        )));

        let weak = Rc::downgrade(&viewport);
        let session = self.session.clone();
        let mut sink = Canvas2dSink::new(ctx);
        *on_frame.borrow_mut() = Some(Closure::new(move || {
            frame_tick(&weak, &session, &mut sink);
        }));

        let weak = Rc::downgrade(&viewport);
        *on_resize.borrow_mut() = Some(Closure::new(move || {
            let Some(viewport) = weak.upgrade() else {
                return;
            };
            let size = fit_canvas(&canvas);
            viewport.borrow_mut().resize(size.width, size.height);
        }));

        viewport.borrow_mut().mount().map_err(js_err)?;
        self.mounted = Some(Mounted {
            viewport,
            on_frame,
            on_resize,
        });
        Ok(())
    }

    /// Stop the render loop and release the resize listener.
    pub fn unmount_viewport(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.teardown();
        }
    }

    /// Click in canvas pixels. Selects and returns the id of the object hit;
    /// a miss leaves the selection alone.
    pub fn viewport_click(&mut self, x: f32, y: f32) -> Option<String> {
        let mounted = self.mounted.as_ref()?;
        let viewport = mounted.viewport.borrow();
        let picked = {
            let session = self.session.borrow();
            viewport.click(Vec2::new(x, y), session.scene(), |_| {})
        }?;
        if let Err(e) = self.session.borrow_mut().select(picked) {
            tracing::warn!("pick selected a missing object: {e}");
            return None;
        }
        Some(picked.to_string())
    }

    /// Pointer moved over the canvas. Returns the hovered id, if any.
    pub fn viewport_pointer(&mut self, x: f32, y: f32) -> Option<String> {
        self.pointer(Some(Vec2::new(x, y)))
    }

    pub fn viewport_pointer_leave(&mut self) {
        self.pointer(None);
    }

    /// Orbit the perspective camera by pixel deltas.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.with_camera(|camera| camera.orbit(-dx * 0.01, dy * 0.01));
    }

    /// Zoom the perspective camera; `factor < 1` moves closer.
    pub fn zoom(&mut self, factor: f32) {
        self.with_camera(|camera| camera.zoom(factor));
    }
}

impl SceneEditor {
    fn pointer(&mut self, point: Option<Vec2>) -> Option<String> {
        let mounted = self.mounted.as_ref()?;
        let session = self.session.borrow();
        mounted
            .viewport
            .borrow_mut()
            .pointer_move(session.scene(), point)
            .map(|id| id.to_string())
    }

    fn with_camera(&mut self, f: impl FnOnce(&mut sceneforge_render::OrbitCamera)) {
        if let Some(mounted) = &self.mounted {
            if let Some(camera) = mounted.viewport.borrow_mut().backend_mut().orbit_camera_mut() {
                f(camera);
            }
        }
    }
}

impl Drop for SceneEditor {
    fn drop(&mut self) {
        self.unmount_viewport();
    }
}

fn frame_tick(
    viewport: &Weak<RefCell<WebViewport>>,
    session: &Rc<RefCell<EditorSession>>,
    sink: &mut Canvas2dSink,
) {
    let Some(viewport) = viewport.upgrade() else {
        return;
    };
    let session = session.borrow();
    let result = viewport
        .borrow_mut()
        .on_frame(session.scene(), session.selected_id());
    match result {
        Ok(frame) => {
            if let Err(e) = sink.present(&frame) {
                web_sys::console::error_1(&e);
            }
        }
        Err(e) => tracing::trace!("frame skipped: {e}"),
    }
}
