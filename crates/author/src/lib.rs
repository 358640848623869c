//! Scene authoring: selection state, the editor session the UI shell talks
//! to, and reversible edit commands.
//!
//! # Invariants
//! - The current selection is always looked up in the scene, never cloned.
//! - Every edit goes through the scene store and is reversible.
//! - Selection is cleared when the selected object leaves the scene.

mod editor;
mod selection;
mod session;

pub use editor::{EditCommand, Editor};
pub use selection::Selection;
pub use session::{EditorSession, SessionError};
