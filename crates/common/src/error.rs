use crate::ObjectId;

/// Error taxonomy shared by every layer of the editor core.
///
/// None of these are fatal. Callers log them and keep operating on the last
/// good state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommonError {
    /// An operation referenced an id that is not in the scene.
    #[error("object {0} not found")]
    NotFound(ObjectId),
    /// Input that could not be interpreted (unknown field name, bad id, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The drawing surface cannot be used right now (e.g. zero size).
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),
}
