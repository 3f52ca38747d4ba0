//! Error types for gridded datasets.

use thiserror::Error;

/// Errors raised while building or manipulating a grid.
#[derive(Error, Debug)]
pub enum GridDataError {
    /// Array and coordinate shapes disagree.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// No coordinate with the given name exists on the grid.
    #[error("coordinate not found: {0}")]
    CoordNotFound(String),

    /// A coordinate is malformed or unusable for the requested operation.
    #[error("invalid coordinate '{name}': {message}")]
    InvalidCoord { name: String, message: String },

    /// A dimension index is outside the grid's rank.
    #[error("dimension {dim} out of range for a {ndim}-dimensional grid")]
    DimOutOfRange { dim: usize, ndim: usize },
}

impl GridDataError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create an InvalidCoord error.
    pub fn invalid_coord(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCoord {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<ndarray::ShapeError> for GridDataError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::ShapeMismatch(err.to_string())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridDataError>;
