//! Error types for the cutting engine.

use geometry_store::GeometryStoreError;
use grid_data::GridDataError;
use thiserror::Error;

/// Errors that can occur while selecting providers or cutting a dataset.
#[derive(Error, Debug)]
pub enum CutError {
    /// No registered provider accepts the given source type.
    #[error("no suitable provider for {0}")]
    UnsupportedSource(String),

    /// The dataset does not have the structure the operation requires.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// A caller-supplied argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The geometry reference matched nothing in the store.
    #[error("geometry not found: {0}")]
    GeometryNotFound(String),

    /// Bounding-box extraction selected no grid cells.
    #[error("no grid cells within the bounding box: {0}")]
    EmptyExtraction(String),

    /// Building or applying the boundary mask failed.
    #[error("boundary mask failed: {0}")]
    Mask(String),

    /// Error from the gridded dataset.
    #[error(transparent)]
    Data(#[from] GridDataError),

    /// Error from the geometry store.
    #[error(transparent)]
    Geometry(#[from] GeometryStoreError),
}

impl CutError {
    /// Create an UnsupportedSource error.
    pub fn unsupported_source(type_name: impl Into<String>) -> Self {
        Self::UnsupportedSource(type_name.into())
    }

    /// Create a Precondition error.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a GeometryNotFound error.
    pub fn geometry_not_found(msg: impl Into<String>) -> Self {
        Self::GeometryNotFound(msg.into())
    }

    /// Create a Mask error.
    pub fn mask(msg: impl Into<String>) -> Self {
        Self::Mask(msg.into())
    }
}

/// Result type alias using CutError.
pub type Result<T> = std::result::Result<T, CutError>;
