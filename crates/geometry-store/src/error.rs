//! Error types for geometry stores.

use thiserror::Error;

/// Errors raised while building or loading a geometry store.
#[derive(Error, Debug)]
pub enum GeometryStoreError {
    /// Failed to read a store from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid GeoJSON.
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The GeoJSON document is a bare geometry rather than features.
    #[error("expected a GeoJSON Feature or FeatureCollection")]
    NotFeatures,

    /// A feature carries a geometry type other than (Multi)Polygon.
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// A feature has no geometry at all.
    #[error("feature {0} has no geometry")]
    MissingGeometry(usize),

    /// A geometry has no coordinates, so no bounds.
    #[error("geometry is empty")]
    EmptyGeometry,

    /// A table column does not exist.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A column's length differs from the table's row count.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type for geometry store operations.
pub type Result<T> = std::result::Result<T, GeometryStoreError>;
