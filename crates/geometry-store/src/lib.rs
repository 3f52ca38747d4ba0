//! Attributed polygon stores.
//!
//! Two layouts of the same information are provided:
//!
//! - [`RecordStore`]: a sequence of [`Record`]s, each with attributes, a
//!   geometry and a precomputed bbox tuple (shapefile-reader style).
//! - [`GeometryTable`]: attribute columns plus a geometry column, with bounds
//!   exposed as a [`BoundsTable`] (data-frame style).
//!
//! Both can be loaded from GeoJSON. Geometries are `geo::MultiPolygon<f64>`;
//! plain polygons are promoted on load.

pub mod bbox;
pub mod error;
pub mod loader;
pub mod record;
pub mod table;

pub use bbox::BoundingBox;
pub use error::{GeometryStoreError, Result};
pub use record::{attribute_matches, Attributes, Record, RecordStore};
pub use table::{BoundsTable, GeometryTable, BOUNDS_COLUMNS};
