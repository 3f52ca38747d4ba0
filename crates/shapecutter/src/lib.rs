//! Cut gridded datasets to polygon geometries.
//!
//! A [`Cutter`] pairs one gridded data source with one geometry store and
//! extracts the part of the grid covered by a selected geometry, either its
//! bounding box or its actual boundary.
//!
//! # Architecture
//!
//! ```text
//! Cutter::new(data, geometry)
//!      │
//!      ├─► ProviderRegistry selects a DataProvider and a GeometryProvider
//!      │
//!      ▼
//! cutter.cut(&geometry_ref, to)
//!      │
//!      ├─► reconcile: translate the dataset onto the geometry's
//!      │   longitude interval ([-180, 180) or [0, 360))
//!      │
//!      ├─► bbox_subset: extract cells whose points lie inside the bbox
//!      │
//!      └─► to == Boundary
//!               │
//!               ├─► boundary_mask: cell rectangles intersecting the geometry
//!               │
//!               └─► apply_mask: broadcast over non-horizontal dimensions
//! ```
//!
//! # Example
//!
//! ```rust
//! use geo::polygon;
//! use geometry_store::GeometryTable;
//! use grid_data::{DimCoord, GridDataset};
//! use serde_json::json;
//! use shapecutter::{CutTarget, Cutter, GeometryRef};
//!
//! let grid = GridDataset::from_vec(
//!     "air_temperature",
//!     (0..16).map(|v| v as f32).collect(),
//!     vec![
//!         DimCoord::latitude(vec![-60.0, -30.0, 0.0, 30.0]),
//!         DimCoord::longitude(vec![0.0, 90.0, 180.0, 270.0]),
//!     ],
//! )?;
//! let regions = GeometryTable::new(vec![polygon![
//!     (x: -10.0, y: -5.0),
//!     (x: 20.0, y: -5.0),
//!     (x: 20.0, y: 5.0),
//!     (x: -10.0, y: 5.0),
//! ]
//! .into()])
//! .with_column("name", vec![json!("equator")])?;
//!
//! let mut cutter = Cutter::new(grid, regions)?;
//! let cut = cutter
//!     .cut(&GeometryRef::new("name", "equator"), CutTarget::Bbox)?
//!     .and_then(|dataset| dataset.into_grid())
//!     .expect("a single grid");
//!
//! assert_eq!(cut.coord("longitude")?.points(), &[0.0]);
//! assert_eq!(cut.coord("latitude")?.points(), &[0.0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod cutter;
pub mod error;
pub mod interval;
pub mod providers;

pub use config::CutterConfig;
pub use cutter::{CutTarget, Cutter};
pub use error::{CutError, Result};
pub use interval::{is_dateline_centred, LonInterval};
pub use providers::{
    select_data_provider, select_geometry_provider, BoundName, DataFactory, DataProvider,
    DataProviderFactory, Dataset, GeometryFactory, GeometryProvider, GeometryProviderFactory,
    GeometryRef, GridDataProvider, GridListDataProvider, HorizontalDims, Mask2D,
    ProviderRegistry, RecordGeometryProvider, TableGeometryProvider,
};
