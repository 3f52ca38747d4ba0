//! Labelled n-dimensional grids.
//!
//! A [`GridDataset`] is an `ndarray` field with one [`DimCoord`] per
//! dimension and a validity mask. Coordinates know which logical [`Axis`]
//! they describe, carry optional cell bounds, and circular longitudes can be
//! rolled into either the `[-180, 180)` or `[0, 360)` interval.
//!
//! # Example
//!
//! ```rust
//! use grid_data::{Constraint, DimCoord, GridDataset};
//!
//! let grid = GridDataset::from_vec(
//!     "air_temperature",
//!     vec![280.0, 281.0, 282.0, 283.0],
//!     vec![
//!         DimCoord::latitude(vec![-10.0, 10.0]),
//!         DimCoord::longitude(vec![90.0, 270.0]),
//!     ],
//! )?;
//!
//! let rolled = grid.wrap_longitude("longitude", -180.0)?;
//! assert_eq!(rolled.coord("longitude")?.points(), &[-90.0, 90.0]);
//!
//! let south = grid
//!     .extract(&Constraint::new().coord_between("latitude", -90.0, 0.0))?
//!     .expect("southern row");
//! assert_eq!(south.shape(), &[1, 2]);
//! # Ok::<(), grid_data::GridDataError>(())
//! ```

pub mod constraint;
pub mod coord;
pub mod dataset;
pub mod error;
pub mod list;

pub use constraint::Constraint;
pub use coord::{Axis, CellBound, DimCoord, LONGITUDE_MODULUS};
pub use dataset::GridDataset;
pub use error::{GridDataError, Result};
pub use list::GridList;
