//! Data providers.
//!
//! A [`DataProvider`] owns a copy of the caller's gridded data and exposes
//! the handful of operations the cutter needs: finding the horizontal
//! coordinates, rolling along longitude, extracting by coordinate value and
//! masking by a 2D horizontal mask.

use grid_data::{Axis, CellBound, Constraint, DimCoord, GridDataset, GridList};
use ndarray::Array2;

use crate::error::{CutError, Result};
use crate::interval::LonInterval;

/// A horizontal boolean mask, `true` where a cell is inside the geometry.
///
/// Axis order follows the order of the horizontal dimensions in the dataset.
pub type Mask2D = Array2<bool>;

/// Gridded data held or produced by a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    /// A single grid.
    Grid(GridDataset),
    /// Several grids sharing one horizontal layout.
    List(GridList),
}

impl Dataset {
    pub fn as_grid(&self) -> Option<&GridDataset> {
        match self {
            Self::Grid(grid) => Some(grid),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&GridList> {
        match self {
            Self::Grid(_) => None,
            Self::List(list) => Some(list),
        }
    }

    pub fn into_grid(self) -> Option<GridDataset> {
        match self {
            Self::Grid(grid) => Some(grid),
            Self::List(_) => None,
        }
    }

    pub fn into_list(self) -> Option<GridList> {
        match self {
            Self::Grid(_) => None,
            Self::List(list) => Some(list),
        }
    }

    /// The member grids, one for a single grid.
    pub fn grids(&self) -> Vec<&GridDataset> {
        match self {
            Self::Grid(grid) => vec![grid],
            Self::List(list) => list.iter().collect(),
        }
    }
}

impl From<GridDataset> for Dataset {
    fn from(grid: GridDataset) -> Self {
        Self::Grid(grid)
    }
}

impl From<GridList> for Dataset {
    fn from(list: GridList) -> Self {
        Self::List(list)
    }
}

/// Positions of the x and y dimensions within a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorizontalDims {
    pub x: usize,
    pub y: usize,
}

impl HorizontalDims {
    /// The two dimensions in ascending order.
    pub fn sorted(&self) -> [usize; 2] {
        if self.x < self.y {
            [self.x, self.y]
        } else {
            [self.y, self.x]
        }
    }

    /// Whether x comes before y in the dataset's dimension order.
    pub fn x_first(&self) -> bool {
        self.x < self.y
    }
}

/// The operations the cutter needs from gridded data.
pub trait DataProvider: Send {
    /// Provider name for logging.
    fn kind(&self) -> &'static str;

    /// A snapshot of the held data.
    fn current(&self) -> Dataset;

    /// Name of the single dimension coordinate describing `axis`.
    fn axis_coord_name(&self, axis: Axis) -> Result<String>;

    /// Largest x coordinate point.
    fn x_max(&self) -> Result<f64>;

    /// Guess bounds for horizontal coordinates that have none.
    fn ensure_bounds(&mut self) -> Result<()>;

    /// Roll the held data along x so every point lies within `interval`.
    fn translate(&mut self, interval: LonInterval) -> Result<()>;

    /// The subset of the held data satisfying `constraint`.
    fn extract(&self, constraint: &Constraint) -> Result<Dataset>;

    /// Positions of the horizontal dimensions of `dataset`.
    fn horizontal_dims(&self, dataset: &Dataset) -> Result<HorizontalDims>;

    /// Cell bounds of the `axis` coordinate of `dataset`.
    fn cell_bounds(&self, dataset: &Dataset, axis: Axis) -> Result<Vec<CellBound>>;

    /// A copy of `dataset` with every cell outside `mask` marked missing.
    fn apply_mask(&self, dataset: &Dataset, mask: &Mask2D, dims: HorizontalDims) -> Result<Dataset>;
}

/// The sole dimension coordinate of `grid` describing `axis`.
fn sole_coord(grid: &GridDataset, axis: Axis) -> Result<(usize, &DimCoord)> {
    match grid.dim_coords_for_axis(axis).as_slice() {
        [found] => Ok(*found),
        [] => Err(CutError::precondition(format!(
            "{} has no dimension coordinate for the {} axis",
            grid.name(),
            axis
        ))),
        many => Err(CutError::precondition(format!(
            "{} has {} dimension coordinates for the {} axis, expected exactly one",
            grid.name(),
            many.len(),
            axis
        ))),
    }
}

fn grid_dims(grid: &GridDataset) -> Result<HorizontalDims> {
    let (x, _) = sole_coord(grid, Axis::X)?;
    let (y, _) = sole_coord(grid, Axis::Y)?;
    Ok(HorizontalDims { x, y })
}

fn grid_x_max(grid: &GridDataset) -> Result<f64> {
    let (_, coord) = sole_coord(grid, Axis::X)?;
    coord
        .points()
        .last()
        .copied()
        .ok_or_else(|| CutError::precondition(format!("{} has an empty x coordinate", grid.name())))
}

fn grid_ensure_bounds(grid: &mut GridDataset) -> Result<()> {
    for axis in [Axis::X, Axis::Y] {
        let name = sole_coord(grid, axis)?.1.name().to_string();
        grid.guess_bounds(&name)?;
    }
    Ok(())
}

fn grid_translate(grid: &GridDataset, interval: LonInterval) -> Result<GridDataset> {
    let (_, coord) = sole_coord(grid, Axis::X)?;
    if coord.modulus().is_none() {
        return Err(CutError::precondition(format!(
            "x coordinate '{}' of {} is neither circular nor in degrees and cannot be translated",
            coord.name(),
            grid.name()
        )));
    }
    Ok(grid.wrap_longitude(coord.name(), interval.lower())?)
}

fn grid_extract(grid: &GridDataset, constraint: &Constraint) -> Result<GridDataset> {
    grid.extract(constraint)?.ok_or_else(|| {
        CutError::EmptyExtraction(format!("{} with {:?}", grid.name(), constraint))
    })
}

fn grid_cell_bounds(grid: &GridDataset, axis: Axis) -> Result<Vec<CellBound>> {
    let (_, coord) = sole_coord(grid, axis)?;
    if let Some(bounds) = coord.bounds() {
        return Ok(bounds.to_vec());
    }

    let mut guessed = coord.clone();
    guessed.guess_bounds();
    Ok(guessed.bounds().map(<[CellBound]>::to_vec).unwrap_or_default())
}

fn grid_apply_mask(grid: &GridDataset, mask: &Mask2D, dims: HorizontalDims) -> Result<GridDataset> {
    grid.mask_outside(mask.view(), dims.sorted())
        .map_err(|e| CutError::mask(e.to_string()))
}

/// Provider over a single [`GridDataset`].
#[derive(Debug, Clone)]
pub struct GridDataProvider {
    dataset: GridDataset,
}

impl GridDataProvider {
    /// Wrap a dataset, guessing any missing horizontal bounds.
    ///
    /// Fails unless the dataset has exactly one x and one y dimension
    /// coordinate.
    pub fn new(dataset: GridDataset) -> Result<Self> {
        let mut provider = Self { dataset };
        provider.ensure_bounds()?;
        Ok(provider)
    }

    fn expect_grid<'a>(&self, dataset: &'a Dataset) -> Result<&'a GridDataset> {
        dataset.as_grid().ok_or_else(|| {
            CutError::precondition(format!("{} expects a single grid, got a list", self.kind()))
        })
    }
}

impl DataProvider for GridDataProvider {
    fn kind(&self) -> &'static str {
        "GridDataProvider"
    }

    fn current(&self) -> Dataset {
        Dataset::Grid(self.dataset.clone())
    }

    fn axis_coord_name(&self, axis: Axis) -> Result<String> {
        Ok(sole_coord(&self.dataset, axis)?.1.name().to_string())
    }

    fn x_max(&self) -> Result<f64> {
        grid_x_max(&self.dataset)
    }

    fn ensure_bounds(&mut self) -> Result<()> {
        grid_ensure_bounds(&mut self.dataset)
    }

    fn translate(&mut self, interval: LonInterval) -> Result<()> {
        self.dataset = grid_translate(&self.dataset, interval)?;
        tracing::debug!(
            dataset = %self.dataset.name(),
            interval = %interval,
            "Translated dataset"
        );
        Ok(())
    }

    fn extract(&self, constraint: &Constraint) -> Result<Dataset> {
        let subset = grid_extract(&self.dataset, constraint)?;
        tracing::debug!(
            dataset = %subset.name(),
            shape = ?subset.shape(),
            "Extracted subset"
        );
        Ok(Dataset::Grid(subset))
    }

    fn horizontal_dims(&self, dataset: &Dataset) -> Result<HorizontalDims> {
        grid_dims(self.expect_grid(dataset)?)
    }

    fn cell_bounds(&self, dataset: &Dataset, axis: Axis) -> Result<Vec<CellBound>> {
        grid_cell_bounds(self.expect_grid(dataset)?, axis)
    }

    fn apply_mask(&self, dataset: &Dataset, mask: &Mask2D, dims: HorizontalDims) -> Result<Dataset> {
        grid_apply_mask(self.expect_grid(dataset)?, mask, dims).map(Dataset::Grid)
    }
}

/// Provider over a [`GridList`]. Every operation applies member-wise and
/// the members must agree on their horizontal coordinates.
#[derive(Debug, Clone)]
pub struct GridListDataProvider {
    datasets: Vec<GridDataset>,
}

impl GridListDataProvider {
    /// Wrap a non-empty list, guessing any missing horizontal bounds.
    pub fn new(list: GridList) -> Result<Self> {
        if list.is_empty() {
            return Err(CutError::precondition("cannot cut an empty grid list"));
        }

        let mut provider = Self {
            datasets: list.into_iter().collect(),
        };
        provider.ensure_bounds()?;
        provider.axis_coord_name(Axis::X)?;
        provider.axis_coord_name(Axis::Y)?;
        Ok(provider)
    }

    fn expect_list<'a>(&self, dataset: &'a Dataset) -> Result<&'a GridList> {
        dataset.as_list().ok_or_else(|| {
            CutError::precondition(format!("{} expects a grid list, got a single grid", self.kind()))
        })
    }

    /// The value `f` yields for every member, which must be the same.
    fn agreed<T, F>(grids: &[&GridDataset], what: &str, f: F) -> Result<T>
    where
        T: PartialEq + std::fmt::Debug,
        F: Fn(&GridDataset) -> Result<T>,
    {
        let mut values = grids.iter().map(|grid| f(grid));
        let first = values
            .next()
            .ok_or_else(|| CutError::precondition("grid list is empty"))??;

        for value in values {
            let value = value?;
            if value != first {
                return Err(CutError::precondition(format!(
                    "grid list members disagree on {}: {:?} and {:?}",
                    what, first, value
                )));
            }
        }
        Ok(first)
    }
}

impl DataProvider for GridListDataProvider {
    fn kind(&self) -> &'static str {
        "GridListDataProvider"
    }

    fn current(&self) -> Dataset {
        Dataset::List(self.datasets.iter().cloned().collect())
    }

    fn axis_coord_name(&self, axis: Axis) -> Result<String> {
        let grids: Vec<&GridDataset> = self.datasets.iter().collect();
        Self::agreed(&grids, "coordinate names", |grid| {
            Ok(sole_coord(grid, axis)?.1.name().to_string())
        })
    }

    fn x_max(&self) -> Result<f64> {
        self.datasets
            .iter()
            .map(grid_x_max)
            .try_fold(f64::NEG_INFINITY, |max, x| x.map(|x| max.max(x)))
    }

    fn ensure_bounds(&mut self) -> Result<()> {
        self.datasets.iter_mut().try_for_each(grid_ensure_bounds)
    }

    fn translate(&mut self, interval: LonInterval) -> Result<()> {
        self.datasets = self
            .datasets
            .iter()
            .map(|grid| grid_translate(grid, interval))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            members = self.datasets.len(),
            interval = %interval,
            "Translated grid list"
        );
        Ok(())
    }

    fn extract(&self, constraint: &Constraint) -> Result<Dataset> {
        let subsets = self
            .datasets
            .iter()
            .map(|grid| grid_extract(grid, constraint))
            .collect::<Result<GridList>>()?;
        tracing::debug!(members = subsets.len(), "Extracted grid list subset");
        Ok(Dataset::List(subsets))
    }

    fn horizontal_dims(&self, dataset: &Dataset) -> Result<HorizontalDims> {
        let grids: Vec<&GridDataset> = self.expect_list(dataset)?.iter().collect();
        Self::agreed(&grids, "horizontal dimensions", grid_dims)
    }

    fn cell_bounds(&self, dataset: &Dataset, axis: Axis) -> Result<Vec<CellBound>> {
        let grids: Vec<&GridDataset> = self.expect_list(dataset)?.iter().collect();
        Self::agreed(&grids, "cell bounds", |grid| grid_cell_bounds(grid, axis))
    }

    fn apply_mask(&self, dataset: &Dataset, mask: &Mask2D, dims: HorizontalDims) -> Result<Dataset> {
        self.expect_list(dataset)?
            .iter()
            .map(|grid| grid_apply_mask(grid, mask, dims))
            .collect::<Result<GridList>>()
            .map(Dataset::List)
    }
}
