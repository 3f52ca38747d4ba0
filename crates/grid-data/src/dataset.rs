//! The labelled n-dimensional grid.

use ndarray::{ArrayD, ArrayView2, Axis as ArrayAxis, IxDyn};

use crate::constraint::Constraint;
use crate::coord::{Axis, DimCoord};
use crate::error::{GridDataError, Result};

/// An n-dimensional field with one dimension coordinate per dimension.
///
/// Values are stored alongside a validity mask of the same shape; a `true`
/// mask entry marks the value as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDataset {
    name: String,
    units: String,
    data: ArrayD<f32>,
    mask: ArrayD<bool>,
    coords: Vec<DimCoord>,
}

impl GridDataset {
    /// Create a dataset from an array and its dimension coordinates.
    ///
    /// `coords[i]` must have exactly `data.shape()[i]` points and coordinate
    /// names must be unique.
    pub fn new(name: impl Into<String>, data: ArrayD<f32>, coords: Vec<DimCoord>) -> Result<Self> {
        let name = name.into();

        if coords.len() != data.ndim() {
            return Err(GridDataError::shape_mismatch(format!(
                "{} has {} dimensions but {} coordinates",
                name,
                data.ndim(),
                coords.len()
            )));
        }

        for (dim, (coord, &len)) in coords.iter().zip(data.shape()).enumerate() {
            if coord.len() != len {
                return Err(GridDataError::shape_mismatch(format!(
                    "coordinate '{}' has {} points but dimension {} has length {}",
                    coord.name(),
                    coord.len(),
                    dim,
                    len
                )));
            }
            if coords[..dim].iter().any(|c| c.name() == coord.name()) {
                return Err(GridDataError::invalid_coord(
                    coord.name(),
                    "coordinate names must be unique",
                ));
            }
        }

        let mask = ArrayD::from_elem(data.raw_dim(), false);
        Ok(Self {
            name,
            units: String::new(),
            data,
            mask,
            coords,
        })
    }

    /// Create a dataset from row-major values, taking the shape from the
    /// coordinate lengths.
    pub fn from_vec(name: impl Into<String>, values: Vec<f32>, coords: Vec<DimCoord>) -> Result<Self> {
        let shape: Vec<usize> = coords.iter().map(DimCoord::len).collect();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values)?;
        Self::new(name, data, coords)
    }

    /// Set the units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Replace the validity mask (`true` = missing).
    pub fn with_mask(mut self, mask: ArrayD<bool>) -> Result<Self> {
        if mask.shape() != self.data.shape() {
            return Err(GridDataError::shape_mismatch(format!(
                "mask shape {:?} does not match data shape {:?}",
                mask.shape(),
                self.data.shape()
            )));
        }
        self.mask = mask;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn mask(&self) -> &ArrayD<bool> {
        &self.mask
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn coords(&self) -> &[DimCoord] {
        &self.coords
    }

    /// Look up a coordinate by name.
    pub fn coord(&self, name: &str) -> Result<&DimCoord> {
        self.coord_dim(name).map(|dim| &self.coords[dim])
    }

    /// The dimension a named coordinate describes.
    pub fn coord_dim(&self, name: &str) -> Result<usize> {
        self.coords
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| GridDataError::CoordNotFound(name.to_string()))
    }

    /// All dimension coordinates describing `axis`, with their dimension.
    pub fn dim_coords_for_axis(&self, axis: Axis) -> Vec<(usize, &DimCoord)> {
        self.coords
            .iter()
            .enumerate()
            .filter(|(_, c)| c.axis() == Some(axis))
            .collect()
    }

    /// Infer bounds for a coordinate if it has none.
    pub fn guess_bounds(&mut self, name: &str) -> Result<()> {
        let dim = self.coord_dim(name)?;
        let coord = &mut self.coords[dim];
        if !coord.has_bounds() {
            coord.guess_bounds();
        }
        Ok(())
    }

    /// The value at `index`, or `None` when it is masked or out of range.
    pub fn value(&self, index: &[usize]) -> Option<f32> {
        match self.mask.get(index) {
            Some(false) => self.data.get(index).copied(),
            _ => None,
        }
    }

    /// Number of unmasked values.
    pub fn count_valid(&self) -> usize {
        self.mask.iter().filter(|masked| !**masked).count()
    }

    /// A new dataset holding only `indices` along `dim`, in that order.
    pub fn select(&self, dim: usize, indices: &[usize]) -> Result<Self> {
        if dim >= self.ndim() {
            return Err(GridDataError::DimOutOfRange {
                dim,
                ndim: self.ndim(),
            });
        }

        let coord = self.coords[dim].select(indices)?;
        let mut coords = self.coords.clone();
        coords[dim] = coord;

        Ok(Self {
            name: self.name.clone(),
            units: self.units.clone(),
            data: self.data.select(ArrayAxis(dim), indices),
            mask: self.mask.select(ArrayAxis(dim), indices),
            coords,
        })
    }

    /// Roll the grid along a circular or degree-valued coordinate so its
    /// points lie in `[lower, lower + 360)`.
    ///
    /// Values and mask entries move with their points.
    pub fn wrap_longitude(&self, coord_name: &str, lower: f64) -> Result<Self> {
        let dim = self.coord_dim(coord_name)?;
        let (order, coord) = self.coords[dim].wrapped(lower)?;

        let mut rolled = self.select(dim, &order)?;
        rolled.coords[dim] = coord;
        Ok(rolled)
    }

    /// Restrict the grid to the indices satisfying every predicate.
    ///
    /// Returns `Ok(None)` when some constrained coordinate has no matching
    /// point. Constraining an unknown coordinate is an error.
    pub fn extract(&self, constraint: &Constraint) -> Result<Option<Self>> {
        let mut subset = self.clone();

        for (name, predicate) in constraint.predicates() {
            let dim = subset.coord_dim(name)?;
            let indices: Vec<usize> = subset.coords[dim]
                .points()
                .iter()
                .enumerate()
                .filter(|(_, &point)| predicate(point))
                .map(|(i, _)| i)
                .collect();

            if indices.is_empty() {
                tracing::debug!(coord = %name, "no points satisfy the constraint");
                return Ok(None);
            }
            if indices.len() < subset.shape()[dim] {
                subset = subset.select(dim, &indices)?;
            }
        }

        Ok(Some(subset))
    }

    /// Mask every value whose horizontal cell is `false` in `keep`.
    ///
    /// `keep` is a 2D array whose axes correspond to dimensions `dims[0]`
    /// and `dims[1]` (ascending). It is broadcast over every other
    /// dimension and combined with the existing mask.
    pub fn mask_outside(&self, keep: ArrayView2<'_, bool>, dims: [usize; 2]) -> Result<Self> {
        let [d0, d1] = dims;
        if d0 >= d1 || d1 >= self.ndim() {
            return Err(GridDataError::shape_mismatch(format!(
                "invalid mask dimensions {:?} for a {}-dimensional grid",
                dims,
                self.ndim()
            )));
        }

        let expected = [self.shape()[d0], self.shape()[d1]];
        if keep.shape() != &expected[..] {
            return Err(GridDataError::shape_mismatch(format!(
                "mask shape {:?} does not match horizontal shape {:?}",
                keep.shape(),
                expected
            )));
        }

        let broadcast = ArrayD::from_shape_fn(self.data.raw_dim(), |ix: IxDyn| keep[[ix[d0], ix[d1]]]);

        let mut masked = self.clone();
        masked
            .mask
            .zip_mut_with(&broadcast, |missing, &inside| *missing = *missing || !inside);
        Ok(masked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// (time: 2, latitude: 3, longitude: 4), value = t * 100 + row * 10 + col.
    fn sample_grid() -> GridDataset {
        let values = (0..2)
            .flat_map(|t| (0..3).flat_map(move |row| (0..4).map(move |col| (t * 100 + row * 10 + col) as f32)))
            .collect();
        GridDataset::from_vec(
            "air_temperature",
            values,
            vec![
                DimCoord::new("time", vec![0.0, 6.0]),
                DimCoord::latitude(vec![-10.0, 0.0, 10.0]),
                DimCoord::longitude(vec![0.0, 90.0, 180.0, 270.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_coords() {
        let result = GridDataset::from_vec(
            "bad",
            vec![0.0; 6],
            vec![DimCoord::latitude(vec![0.0, 1.0]), DimCoord::longitude(vec![0.0, 1.0])],
        );
        assert!(matches!(result, Err(GridDataError::ShapeMismatch(_))));

        let data = ArrayD::zeros(IxDyn(&[2, 3]));
        let result = GridDataset::new("bad", data, vec![DimCoord::latitude(vec![0.0, 1.0])]);
        assert!(matches!(result, Err(GridDataError::ShapeMismatch(_))));
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let result = GridDataset::from_vec(
            "bad",
            vec![0.0; 4],
            vec![DimCoord::latitude(vec![0.0, 1.0]), DimCoord::latitude(vec![0.0, 1.0])],
        );
        assert!(matches!(result, Err(GridDataError::InvalidCoord { .. })));
    }

    #[test]
    fn test_coord_lookup() {
        let grid = sample_grid();
        assert_eq!(grid.coord_dim("longitude").unwrap(), 2);
        assert_eq!(grid.coord("latitude").unwrap().len(), 3);
        assert!(matches!(
            grid.coord("depth"),
            Err(GridDataError::CoordNotFound(_))
        ));

        let x_coords = grid.dim_coords_for_axis(Axis::X);
        assert_eq!(x_coords.len(), 1);
        assert_eq!(x_coords[0].0, 2);
        assert_eq!(grid.dim_coords_for_axis(Axis::T)[0].1.name(), "time");
    }

    #[test]
    fn test_value_and_mask() {
        let grid = sample_grid();
        assert_eq!(grid.value(&[1, 2, 3]), Some(123.0));
        assert_eq!(grid.value(&[2, 0, 0]), None);
        assert_eq!(grid.count_valid(), 24);

        let mut mask = ArrayD::from_elem(IxDyn(grid.shape()), false);
        mask[IxDyn(&[0, 0, 0])] = true;
        let grid = grid.with_mask(mask).unwrap();
        assert_eq!(grid.value(&[0, 0, 0]), None);
        assert_eq!(grid.count_valid(), 23);
    }

    #[test]
    fn test_wrap_longitude() {
        let grid = sample_grid();
        let rolled = grid.wrap_longitude("longitude", -180.0).unwrap();

        assert_eq!(
            rolled.coord("longitude").unwrap().points(),
            &[-180.0, -90.0, 0.0, 90.0]
        );
        // Column that held x=180 now comes first.
        assert_eq!(rolled.value(&[0, 1, 0]), Some(12.0));
        assert_eq!(rolled.value(&[0, 1, 2]), Some(10.0));
        // The input grid is untouched.
        assert_eq!(grid.coord("longitude").unwrap().points()[0], 0.0);
    }

    #[test]
    fn test_wrap_longitude_without_modulus() {
        let grid = sample_grid();
        assert!(grid.wrap_longitude("time", 0.0).is_err());
    }

    #[test]
    fn test_extract() {
        let grid = sample_grid();
        let constraint = Constraint::new()
            .coord_between("longitude", 80.0, 200.0)
            .coord_between("latitude", 0.0, 0.0);

        let subset = grid.extract(&constraint).unwrap().unwrap();
        assert_eq!(subset.shape(), &[2, 1, 2]);
        assert_eq!(subset.coord("longitude").unwrap().points(), &[90.0, 180.0]);
        assert_eq!(subset.value(&[1, 0, 1]), Some(112.0));
    }

    #[test]
    fn test_extract_no_match() {
        let grid = sample_grid();
        let constraint = Constraint::new().coord_between("latitude", 50.0, 60.0);
        assert!(grid.extract(&constraint).unwrap().is_none());

        let constraint = Constraint::new().coord_between("depth", 0.0, 1.0);
        assert!(grid.extract(&constraint).is_err());
    }

    #[test]
    fn test_mask_outside_broadcasts() {
        let grid = sample_grid();
        let keep = array![
            [true, false, false, false],
            [false, true, false, false],
            [false, false, true, true],
        ];

        let masked = grid.mask_outside(keep.view(), [1, 2]).unwrap();
        assert_eq!(masked.count_valid(), 2 * 4);
        for t in 0..2 {
            assert_eq!(masked.value(&[t, 0, 0]), grid.value(&[t, 0, 0]));
            assert_eq!(masked.value(&[t, 0, 1]), None);
            assert_eq!(masked.value(&[t, 2, 3]), grid.value(&[t, 2, 3]));
        }
    }

    #[test]
    fn test_mask_outside_keeps_existing_mask() {
        let mut mask = ArrayD::from_elem(IxDyn(&[2, 3, 4]), false);
        mask[IxDyn(&[1, 0, 0])] = true;
        let grid = sample_grid().with_mask(mask).unwrap();

        let keep = ndarray::Array2::from_elem((3, 4), true);
        let masked = grid.mask_outside(keep.view(), [1, 2]).unwrap();
        assert_eq!(masked.value(&[1, 0, 0]), None);
        assert_eq!(masked.count_valid(), 23);
    }

    #[test]
    fn test_mask_outside_shape_mismatch() {
        let grid = sample_grid();
        let keep = ndarray::Array2::from_elem((4, 3), true);
        assert!(grid.mask_outside(keep.view(), [1, 2]).is_err());
        assert!(grid.mask_outside(keep.view(), [2, 1]).is_err());
    }
}
