//! Generators for synthetic grids and polygons.
//!
//! Grid values follow predictable patterns so tests can tell exactly which
//! source cell ended up where after rolling, extraction or masking.

use geo::{polygon, LineString, MultiPolygon, Polygon};
use grid_data::{DimCoord, GridDataset};

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being read/written correctly
/// by checking that grid[row][col] == col * 1000 + row.
///
/// # Returns
///
/// A `Vec<f32>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// The value [`create_test_grid`] stores at `(row, col)`.
pub fn test_grid_value(row: usize, col: usize) -> f32 {
    (col * 1000 + row) as f32
}

/// `count` evenly spaced points starting at `start`.
pub fn regular_points(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// A `(latitude, longitude)` grid with [`create_test_grid`] values.
///
/// The longitude coordinate is circular.
pub fn lat_lon_grid(lons: &[f64], lats: &[f64]) -> GridDataset {
    GridDataset::from_vec(
        "air_temperature",
        create_test_grid(lons.len(), lats.len()),
        vec![
            DimCoord::latitude(lats.to_vec()),
            DimCoord::longitude(lons.to_vec()),
        ],
    )
    .expect("valid synthetic grid")
    .with_units("K")
}

/// A `(longitude, latitude)` grid, x before y.
///
/// Values are `lon_index * 1000 + lat_index`, the same cell values as
/// [`lat_lon_grid`] with the axes swapped.
pub fn lon_lat_grid(lons: &[f64], lats: &[f64]) -> GridDataset {
    let values = (0..lons.len())
        .flat_map(|col| (0..lats.len()).map(move |row| test_grid_value(row, col)))
        .collect();
    GridDataset::from_vec(
        "air_temperature",
        values,
        vec![
            DimCoord::longitude(lons.to_vec()),
            DimCoord::latitude(lats.to_vec()),
        ],
    )
    .expect("valid synthetic grid")
}

/// A `(height, latitude, longitude)` grid.
///
/// Values are `level * 1_000_000 + col * 1000 + row`.
pub fn layered_grid(levels: &[f64], lons: &[f64], lats: &[f64]) -> GridDataset {
    let layer = create_test_grid(lons.len(), lats.len());
    let values = (0..levels.len())
        .flat_map(|level| layer.iter().map(move |v| v + (level * 1_000_000) as f32))
        .collect();
    GridDataset::from_vec(
        "air_temperature",
        values,
        vec![
            DimCoord::new("height", levels.to_vec()).with_units("m"),
            DimCoord::latitude(lats.to_vec()),
            DimCoord::longitude(lons.to_vec()),
        ],
    )
    .expect("valid synthetic grid")
}

/// A one-degree global grid on `[0, 360)` with cell centres on whole
/// degrees.
pub fn global_one_degree_grid() -> GridDataset {
    lat_lon_grid(&regular_points(0.0, 1.0, 360), &regular_points(-89.0, 1.0, 179))
}

/// An axis-aligned rectangle.
pub fn rect_polygon(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: min_x, y: min_y),
        (x: max_x, y: min_y),
        (x: max_x, y: max_y),
        (x: min_x, y: max_y),
    ]])
}

/// A right triangle with its right angle at `(x, y)` and legs of `size`
/// along +x and +y.
pub fn triangle_polygon(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: x, y: y),
        (x: x + size, y: y),
        (x: x, y: y + size),
    ]])
}

/// A degenerate polygon whose vertices all lie on `y`, spanning
/// `[min_x, max_x]`. It has a bounding box but no area.
pub fn sliver_polygon(min_x: f64, max_x: f64, y: f64) -> MultiPolygon<f64> {
    let mid = (min_x + max_x) / 2.0;
    let ring = LineString::from(vec![(min_x, y), (mid, y), (max_x, y), (min_x, y)]);
    MultiPolygon::new(vec![Polygon::new(ring, vec![])])
}
