//! Tabular geometry stores.
//!
//! A [`GeometryTable`] is laid out the way a geographic data frame is:
//! attributes live in named columns and geometries in a parallel geometry
//! column. Lookups are column filters returning row indices, and bounds are
//! exposed as a [`BoundsTable`] with one row per selected geometry.

use std::collections::BTreeMap;
use std::path::Path;

use geo::{BoundingRect, MultiPolygon};
use serde_json::Value;

use crate::error::{GeometryStoreError, Result};
use crate::loader;
use crate::record::{attribute_matches, Attributes};

/// Column names of a [`BoundsTable`], in order.
pub const BOUNDS_COLUMNS: [&str; 4] = ["minx", "miny", "maxx", "maxy"];

/// Attribute columns plus a geometry column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryTable {
    columns: BTreeMap<String, Vec<Value>>,
    geometry: Vec<MultiPolygon<f64>>,
}

impl GeometryTable {
    /// Create a table with a geometry column and no attributes.
    pub fn new(geometry: Vec<MultiPolygon<f64>>) -> Self {
        Self {
            columns: BTreeMap::new(),
            geometry,
        }
    }

    /// Add (or replace) an attribute column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        if values.len() != self.geometry.len() {
            return Err(GeometryStoreError::LengthMismatch {
                column: name,
                expected: self.geometry.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    /// Build a table from attributed features. Keys missing from a feature
    /// are filled with `null`.
    pub fn from_features(features: Vec<(Attributes, MultiPolygon<f64>)>) -> Self {
        let rows = features.len();
        let mut columns: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        let mut geometry = Vec::with_capacity(rows);

        for (row, (attributes, shape)) in features.into_iter().enumerate() {
            for (key, value) in attributes {
                columns
                    .entry(key)
                    .or_insert_with(|| vec![Value::Null; rows])[row] = value;
            }
            geometry.push(shape);
        }

        Self { columns, geometry }
    }

    /// Read a GeoJSON file into a table.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_features(loader::read_features(path)?))
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn geometry(&self, row: usize) -> Option<&MultiPolygon<f64>> {
        self.geometry.get(row)
    }

    /// Rows whose `column` matches `value`. Numbers compare by value.
    pub fn rows_where(&self, column: &str, value: &Value) -> Result<Vec<usize>> {
        let values = self
            .columns
            .get(column)
            .ok_or_else(|| GeometryStoreError::ColumnNotFound(column.to_string()))?;

        Ok(values
            .iter()
            .enumerate()
            .filter(|(_, v)| attribute_matches(v, value))
            .map(|(row, _)| row)
            .collect())
    }

    /// Bounds of the given rows. Empty geometries get `NaN` bounds.
    pub fn bounds_of(&self, rows: &[usize]) -> BoundsTable {
        let mut table = BoundsTable::default();
        for &row in rows {
            let rect = self.geometry.get(row).and_then(|g| g.bounding_rect());
            let (min_x, min_y, max_x, max_y) = rect
                .map(|r| (r.min().x, r.min().y, r.max().x, r.max().y))
                .unwrap_or((f64::NAN, f64::NAN, f64::NAN, f64::NAN));
            table.index.push(row);
            table.min_x.push(min_x);
            table.min_y.push(min_y);
            table.max_x.push(max_x);
            table.max_y.push(max_y);
        }
        table
    }

    /// Bounds of every row.
    pub fn bounds(&self) -> BoundsTable {
        let rows: Vec<usize> = (0..self.len()).collect();
        self.bounds_of(&rows)
    }
}

/// Per-geometry bounds in four named columns, indexed by source row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundsTable {
    index: Vec<usize>,
    min_x: Vec<f64>,
    min_y: Vec<f64>,
    max_x: Vec<f64>,
    max_y: Vec<f64>,
}

impl BoundsTable {
    /// Source-table row of each bounds row.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// One of the [`BOUNDS_COLUMNS`] by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            "minx" => Some(self.min_x.as_slice()),
            "miny" => Some(self.min_y.as_slice()),
            "maxx" => Some(self.max_x.as_slice()),
            "maxy" => Some(self.max_y.as_slice()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use serde_json::json;

    fn unit_square(offset: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: offset, y: offset),
            (x: offset + 1.0, y: offset),
            (x: offset + 1.0, y: offset + 1.0),
            (x: offset, y: offset + 1.0),
        ]])
    }

    fn sample_table() -> GeometryTable {
        GeometryTable::new(vec![unit_square(0.0), unit_square(5.0), unit_square(9.0)])
            .with_column("name", vec![json!("a"), json!("b"), json!("a")])
            .unwrap()
            .with_column("id", vec![json!(1), json!(2), json!(3)])
            .unwrap()
    }

    #[test]
    fn test_with_column_length_check() {
        let result = GeometryTable::new(vec![unit_square(0.0)]).with_column("name", vec![]);
        assert!(matches!(
            result,
            Err(GeometryStoreError::LengthMismatch { expected: 1, actual: 0, .. })
        ));
    }

    #[test]
    fn test_rows_where() {
        let table = sample_table();
        assert_eq!(table.rows_where("name", &json!("a")).unwrap(), vec![0, 2]);
        assert_eq!(table.rows_where("id", &json!(2)).unwrap(), vec![1]);
        assert_eq!(table.rows_where("id", &json!(2.0)).unwrap(), vec![1]);
        assert!(table.rows_where("id", &json!("2")).unwrap().is_empty());
        assert!(table.rows_where("id", &json!(7)).unwrap().is_empty());
        assert!(matches!(
            table.rows_where("colour", &json!("red")),
            Err(GeometryStoreError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_bounds_of() {
        let table = sample_table();
        let bounds = table.bounds_of(&[1]);

        assert_eq!(bounds.len(), 1);
        assert_eq!(bounds.index(), &[1]);
        assert_eq!(bounds.column("minx"), Some(&[5.0][..]));
        assert_eq!(bounds.column("maxy"), Some(&[6.0][..]));
        assert_eq!(bounds.column("width"), None);
        assert_eq!(table.bounds().len(), 3);
    }

    #[test]
    fn test_from_features_fills_missing_columns() {
        let mut first = Attributes::new();
        first.insert("name".to_string(), json!("a"));
        let mut second = Attributes::new();
        second.insert("code".to_string(), json!(7));

        let table = GeometryTable::from_features(vec![
            (first, unit_square(0.0)),
            (second, unit_square(1.0)),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.column_names(), vec!["code", "name"]);
        assert_eq!(table.column("name").unwrap(), &[json!("a"), Value::Null]);
        assert_eq!(table.column("code").unwrap(), &[Value::Null, json!(7)]);
    }
}
