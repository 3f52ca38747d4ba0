//! Record-oriented geometry stores.
//!
//! A [`RecordStore`] is laid out the way a shapefile reader presents its
//! contents: a sequence of records, each carrying its attributes, its
//! geometry and a precomputed `(minx, miny, maxx, maxy)` bbox tuple.

use std::path::Path;

use geo::MultiPolygon;
use serde_json::Value;

use crate::bbox::BoundingBox;
use crate::error::Result;
use crate::loader;

/// Attribute name/value pairs attached to a geometry.
pub type Attributes = serde_json::Map<String, Value>;

/// Whether a stored attribute value equals a requested one.
///
/// Numbers compare by value, so `5` matches `5.0`. Everything else uses
/// JSON equality; the string `"5"` never matches the number `5`.
pub fn attribute_matches(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => stored == wanted,
    }
}

/// A single attributed geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    attributes: Attributes,
    geometry: MultiPolygon<f64>,
    bbox: (f64, f64, f64, f64),
}

impl Record {
    /// Create a record, computing its bbox. Empty geometries are rejected.
    pub fn new(attributes: Attributes, geometry: impl Into<MultiPolygon<f64>>) -> Result<Self> {
        let geometry = geometry.into();
        let bbox = BoundingBox::of(&geometry)?.as_tuple();
        Ok(Self {
            attributes,
            geometry,
            bbox,
        })
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The value of one attribute, if present.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Whether attribute `key` is present and matches `value`.
    pub fn matches(&self, key: &str, value: &Value) -> bool {
        self.attribute(key)
            .is_some_and(|stored| attribute_matches(stored, value))
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// The bbox as a `(minx, miny, maxx, maxy)` tuple.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.bbox
    }
}

/// An in-memory sequence of records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load every feature of a GeoJSON file as a record.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        loader::read_features(path)?
            .into_iter()
            .map(|(attributes, geometry)| Record::new(attributes, geometry))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Build a store from GeoJSON text.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        loader::parse_features(text)?
            .into_iter()
            .map(|(attributes, geometry)| Record::new(attributes, geometry))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for RecordStore {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Polygon};
    use serde_json::json;

    fn square(min: f64, max: f64) -> Polygon<f64> {
        polygon![
            (x: min, y: min),
            (x: max, y: min),
            (x: max, y: max),
            (x: min, y: max),
        ]
    }

    fn attributes(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => Attributes::new(),
        }
    }

    #[test]
    fn test_record_bounds() {
        let record = Record::new(attributes(json!({"name": "a"})), square(-2.0, 3.0)).unwrap();
        assert_eq!(record.bounds(), (-2.0, -2.0, 3.0, 3.0));
        assert_eq!(record.attribute("name"), Some(&json!("a")));
        assert_eq!(record.attribute("missing"), None);
    }

    #[test]
    fn test_record_matches_numbers_by_value() {
        let record = Record::new(attributes(json!({"id": 5, "code": "5"})), square(0.0, 1.0)).unwrap();
        assert!(record.matches("id", &json!(5)));
        assert!(record.matches("id", &json!(5.0)));
        assert!(!record.matches("id", &json!("5")));
        assert!(!record.matches("code", &json!(5)));
        assert!(!record.matches("missing", &json!(5)));
        assert!(attribute_matches(&json!(-1.5), &json!(-1.5)));
        assert!(!attribute_matches(&json!(null), &json!(0)));
    }

    #[test]
    fn test_record_rejects_empty_geometry() {
        let empty: MultiPolygon<f64> = MultiPolygon::new(vec![]);
        assert!(Record::new(Attributes::new(), empty).is_err());
    }

    #[test]
    fn test_store_from_geojson() {
        let store = RecordStore::from_geojson_str(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"name": "unit"},
                 "geometry": {"type": "Polygon",
                              "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].bounds(), (0.0, 0.0, 1.0, 1.0));
    }
}
