//! Common test fixtures for cutting tests.
//!
//! The sample regions are available as a [`RecordStore`], a
//! [`GeometryTable`] and GeoJSON text, all holding the same features in the
//! same order.

use geo::MultiPolygon;
use geometry_store::{Attributes, GeometryTable, Record, RecordStore};
use serde_json::{json, Value};

use crate::generators::{rect_polygon, sliver_polygon, triangle_polygon};

/// Names of the sample regions.
pub mod regions {
    /// Rectangle `(-10, -5) .. (20, 5)` straddling the prime meridian.
    pub const EQUATOR: &str = "Equator";

    /// Rectangle `(170, -20) .. (200, 20)`, expressed on `[0, 360)`.
    pub const PACIFIC: &str = "Pacific";

    /// Right triangle at `(0, 0)` with legs of 10 degrees.
    pub const TRIANGLE: &str = "Triangle";

    /// Zero-area polygon along the equator from `-5` to `5`.
    pub const SLIVER: &str = "Sliver";

    /// Rectangle covering exactly the one-degree cell centred on `(10, 20)`.
    pub const CELL: &str = "Cell";
}

/// Attribute key holding the region name.
pub const NAME_KEY: &str = "name";

/// Attribute key holding the numeric region id.
pub const ID_KEY: &str = "id";

/// The sample features as `(attributes, geometry)` pairs.
pub fn sample_features() -> Vec<(Attributes, MultiPolygon<f64>)> {
    vec![
        (regions::EQUATOR, rect_polygon(-10.0, -5.0, 20.0, 5.0)),
        (regions::PACIFIC, rect_polygon(170.0, -20.0, 200.0, 20.0)),
        (regions::TRIANGLE, triangle_polygon(0.0, 0.0, 10.0)),
        (regions::SLIVER, sliver_polygon(-5.0, 5.0, 0.0)),
        (regions::CELL, rect_polygon(9.5, 19.5, 10.5, 20.5)),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (name, geometry))| (attributes(name, index as i64 + 1), geometry))
    .collect()
}

/// The sample regions as a record store.
pub fn sample_record_store() -> RecordStore {
    sample_features()
        .into_iter()
        .map(|(attributes, geometry)| Record::new(attributes, geometry).expect("non-empty fixture"))
        .collect()
}

/// The sample regions as a geometry table.
pub fn sample_table() -> GeometryTable {
    GeometryTable::from_features(sample_features())
}

/// The sample regions as a GeoJSON FeatureCollection.
pub fn sample_geojson() -> String {
    let features: Vec<Value> = sample_features()
        .into_iter()
        .map(|(attributes, geometry)| {
            let polygons: Vec<Value> = geometry
                .0
                .iter()
                .map(|polygon| {
                    let ring: Vec<Value> = polygon
                        .exterior()
                        .coords()
                        .map(|c| json!([c.x, c.y]))
                        .collect();
                    json!([ring])
                })
                .collect();
            json!({
                "type": "Feature",
                "properties": attributes,
                "geometry": {"type": "MultiPolygon", "coordinates": polygons},
            })
        })
        .collect();

    json!({"type": "FeatureCollection", "features": features}).to_string()
}

fn attributes(name: &str, id: i64) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(NAME_KEY.to_string(), json!(name));
    attributes.insert(ID_KEY.to_string(), json!(id));
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stores_agree() {
        let store = sample_record_store();
        let table = sample_table();

        assert_eq!(store.len(), 5);
        assert_eq!(table.len(), 5);
        assert_eq!(
            table.rows_where(NAME_KEY, &json!(regions::PACIFIC)).unwrap(),
            vec![1]
        );
        assert_eq!(store.records()[1].bounds(), (170.0, -20.0, 200.0, 20.0));
    }

    #[test]
    fn test_sample_geojson_parses() {
        let store = RecordStore::from_geojson_str(&sample_geojson()).unwrap();
        assert_eq!(store.len(), 5);
        assert_eq!(store.records()[4].attribute(ID_KEY), Some(&json!(5)));
        assert_eq!(store.records()[0].bounds(), (-10.0, -5.0, 20.0, 5.0));
    }
}
