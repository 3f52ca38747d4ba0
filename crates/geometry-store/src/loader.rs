//! GeoJSON loading.
//!
//! Features are read into `(attributes, MultiPolygon)` pairs. Polygons are
//! promoted to single-member multipolygons; any other geometry type is
//! rejected, as are features without a geometry.

use std::path::Path;

use geo::{Geometry, MultiPolygon};
use geojson::GeoJson;

use crate::error::{GeometryStoreError, Result};
use crate::record::Attributes;

/// Parse GeoJSON text into attributed polygons.
pub fn parse_features(text: &str) -> Result<Vec<(Attributes, MultiPolygon<f64>)>> {
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => return Err(GeometryStoreError::NotFeatures),
    };

    features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let attributes = feature.properties.unwrap_or_default();
            let geometry = feature
                .geometry
                .ok_or(GeometryStoreError::MissingGeometry(index))?;
            let geometry = Geometry::<f64>::try_from(geometry.value)?;
            Ok((attributes, into_multi_polygon(geometry)?))
        })
        .collect()
}

/// Read a GeoJSON file into attributed polygons.
pub fn read_features(path: impl AsRef<Path>) -> Result<Vec<(Attributes, MultiPolygon<f64>)>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let features = parse_features(&text)?;

    tracing::debug!(
        path = %path.display(),
        features = features.len(),
        "Loaded GeoJSON features"
    );

    Ok(features)
}

fn into_multi_polygon(geometry: Geometry<f64>) -> Result<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        Geometry::MultiPolygon(multi) => Ok(multi),
        other => Err(GeometryStoreError::UnsupportedGeometry(
            geometry_type_name(&other).to_string(),
        )),
    }
}

fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Square", "code": 1},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "Islands"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[20, 20], [21, 20], [21, 21], [20, 20]]],
                        [[[30, 30], [31, 30], [31, 31], [30, 30]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let features = parse_features(COLLECTION).unwrap();
        assert_eq!(features.len(), 2);

        let (attributes, square) = &features[0];
        assert_eq!(attributes["name"], "Square");
        assert_eq!(attributes["code"], 1);
        assert_eq!(square.0.len(), 1);

        let (_, islands) = &features[1];
        assert_eq!(islands.0.len(), 2);
    }

    #[test]
    fn test_parse_rejects_points() {
        let text = r#"{
            "type": "Feature",
            "properties": null,
            "geometry": {"type": "Point", "coordinates": [1, 2]}
        }"#;
        assert!(matches!(
            parse_features(text),
            Err(GeometryStoreError::UnsupportedGeometry(name)) if name == "Point"
        ));
    }

    #[test]
    fn test_parse_rejects_bare_geometry() {
        let text = r#"{"type": "Point", "coordinates": [1, 2]}"#;
        assert!(matches!(
            parse_features(text),
            Err(GeometryStoreError::NotFeatures)
        ));
    }

    #[test]
    fn test_parse_rejects_missing_geometry() {
        let text = r#"{"type": "Feature", "properties": {}, "geometry": null}"#;
        assert!(matches!(
            parse_features(text),
            Err(GeometryStoreError::MissingGeometry(0))
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_features("not json"),
            Err(GeometryStoreError::GeoJson(_))
        ));
    }
}
