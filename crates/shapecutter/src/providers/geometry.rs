//! Geometry providers.
//!
//! A [`GeometryProvider`] resolves a [`GeometryRef`] (an attribute key and
//! value) to one polygon of a store and reports its bounds.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::str::FromStr;

use geo::MultiPolygon;
use geometry_store::{
    Attributes, BoundingBox, GeometryStoreError, GeometryTable, RecordStore, BOUNDS_COLUMNS,
};
use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{CutError, Result};

/// An attribute key and value selecting one geometry from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRef {
    key: String,
    value: Value,
}

impl GeometryRef {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build a reference from the first pair of an attribute mapping.
    pub fn from_map(map: &Attributes) -> Result<Self> {
        map.iter()
            .next()
            .map(|(key, value)| Self::new(key.clone(), value.clone()))
            .ok_or_else(|| CutError::invalid_argument("geometry reference mapping is empty"))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Lookup-cache key: the attribute name and the value as JSON text.
    ///
    /// Strings keep their quotes so `"7"` and `7` never share an entry.
    pub fn cache_key(&self) -> (String, String) {
        (self.key.clone(), self.value.to_string())
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for GeometryRef {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl fmt::Display for GeometryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, value_text(&self.value))
    }
}

/// Strings without their JSON quotes, everything else as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One of the four bounding-box values of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundName {
    MinX,
    MinY,
    MaxX,
    MaxY,
}

impl BoundName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinX => "minx",
            Self::MinY => "miny",
            Self::MaxX => "maxx",
            Self::MaxY => "maxy",
        }
    }

    /// The matching value of `bbox`.
    pub fn of(&self, bbox: &BoundingBox) -> f64 {
        match self {
            Self::MinX => bbox.min_x,
            Self::MinY => bbox.min_y,
            Self::MaxX => bbox.max_x,
            Self::MaxY => bbox.max_y,
        }
    }
}

impl FromStr for BoundName {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minx" => Ok(Self::MinX),
            "miny" => Ok(Self::MinY),
            "maxx" => Ok(Self::MaxX),
            "maxy" => Ok(Self::MaxY),
            _ => Err(CutError::invalid_argument(format!(
                "bound must be one of {}, got '{}'",
                BOUNDS_COLUMNS.join(", "),
                s
            ))),
        }
    }
}

/// The operations the cutter needs from a geometry store.
///
/// `Display` describes the provider as
/// `"<provider> containing <n> geometries in a <store>"`.
pub trait GeometryProvider: fmt::Display + Send + Sync {
    /// Provider name for logging.
    fn kind(&self) -> &'static str;

    /// Number of geometries in the store.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The geometry selected by `geometry`.
    fn resolve(&self, geometry: &GeometryRef) -> Result<&MultiPolygon<f64>>;

    /// The bounding box of the geometry selected by `geometry`.
    fn bounds(&self, geometry: &GeometryRef) -> Result<BoundingBox>;

    /// A single bound by name: `minx`, `miny`, `maxx` or `maxy`.
    fn named_bound(&self, geometry: &GeometryRef, name: &str) -> Result<f64> {
        let bound: BoundName = name.parse()?;
        Ok(bound.of(&self.bounds(geometry)?))
    }
}

/// Provider over a [`RecordStore`].
///
/// Record indices resolved for a reference are kept in a bounded LRU cache
/// so repeated cuts of the same geometry skip the linear scan.
pub struct RecordGeometryProvider {
    store: RecordStore,
    lookups: Mutex<LruCache<(String, String), usize>>,
}

impl RecordGeometryProvider {
    pub fn new(store: RecordStore, cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            lookups: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached lookups.
    pub fn cached_lookups(&self) -> usize {
        self.lookups.lock().len()
    }

    fn lookup(&self, geometry: &GeometryRef) -> Result<usize> {
        let cache_key = geometry.cache_key();
        if let Some(index) = self.lookups.lock().get(&cache_key).copied() {
            return Ok(index);
        }

        let index = self
            .store
            .records()
            .iter()
            .position(|record| record.matches(geometry.key(), geometry.value()))
            .ok_or_else(|| CutError::geometry_not_found(geometry.to_string()))?;

        tracing::debug!(geometry = %geometry, record = index, "Resolved geometry record");
        self.lookups.lock().put(cache_key, index);
        Ok(index)
    }
}

impl GeometryProvider for RecordGeometryProvider {
    fn kind(&self) -> &'static str {
        "RecordGeometryProvider"
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn resolve(&self, geometry: &GeometryRef) -> Result<&MultiPolygon<f64>> {
        let index = self.lookup(geometry)?;
        self.store
            .get(index)
            .map(|record| record.geometry())
            .ok_or_else(|| CutError::geometry_not_found(geometry.to_string()))
    }

    fn bounds(&self, geometry: &GeometryRef) -> Result<BoundingBox> {
        let index = self.lookup(geometry)?;
        self.store
            .get(index)
            .map(|record| BoundingBox::from(record.bounds()))
            .ok_or_else(|| CutError::geometry_not_found(geometry.to_string()))
    }
}

impl fmt::Display for RecordGeometryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} containing {} geometries in a RecordStore",
            self.kind(),
            self.len()
        )
    }
}

/// Provider over a [`GeometryTable`].
#[derive(Debug, Clone)]
pub struct TableGeometryProvider {
    table: GeometryTable,
}

impl TableGeometryProvider {
    pub fn new(table: GeometryTable) -> Self {
        Self { table }
    }

    /// Load a GeoJSON file into a table.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(GeometryTable::read_file(path)?))
    }

    /// First row matching the reference.
    fn row(&self, geometry: &GeometryRef) -> Result<usize> {
        let rows = match self.table.rows_where(geometry.key(), geometry.value()) {
            Ok(rows) => rows,
            Err(GeometryStoreError::ColumnNotFound(_)) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        rows.first()
            .copied()
            .ok_or_else(|| CutError::geometry_not_found(geometry.to_string()))
    }
}

impl GeometryProvider for TableGeometryProvider {
    fn kind(&self) -> &'static str {
        "TableGeometryProvider"
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn resolve(&self, geometry: &GeometryRef) -> Result<&MultiPolygon<f64>> {
        let row = self.row(geometry)?;
        self.table
            .geometry(row)
            .ok_or_else(|| CutError::geometry_not_found(geometry.to_string()))
    }

    fn bounds(&self, geometry: &GeometryRef) -> Result<BoundingBox> {
        let row = self.row(geometry)?;
        let bounds = self.table.bounds_of(&[row]);
        let value = |name: &str| {
            bounds
                .column(name)
                .and_then(|column| column.first().copied())
                .filter(|v| !v.is_nan())
                .ok_or(GeometryStoreError::EmptyGeometry)
        };

        Ok(BoundingBox::new(
            value("minx")?,
            value("miny")?,
            value("maxx")?,
            value("maxy")?,
        ))
    }
}

impl fmt::Display for TableGeometryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} containing {} geometries in a GeometryTable",
            self.kind(),
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use geometry_store::Record;
    use serde_json::json;

    fn square(min: f64, max: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: min, y: min),
            (x: max, y: min),
            (x: max, y: max),
            (x: min, y: max),
        ]])
    }

    fn attributes(name: &str) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), json!(name));
        attributes
    }

    fn record_provider() -> RecordGeometryProvider {
        let store: RecordStore = vec![
            Record::new(attributes("small"), square(0.0, 1.0)).unwrap(),
            Record::new(attributes("large"), square(-10.0, 10.0)).unwrap(),
        ]
        .into_iter()
        .collect();
        RecordGeometryProvider::new(store, 4)
    }

    fn table_provider() -> TableGeometryProvider {
        let table = GeometryTable::new(vec![square(0.0, 1.0), square(-10.0, 10.0)])
            .with_column("name", vec![json!("small"), json!("large")])
            .unwrap();
        TableGeometryProvider::new(table)
    }

    #[test]
    fn test_geometry_ref() {
        let geometry = GeometryRef::from(("name", "large"));
        assert_eq!(
            geometry.cache_key(),
            ("name".to_string(), "\"large\"".to_string())
        );
        assert_ne!(
            GeometryRef::new("id", 7).cache_key(),
            GeometryRef::new("id", "7").cache_key()
        );
        assert_ne!(
            GeometryRef::new("a,b", "c").cache_key(),
            GeometryRef::new("a", "b,c").cache_key()
        );
        assert_eq!(GeometryRef::new("id", 7).to_string(), "id=7");

        let mut map = Attributes::new();
        map.insert("name".to_string(), json!("small"));
        assert_eq!(GeometryRef::from_map(&map).unwrap(), GeometryRef::new("name", "small"));
        assert!(matches!(
            GeometryRef::from_map(&Attributes::new()),
            Err(CutError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_record_provider_resolve() {
        let provider = record_provider();
        let large = GeometryRef::new("name", "large");

        assert_eq!(provider.resolve(&large).unwrap(), &square(-10.0, 10.0));
        assert_eq!(provider.bounds(&large).unwrap().as_tuple(), (-10.0, -10.0, 10.0, 10.0));
        assert_eq!(provider.named_bound(&large, "maxx").unwrap(), 10.0);
        assert_eq!(provider.cached_lookups(), 1);
    }

    #[test]
    fn test_record_provider_not_found() {
        let provider = record_provider();
        assert!(matches!(
            provider.resolve(&GeometryRef::new("name", "missing")),
            Err(CutError::GeometryNotFound(_))
        ));
        assert_eq!(provider.cached_lookups(), 0);
    }

    #[test]
    fn test_record_provider_cache_is_bounded() {
        let store: RecordStore = (0..5)
            .map(|i| {
                let mut attributes = Attributes::new();
                attributes.insert("id".to_string(), json!(i));
                Record::new(attributes, square(i as f64, i as f64 + 1.0)).unwrap()
            })
            .collect();
        let provider = RecordGeometryProvider::new(store, 2);

        for i in 0..5 {
            provider.resolve(&GeometryRef::new("id", i)).unwrap();
        }
        assert_eq!(provider.cached_lookups(), 2);
    }

    #[test]
    fn test_record_provider_cache_distinguishes_value_types() {
        let mut attributes = Attributes::new();
        attributes.insert("id".to_string(), json!(7));
        let store: RecordStore = vec![Record::new(attributes, square(0.0, 1.0)).unwrap()]
            .into_iter()
            .collect();
        let provider = RecordGeometryProvider::new(store, 4);

        assert!(provider.resolve(&GeometryRef::new("id", 7)).is_ok());
        assert!(matches!(
            provider.resolve(&GeometryRef::new("id", "7")),
            Err(CutError::GeometryNotFound(_))
        ));
        assert!(provider.resolve(&GeometryRef::new("id", 7.0)).is_ok());
    }

    #[test]
    fn test_record_provider_cache_distinguishes_commas() {
        let record = |key: &str, value: &str, min: f64| {
            let mut attributes = Attributes::new();
            attributes.insert(key.to_string(), json!(value));
            Record::new(attributes, square(min, min + 10.0)).unwrap()
        };
        let store: RecordStore = vec![record("a,b", "c", 0.0), record("a", "b,c", 50.0)]
            .into_iter()
            .collect();
        let provider = RecordGeometryProvider::new(store, 4);

        let first = GeometryRef::new("a,b", "c");
        let second = GeometryRef::new("a", "b,c");
        assert_eq!(provider.bounds(&first).unwrap().as_tuple(), (0.0, 0.0, 10.0, 10.0));
        assert_eq!(provider.bounds(&second).unwrap().as_tuple(), (50.0, 50.0, 60.0, 60.0));
        assert_eq!(provider.cached_lookups(), 2);
    }

    #[test]
    fn test_table_provider_matches_numbers_by_value() {
        let table = GeometryTable::new(vec![square(0.0, 1.0)])
            .with_column("id", vec![json!(5)])
            .unwrap();
        let provider = TableGeometryProvider::new(table);

        assert!(provider.resolve(&GeometryRef::new("id", 5.0)).is_ok());
        assert!(provider.resolve(&GeometryRef::new("id", "5")).is_err());
    }

    #[test]
    fn test_table_provider() {
        let provider = table_provider();
        let small = GeometryRef::new("name", "small");

        assert_eq!(provider.resolve(&small).unwrap(), &square(0.0, 1.0));
        assert_eq!(provider.bounds(&small).unwrap().as_tuple(), (0.0, 0.0, 1.0, 1.0));
        assert!(matches!(
            provider.resolve(&GeometryRef::new("colour", "red")),
            Err(CutError::GeometryNotFound(_))
        ));
    }

    #[test]
    fn test_named_bound_rejects_unknown_name() {
        let provider = table_provider();
        let err = provider
            .named_bound(&GeometryRef::new("name", "small"), "width")
            .unwrap_err();

        let message = err.to_string();
        for name in BOUNDS_COLUMNS {
            assert!(message.contains(name), "{} missing from '{}'", name, message);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            record_provider().to_string(),
            "RecordGeometryProvider containing 2 geometries in a RecordStore"
        );
        assert_eq!(
            table_provider().to_string(),
            "TableGeometryProvider containing 2 geometries in a GeometryTable"
        );
    }
}
