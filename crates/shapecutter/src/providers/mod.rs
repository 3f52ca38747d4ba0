//! Providers and provider selection.
//!
//! Raw sources are handed to the cutter as values of any type. A
//! [`ProviderRegistry`] holds an ordered list of factories per provider
//! family; the first factory that accepts the concrete source type builds
//! the provider. New source kinds are supported by registering another
//! factory.
//!
//! ```text
//! source (Any + Send)
//!      │
//!      ▼
//! ProviderRegistry::select_data / select_geometry
//!      │
//!      ├─► factory.accepts(&source)?  ── no ──► next factory
//!      │
//!      └─► factory.create(source, config)
//!               │
//!               ▼
//!          Box<dyn DataProvider> / Box<dyn GeometryProvider>
//! ```

pub mod data;
pub mod geometry;

use std::any::{type_name, Any};
use std::path::PathBuf;

use geometry_store::{GeometryTable, RecordStore};
use grid_data::{GridDataset, GridList};

use crate::config::CutterConfig;
use crate::error::{CutError, Result};

pub use data::{
    DataProvider, Dataset, GridDataProvider, GridListDataProvider, HorizontalDims, Mask2D,
};
pub use geometry::{
    BoundName, GeometryProvider, GeometryRef, RecordGeometryProvider, TableGeometryProvider,
};

/// A type-erased raw source.
pub type Source = Box<dyn Any + Send>;

/// Builds a [`DataProvider`] from sources of one concrete type.
pub trait DataProviderFactory: Send + Sync {
    /// Factory name for logging.
    fn name(&self) -> &'static str;

    /// Whether `source` is of the type this factory handles.
    fn accepts(&self, source: &(dyn Any + Send)) -> bool;

    /// Build a provider, taking ownership of the source.
    fn create(&self, source: Source, config: &CutterConfig) -> Result<Box<dyn DataProvider>>;
}

/// Builds a [`GeometryProvider`] from sources of one concrete type.
pub trait GeometryProviderFactory: Send + Sync {
    /// Factory name for logging.
    fn name(&self) -> &'static str;

    /// Whether `source` is of the type this factory handles.
    fn accepts(&self, source: &(dyn Any + Send)) -> bool;

    /// Build a provider, taking ownership of the source.
    fn create(&self, source: Source, config: &CutterConfig) -> Result<Box<dyn GeometryProvider>>;
}

type BuildData<T> = fn(T, &CutterConfig) -> Result<Box<dyn DataProvider>>;
type BuildGeometry<T> = fn(T, &CutterConfig) -> Result<Box<dyn GeometryProvider>>;

/// A [`DataProviderFactory`] for sources of type `T`.
pub struct DataFactory<T> {
    name: &'static str,
    build: BuildData<T>,
}

impl<T> DataFactory<T> {
    pub fn new(name: &'static str, build: BuildData<T>) -> Self {
        Self { name, build }
    }
}

impl<T: Any + Send> DataProviderFactory for DataFactory<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, source: &(dyn Any + Send)) -> bool {
        source.is::<T>()
    }

    fn create(&self, source: Source, config: &CutterConfig) -> Result<Box<dyn DataProvider>> {
        let source = source
            .downcast::<T>()
            .map_err(|_| CutError::unsupported_source(type_name::<T>()))?;
        (self.build)(*source, config)
    }
}

/// A [`GeometryProviderFactory`] for sources of type `T`.
pub struct GeometryFactory<T> {
    name: &'static str,
    build: BuildGeometry<T>,
}

impl<T> GeometryFactory<T> {
    pub fn new(name: &'static str, build: BuildGeometry<T>) -> Self {
        Self { name, build }
    }
}

impl<T: Any + Send> GeometryProviderFactory for GeometryFactory<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, source: &(dyn Any + Send)) -> bool {
        source.is::<T>()
    }

    fn create(&self, source: Source, config: &CutterConfig) -> Result<Box<dyn GeometryProvider>> {
        let source = source
            .downcast::<T>()
            .map_err(|_| CutError::unsupported_source(type_name::<T>()))?;
        (self.build)(*source, config)
    }
}

fn grid_provider(grid: GridDataset, _: &CutterConfig) -> Result<Box<dyn DataProvider>> {
    Ok(Box::new(GridDataProvider::new(grid)?))
}

fn grid_list_provider(list: GridList, _: &CutterConfig) -> Result<Box<dyn DataProvider>> {
    Ok(Box::new(GridListDataProvider::new(list)?))
}

fn record_provider(store: RecordStore, config: &CutterConfig) -> Result<Box<dyn GeometryProvider>> {
    Ok(Box::new(RecordGeometryProvider::new(
        store,
        config.geometry_cache_size,
    )))
}

fn table_provider(table: GeometryTable, _: &CutterConfig) -> Result<Box<dyn GeometryProvider>> {
    Ok(Box::new(TableGeometryProvider::new(table)))
}

fn path_provider(path: PathBuf, _: &CutterConfig) -> Result<Box<dyn GeometryProvider>> {
    Ok(Box::new(TableGeometryProvider::from_path(path)?))
}

fn string_path_provider(path: String, _: &CutterConfig) -> Result<Box<dyn GeometryProvider>> {
    Ok(Box::new(TableGeometryProvider::from_path(path)?))
}

fn str_path_provider(path: &'static str, _: &CutterConfig) -> Result<Box<dyn GeometryProvider>> {
    Ok(Box::new(TableGeometryProvider::from_path(path)?))
}

/// Ordered provider factories for data and geometry sources.
pub struct ProviderRegistry {
    data: Vec<Box<dyn DataProviderFactory>>,
    geometry: Vec<Box<dyn GeometryProviderFactory>>,
}

impl ProviderRegistry {
    /// A registry with no factories.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            geometry: Vec::new(),
        }
    }

    /// Add a data provider factory. Earlier factories take precedence.
    pub fn register_data(&mut self, factory: impl DataProviderFactory + 'static) -> &mut Self {
        self.data.push(Box::new(factory));
        self
    }

    /// Add a geometry provider factory. Earlier factories take precedence.
    pub fn register_geometry(
        &mut self,
        factory: impl GeometryProviderFactory + 'static,
    ) -> &mut Self {
        self.geometry.push(Box::new(factory));
        self
    }

    /// Names of the registered data factories, in order.
    pub fn data_factories(&self) -> Vec<&'static str> {
        self.data.iter().map(|f| f.name()).collect()
    }

    /// Names of the registered geometry factories, in order.
    pub fn geometry_factories(&self) -> Vec<&'static str> {
        self.geometry.iter().map(|f| f.name()).collect()
    }

    /// Build a data provider for `source`.
    pub fn select_data<S: Any + Send>(
        &self,
        source: S,
        config: &CutterConfig,
    ) -> Result<Box<dyn DataProvider>> {
        let source_type = type_name::<S>();
        let source: Source = Box::new(source);
        let factory = self
            .data
            .iter()
            .find(|f| f.accepts(&*source))
            .ok_or_else(|| CutError::unsupported_source(source_type))?;

        tracing::debug!(
            source = source_type,
            factory = factory.name(),
            "Selected data provider"
        );
        factory.create(source, config)
    }

    /// Build a geometry provider for `source`.
    pub fn select_geometry<S: Any + Send>(
        &self,
        source: S,
        config: &CutterConfig,
    ) -> Result<Box<dyn GeometryProvider>> {
        let source_type = type_name::<S>();
        let source: Source = Box::new(source);
        let factory = self
            .geometry
            .iter()
            .find(|f| f.accepts(&*source))
            .ok_or_else(|| CutError::unsupported_source(source_type))?;

        tracing::debug!(
            source = source_type,
            factory = factory.name(),
            "Selected geometry provider"
        );
        factory.create(source, config)
    }
}

impl Default for ProviderRegistry {
    /// The built-in providers for grids, grid lists, record stores, tables
    /// and GeoJSON paths.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register_data(DataFactory::new("grid", grid_provider))
            .register_data(DataFactory::new("grid_list", grid_list_provider));
        registry
            .register_geometry(GeometryFactory::new("records", record_provider))
            .register_geometry(GeometryFactory::new("table", table_provider))
            .register_geometry(GeometryFactory::new("path", path_provider))
            .register_geometry(GeometryFactory::new("path", string_path_provider))
            .register_geometry(GeometryFactory::new("path", str_path_provider));
        registry
    }
}

/// Select a data provider from the built-in registry.
pub fn select_data_provider<S: Any + Send>(
    source: S,
    config: &CutterConfig,
) -> Result<Box<dyn DataProvider>> {
    ProviderRegistry::default().select_data(source, config)
}

/// Select a geometry provider from the built-in registry.
pub fn select_geometry_provider<S: Any + Send>(
    source: S,
    config: &CutterConfig,
) -> Result<Box<dyn GeometryProvider>> {
    ProviderRegistry::default().select_geometry(source, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_data::DimCoord;

    fn grid() -> GridDataset {
        GridDataset::from_vec(
            "t",
            vec![0.0; 4],
            vec![
                DimCoord::latitude(vec![0.0, 1.0]),
                DimCoord::longitude(vec![0.0, 1.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_default_selects_builtin_providers() {
        let config = CutterConfig::default();

        let provider = select_data_provider(grid(), &config).unwrap();
        assert_eq!(provider.kind(), "GridDataProvider");

        let list: GridList = vec![grid()].into_iter().collect();
        let provider = select_data_provider(list, &config).unwrap();
        assert_eq!(provider.kind(), "GridListDataProvider");

        let provider = select_geometry_provider(RecordStore::default(), &config).unwrap();
        assert_eq!(provider.kind(), "RecordGeometryProvider");

        let provider = select_geometry_provider(GeometryTable::default(), &config).unwrap();
        assert_eq!(provider.kind(), "TableGeometryProvider");
    }

    #[test]
    fn test_unsupported_source() {
        let config = CutterConfig::default();

        let err = select_data_provider(vec![1u8, 2, 3], &config).err().unwrap();
        assert!(matches!(err, CutError::UnsupportedSource(_)));
        assert!(err.to_string().contains("no suitable provider"));
        assert!(err.to_string().contains("Vec<u8>"));

        let err = select_geometry_provider(42_i32, &config).err().unwrap();
        assert!(err.to_string().contains("i32"));
    }

    #[test]
    fn test_path_source_missing_file() {
        let config = CutterConfig::default();
        let result = select_geometry_provider("/nonexistent/regions.geojson", &config);
        assert!(matches!(result, Err(CutError::Geometry(_))));
    }

    #[test]
    fn test_register_custom_factory() {
        fn from_values(
            values: Vec<f32>,
            _: &CutterConfig,
        ) -> Result<Box<dyn DataProvider>> {
            let side = (values.len() as f64).sqrt() as usize;
            let points: Vec<f64> = (0..side).map(|i| i as f64).collect();
            let grid = GridDataset::from_vec(
                "values",
                values,
                vec![DimCoord::latitude(points.clone()), DimCoord::longitude(points)],
            )?;
            Ok(Box::new(GridDataProvider::new(grid)?))
        }

        let mut registry = ProviderRegistry::empty();
        registry.register_data(DataFactory::new("values", from_values));
        assert_eq!(registry.data_factories(), vec!["values"]);

        let provider = registry
            .select_data(vec![0.0_f32; 9], &CutterConfig::default())
            .unwrap();
        assert_eq!(provider.axis_coord_name(grid_data::Axis::X).unwrap(), "longitude");
        assert!(registry.select_data(grid(), &CutterConfig::default()).is_err());
    }
}
