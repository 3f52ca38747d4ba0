//! The cutting engine.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use geo::{Area, Intersects, MultiPolygon, Rect};
use grid_data::{Axis, Constraint};
use ndarray::Array2;

use crate::config::CutterConfig;
use crate::error::{CutError, Result};
use crate::interval::LonInterval;
use crate::providers::{
    DataProvider, Dataset, GeometryProvider, GeometryRef, Mask2D, ProviderRegistry,
};

/// How far a cut goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutTarget {
    /// Keep every cell whose point lies inside the geometry's bounding box.
    #[default]
    Bbox,
    /// Additionally mask cells whose rectangle does not touch the geometry.
    Boundary,
}

impl CutTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bbox => "bbox",
            Self::Boundary => "boundary",
        }
    }
}

impl FromStr for CutTarget {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bbox" => Ok(Self::Bbox),
            "boundary" => Ok(Self::Boundary),
            _ => Err(CutError::invalid_argument(format!(
                "cut target must be 'bbox' or 'boundary', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for CutTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cuts one dataset to the geometries of one store.
///
/// The cutter owns its data provider. Reconciling longitude intervals may
/// replace the held dataset, so every cutting operation takes `&mut self`.
///
/// # Example
///
/// ```rust,ignore
/// use shapecutter::{CutTarget, Cutter, GeometryRef};
///
/// let mut cutter = Cutter::new(dataset, "regions.geojson")?;
/// let region = cutter.cut(&GeometryRef::new("name", "Wales"), CutTarget::Boundary)?;
/// ```
pub struct Cutter {
    data: Box<dyn DataProvider>,
    geometry: Box<dyn GeometryProvider>,
    config: CutterConfig,
}

impl Cutter {
    /// Create a cutter with the default configuration.
    pub fn new<D, G>(data: D, geometry: G) -> Result<Self>
    where
        D: Any + Send,
        G: Any + Send,
    {
        Self::with_config(data, geometry, CutterConfig::default())
    }

    /// Create a cutter using the built-in providers.
    pub fn with_config<D, G>(data: D, geometry: G, config: CutterConfig) -> Result<Self>
    where
        D: Any + Send,
        G: Any + Send,
    {
        Self::with_registry(data, geometry, &ProviderRegistry::default(), config)
    }

    /// Create a cutter, selecting providers from `registry`.
    pub fn with_registry<D, G>(
        data: D,
        geometry: G,
        registry: &ProviderRegistry,
        config: CutterConfig,
    ) -> Result<Self>
    where
        D: Any + Send,
        G: Any + Send,
    {
        config.validate().map_err(CutError::InvalidArgument)?;

        let data = registry.select_data(data, &config)?;
        let geometry = registry.select_geometry(geometry, &config)?;
        Ok(Self::from_providers(data, geometry, config))
    }

    /// Create a cutter from already-built providers.
    pub fn from_providers(
        data: Box<dyn DataProvider>,
        geometry: Box<dyn GeometryProvider>,
        config: CutterConfig,
    ) -> Self {
        tracing::debug!(
            data_provider = data.kind(),
            geometry_provider = %geometry,
            ignore_errors = config.ignore_errors,
            "Created cutter"
        );
        Self {
            data,
            geometry,
            config,
        }
    }

    pub fn config(&self) -> &CutterConfig {
        &self.config
    }

    pub fn data_provider(&self) -> &dyn DataProvider {
        self.data.as_ref()
    }

    pub fn geometry_provider(&self) -> &dyn GeometryProvider {
        self.geometry.as_ref()
    }

    /// The geometry selected by `geometry`, e.g. for plotting.
    pub fn geometry(&self, geometry: &GeometryRef) -> Result<&MultiPolygon<f64>> {
        self.geometry.resolve(geometry)
    }

    /// Translate the held dataset onto the geometry's longitude interval
    /// when the two differ.
    pub fn reconcile(&mut self, geometry: &GeometryRef) -> Result<()> {
        let target = LonInterval::for_max_x(self.geometry.named_bound(geometry, "maxx")?);
        let current = LonInterval::for_max_x(self.data.x_max()?);

        if target != current {
            tracing::debug!(
                geometry = %geometry,
                from = %current,
                to = %target,
                "Reconciling longitude interval"
            );
            self.data.translate(target)?;
        }
        Ok(())
    }

    /// The cells whose x and y points lie inside the geometry's bounding
    /// box, inclusive of the edges.
    pub fn bbox_subset(&mut self, geometry: &GeometryRef) -> Result<Dataset> {
        self.reconcile(geometry)?;

        let bbox = self.geometry.bounds(geometry)?;
        let x = self.data.axis_coord_name(Axis::X)?;
        let y = self.data.axis_coord_name(Axis::Y)?;
        let constraint = Constraint::new()
            .coord_between(x, bbox.min_x, bbox.max_x)
            .coord_between(y, bbox.min_y, bbox.max_y);

        tracing::debug!(geometry = %geometry, bbox = %bbox, "Extracting bounding box");
        self.data.extract(&constraint)
    }

    /// `true` for every horizontal cell of `dataset` whose rectangle
    /// intersects the geometry. Touching counts.
    pub fn boundary_mask(&self, dataset: &Dataset, geometry: &GeometryRef) -> Result<Mask2D> {
        let shape = self.geometry.resolve(geometry)?;
        if shape.unsigned_area() == 0.0 {
            return Err(CutError::mask(format!(
                "geometry {} has zero area and cannot bound any cell",
                geometry
            )));
        }

        let dims = self.data.horizontal_dims(dataset)?;
        let x_bounds = self.data.cell_bounds(dataset, Axis::X)?;
        let y_bounds = self.data.cell_bounds(dataset, Axis::Y)?;

        let x_first = dims.x_first();
        let mask_shape = if x_first {
            (x_bounds.len(), y_bounds.len())
        } else {
            (y_bounds.len(), x_bounds.len())
        };

        let mask = Array2::from_shape_fn(mask_shape, |(i, j)| {
            let (xi, yi) = if x_first { (i, j) } else { (j, i) };
            let [x0, x1] = x_bounds[xi];
            let [y0, y1] = y_bounds[yi];
            shape.intersects(&Rect::new((x0, y0), (x1, y1)))
        });

        tracing::debug!(
            geometry = %geometry,
            cells = mask.len(),
            inside = mask.iter().filter(|inside| **inside).count(),
            "Built boundary mask"
        );
        Ok(mask)
    }

    /// Cut the held dataset to `geometry`.
    ///
    /// Bounding-box failures are always returned. When `ignore_errors` is
    /// set, a failure while masking to the boundary yields `Ok(None)`.
    pub fn cut(&mut self, geometry: &GeometryRef, to: CutTarget) -> Result<Option<Dataset>> {
        let subset = self.bbox_subset(geometry)?;

        match to {
            CutTarget::Bbox => Ok(Some(subset)),
            CutTarget::Boundary => match self.mask_to_boundary(&subset, geometry) {
                Ok(masked) => Ok(Some(masked)),
                Err(e) if self.config.ignore_errors => {
                    tracing::warn!(
                        geometry = %geometry,
                        error = %e,
                        "Boundary cut failed, returning no data"
                    );
                    Ok(None)
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Cut the held dataset to each geometry in turn.
    pub fn cut_many<'a, I>(&mut self, geometries: I, to: CutTarget) -> Result<Vec<Option<Dataset>>>
    where
        I: IntoIterator<Item = &'a GeometryRef>,
    {
        geometries
            .into_iter()
            .map(|geometry| self.cut(geometry, to))
            .collect()
    }

    fn mask_to_boundary(&self, subset: &Dataset, geometry: &GeometryRef) -> Result<Dataset> {
        let dims = self.data.horizontal_dims(subset)?;
        let mask = self.boundary_mask(subset, geometry)?;
        self.data.apply_mask(subset, &mask, dims)
    }
}

impl fmt::Debug for Cutter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cutter")
            .field("data", &self.data.kind())
            .field("geometry", &self.geometry.to_string())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_target_from_str() {
        assert_eq!("bbox".parse::<CutTarget>().unwrap(), CutTarget::Bbox);
        assert_eq!("boundary".parse::<CutTarget>().unwrap(), CutTarget::Boundary);
        assert_eq!(CutTarget::default(), CutTarget::Bbox);
    }

    #[test]
    fn test_cut_target_rejects_unknown() {
        let err = "polygon".parse::<CutTarget>().unwrap_err();
        assert!(matches!(err, CutError::InvalidArgument(_)));

        let message = err.to_string();
        assert!(message.contains("bbox"));
        assert!(message.contains("boundary"));
        assert!(message.contains("polygon"));
    }

    #[test]
    fn test_cut_target_display() {
        assert_eq!(CutTarget::Boundary.to_string(), "boundary");
    }
}
