//! Dimension coordinates and their cell bounds.

use serde::{Deserialize, Serialize};

use crate::error::{GridDataError, Result};

/// Period of a circular longitude coordinate, in degrees.
pub const LONGITUDE_MODULUS: f64 = 360.0;

/// Unit spellings that carry a [`LONGITUDE_MODULUS`].
const DEGREE_UNITS: &[&str] = &[
    "degree",
    "degrees",
    "deg",
    "degree_east",
    "degrees_east",
    "degree_e",
    "degrees_e",
    "degree_north",
    "degrees_north",
    "degree_n",
    "degrees_n",
];

/// Relative tolerance used when deciding whether point spacing is regular.
const SPACING_TOLERANCE: f64 = 1e-6;

/// Lower and upper edge of a single grid cell along one coordinate.
pub type CellBound = [f64; 2];

/// Logical axis a coordinate describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal, longitude-like.
    X,
    /// Horizontal, latitude-like.
    Y,
    /// Vertical.
    Z,
    /// Time.
    T,
}

impl Axis {
    /// Guess the axis of a coordinate from its name (case-insensitive).
    ///
    /// Returns `None` for names that carry no axis meaning.
    pub fn guess(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "longitude" | "lon" | "long" | "grid_longitude" | "projection_x_coordinate" | "x" => {
                Some(Self::X)
            }
            "latitude" | "lat" | "grid_latitude" | "projection_y_coordinate" | "y" => {
                Some(Self::Y)
            }
            "height" | "depth" | "altitude" | "level" | "model_level_number" | "pressure"
            | "air_pressure" | "z" => Some(Self::Z),
            "time" | "forecast_period" | "t" => Some(Self::T),
            _ => None,
        }
    }

    /// Short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::T => "t",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A coordinate that varies along exactly one grid dimension.
///
/// Points are expected in ascending order. Bounds, when present, hold one
/// `[lower, upper]` interval per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimCoord {
    name: String,
    units: String,
    axis: Option<Axis>,
    points: Vec<f64>,
    bounds: Option<Vec<CellBound>>,
    circular: bool,
}

impl DimCoord {
    /// Create a coordinate with no units, bounds or explicit axis.
    pub fn new(name: impl Into<String>, points: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            units: String::new(),
            axis: None,
            points,
            bounds: None,
            circular: false,
        }
    }

    /// A circular longitude coordinate in degrees.
    pub fn longitude(points: Vec<f64>) -> Self {
        Self::new("longitude", points)
            .with_units("degrees")
            .with_axis(Axis::X)
            .circular(true)
    }

    /// A latitude coordinate in degrees.
    pub fn latitude(points: Vec<f64>) -> Self {
        Self::new("latitude", points)
            .with_units("degrees")
            .with_axis(Axis::Y)
    }

    /// Set the units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Tag the coordinate with an explicit axis, overriding name guessing.
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Mark the coordinate as circular (wraps every [`LONGITUDE_MODULUS`]).
    pub fn circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    /// Attach explicit cell bounds.
    pub fn with_bounds(mut self, bounds: Vec<CellBound>) -> Result<Self> {
        if bounds.len() != self.points.len() {
            return Err(GridDataError::invalid_coord(
                &self.name,
                format!(
                    "expected {} bound intervals, got {}",
                    self.points.len(),
                    bounds.len()
                ),
            ));
        }
        self.bounds = Some(bounds);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    /// The explicit axis tag, or one guessed from the name.
    pub fn axis(&self) -> Option<Axis> {
        self.axis.or_else(|| Axis::guess(&self.name))
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn bounds(&self) -> Option<&[CellBound]> {
        self.bounds.as_deref()
    }

    pub fn has_bounds(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Whether the units are an angle in degrees.
    pub fn is_degrees(&self) -> bool {
        let units = self.units.trim().to_ascii_lowercase();
        DEGREE_UNITS.contains(&units.as_str())
    }

    /// The period the points repeat with, if any.
    ///
    /// Circular coordinates and coordinates in degrees wrap every
    /// [`LONGITUDE_MODULUS`].
    pub fn modulus(&self) -> Option<f64> {
        (self.circular || self.is_degrees()).then_some(LONGITUDE_MODULUS)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Infer bounds from the points, assuming each point sits at the
    /// centre of its cell.
    ///
    /// Interior edges are midpoints between neighbours; the outer edges are
    /// extrapolated by half a step. A single point gets a zero-width cell.
    pub fn guess_bounds(&mut self) {
        let points = &self.points;
        let bounds = match points.len() {
            0 => Vec::new(),
            1 => {
                tracing::debug!(
                    coord = %self.name,
                    "single-point coordinate, using a zero-width cell"
                );
                vec![[points[0], points[0]]]
            }
            n => {
                let first_step = points[1] - points[0];
                let last_step = points[n - 1] - points[n - 2];

                let irregular = points.windows(2).any(|w| {
                    ((w[1] - w[0]) - first_step).abs() > SPACING_TOLERANCE * first_step.abs()
                });
                if irregular {
                    tracing::debug!(
                        coord = %self.name,
                        "points are irregularly spaced, guessed bounds are approximate"
                    );
                }

                let mut edges = Vec::with_capacity(n + 1);
                edges.push(points[0] - first_step / 2.0);
                edges.extend(points.windows(2).map(|w| (w[0] + w[1]) / 2.0));
                edges.push(points[n - 1] + last_step / 2.0);

                edges.windows(2).map(|e| [e[0], e[1]]).collect()
            }
        };
        self.bounds = Some(bounds);
    }

    /// A new coordinate holding only the given indices, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.points.len()) {
            return Err(GridDataError::invalid_coord(
                &self.name,
                format!("index {} out of range for {} points", bad, self.points.len()),
            ));
        }

        Ok(Self {
            points: indices.iter().map(|&i| self.points[i]).collect(),
            bounds: self
                .bounds
                .as_ref()
                .map(|b| indices.iter().map(|&i| b[i]).collect()),
            ..self.clone()
        })
    }

    /// Wrap every point into the half-open interval
    /// `[lower, lower + modulus)`.
    ///
    /// Returns the permutation that sorts the wrapped points together with
    /// the reordered coordinate. Each bound interval is shifted by the same
    /// offset as its point. Only coordinates with a [`modulus`](Self::modulus)
    /// can be wrapped.
    pub fn wrapped(&self, lower: f64) -> Result<(Vec<usize>, Self)> {
        let modulus = self.modulus().ok_or_else(|| {
            GridDataError::invalid_coord(
                &self.name,
                "cannot wrap a coordinate that is neither circular nor in degrees",
            )
        })?;

        let wrapped: Vec<f64> = self
            .points
            .iter()
            .map(|&p| lower + (p - lower).rem_euclid(modulus))
            .collect();

        let mut order: Vec<usize> = (0..wrapped.len()).collect();
        order.sort_by(|&a, &b| wrapped[a].total_cmp(&wrapped[b]));

        let points = order.iter().map(|&i| wrapped[i]).collect();
        let bounds = self.bounds.as_ref().map(|b| {
            order
                .iter()
                .map(|&i| {
                    let shift = wrapped[i] - self.points[i];
                    [b[i][0] + shift, b[i][1] + shift]
                })
                .collect()
        });

        Ok((
            order,
            Self {
                points,
                bounds,
                ..self.clone()
            },
        ))
    }
}
