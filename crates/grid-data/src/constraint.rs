//! Coordinate-value constraints used to extract grid subsets.
//!
//! A [`Constraint`] is a list of per-coordinate predicates. A grid index
//! along a constrained dimension survives extraction only when the
//! coordinate point at that index satisfies the predicate.
//!
//! ```rust
//! use grid_data::Constraint;
//!
//! let constraint = Constraint::new()
//!     .coord_between("longitude", -10.0, 20.0)
//!     .coord_where("height", |h| h < 1000.0);
//! assert_eq!(constraint.len(), 2);
//! ```

use std::fmt;

type Predicate = Box<dyn Fn(f64) -> bool + Send + Sync>;

/// A set of predicates over named coordinates.
#[derive(Default)]
pub struct Constraint {
    predicates: Vec<(String, Predicate)>,
}

impl Constraint {
    /// Create an empty constraint (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep indices whose `coord` point satisfies `predicate`.
    pub fn coord_where<F>(mut self, coord: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(f64) -> bool + Send + Sync + 'static,
    {
        self.predicates.push((coord.into(), Box::new(predicate)));
        self
    }

    /// Keep indices whose `coord` point lies in `[min, max]` (inclusive).
    pub fn coord_between(self, coord: impl Into<String>, min: f64, max: f64) -> Self {
        self.coord_where(coord, move |cell| min <= cell && cell <= max)
    }

    /// Iterate over `(coordinate name, predicate)` pairs in insertion order.
    pub fn predicates(&self) -> impl Iterator<Item = (&str, &(dyn Fn(f64) -> bool + Send + Sync))> {
        self.predicates
            .iter()
            .map(|(name, predicate)| (name.as_str(), predicate.as_ref()))
    }

    /// Names of the constrained coordinates.
    pub fn coord_names(&self) -> Vec<&str> {
        self.predicates.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("coords", &self.coord_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_between_is_inclusive() {
        let constraint = Constraint::new().coord_between("latitude", -5.0, 5.0);
        let (name, predicate) = constraint.predicates().next().unwrap();

        assert_eq!(name, "latitude");
        assert!(predicate(-5.0));
        assert!(predicate(0.0));
        assert!(predicate(5.0));
        assert!(!predicate(5.000001));
    }

    #[test]
    fn test_debug_lists_coords() {
        let constraint = Constraint::new()
            .coord_between("longitude", 0.0, 1.0)
            .coord_where("time", |t| t > 0.0);
        assert_eq!(
            format!("{:?}", constraint),
            r#"Constraint { coords: ["longitude", "time"] }"#
        );
        assert!(Constraint::new().is_empty());
    }
}
