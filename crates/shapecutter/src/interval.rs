//! Longitude intervals.
//!
//! Datasets and geometries express longitude either on `[-180, 180)` or on
//! the dateline-centred `[0, 360)`. Which one is in use is inferred from the
//! largest x value: anything beyond 180 can only be dateline-centred.

use std::fmt;

use grid_data::LONGITUDE_MODULUS;

/// Whether a maximum x value implies the dateline-centred interval.
pub fn is_dateline_centred(max_x: f64) -> bool {
    max_x > 180.0
}

/// The longitude interval a dataset or geometry is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LonInterval {
    /// `[-180, 180)`.
    Signed,
    /// `[0, 360)`, centred on the dateline.
    Positive,
}

impl LonInterval {
    /// Infer the interval from the largest x value in use.
    pub fn for_max_x(max_x: f64) -> Self {
        if is_dateline_centred(max_x) {
            Self::Positive
        } else {
            Self::Signed
        }
    }

    /// Inclusive lower end.
    pub fn lower(&self) -> f64 {
        match self {
            Self::Signed => -180.0,
            Self::Positive => 0.0,
        }
    }

    /// Exclusive upper end.
    pub fn upper(&self) -> f64 {
        self.lower() + LONGITUDE_MODULUS
    }
}

impl fmt::Display for LonInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower(), self.upper())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_max_x() {
        assert_eq!(LonInterval::for_max_x(20.0), LonInterval::Signed);
        assert_eq!(LonInterval::for_max_x(180.0), LonInterval::Signed);
        assert_eq!(LonInterval::for_max_x(180.5), LonInterval::Positive);
        assert_eq!(LonInterval::for_max_x(270.0), LonInterval::Positive);
    }

    #[test]
    fn test_ends() {
        assert_eq!(LonInterval::Signed.lower(), -180.0);
        assert_eq!(LonInterval::Signed.upper(), 180.0);
        assert_eq!(LonInterval::Positive.upper(), 360.0);
        assert_eq!(LonInterval::Positive.to_string(), "[0, 360)");
    }
}
