//! Curve flattening tolerance

/// Tolerance used when none is specified
pub const STANDARD_FLATTENING_TOLERANCE: f64 = 0.25;

/// How a tolerance value is interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToleranceType {
    /// Maximum deviation in user units
    #[default]
    Absolute,
    /// Fraction of the larger side of the shape's bounds
    Relative,
}

/// Maximum allowed deviation when approximating curves with line segments
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub value: f64,
    pub kind: ToleranceType,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            value: STANDARD_FLATTENING_TOLERANCE,
            kind: ToleranceType::Absolute,
        }
    }
}

impl Tolerance {
    pub fn absolute(value: f64) -> Self {
        Self {
            value,
            kind: ToleranceType::Absolute,
        }
    }

    pub fn relative(value: f64) -> Self {
        Self {
            value,
            kind: ToleranceType::Relative,
        }
    }

    /// Absolute tolerance for a shape whose largest extent is `extent`
    ///
    /// Non-positive or non-finite results fall back to the standard value.
    pub fn resolve(&self, extent: f64) -> f64 {
        let value = match self.kind {
            ToleranceType::Absolute => self.value,
            ToleranceType::Relative => self.value * extent,
        };

        if value > 0.0 && value.is_finite() {
            value
        } else {
            STANDARD_FLATTENING_TOLERANCE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(Tolerance::default().resolve(1000.0), 0.25);
        assert_eq!(Tolerance::relative(0.01).resolve(200.0), 2.0);
        assert_eq!(Tolerance::relative(0.01).resolve(0.0), STANDARD_FLATTENING_TOLERANCE);
        assert_eq!(Tolerance::absolute(-1.0).resolve(10.0), STANDARD_FLATTENING_TOLERANCE);
    }
}
