use serde::{Deserialize, Serialize};

/// Closed numeric interval a score lives in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreScale {
    min: f64,
    max: f64,
}

/// Annual school grades, 1 through 12.
pub const SCHOOL_SCALE: ScoreScale = ScoreScale {
    min: 1.0,
    max: 12.0,
};

/// NMT score scale, 100 through 200.
pub const TARGET_SCALE: ScoreScale = ScoreScale {
    min: 100.0,
    max: 200.0,
};

impl ScoreScale {
    pub const fn min(&self) -> f64 {
        self.min
    }

    pub const fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Inclusive bounds check. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        clamp(value, self.min, self.max)
    }
}

/// `max(lower, min(upper, value))`, evaluated in that order.
pub fn clamp(value: f64, lower: f64, upper: f64) -> f64 {
    lower.max(upper.min(value))
}

/// Linear map of `value` from `source` onto `target`.
pub fn normalize(value: f64, source: &ScoreScale, target: &ScoreScale) -> f64 {
    target.min + (value - source.min) * target.span() / source.span()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_bounds_map_to_target_bounds() {
        assert_eq!(normalize(1.0, &SCHOOL_SCALE, &TARGET_SCALE), 100.0);
        assert_eq!(normalize(12.0, &SCHOOL_SCALE, &TARGET_SCALE), 200.0);
    }

    #[test]
    fn midpoint_maps_linearly() {
        let value = normalize(6.5, &SCHOOL_SCALE, &TARGET_SCALE);
        assert!((value - 150.0).abs() < 1e-9);
    }

    #[test]
    fn values_outside_source_extrapolate() {
        let value = normalize(0.0, &SCHOOL_SCALE, &TARGET_SCALE);
        assert!(value < 100.0);
    }

    #[test]
    fn contains_is_inclusive_and_rejects_nan() {
        assert!(SCHOOL_SCALE.contains(1.0));
        assert!(SCHOOL_SCALE.contains(12.0));
        assert!(!SCHOOL_SCALE.contains(12.01));
        assert!(!SCHOOL_SCALE.contains(f64::NAN));
    }

    #[test]
    fn clamp_bounds_both_sides() {
        assert_eq!(TARGET_SCALE.clamp(250.0), 200.0);
        assert_eq!(TARGET_SCALE.clamp(42.0), 100.0);
        assert_eq!(TARGET_SCALE.clamp(150.5), 150.5);
    }
}
