use super::scale::{normalize, SCHOOL_SCALE, TARGET_SCALE};
use serde::{Deserialize, Serialize};

/// Grade an average applicant is assumed to hold.
pub const AVG_GRADE: f64 = 7.5;

/// NMT points per school grade point: 100 / 11.
pub const K_SCALE: f64 = (200.0 - 100.0) / (12.0 - 1.0);

pub const DEFAULT_BALANCE_WEIGHT: f64 = 0.5;
pub const DEFAULT_STRESS_FACTOR: f64 = 1.0;

/// Caller-tunable knobs for the blending scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlendSettings {
    balance_weight: f64,
    stress_factor: f64,
}

impl BlendSettings {
    pub fn new(balance_weight: f64, stress_factor: f64) -> Result<Self, BlendSettingsError> {
        if !(0.0..=1.0).contains(&balance_weight) {
            return Err(BlendSettingsError::BalanceWeight(balance_weight));
        }
        if !(stress_factor >= 0.0 && stress_factor.is_finite()) {
            return Err(BlendSettingsError::StressFactor(stress_factor));
        }
        Ok(Self {
            balance_weight,
            stress_factor,
        })
    }

    pub const fn balance_weight(&self) -> f64 {
        self.balance_weight
    }

    pub const fn stress_factor(&self) -> f64 {
        self.stress_factor
    }
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self {
            balance_weight: DEFAULT_BALANCE_WEIGHT,
            stress_factor: DEFAULT_STRESS_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BlendSettingsError {
    #[error("balance weight must lie in [0, 1] (got {0})")]
    BalanceWeight(f64),
    #[error("stress factor must be a non-negative number (got {0})")]
    StressFactor(f64),
}

/// The three scenario scores produced for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioScores {
    pub balanced: f64,
    pub individual: f64,
    pub cautious: f64,
}

impl ScenarioScores {
    pub fn blend(model_score: f64, grade: f64, settings: &BlendSettings) -> Self {
        Self {
            balanced: balanced(model_score, grade, settings.balance_weight),
            individual: individual_adjusted(model_score, grade),
            cautious: cautious_stress(model_score, grade, settings.stress_factor),
        }
    }

    /// Arithmetic mean of the three scenarios.
    pub fn representative(&self) -> f64 {
        (self.balanced + self.individual + self.cautious) / 3.0
    }
}

/// Grades outside the school scale skip blending entirely.
fn out_of_range_fallback(model_score: f64, grade: f64) -> Option<f64> {
    if SCHOOL_SCALE.contains(grade) {
        None
    } else {
        Some(TARGET_SCALE.clamp(model_score))
    }
}

/// Weighted average of the model score and the grade mapped onto the NMT scale.
pub fn balanced(model_score: f64, grade: f64, weight: f64) -> f64 {
    if let Some(fallback) = out_of_range_fallback(model_score, grade) {
        return fallback;
    }

    let normalized = normalize(grade, &SCHOOL_SCALE, &TARGET_SCALE);
    TARGET_SCALE.clamp(weight * model_score + (1.0 - weight) * normalized)
}

/// Shifts the model score by how far the grade sits from [`AVG_GRADE`].
pub fn individual_adjusted(model_score: f64, grade: f64) -> f64 {
    if let Some(fallback) = out_of_range_fallback(model_score, grade) {
        return fallback;
    }

    TARGET_SCALE.clamp(model_score + (grade - AVG_GRADE) * K_SCALE)
}

/// Averages the model score with a grade lowered by `stress_factor` points.
///
/// Unlike the other scenarios the result is not clamped to the NMT scale, so a
/// model score above 200 can carry the result above 200 as well.
pub fn cautious_stress(model_score: f64, grade: f64, stress_factor: f64) -> f64 {
    if let Some(fallback) = out_of_range_fallback(model_score, grade) {
        return fallback;
    }

    let stressed = SCHOOL_SCALE.min().max(grade - stress_factor);
    let normalized = normalize(stressed, &SCHOOL_SCALE, &TARGET_SCALE);
    (model_score + normalized) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn out_of_range_grades_return_clamped_model_score() {
        for grade in [0.0, 0.99, 12.01, 15.0, -3.0, f64::NAN] {
            assert_eq!(balanced(250.0, grade, 0.5), 200.0);
            assert_eq!(individual_adjusted(90.0, grade), 100.0);
            assert_eq!(cautious_stress(250.0, grade, 1.0), 200.0);
            assert_eq!(cautious_stress(150.0, grade, 1.0), 150.0);
        }
    }

    #[test]
    fn balanced_weight_extremes() {
        assert_eq!(balanced(180.0, 6.0, 1.0), 180.0);
        assert_eq!(balanced(230.0, 6.0, 1.0), 200.0);

        let normalized = normalize(6.0, &SCHOOL_SCALE, &TARGET_SCALE);
        assert!(approx(balanced(180.0, 6.0, 0.0), normalized));
    }

    #[test]
    fn balanced_default_weight_is_midpoint() {
        let normalized = normalize(12.0, &SCHOOL_SCALE, &TARGET_SCALE);
        assert!(approx(balanced(160.0, 12.0, 0.5), (160.0 + normalized) / 2.0));
    }

    #[test]
    fn individual_adjusted_is_neutral_at_average_grade() {
        assert_eq!(individual_adjusted(163.4, AVG_GRADE), 163.4);
        assert_eq!(individual_adjusted(260.0, AVG_GRADE), 200.0);
    }

    #[test]
    fn individual_adjusted_scales_grade_delta() {
        let expected = 150.0 + 2.5 * K_SCALE;
        assert!(approx(individual_adjusted(150.0, 10.0), expected));
    }

    #[test]
    fn cautious_stress_is_not_clamped() {
        let result = cautious_stress(250.0, 12.0, 0.0);
        assert!(result > 200.0, "expected unclamped result, got {result}");
        assert!(approx(result, 225.0));
    }

    #[test]
    fn cautious_stress_floors_stressed_grade_at_scale_minimum() {
        // 1.5 - 3.0 floors at 1.0, which normalizes to 100.
        assert!(approx(cautious_stress(140.0, 1.5, 3.0), 120.0));
    }

    #[test]
    fn scenario_representative_is_mean() {
        let scores = ScenarioScores {
            balanced: 150.0,
            individual: 160.0,
            cautious: 170.0,
        };
        assert!(approx(scores.representative(), 160.0));
    }

    #[test]
    fn settings_validate_ranges() {
        assert!(BlendSettings::new(0.0, 0.0).is_ok());
        assert!(BlendSettings::new(1.0, 3.5).is_ok());
        assert_eq!(
            BlendSettings::new(1.2, 1.0),
            Err(BlendSettingsError::BalanceWeight(1.2))
        );
        assert_eq!(
            BlendSettings::new(0.5, -0.1),
            Err(BlendSettingsError::StressFactor(-0.1))
        );
        assert!(BlendSettings::new(f64::NAN, 1.0).is_err());
    }
}
