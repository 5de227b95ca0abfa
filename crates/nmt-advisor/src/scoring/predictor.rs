use super::features::EncodedFeatures;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Opaque per-subject capability returning an NMT estimate for an applicant.
///
/// Implementations are not required to stay inside the 100-200 scale.
pub trait ScorePredictor: Send + Sync {
    fn predict(&self, features: &EncodedFeatures) -> Result<f64, PredictorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("model produced a non-finite score")]
    NonFinite,
    #[error("invalid model artifact: {0}")]
    Artifact(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

/// Additive model: intercept plus numeric terms plus per-category offsets.
///
/// Categories absent from a lookup table contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearScoreModel {
    pub intercept: f64,
    #[serde(default)]
    pub age: f64,
    #[serde(default)]
    pub sex: f64,
    #[serde(default)]
    pub region: BTreeMap<String, f64>,
    #[serde(default)]
    pub settlement_type: BTreeMap<String, f64>,
    #[serde(default)]
    pub institution_type: BTreeMap<String, f64>,
}

impl LinearScoreModel {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PredictorError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl ScorePredictor for LinearScoreModel {
    fn predict(&self, features: &EncodedFeatures) -> Result<f64, PredictorError> {
        let offset = |table: &BTreeMap<String, f64>, key: &str| -> f64 {
            table.get(key).copied().unwrap_or(0.0)
        };

        let score = self.intercept
            + self.age * f64::from(features.age)
            + self.sex * f64::from(features.sex)
            + offset(&self.region, features.region)
            + offset(&self.settlement_type, features.settlement_type)
            + offset(&self.institution_type, features.institution_type);

        if score.is_finite() {
            Ok(score)
        } else {
            Err(PredictorError::NonFinite)
        }
    }
}

/// Wraps a closure as a predictor; convenient for fixed estimates and tests.
pub struct FnPredictor<F>(F);

impl<F> FnPredictor<F>
where
    F: Fn(&EncodedFeatures) -> Result<f64, PredictorError> + Send + Sync,
{
    pub fn new(predict: F) -> Self {
        Self(predict)
    }
}

impl<F> ScorePredictor for FnPredictor<F>
where
    F: Fn(&EncodedFeatures) -> Result<f64, PredictorError> + Send + Sync,
{
    fn predict(&self, features: &EncodedFeatures) -> Result<f64, PredictorError> {
        (self.0)(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> EncodedFeatures {
        EncodedFeatures {
            region: "kyiv_city",
            settlement_type: "regional_center",
            institution_type: "lyceum",
            sex: 1,
            age: 17,
        }
    }

    #[test]
    fn linear_model_sums_terms() {
        let json = r#"{
            "intercept": 120.0,
            "age": 1.0,
            "sex": -2.0,
            "region": { "kyiv_city": 6.5 },
            "institution_type": { "lyceum": 4.0, "gymnasium": 3.0 }
        }"#;
        let model = LinearScoreModel::from_reader(json.as_bytes()).expect("model parses");

        let score = model.predict(&features()).expect("prediction succeeds");
        assert!((score - (120.0 + 17.0 - 2.0 + 6.5 + 4.0)).abs() < 1e-9);
    }

    #[test]
    fn malformed_artifact_is_reported() {
        let err = LinearScoreModel::from_reader("{ \"age\": 1.0 }".as_bytes())
            .expect_err("intercept is required");
        assert!(matches!(err, PredictorError::Artifact(_)));
    }

    #[test]
    fn non_finite_predictions_fail() {
        let model = LinearScoreModel {
            intercept: f64::INFINITY,
            age: 0.0,
            sex: 0.0,
            region: BTreeMap::new(),
            settlement_type: BTreeMap::new(),
            institution_type: BTreeMap::new(),
        };
        assert!(matches!(
            model.predict(&features()),
            Err(PredictorError::NonFinite)
        ));
    }
}
