use super::blend::{BlendSettings, ScenarioScores};
use super::features::ApplicantFeatures;
use super::predictor::{PredictorError, ScorePredictor};
use super::scale::SCHOOL_SCALE;
use super::subject::Subject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves the predictor for a subject, if one is available.
pub trait PredictorSource {
    fn predictor(&self, subject: Subject) -> Option<&dyn ScorePredictor>;
}

impl PredictorSource for BTreeMap<Subject, Arc<dyn ScorePredictor>> {
    fn predictor(&self, subject: Subject) -> Option<&dyn ScorePredictor> {
        self.get(&subject).map(|predictor| predictor.as_ref())
    }
}

/// One applicant's answers plus the school grade for each attempted subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub features: ApplicantFeatures,
    pub grades: BTreeMap<Subject, f64>,
}

/// Per-subject outcome of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectResult {
    pub subject: Subject,
    pub grade: f64,
    pub model_score: f64,
    pub scenarios: ScenarioScores,
    pub representative: f64,
}

/// Non-fatal problems met while scoring a subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubjectDiagnostic {
    ModelUnavailable { subject: Subject },
    PredictionFailed { subject: Subject, reason: String },
    GradeOutOfRange { subject: Subject, grade: f64 },
}

impl SubjectDiagnostic {
    pub fn subject(&self) -> Subject {
        match self {
            Self::ModelUnavailable { subject }
            | Self::PredictionFailed { subject, .. }
            | Self::GradeOutOfRange { subject, .. } => *subject,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::ModelUnavailable { subject } => {
                format!("model unavailable for subject {}", subject.label())
            }
            Self::PredictionFailed { subject, reason } => {
                format!("model unavailable for subject {}: {reason}", subject.label())
            }
            Self::GradeOutOfRange { subject, grade } => format!(
                "grade {grade} for {} is outside [{:.1}, {:.1}]; blending skipped",
                subject.label(),
                SCHOOL_SCALE.min(),
                SCHOOL_SCALE.max()
            ),
        }
    }
}

/// Immutable result of one calculation. Callers keep it if they need it later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEstimate {
    pub subjects: Vec<SubjectResult>,
    pub diagnostics: Vec<SubjectDiagnostic>,
    pub applicant_score: Option<f64>,
}

impl ScoreEstimate {
    pub fn subject(&self, subject: Subject) -> Option<&SubjectResult> {
        self.subjects.iter().find(|result| result.subject == subject)
    }
}

/// Stateless calculator applying one set of blend settings.
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    settings: BlendSettings,
}

impl ScoreCalculator {
    pub fn new(settings: BlendSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BlendSettings {
        &self.settings
    }

    pub fn estimate<S>(&self, source: &S, request: &ScoreRequest) -> ScoreEstimate
    where
        S: PredictorSource + ?Sized,
    {
        let encoded = request.features.encode();
        let mut subjects = Vec::new();
        let mut diagnostics = Vec::new();

        for (&subject, &grade) in &request.grades {
            let Some(predictor) = source.predictor(subject) else {
                warn!(subject = subject.key(), "model unavailable, subject skipped");
                diagnostics.push(SubjectDiagnostic::ModelUnavailable { subject });
                continue;
            };

            // Predictors other than the linear model may hand back NaN or infinity.
            let prediction = predictor.predict(&encoded).and_then(|score| {
                if score.is_finite() {
                    Ok(score)
                } else {
                    Err(PredictorError::NonFinite)
                }
            });
            let model_score = match prediction {
                Ok(score) => score,
                Err(err) => {
                    warn!(subject = subject.key(), error = %err, "prediction failed, subject skipped");
                    diagnostics.push(SubjectDiagnostic::PredictionFailed {
                        subject,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            if !SCHOOL_SCALE.contains(grade) {
                diagnostics.push(SubjectDiagnostic::GradeOutOfRange { subject, grade });
            }

            let scenarios = ScenarioScores::blend(model_score, grade, &self.settings);
            let representative = scenarios.representative();
            debug!(
                subject = subject.key(),
                model_score,
                balanced = scenarios.balanced,
                individual = scenarios.individual,
                cautious = scenarios.cautious,
                "subject scored"
            );

            subjects.push(SubjectResult {
                subject,
                grade,
                model_score,
                scenarios,
                representative,
            });
        }

        let applicant_score = applicant_score(&subjects);
        if applicant_score.is_none() {
            warn!("no subject produced a score; applicant score undefined");
        }

        ScoreEstimate {
            subjects,
            diagnostics,
            applicant_score,
        }
    }
}

/// Mean of the representative values, or `None` when there are none.
pub fn applicant_score(results: &[SubjectResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }

    let total: f64 = results.iter().map(|result| result.representative).sum();
    Some(total / results.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::features::Sex;
    use crate::scoring::predictor::FnPredictor;

    fn request(grades: &[(Subject, f64)]) -> ScoreRequest {
        ScoreRequest {
            features: ApplicantFeatures {
                exam_year: 2024,
                birth_year: 2007,
                sex: Sex::Male,
                region: "Львівська область".to_string(),
                settlement_type: "місто".to_string(),
                institution_type: "гімназія".to_string(),
            },
            grades: grades.iter().copied().collect(),
        }
    }

    fn fixed(score: f64) -> Arc<dyn ScorePredictor> {
        Arc::new(FnPredictor::new(move |_| Ok(score)))
    }

    #[test]
    fn averages_representatives_across_subjects() {
        let mut models: BTreeMap<Subject, Arc<dyn ScorePredictor>> = BTreeMap::new();
        models.insert(Subject::Ukrainian, fixed(150.0));
        models.insert(Subject::Math, fixed(170.0));

        let estimate = ScoreCalculator::default().estimate(
            &models,
            &request(&[(Subject::Ukrainian, 7.5), (Subject::Math, 7.5)]),
        );

        assert_eq!(estimate.subjects.len(), 2);
        assert!(estimate.diagnostics.is_empty());
        let expected = estimate
            .subjects
            .iter()
            .map(|result| result.representative)
            .sum::<f64>()
            / 2.0;
        let score = estimate.applicant_score.expect("score defined");
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_model_skips_subject_without_zero_filling() {
        let mut models: BTreeMap<Subject, Arc<dyn ScorePredictor>> = BTreeMap::new();
        models.insert(Subject::Math, fixed(160.0));

        let estimate = ScoreCalculator::default().estimate(
            &models,
            &request(&[(Subject::Math, 12.0), (Subject::History, 12.0)]),
        );

        assert_eq!(estimate.subjects.len(), 1);
        assert_eq!(
            estimate.diagnostics,
            vec![SubjectDiagnostic::ModelUnavailable {
                subject: Subject::History
            }]
        );
        let math = estimate.subject(Subject::Math).expect("math scored");
        assert_eq!(estimate.applicant_score, Some(math.representative));
    }

    #[test]
    fn failing_predictor_is_reported_and_skipped() {
        let mut models: BTreeMap<Subject, Arc<dyn ScorePredictor>> = BTreeMap::new();
        models.insert(
            Subject::Ukrainian,
            Arc::new(FnPredictor::new(|_| {
                Err(PredictorError::Other("boom".to_string()))
            })),
        );
        models.insert(Subject::History, fixed(140.0));

        let estimate = ScoreCalculator::default().estimate(
            &models,
            &request(&[(Subject::Ukrainian, 9.0), (Subject::History, 9.0)]),
        );

        assert_eq!(estimate.subjects.len(), 1);
        assert!(matches!(
            &estimate.diagnostics[0],
            SubjectDiagnostic::PredictionFailed { subject: Subject::Ukrainian, reason } if reason == "boom"
        ));
        assert!(estimate.applicant_score.is_some());
    }

    #[test]
    fn non_finite_prediction_is_reported_and_skipped() {
        let mut models: BTreeMap<Subject, Arc<dyn ScorePredictor>> = BTreeMap::new();
        models.insert(Subject::Math, fixed(f64::NAN));
        models.insert(Subject::History, fixed(f64::INFINITY));

        let estimate = ScoreCalculator::default().estimate(
            &models,
            &request(&[(Subject::Math, 10.0), (Subject::History, 10.0)]),
        );

        assert!(estimate.subjects.is_empty());
        assert_eq!(estimate.applicant_score, None);
        let reason = PredictorError::NonFinite.to_string();
        assert_eq!(
            estimate.diagnostics,
            vec![
                SubjectDiagnostic::PredictionFailed {
                    subject: Subject::Math,
                    reason: reason.clone(),
                },
                SubjectDiagnostic::PredictionFailed {
                    subject: Subject::History,
                    reason,
                },
            ]
        );
    }

    #[test]
    fn zero_subjects_leave_score_undefined() {
        let models: BTreeMap<Subject, Arc<dyn ScorePredictor>> = BTreeMap::new();
        let estimate =
            ScoreCalculator::default().estimate(&models, &request(&[(Subject::Math, 10.0)]));

        assert!(estimate.subjects.is_empty());
        assert_eq!(estimate.applicant_score, None);
    }

    #[test]
    fn out_of_range_grade_is_flagged_but_still_scored() {
        let mut models: BTreeMap<Subject, Arc<dyn ScorePredictor>> = BTreeMap::new();
        models.insert(Subject::Math, fixed(230.0));

        let estimate =
            ScoreCalculator::default().estimate(&models, &request(&[(Subject::Math, 13.0)]));

        let math = estimate.subject(Subject::Math).expect("math scored");
        assert_eq!(math.scenarios.balanced, 200.0);
        assert_eq!(math.scenarios.individual, 200.0);
        assert_eq!(math.scenarios.cautious, 200.0);
        assert!(matches!(
            estimate.diagnostics.as_slice(),
            [SubjectDiagnostic::GradeOutOfRange { subject: Subject::Math, .. }]
        ));
    }

    #[test]
    fn predictor_sees_encoded_features() {
        let mut models: BTreeMap<Subject, Arc<dyn ScorePredictor>> = BTreeMap::new();
        models.insert(
            Subject::History,
            Arc::new(FnPredictor::new(|features| {
                assert_eq!(features.region, "lviv");
                assert_eq!(features.age, 17);
                Ok(150.0)
            })),
        );

        let estimate = ScoreCalculator::default()
            .estimate(&models, &request(&[(Subject::History, 6.5)]));
        assert_eq!(estimate.subjects.len(), 1);
    }
}
