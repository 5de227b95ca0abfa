//! Per-subject NMT estimation: model prediction blended with school grades.

pub mod blend;
mod calculator;
pub mod features;
mod predictor;
pub mod scale;
mod subject;

pub use blend::{BlendSettings, BlendSettingsError, ScenarioScores, AVG_GRADE, K_SCALE};
pub use calculator::{
    applicant_score, PredictorSource, ScoreCalculator, ScoreEstimate, ScoreRequest,
    SubjectDiagnostic, SubjectResult,
};
pub use features::{ApplicantFeatures, EncodedFeatures, FeatureError, Sex};
pub use predictor::{FnPredictor, LinearScoreModel, PredictorError, ScorePredictor};
pub use scale::{normalize, ScoreScale, SCHOOL_SCALE, TARGET_SCALE};
pub use subject::{Subject, UnknownSubject};
