use crate::admissions::DatasetError;
use crate::artifacts::ArtifactError;
use crate::config::ConfigError;
use crate::scoring::{BlendSettingsError, FeatureError, UnknownSubject};
use crate::telemetry::TelemetryError;
use std::fmt;

/// Session-level failures surfaced by the command line front end.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Dataset(DatasetError),
    Artifact(ArtifactError),
    Blend(BlendSettingsError),
    Input(String),
    Runtime(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Dataset(err) => write!(f, "dataset error: {}", err),
            AppError::Artifact(err) => write!(f, "artifact error: {}", err),
            AppError::Blend(err) => write!(f, "invalid blend settings: {}", err),
            AppError::Input(message) => write!(f, "invalid input: {}", message),
            AppError::Runtime(message) => write!(f, "runtime error: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Dataset(err) => Some(err),
            AppError::Artifact(err) => Some(err),
            AppError::Blend(err) => Some(err),
            AppError::Input(_) | AppError::Runtime(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DatasetError> for AppError {
    fn from(value: DatasetError) -> Self {
        Self::Dataset(value)
    }
}

impl From<ArtifactError> for AppError {
    fn from(value: ArtifactError) -> Self {
        Self::Artifact(value)
    }
}

impl From<BlendSettingsError> for AppError {
    fn from(value: BlendSettingsError) -> Self {
        Self::Blend(value)
    }
}

impl From<FeatureError> for AppError {
    fn from(value: FeatureError) -> Self {
        Self::Input(value.to_string())
    }
}

impl From<UnknownSubject> for AppError {
    fn from(value: UnknownSubject) -> Self {
        Self::Input(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Runtime(format!("failed to encode output: {value}"))
    }
}
