use crate::artifacts::ArtifactMode;
use crate::scoring::blend::{DEFAULT_BALANCE_WEIGHT, DEFAULT_STRESS_FACTOR};
use crate::scoring::{BlendSettings, BlendSettingsError};
use std::env;
use std::fmt;
use std::num::ParseFloatError;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Only production fetches artifacts before loading them.
    pub const fn artifact_mode(self) -> ArtifactMode {
        match self {
            Self::Production => ArtifactMode::Production,
            Self::Development | Self::Test => ArtifactMode::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub artifacts: ArtifactConfig,
    pub blend: BlendSettings,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let models_dir = env::var("NMT_MODELS_DIR").unwrap_or_else(|_| "models".to_string());
        let programs_csv =
            env::var("NMT_PROGRAMS_CSV").unwrap_or_else(|_| "data/konkurs_NMT.csv".to_string());
        let mirror = env::var("NMT_ARTIFACT_MIRROR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let balance_weight = read_f64("NMT_BALANCE_WEIGHT", DEFAULT_BALANCE_WEIGHT)?;
        let stress_factor = read_f64("NMT_STRESS_FACTOR", DEFAULT_STRESS_FACTOR)?;
        let blend = BlendSettings::new(balance_weight, stress_factor).map_err(ConfigError::Blend)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            artifacts: ArtifactConfig {
                mode: environment.artifact_mode(),
                models_dir: PathBuf::from(models_dir),
                programs_csv: PathBuf::from(programs_csv),
                mirror,
            },
            blend,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn read_f64(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse::<f64>()
                .map_err(|source| ConfigError::InvalidNumber {
                    name,
                    value: value.clone(),
                    source,
                })
        }
        _ => Ok(default),
    }
}

/// Where model and dataset artifacts live and how they are provisioned.
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub mode: ArtifactMode,
    pub models_dir: PathBuf,
    pub programs_csv: PathBuf,
    pub mirror: Option<PathBuf>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber {
        name: &'static str,
        value: String,
        source: ParseFloatError,
    },
    Blend(BlendSettingsError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { name, value, .. } => {
                write!(f, "{name} must be a number, got '{value}'")
            }
            ConfigError::Blend(BlendSettingsError::BalanceWeight(_)) => {
                write!(f, "NMT_BALANCE_WEIGHT must lie in [0, 1]")
            }
            ConfigError::Blend(BlendSettingsError::StressFactor(_)) => {
                write!(f, "NMT_STRESS_FACTOR must be a non-negative number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidNumber { source, .. } => Some(source),
            ConfigError::Blend(source) => Some(source),
        }
    }
}
