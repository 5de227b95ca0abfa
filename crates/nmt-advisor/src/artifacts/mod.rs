//! Model and dataset artifacts: provisioning, caching and the model registry.

mod cache;
mod provision;
mod registry;

pub use cache::ReadThroughCache;
pub use provision::{
    ArtifactFetcher, ArtifactMode, ArtifactProvisioner, ArtifactRequest, MirrorFetcher,
    ProvisionReport,
};
pub use registry::{ArtifactStore, ModelRegistry};

use crate::scoring::{PredictorError, Subject};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact not accessible: {0}")]
    Missing(#[from] std::io::Error),
    #[error("unable to read artifact '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid model artifact '{}': {source}", path.display())]
    InvalidModel {
        path: PathBuf,
        source: PredictorError,
    },
    #[error("failed to fetch artifact '{name}': {reason}")]
    Fetch { name: String, reason: String },
}

/// Everything a scoring session needs on disk: one model per subject plus
/// the competition dataset.
pub fn standard_artifacts(models_dir: &Path, programs_csv: &Path) -> Vec<ArtifactRequest> {
    Subject::ordered()
        .into_iter()
        .map(|subject| ArtifactRequest::for_path(models_dir.join(subject.model_file())))
        .chain(std::iter::once(ArtifactRequest::for_path(programs_csv)))
        .collect()
}
