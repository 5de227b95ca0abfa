use super::cache::ReadThroughCache;
use super::ArtifactError;
use crate::admissions::{DatasetError, ProgramStatsImporter, ProgramStatsOutcome};
use crate::scoring::{LinearScoreModel, PredictorSource, ScorePredictor, Subject};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Predictors keyed by subject, plus the reason each missing one is missing.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<Subject, Arc<dyn ScorePredictor>>,
    unavailable: BTreeMap<Subject, String>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, subject: Subject, predictor: Arc<dyn ScorePredictor>) {
        self.unavailable.remove(&subject);
        self.models.insert(subject, predictor);
    }

    pub fn mark_unavailable(&mut self, subject: Subject, reason: impl Into<String>) {
        self.models.remove(&subject);
        self.unavailable.insert(subject, reason.into());
    }

    pub fn is_available(&self, subject: Subject) -> bool {
        self.models.contains_key(&subject)
    }

    pub fn available(&self) -> impl Iterator<Item = Subject> + '_ {
        self.models.keys().copied()
    }

    pub fn unavailable(&self) -> &BTreeMap<Subject, String> {
        &self.unavailable
    }
}

impl PredictorSource for ModelRegistry {
    fn predictor(&self, subject: Subject) -> Option<&dyn ScorePredictor> {
        self.models.get(&subject).map(|predictor| predictor.as_ref())
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("available", &self.models.keys().collect::<Vec<_>>())
            .field("unavailable", &self.unavailable)
            .finish()
    }
}

/// Loads model and dataset artifacts from disk through read-through caches.
pub struct ArtifactStore {
    models_dir: PathBuf,
    importer: ProgramStatsImporter,
    models: ReadThroughCache<LinearScoreModel>,
    programs: ReadThroughCache<ProgramStatsOutcome>,
}

impl ArtifactStore {
    pub fn new(models_dir: impl Into<PathBuf>, importer: ProgramStatsImporter) -> Self {
        Self {
            models_dir: models_dir.into(),
            importer,
            models: ReadThroughCache::new(),
            programs: ReadThroughCache::new(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn importer(&self) -> &ProgramStatsImporter {
        &self.importer
    }

    pub fn model_path(&self, subject: Subject) -> PathBuf {
        self.models_dir.join(subject.model_file())
    }

    pub fn load_model(&self, subject: Subject) -> Result<Arc<LinearScoreModel>, ArtifactError> {
        let path = self.model_path(subject);
        self.models
            .get_or_load(&path, |path| {
                let file = std::fs::File::open(path).map_err(|source| ArtifactError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                LinearScoreModel::from_reader(std::io::BufReader::new(file)).map_err(|source| {
                    ArtifactError::InvalidModel {
                        path: path.to_path_buf(),
                        source,
                    }
                })
            })
            .map_err(|err| match err {
                ArtifactError::Missing(source) => ArtifactError::Io { path, source },
                other => other,
            })
    }

    /// Every requested subject ends up either loaded or marked unavailable.
    pub fn model_registry(&self, subjects: &[Subject]) -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        for &subject in subjects {
            match self.load_model(subject) {
                Ok(model) => registry.insert(subject, model),
                Err(err) => {
                    warn!(subject = subject.key(), error = %err, "model unavailable");
                    registry.mark_unavailable(subject, err.to_string());
                }
            }
        }
        info!(
            loaded = registry.models.len(),
            unavailable = registry.unavailable.len(),
            "model registry ready"
        );
        registry
    }

    pub fn program_stats(&self, path: &Path) -> Result<Arc<ProgramStatsOutcome>, DatasetError> {
        self.programs
            .get_or_load(path, |path| self.importer.import_path(path))
            .map_err(|err| match err {
                DatasetError::Io(source) => DatasetError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })
    }
}
