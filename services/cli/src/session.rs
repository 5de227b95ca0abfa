use crate::args::{BlendArgs, DatasetArgs};
use nmt_advisor::admissions::{DatasetError, ProgramStatsImporter, ProgramStatsOutcome};
use nmt_advisor::artifacts::{
    standard_artifacts, ArtifactFetcher, ArtifactProvisioner, ArtifactStore, MirrorFetcher,
    ModelRegistry,
};
use nmt_advisor::config::AppConfig;
use nmt_advisor::error::AppError;
use nmt_advisor::scoring::{ScoreCalculator, Subject};
use nmt_advisor::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Loaded configuration plus the artifact store shared by every command.
pub(crate) struct Session {
    config: AppConfig,
    store: ArtifactStore,
}

impl Session {
    pub(crate) fn start() -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        telemetry::init(&config.telemetry)?;

        let fetcher = config
            .artifacts
            .mirror
            .as_ref()
            .map(|root| Box::new(MirrorFetcher::new(root)) as Box<dyn ArtifactFetcher>);
        let provisioner = ArtifactProvisioner::new(config.artifacts.mode, fetcher);
        let report = provisioner.provision(&standard_artifacts(
            &config.artifacts.models_dir,
            &config.artifacts.programs_csv,
        ));

        info!(
            environment = ?config.environment,
            mode = config.artifacts.mode.label(),
            fetched = report.fetched.len(),
            failed = report.failed.len(),
            "session ready"
        );

        let store = ArtifactStore::new(
            config.artifacts.models_dir.clone(),
            ProgramStatsImporter::default(),
        );
        Ok(Self { config, store })
    }

    pub(crate) fn calculator(&self, blend: &BlendArgs) -> Result<ScoreCalculator, AppError> {
        Ok(ScoreCalculator::new(blend.apply(&self.config.blend)?))
    }

    pub(crate) fn registry(&self) -> ModelRegistry {
        self.store.model_registry(&Subject::ordered())
    }

    pub(crate) fn dataset_path(&self, args: &DatasetArgs) -> PathBuf {
        args.dataset
            .clone()
            .unwrap_or_else(|| self.config.artifacts.programs_csv.clone())
    }

    pub(crate) fn program_stats(
        &self,
        args: &DatasetArgs,
    ) -> Result<Arc<ProgramStatsOutcome>, DatasetError> {
        self.store.program_stats(&self.dataset_path(args))
    }

    pub(crate) fn store(&self) -> &ArtifactStore {
        &self.store
    }
}
