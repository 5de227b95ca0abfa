use super::ArtifactError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Whether artifacts are fetched before loading or taken from disk as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactMode {
    Development,
    Production,
}

impl ArtifactMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Source able to place a named artifact at a local destination.
pub trait ArtifactFetcher: Send + Sync {
    fn fetch(&self, name: &str, destination: &Path) -> Result<(), ArtifactError>;
}

/// Copies artifacts from a mirror directory (a mounted bucket, a shared volume).
#[derive(Debug, Clone)]
pub struct MirrorFetcher {
    root: PathBuf,
}

impl MirrorFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactFetcher for MirrorFetcher {
    fn fetch(&self, name: &str, destination: &Path) -> Result<(), ArtifactError> {
        let source = self.root.join(name);
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::copy(&source, destination).map_err(|err| ArtifactError::Fetch {
            name: name.to_string(),
            reason: format!("copy from {} failed: {err}", source.display()),
        })?;
        Ok(())
    }
}

/// A file the application needs, by remote name and local destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRequest {
    pub name: String,
    pub destination: PathBuf,
}

impl ArtifactRequest {
    /// Remote name is the destination's file name.
    pub fn for_path(destination: impl Into<PathBuf>) -> Self {
        let destination = destination.into();
        let name = destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, destination }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProvisionReport {
    pub skipped: bool,
    pub fetched: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Applies the configured [`ArtifactMode`] to a list of artifact requests.
pub struct ArtifactProvisioner {
    mode: ArtifactMode,
    fetcher: Option<Box<dyn ArtifactFetcher>>,
}

impl ArtifactProvisioner {
    pub fn new(mode: ArtifactMode, fetcher: Option<Box<dyn ArtifactFetcher>>) -> Self {
        Self { mode, fetcher }
    }

    pub fn mode(&self) -> ArtifactMode {
        self.mode
    }

    pub fn provision(&self, requests: &[ArtifactRequest]) -> ProvisionReport {
        let fetcher = match (self.mode, self.fetcher.as_deref()) {
            (ArtifactMode::Development, _) => {
                warn!("development mode: artifact fetching skipped, using local files");
                return ProvisionReport {
                    skipped: true,
                    ..ProvisionReport::default()
                };
            }
            (ArtifactMode::Production, None) => {
                warn!("production mode without an artifact source; using local files");
                return ProvisionReport {
                    skipped: true,
                    ..ProvisionReport::default()
                };
            }
            (ArtifactMode::Production, Some(fetcher)) => fetcher,
        };

        let mut report = ProvisionReport::default();
        for request in requests {
            match fetcher.fetch(&request.name, &request.destination) {
                Ok(()) => {
                    info!(artifact = %request.name, destination = %request.destination.display(), "artifact fetched");
                    report.fetched.push(request.destination.clone());
                }
                Err(err) => {
                    warn!(artifact = %request.name, error = %err, "artifact fetch failed");
                    report
                        .failed
                        .push((request.destination.clone(), err.to_string()));
                }
            }
        }
        report
    }
}
