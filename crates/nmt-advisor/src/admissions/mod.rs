//! Historical competition statistics and admission chance classification.

mod analysis;
mod chance;
mod columns;
mod export;
mod parser;
mod stats;

pub use analysis::{analyze_chances, sort_rows, ChanceReport, ChanceRow, ProgramFilter};
pub use chance::{classify, ChanceCategory, UnknownChanceCategory};
pub use columns::{ProgramAttribute, ProgramColumns};
pub use export::write_catalog;
pub use parser::{RawProgramRow, RawProgramTable};
pub use stats::{
    aggregate, parse_score, round2, AggregationReport, ProgramCatalog, ProgramKey,
    ProgramStats, ProgramStatsOutcome, NOT_SPECIFIED,
};

use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Recoverable problems with a competition dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unable to read dataset '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is empty")]
    Empty,
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Loads a competition export and aggregates it into per-program statistics.
#[derive(Debug, Clone, Default)]
pub struct ProgramStatsImporter {
    columns: ProgramColumns,
}

impl ProgramStatsImporter {
    pub fn new(columns: ProgramColumns) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ProgramColumns {
        &self.columns
    }

    pub fn import_path<P: AsRef<Path>>(&self, path: P) -> Result<ProgramStatsOutcome, DatasetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let outcome = self.import_reader(file)?;
        info!(
            path = %path.display(),
            programs = outcome.catalog().map(ProgramCatalog::len).unwrap_or(0),
            dropped_rows = outcome.report().dropped_rows,
            "program statistics loaded"
        );
        Ok(outcome)
    }

    pub fn import_reader<R: Read>(&self, reader: R) -> Result<ProgramStatsOutcome, DatasetError> {
        let table = parser::parse_program_table(reader, &self.columns)?;
        Ok(aggregate(&table))
    }
}
