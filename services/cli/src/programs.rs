use crate::args::{DatasetArgs, OutputFormat};
use crate::render::{emit, render_outcome};
use crate::session::Session;
use clap::Args;
use nmt_advisor::admissions::write_catalog;
use nmt_advisor::error::AppError;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ProgramsArgs {
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
    /// Write the aggregated statistics to this CSV file
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

pub(crate) fn run_programs(args: ProgramsArgs) -> Result<(), AppError> {
    let session = Session::start()?;
    let outcome = session.program_stats(&args.dataset)?;

    if let (Some(path), Some(catalog)) = (&args.output, outcome.catalog()) {
        let file = std::fs::File::create(path)?;
        write_catalog(file, catalog, session.store().importer().columns())?;
        info!(path = %path.display(), programs = catalog.len(), "aggregated statistics written");
    }

    emit(args.format, &*outcome, || render_outcome(&outcome))
}
