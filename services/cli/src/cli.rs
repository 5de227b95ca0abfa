use crate::batch::{run_batch, BatchArgs};
use crate::estimate::{run_chances, run_estimate, ChancesArgs, EstimateArgs};
use crate::options::{run_options, OptionsArgs};
use crate::programs::{run_programs, ProgramsArgs};
use clap::{Parser, Subcommand};
use nmt_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "nmt-advisor",
    about = "Estimate NMT scores and admission chances from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate per-subject NMT scores and the overall applicant score
    Estimate(EstimateArgs),
    /// Aggregate a competition dataset into per-program statistics
    Programs(ProgramsArgs),
    /// Classify admission chances for every program in the dataset
    Chances(ChancesArgs),
    /// Score a CSV of applicants concurrently
    Batch(BatchArgs),
    /// List accepted subjects, regions, school types and chance categories
    Options(OptionsArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Estimate(args) => run_estimate(args),
        Command::Programs(args) => run_programs(args),
        Command::Chances(args) => run_chances(args),
        Command::Batch(args) => run_batch(args).await,
        Command::Options(args) => run_options(args),
    }
}
