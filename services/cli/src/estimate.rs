use crate::args::{
    parse_score, ApplicantArgs, BlendArgs, DatasetArgs, FilterArgs, LabelLanguage, OutputFormat,
};
use crate::render::{emit, format_score, render_chances, render_estimate};
use crate::session::Session;
use clap::Args;
use nmt_advisor::admissions::{analyze_chances, ChanceReport};
use nmt_advisor::error::AppError;
use nmt_advisor::scoring::ScoreEstimate;
use serde::Serialize;
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    #[command(flatten)]
    pub(crate) applicant: ApplicantArgs,
    #[command(flatten)]
    pub(crate) blend: BlendArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let session = Session::start()?;
    let calculator = session.calculator(&args.blend)?;
    let request = args.applicant.into_request()?;

    let estimate = calculator.estimate(&session.registry(), &request);
    emit(args.format, &estimate, || render_estimate(&estimate))
}

#[derive(Args, Debug)]
pub(crate) struct ChancesArgs {
    /// Use this applicant score instead of estimating one
    #[arg(long, value_parser = parse_score)]
    pub(crate) score: Option<f64>,
    #[command(flatten)]
    pub(crate) applicant: ApplicantArgs,
    #[command(flatten)]
    pub(crate) blend: BlendArgs,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Show at most this many programs in text output
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Language of chance labels in text output
    #[arg(long, value_enum, default_value_t = LabelLanguage::En)]
    pub(crate) lang: LabelLanguage,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ChancesOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    estimate: Option<ScoreEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chances: Option<ChanceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dataset_error: Option<String>,
}

pub(crate) fn run_chances(args: ChancesArgs) -> Result<(), AppError> {
    let session = Session::start()?;
    let calculator = session.calculator(&args.blend)?;

    let (estimate, applicant_score) = match args.score {
        Some(score) => (None, Some(score)),
        None if args.applicant.is_empty() => (None, None),
        None => {
            let request = args.applicant.clone().into_request()?;
            let estimate = calculator.estimate(&session.registry(), &request);
            let score = estimate.applicant_score;
            (Some(estimate), score)
        }
    };

    let filter = args.filters.program_filter();
    let (chances, dataset_error) = match session.program_stats(&args.dataset) {
        Ok(outcome) => match outcome.catalog() {
            Some(catalog) => (
                Some(analyze_chances(
                    applicant_score,
                    catalog,
                    &filter,
                    &args.filters.chances,
                )),
                None,
            ),
            None => (None, Some("dataset has no rows with valid scores".to_string())),
        },
        Err(err) => {
            warn!(error = %err, "competition dataset unavailable");
            (None, Some(err.to_string()))
        }
    };

    let output = ChancesOutput {
        estimate,
        chances,
        dataset_error,
    };
    emit(args.format, &output, || {
        if let Some(estimate) = &output.estimate {
            render_estimate(estimate);
        }
        match (&output.chances, &output.dataset_error) {
            (Some(report), _) => render_chances(report, args.limit, args.lang),
            (None, Some(reason)) => {
                println!("Applicant score: {}", format_score(applicant_score));
                println!("Chances unavailable: {reason}");
            }
            (None, None) => {}
        }
    })
}
