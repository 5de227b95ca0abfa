use crate::args::{BlendArgs, DatasetArgs, FilterArgs, LabelLanguage, OutputFormat};
use crate::render::{chance_line, emit, format_score};
use crate::session::Session;
use chrono::{DateTime, Utc};
use clap::Args;
use nmt_advisor::admissions::{
    analyze_chances, ChanceCategory, ChanceRow, ProgramFilter, ProgramStatsOutcome,
};
use nmt_advisor::artifacts::ModelRegistry;
use nmt_advisor::error::AppError;
use nmt_advisor::scoring::features::current_exam_year;
use nmt_advisor::scoring::{ApplicantFeatures, ScoreCalculator, ScoreRequest, Sex, Subject};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with one applicant per row (id, birth_year, sex, region,
    /// settlement_type, institution_type, optional exam_year and one grade
    /// column per subject)
    #[arg(long)]
    pub(crate) applicants: PathBuf,
    #[command(flatten)]
    pub(crate) blend: BlendArgs,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Programs listed per applicant
    #[arg(long, default_value_t = 3)]
    pub(crate) top: usize,
    /// Language of chance labels in text output
    #[arg(long, value_enum, default_value_t = LabelLanguage::En)]
    pub(crate) lang: LabelLanguage,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApplicantRecord {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) exam_year: Option<i32>,
    pub(crate) birth_year: i32,
    pub(crate) sex: String,
    pub(crate) region: String,
    pub(crate) settlement_type: String,
    pub(crate) institution_type: String,
    #[serde(default)]
    pub(crate) ukrainian: Option<f64>,
    #[serde(default)]
    pub(crate) math: Option<f64>,
    #[serde(default)]
    pub(crate) history: Option<f64>,
}

impl ApplicantRecord {
    fn into_request(self) -> Result<ScoreRequest, String> {
        let sex: Sex = self.sex.parse().map_err(|err| format!("{err}"))?;
        let grades: BTreeMap<Subject, f64> = [
            (Subject::Ukrainian, self.ukrainian),
            (Subject::Math, self.math),
            (Subject::History, self.history),
        ]
        .into_iter()
        .filter_map(|(subject, grade)| grade.map(|grade| (subject, grade)))
        .collect();

        Ok(ScoreRequest {
            features: ApplicantFeatures {
                exam_year: self.exam_year.unwrap_or_else(current_exam_year),
                birth_year: self.birth_year,
                sex,
                region: self.region,
                settlement_type: self.settlement_type,
                institution_type: self.institution_type,
            },
            grades,
        })
    }
}

pub(crate) fn read_applicants(path: &Path) -> Result<Vec<ApplicantRecord>, AppError> {
    let file = std::fs::File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<ApplicantRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(err) => warn!(row = index + 1, error = %err, "applicant row skipped"),
        }
    }
    Ok(records)
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApplicantOutcome {
    pub(crate) id: String,
    pub(crate) applicant_score: Option<f64>,
    pub(crate) warnings: Vec<String>,
    pub(crate) programs: Vec<ChanceRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchSummary {
    generated_at: DateTime<Utc>,
    dataset_error: Option<String>,
    applicants: Vec<ApplicantOutcome>,
}

/// Shared, read-only inputs every scoring task sees.
struct BatchContext {
    calculator: ScoreCalculator,
    registry: ModelRegistry,
    programs: Option<Arc<ProgramStatsOutcome>>,
    filter: ProgramFilter,
    chances: Vec<ChanceCategory>,
    top: usize,
}

fn score_applicant(context: &BatchContext, record: ApplicantRecord) -> ApplicantOutcome {
    let id = record.id.clone();
    let request = match record.into_request() {
        Ok(request) => request,
        Err(error) => {
            return ApplicantOutcome {
                id,
                applicant_score: None,
                warnings: Vec::new(),
                programs: Vec::new(),
                error: Some(error),
            }
        }
    };

    let estimate = context.calculator.estimate(&context.registry, &request);
    let programs = context
        .programs
        .as_deref()
        .and_then(ProgramStatsOutcome::catalog)
        .map(|catalog| {
            let mut report = analyze_chances(
                estimate.applicant_score,
                catalog,
                &context.filter,
                &context.chances,
            );
            report.rows.truncate(context.top);
            report.rows
        })
        .unwrap_or_default();

    ApplicantOutcome {
        id,
        applicant_score: estimate.applicant_score,
        warnings: estimate
            .diagnostics
            .iter()
            .map(|diagnostic| diagnostic.summary())
            .collect(),
        programs,
        error: None,
    }
}

pub(crate) async fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let session = Session::start()?;
    let records = read_applicants(&args.applicants)?;

    let (programs, dataset_error) = match session.program_stats(&args.dataset) {
        Ok(outcome) => (Some(outcome), None),
        Err(err) => {
            warn!(error = %err, "competition dataset unavailable; scoring without chances");
            (None, Some(err.to_string()))
        }
    };

    let context = Arc::new(BatchContext {
        calculator: session.calculator(&args.blend)?,
        registry: session.registry(),
        programs,
        filter: args.filters.program_filter(),
        chances: args.filters.chances.clone(),
        top: args.top,
    });

    let mut handles = Vec::with_capacity(records.len());
    for record in records {
        let context = Arc::clone(&context);
        handles.push(tokio::task::spawn_blocking(move || {
            score_applicant(&context, record)
        }));
    }

    let mut applicants = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = handle
            .await
            .map_err(|err| AppError::Runtime(format!("scoring task failed: {err}")))?;
        applicants.push(outcome);
    }
    info!(applicants = applicants.len(), "batch scored");

    let summary = BatchSummary {
        generated_at: Utc::now(),
        dataset_error,
        applicants,
    };
    emit(args.format, &summary, || render_batch(&summary, args.lang))
}

fn render_batch(summary: &BatchSummary, lang: LabelLanguage) {
    println!(
        "Batch of {} applicants ({})",
        summary.applicants.len(),
        summary.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(reason) = &summary.dataset_error {
        println!("Chances unavailable: {reason}");
    }
    for applicant in &summary.applicants {
        if let Some(error) = &applicant.error {
            println!("- {}: skipped ({error})", applicant.id);
            continue;
        }
        println!(
            "- {}: score {}",
            applicant.id,
            format_score(applicant.applicant_score)
        );
        for warning in &applicant.warnings {
            println!("    ! {warning}");
        }
        for row in &applicant.programs {
            println!("    {}", chance_line(row, lang));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmt_advisor::admissions::ProgramStatsImporter;
    use nmt_advisor::scoring::{FnPredictor, ScorePredictor};

    fn write_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nmt-advisor-batch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("scratch dir");
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("scratch file");
        path
    }

    #[test]
    fn reads_applicants_with_optional_columns() {
        let path = write_file(
            "applicants.csv",
            "id,birth_year,sex,region,settlement_type,institution_type,exam_year,ukrainian,math,history\n\
             a1, 2007 ,female,Львівська область,місто,ліцей,,10.5,9,\n\
             a2,not-a-year,male,Львівська область,місто,ліцей,2024,8,8,8\n\
             a3,2006,male,Одеська область,село,гімназія,2024,,11,7\n",
        );

        let records = read_applicants(&path).expect("file readable");
        assert_eq!(records.len(), 2, "malformed birth year row is skipped");
        assert_eq!(records[0].id, "a1");
        assert_eq!(records[0].exam_year, None);
        assert_eq!(records[0].history, None);

        let request = records[1].clone().into_request().expect("valid answers");
        assert_eq!(request.features.exam_year, 2024);
        assert_eq!(
            request.grades.keys().copied().collect::<Vec<_>>(),
            vec![Subject::Math, Subject::History]
        );
    }

    #[test]
    fn scores_applicants_against_shared_catalog() {
        let mut registry = ModelRegistry::new();
        let predictor: Arc<dyn ScorePredictor> = Arc::new(FnPredictor::new(|_| Ok(160.0)));
        registry.insert(Subject::Math, predictor);

        let outcome = ProgramStatsImporter::default()
            .import_reader(
                "\"Назва закладу\",Спеціальність,\"шк_Мін. бал\n(на загальних підставах)\",\"шк_Сер. бал\n(на загальних підставах)\",\"шк_Макс. бал\n(на загальних підставах)\"\n\
                 KNU,Law,150,175,190\n\
                 LNU,History,100,110,120\n"
                    .as_bytes(),
            )
            .expect("dataset parses");

        let context = BatchContext {
            calculator: ScoreCalculator::default(),
            registry,
            programs: Some(Arc::new(outcome)),
            filter: ProgramFilter::default(),
            chances: Vec::new(),
            top: 1,
        };
        let record = ApplicantRecord {
            id: "a1".to_string(),
            exam_year: Some(2024),
            birth_year: 2007,
            sex: "female".to_string(),
            region: "Львівська область".to_string(),
            settlement_type: "місто".to_string(),
            institution_type: "ліцей".to_string(),
            ukrainian: Some(10.0),
            math: Some(10.0),
            history: None,
        };

        let outcome = score_applicant(&context, record);
        assert!(outcome.error.is_none());
        assert!(outcome.applicant_score.is_some());
        assert_eq!(outcome.warnings.len(), 1, "ukrainian model is missing");
        assert_eq!(outcome.programs.len(), 1);
        assert_eq!(outcome.programs[0].category, ChanceCategory::AboveMax);
        assert_eq!(outcome.programs[0].institution, "LNU");
    }

    #[test]
    fn invalid_answers_are_reported_per_applicant() {
        let context = BatchContext {
            calculator: ScoreCalculator::default(),
            registry: ModelRegistry::new(),
            programs: None,
            filter: ProgramFilter::default(),
            chances: Vec::new(),
            top: 3,
        };
        let record = ApplicantRecord {
            id: "bad".to_string(),
            exam_year: None,
            birth_year: 2007,
            sex: "unknown".to_string(),
            region: String::new(),
            settlement_type: String::new(),
            institution_type: String::new(),
            ukrainian: Some(9.0),
            math: None,
            history: None,
        };

        let outcome = score_applicant(&context, record);
        assert!(outcome.error.is_some());
        assert!(outcome.programs.is_empty());
    }
}
