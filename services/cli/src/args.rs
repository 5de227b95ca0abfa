use clap::{Args, ValueEnum};
use nmt_advisor::admissions::{ChanceCategory, ProgramFilter};
use nmt_advisor::error::AppError;
use nmt_advisor::scoring::features::current_exam_year;
use nmt_advisor::scoring::{ApplicantFeatures, BlendSettings, ScoreRequest, Sex, Subject};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Language of chance category labels in text output.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum LabelLanguage {
    #[default]
    En,
    Uk,
}

impl LabelLanguage {
    pub(crate) const fn chance_label(self, category: ChanceCategory) -> &'static str {
        match self {
            Self::En => category.label(),
            Self::Uk => category.label_uk(),
        }
    }
}

/// Applicant answers plus school grades. Every field is optional at the
/// parser level so `chances --score` can skip them entirely.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ApplicantArgs {
    /// Exam year (defaults to the current year)
    #[arg(long)]
    pub(crate) exam_year: Option<i32>,
    /// Applicant's year of birth
    #[arg(long)]
    pub(crate) birth_year: Option<i32>,
    /// male or female
    #[arg(long)]
    pub(crate) sex: Option<Sex>,
    /// Region label (see `options`)
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Settlement type label (see `options`)
    #[arg(long)]
    pub(crate) settlement_type: Option<String>,
    /// School type label (see `options`)
    #[arg(long)]
    pub(crate) institution_type: Option<String>,
    /// Average school grade per subject, e.g. `--grade math=10.5` (repeatable)
    #[arg(long = "grade", value_parser = parse_grade)]
    pub(crate) grades: Vec<(Subject, f64)>,
}

impl ApplicantArgs {
    pub(crate) fn is_empty(&self) -> bool {
        self.birth_year.is_none()
            && self.sex.is_none()
            && self.region.is_none()
            && self.settlement_type.is_none()
            && self.institution_type.is_none()
            && self.grades.is_empty()
    }

    pub(crate) fn into_request(self) -> Result<ScoreRequest, AppError> {
        fn required<T>(value: Option<T>, flag: &str) -> Result<T, AppError> {
            value.ok_or_else(|| AppError::Input(format!("--{flag} is required")))
        }

        if self.grades.is_empty() {
            return Err(AppError::Input(
                "at least one --grade subject=value is required".to_string(),
            ));
        }

        Ok(ScoreRequest {
            features: ApplicantFeatures {
                exam_year: self.exam_year.unwrap_or_else(current_exam_year),
                birth_year: required(self.birth_year, "birth-year")?,
                sex: required(self.sex, "sex")?,
                region: required(self.region, "region")?,
                settlement_type: required(self.settlement_type, "settlement-type")?,
                institution_type: required(self.institution_type, "institution-type")?,
            },
            grades: self.grades.into_iter().collect(),
        })
    }
}

/// Overrides for the configured blending knobs.
#[derive(Args, Debug, Default, Clone, Copy)]
pub(crate) struct BlendArgs {
    /// Weight of the model score in the balanced scenario, in [0, 1]
    #[arg(long)]
    pub(crate) weight: Option<f64>,
    /// Grade points subtracted in the cautious scenario
    #[arg(long)]
    pub(crate) stress: Option<f64>,
}

impl BlendArgs {
    pub(crate) fn apply(&self, base: &BlendSettings) -> Result<BlendSettings, AppError> {
        Ok(BlendSettings::new(
            self.weight.unwrap_or(base.balance_weight()),
            self.stress.unwrap_or(base.stress_factor()),
        )?)
    }
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct DatasetArgs {
    /// Competition dataset CSV (defaults to NMT_PROGRAMS_CSV)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct FilterArgs {
    /// Keep only these institutions (repeatable)
    #[arg(long = "institution")]
    pub(crate) institutions: Vec<String>,
    /// Keep only these programs (repeatable)
    #[arg(long = "program")]
    pub(crate) programs: Vec<String>,
    /// Keep only these degree levels (repeatable)
    #[arg(long = "degree-level")]
    pub(crate) degree_levels: Vec<String>,
    /// Keep only these entry bases (repeatable)
    #[arg(long = "entry-basis")]
    pub(crate) entry_bases: Vec<String>,
    /// Keep only these study forms (repeatable)
    #[arg(long = "study-form")]
    pub(crate) study_forms: Vec<String>,
    /// Keep only these chance categories, e.g. `--chance high` (repeatable)
    #[arg(long = "chance")]
    pub(crate) chances: Vec<ChanceCategory>,
}

impl FilterArgs {
    pub(crate) fn program_filter(&self) -> ProgramFilter {
        ProgramFilter {
            institutions: self.institutions.clone(),
            programs: self.programs.clone(),
            degree_levels: self.degree_levels.clone(),
            entry_bases: self.entry_bases.clone(),
            study_forms: self.study_forms.clone(),
        }
    }
}

/// Applicant score given directly on the command line; must be a finite number.
pub(crate) fn parse_score(raw: &str) -> Result<f64, String> {
    let score = raw
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|err| format!("failed to parse score '{raw}' ({err})"))?;
    if !score.is_finite() {
        return Err(format!("score must be a finite number, got '{raw}'"));
    }
    Ok(score)
}

pub(crate) fn parse_grade(raw: &str) -> Result<(Subject, f64), String> {
    let (subject, grade) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected subject=grade, got '{raw}'"))?;
    let subject: Subject = subject.parse().map_err(|err| format!("{err}"))?;
    let grade = grade
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|err| format!("failed to parse grade in '{raw}' ({err})"))?;
    Ok((subject, grade))
}
