use super::columns::ProgramAttribute;
use super::parser::{RawProgramRow, RawProgramTable};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Value substituted for a blank cell in a present optional column.
pub const NOT_SPECIFIED: &str = "Не вказано";

/// Grouping key of one program offering.
///
/// `None` attributes mean the source had no such column at all.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProgramKey {
    pub institution: String,
    pub program: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_basis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_form: Option<String>,
}

impl ProgramKey {
    pub fn attribute(&self, attribute: ProgramAttribute) -> Option<&str> {
        match attribute {
            ProgramAttribute::DegreeLevel => self.degree_level.as_deref(),
            ProgramAttribute::EntryBasis => self.entry_basis.as_deref(),
            ProgramAttribute::StudyForm => self.study_form.as_deref(),
        }
    }

    fn attribute_mut(&mut self, attribute: ProgramAttribute) -> &mut Option<String> {
        match attribute {
            ProgramAttribute::DegreeLevel => &mut self.degree_level,
            ProgramAttribute::EntryBasis => &mut self.entry_basis,
            ProgramAttribute::StudyForm => &mut self.study_form,
        }
    }
}

/// Year-averaged competition scores of one program offering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramStats {
    #[serde(flatten)]
    pub key: ProgramKey,
    pub min_score: f64,
    pub mean_score: f64,
    pub max_score: f64,
}

/// Aggregated statistics, one entry per unique key, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgramCatalog {
    pub attributes: Vec<ProgramAttribute>,
    pub programs: Vec<ProgramStats>,
}

impl ProgramCatalog {
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn institutions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .programs
            .iter()
            .map(|stats| stats.key.institution.as_str())
            .collect();
        names.dedup();
        names
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    pub input_rows: usize,
    pub dropped_rows: usize,
}

/// Either a catalog or the explicit "nothing survived parsing" condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgramStatsOutcome {
    Aggregated {
        catalog: ProgramCatalog,
        report: AggregationReport,
    },
    NoValidRows {
        report: AggregationReport,
    },
}

impl ProgramStatsOutcome {
    pub fn report(&self) -> AggregationReport {
        match self {
            Self::Aggregated { report, .. } | Self::NoValidRows { report } => *report,
        }
    }

    pub fn catalog(&self) -> Option<&ProgramCatalog> {
        match self {
            Self::Aggregated { catalog, .. } => Some(catalog),
            Self::NoValidRows { .. } => None,
        }
    }

    pub fn into_catalog(self) -> Option<ProgramCatalog> {
        match self {
            Self::Aggregated { catalog, .. } => Some(catalog),
            Self::NoValidRows { .. } => None,
        }
    }
}

/// Parses a score cell, accepting a comma as the decimal separator.
pub fn parse_score(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Rounds to two decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[derive(Default)]
struct ScoreTotals {
    min: f64,
    mean: f64,
    max: f64,
    count: usize,
}

/// Collapses multi-year rows into one averaged row per program key.
pub fn aggregate(table: &RawProgramTable) -> ProgramStatsOutcome {
    let mut groups: BTreeMap<ProgramKey, ScoreTotals> = BTreeMap::new();
    let mut dropped_rows = 0;

    for row in &table.rows {
        let Some((key, [min, mean, max])) = prepare_row(row, &table.attributes) else {
            dropped_rows += 1;
            continue;
        };

        let totals = groups.entry(key).or_default();
        totals.min += min;
        totals.mean += mean;
        totals.max += max;
        totals.count += 1;
    }

    let report = AggregationReport {
        input_rows: table.rows.len(),
        dropped_rows,
    };
    if dropped_rows > 0 {
        debug!(dropped_rows, "rows with unparseable scores excluded");
    }

    if groups.is_empty() {
        warn!(
            input_rows = report.input_rows,
            "no rows with valid scores remain after parsing"
        );
        return ProgramStatsOutcome::NoValidRows { report };
    }

    let programs = groups
        .into_iter()
        .map(|(key, totals)| {
            let count = totals.count as f64;
            ProgramStats {
                key,
                min_score: round2(totals.min / count),
                mean_score: round2(totals.mean / count),
                max_score: round2(totals.max / count),
            }
        })
        .collect();

    ProgramStatsOutcome::Aggregated {
        catalog: ProgramCatalog {
            attributes: table.attributes.clone(),
            programs,
        },
        report,
    }
}

fn prepare_row(
    row: &RawProgramRow,
    attributes: &[ProgramAttribute],
) -> Option<(ProgramKey, [f64; 3])> {
    let scores = [
        parse_score(&row.min_score)?,
        parse_score(&row.mean_score)?,
        parse_score(&row.max_score)?,
    ];

    let institution = row.institution.trim();
    let program = row.program.trim();
    if institution.is_empty() || program.is_empty() {
        return None;
    }

    let mut key = ProgramKey {
        institution: institution.to_string(),
        program: program.to_string(),
        degree_level: None,
        entry_basis: None,
        study_form: None,
    };
    for &attribute in attributes {
        let value = row
            .attributes
            .get(&attribute)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .unwrap_or(NOT_SPECIFIED);
        *key.attribute_mut(attribute) = Some(value.to_string());
    }

    Some((key, scores))
}
