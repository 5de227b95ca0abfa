use super::chance::{classify, ChanceCategory};
use super::columns::ProgramAttribute;
use super::stats::{ProgramCatalog, ProgramStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Narrowing applied before chances are computed. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramFilter {
    #[serde(default)]
    pub institutions: Vec<String>,
    #[serde(default)]
    pub programs: Vec<String>,
    #[serde(default)]
    pub degree_levels: Vec<String>,
    #[serde(default)]
    pub entry_bases: Vec<String>,
    #[serde(default)]
    pub study_forms: Vec<String>,
}

impl ProgramFilter {
    fn values(&self, attribute: ProgramAttribute) -> &[String] {
        match attribute {
            ProgramAttribute::DegreeLevel => &self.degree_levels,
            ProgramAttribute::EntryBasis => &self.entry_bases,
            ProgramAttribute::StudyForm => &self.study_forms,
        }
    }

    /// Attribute filters are skipped when the catalog has no such column.
    pub fn matches(&self, catalog: &ProgramCatalog, stats: &ProgramStats) -> bool {
        let allowed = |values: &[String], candidate: &str| {
            values.is_empty() || values.iter().any(|value| value == candidate)
        };

        if !allowed(self.institutions.as_slice(), stats.key.institution.as_str())
            || !allowed(self.programs.as_slice(), stats.key.program.as_str())
        {
            return false;
        }

        catalog.attributes.iter().all(|&attribute| {
            allowed(
                self.values(attribute),
                stats.key.attribute(attribute).unwrap_or_default(),
            )
        })
    }
}

/// One program as presented to the applicant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChanceRow {
    pub institution: String,
    pub program: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_basis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_form: Option<String>,
    pub min_score: f64,
    pub mean_score: f64,
    pub max_score: f64,
    pub category: ChanceCategory,
    pub category_label: &'static str,
    pub category_label_uk: &'static str,
    pub rank: u8,
}

impl ChanceRow {
    fn new(stats: &ProgramStats, category: ChanceCategory) -> Self {
        Self {
            institution: stats.key.institution.clone(),
            program: stats.key.program.clone(),
            degree_level: stats.key.degree_level.clone(),
            entry_basis: stats.key.entry_basis.clone(),
            study_form: stats.key.study_form.clone(),
            min_score: stats.min_score,
            mean_score: stats.mean_score,
            max_score: stats.max_score,
            category,
            category_label: category.label(),
            category_label_uk: category.label_uk(),
            rank: category.rank(),
        }
    }
}

/// Result of a chance analysis over a catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChanceReport {
    pub applicant_score: Option<f64>,
    pub rows: Vec<ChanceRow>,
}

impl ChanceReport {
    /// Number of rows per category, best category first.
    pub fn category_counts(&self) -> BTreeMap<ChanceCategory, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn best_category(&self) -> Option<ChanceCategory> {
        self.rows.first().map(|row| row.category)
    }
}

/// Classifies every program passing `filter`, keeps the requested categories
/// (all when `categories` is empty) and orders rows by rank, institution, program.
pub fn analyze_chances(
    applicant_score: Option<f64>,
    catalog: &ProgramCatalog,
    filter: &ProgramFilter,
    categories: &[ChanceCategory],
) -> ChanceReport {
    let mut rows: Vec<ChanceRow> = catalog
        .programs
        .iter()
        .filter(|stats| filter.matches(catalog, stats))
        .map(|stats| {
            let category = classify(
                applicant_score,
                Some(stats.min_score),
                Some(stats.mean_score),
                Some(stats.max_score),
            );
            ChanceRow::new(stats, category)
        })
        .filter(|row| categories.is_empty() || categories.contains(&row.category))
        .collect();

    sort_rows(&mut rows);

    ChanceReport {
        applicant_score,
        rows,
    }
}

/// Stable ordering by rank, then institution, then program.
pub fn sort_rows(rows: &mut [ChanceRow]) {
    rows.sort_by(|left, right| {
        left.rank
            .cmp(&right.rank)
            .then_with(|| left.institution.cmp(&right.institution))
            .then_with(|| left.program.cmp(&right.program))
    });
}
