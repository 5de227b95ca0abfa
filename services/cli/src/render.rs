use crate::args::{LabelLanguage, OutputFormat};
use nmt_advisor::admissions::{ChanceReport, ChanceRow, ProgramCatalog, ProgramStatsOutcome};
use nmt_advisor::error::AppError;
use nmt_advisor::scoring::ScoreEstimate;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn format_score(score: Option<f64>) -> String {
    score
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

pub(crate) fn render_estimate(estimate: &ScoreEstimate) {
    println!("NMT estimate");
    for result in &estimate.subjects {
        println!(
            "- {} (grade {:.1}): model {:.2} | balanced {:.2} | individual {:.2} | cautious {:.2} | representative {:.2}",
            result.subject.label(),
            result.grade,
            result.model_score,
            result.scenarios.balanced,
            result.scenarios.individual,
            result.scenarios.cautious,
            result.representative,
        );
    }
    if !estimate.diagnostics.is_empty() {
        println!("Warnings:");
        for diagnostic in &estimate.diagnostics {
            println!("  - {}", diagnostic.summary());
        }
    }
    println!("Applicant score: {}", format_score(estimate.applicant_score));
}

pub(crate) fn render_outcome(outcome: &ProgramStatsOutcome) {
    let report = outcome.report();
    match outcome.catalog() {
        Some(catalog) => {
            println!(
                "{} programs at {} institutions aggregated from {} rows ({} dropped)",
                catalog.len(),
                catalog.institutions().len(),
                report.input_rows,
                report.dropped_rows
            );
            render_catalog(catalog);
        }
        None => println!(
            "No rows with valid scores ({} rows read, {} dropped)",
            report.input_rows, report.dropped_rows
        ),
    }
}

/// ` [бакалавр, денна]` for the attributes present, empty when there are none.
fn attribute_suffix<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let values: Vec<&str> = values.into_iter().collect();
    if values.is_empty() {
        String::new()
    } else {
        format!(" [{}]", values.join(", "))
    }
}

fn render_catalog(catalog: &ProgramCatalog) {
    for stats in &catalog.programs {
        let suffix = attribute_suffix(
            catalog
                .attributes
                .iter()
                .filter_map(|&attribute| stats.key.attribute(attribute)),
        );
        println!(
            "- {} / {}{}: min {:.2} | mean {:.2} | max {:.2}",
            stats.key.institution,
            stats.key.program,
            suffix,
            stats.min_score,
            stats.mean_score,
            stats.max_score
        );
    }
}

pub(crate) fn render_chances(report: &ChanceReport, limit: Option<usize>, lang: LabelLanguage) {
    println!("Applicant score: {}", format_score(report.applicant_score));
    if report.rows.is_empty() {
        println!("No programs match the selected filters.");
        return;
    }

    if let Some(best) = report.best_category() {
        println!("Best chance: {}", lang.chance_label(best));
    }
    println!("Programs by category:");
    for (category, count) in report.category_counts() {
        println!("  - {}: {}", lang.chance_label(category), count);
    }

    let shown = limit.unwrap_or(report.rows.len()).min(report.rows.len());
    println!("Top {} of {} programs:", shown, report.rows.len());
    for row in report.rows.iter().take(shown) {
        println!("  {}", chance_line(row, lang));
    }
}

pub(crate) fn chance_line(row: &ChanceRow, lang: LabelLanguage) -> String {
    let suffix = attribute_suffix(
        [&row.degree_level, &row.entry_basis, &row.study_form]
            .into_iter()
            .filter_map(|value| value.as_deref()),
    );
    let label = match lang {
        LabelLanguage::En => row.category_label,
        LabelLanguage::Uk => row.category_label_uk,
    };
    format!(
        "{} / {}{} -> {} (min {:.2}, mean {:.2}, max {:.2})",
        row.institution, row.program, suffix, label, row.min_score, row.mean_score, row.max_score
    )
}

pub(crate) fn emit<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(),
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Text => {
            text();
            Ok(())
        }
    }
}
