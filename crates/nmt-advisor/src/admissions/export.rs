use super::columns::ProgramColumns;
use super::stats::ProgramCatalog;
use super::DatasetError;
use std::io::Write;

/// Writes the catalog as CSV under the dataset's own header names, so the
/// output can be fed back through the importer unchanged.
pub fn write_catalog<W: Write>(
    writer: W,
    catalog: &ProgramCatalog,
    columns: &ProgramColumns,
) -> Result<(), DatasetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = vec![columns.institution.as_str(), columns.program.as_str()];
    header.extend(
        catalog
            .attributes
            .iter()
            .map(|&attribute| columns.attribute(attribute)),
    );
    header.extend([
        columns.min_score.as_str(),
        columns.mean_score.as_str(),
        columns.max_score.as_str(),
    ]);
    csv_writer.write_record(&header)?;

    for stats in &catalog.programs {
        let mut record: Vec<String> = vec![stats.key.institution.clone(), stats.key.program.clone()];
        record.extend(catalog.attributes.iter().map(|&attribute| {
            stats
                .key
                .attribute(attribute)
                .unwrap_or_default()
                .to_string()
        }));
        record.extend([
            stats.min_score.to_string(),
            stats.mean_score.to_string(),
            stats.max_score.to_string(),
        ]);
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}
