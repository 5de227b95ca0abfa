use super::columns::{ProgramAttribute, ProgramColumns};
use super::DatasetError;
use std::collections::BTreeMap;
use std::io::Read;

/// One untouched competition row; scores are still text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProgramRow {
    pub institution: String,
    pub program: String,
    pub attributes: BTreeMap<ProgramAttribute, String>,
    pub min_score: String,
    pub mean_score: String,
    pub max_score: String,
}

/// Rows plus the optional columns the source actually carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProgramTable {
    pub attributes: Vec<ProgramAttribute>,
    pub rows: Vec<RawProgramRow>,
}

struct ColumnIndex {
    institution: usize,
    program: usize,
    min_score: usize,
    mean_score: usize,
    max_score: usize,
    attributes: Vec<(ProgramAttribute, usize)>,
}

impl ColumnIndex {
    fn resolve(
        headers: &csv::StringRecord,
        columns: &ProgramColumns,
    ) -> Result<Self, DatasetError> {
        let position = |name: &str| headers.iter().position(|header| header == name);

        let missing: Vec<String> = columns
            .required()
            .into_iter()
            .filter(|name| position(*name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns(missing));
        }

        let required = |name: &str| {
            position(name).ok_or_else(|| DatasetError::MissingColumns(vec![name.to_string()]))
        };
        let attributes = ProgramAttribute::ordered()
            .into_iter()
            .filter_map(|attribute| {
                position(columns.attribute(attribute)).map(|index| (attribute, index))
            })
            .collect();

        Ok(Self {
            institution: required(columns.institution.as_str())?,
            program: required(columns.program.as_str())?,
            min_score: required(columns.min_score.as_str())?,
            mean_score: required(columns.mean_score.as_str())?,
            max_score: required(columns.max_score.as_str())?,
            attributes,
        })
    }
}

pub(crate) fn parse_program_table<R: Read>(
    reader: R,
    columns: &ProgramColumns,
) -> Result<RawProgramTable, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(DatasetError::Empty);
    }

    let index = ColumnIndex::resolve(&headers, columns)?;
    let field = |record: &csv::StringRecord, position: usize| -> String {
        record.get(position).unwrap_or_default().to_string()
    };

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let attributes = index
            .attributes
            .iter()
            .map(|&(attribute, position)| (attribute, field(&record, position)))
            .collect();

        rows.push(RawProgramRow {
            institution: field(&record, index.institution),
            program: field(&record, index.program),
            attributes,
            min_score: field(&record, index.min_score),
            mean_score: field(&record, index.mean_score),
            max_score: field(&record, index.max_score),
        });
    }

    Ok(RawProgramTable {
        attributes: index.attributes.iter().map(|&(attribute, _)| attribute).collect(),
        rows,
    })
}
