use serde::{Deserialize, Serialize};

/// Optional descriptive columns of a program offering, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramAttribute {
    DegreeLevel,
    EntryBasis,
    StudyForm,
}

impl ProgramAttribute {
    pub const fn ordered() -> [Self; 3] {
        [Self::DegreeLevel, Self::EntryBasis, Self::StudyForm]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DegreeLevel => "Degree level",
            Self::EntryBasis => "Entry basis",
            Self::StudyForm => "Study form",
        }
    }
}

/// Header names of the historical competition dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramColumns {
    pub institution: String,
    pub program: String,
    pub min_score: String,
    pub mean_score: String,
    pub max_score: String,
    pub degree_level: String,
    pub entry_basis: String,
    pub study_form: String,
}

impl ProgramColumns {
    pub fn attribute(&self, attribute: ProgramAttribute) -> &str {
        match attribute {
            ProgramAttribute::DegreeLevel => &self.degree_level,
            ProgramAttribute::EntryBasis => &self.entry_basis,
            ProgramAttribute::StudyForm => &self.study_form,
        }
    }

    /// Required headers in reporting order.
    pub fn required(&self) -> [&str; 5] {
        [
            &self.institution,
            &self.program,
            &self.min_score,
            &self.mean_score,
            &self.max_score,
        ]
    }
}

impl Default for ProgramColumns {
    /// Headers used by the published competition export.
    fn default() -> Self {
        Self {
            institution: "Назва закладу".to_string(),
            program: "Спеціальність".to_string(),
            min_score: "шк_Мін. бал\n(на загальних підставах)".to_string(),
            mean_score: "шк_Сер. бал\n(на загальних підставах)".to_string(),
            max_score: "шк_Макс. бал\n(на загальних підставах)".to_string(),
            degree_level: "Освітній ступінь".to_string(),
            entry_basis: "Вступ на основі".to_string(),
            study_form: "Форма навчання".to_string(),
        }
    }
}
