use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Category key assigned to labels the models have never seen.
pub const UNKNOWN_CATEGORY: &str = "unknown";

const SCHOOL_TYPES: &[(&str, &str)] = &[
    ("середня загальноосвітня школа", "general_school"),
    ("навчально-виховний комплекс", "education_complex"),
    ("ліцей", "lyceum"),
    ("спеціалізована школа", "specialized_school"),
    ("науковий ліцей", "science_lyceum"),
    ("гімназія", "gymnasium"),
    ("заклад фахової передвищої освіти", "pre_higher_institution"),
    ("заклад вищої освіти", "higher_education"),
    ("колегіум", "collegium"),
    (
        "заклад професійної (професійно-технічної) освіти",
        "vocational_institution",
    ),
    ("загальноосвітня санаторна школа", "sanatorium_school"),
    ("навчально-виховне об'єднання", "education_association"),
    (
        "ліцей із посиленою військово-фізичною підготовкою",
        "military_physical_lyceum",
    ),
    ("спортивний ліцей", "sports_lyceum"),
    (
        "середня загальноосвітня школа-інтернат",
        "boarding_general_school",
    ),
    ("спеціалізована школа-інтернат", "boarding_special_school"),
    ("спеціальна загальноосвітня школа", "special_general_school"),
    ("колегіум/колеж", "collegium_college"),
    (
        "військовий (військово-морський, військово-спортивний) ліцей",
        "military_lyceum",
    ),
    ("колеж", "college"),
    ("вечірня (змінна) школа", "evening_school"),
    (
        "спеціальна загальноосвітня школа-інтернат",
        "special_boarding_school",
    ),
    ("професійний ліцей відповідного профілю", "vocational_lyceum"),
    ("початкова школа", "primary_school"),
    ("Пенітенціарна установа", "penitentiary_institution"),
    ("мистецький ліцей", "art_lyceum"),
    ("спеціальна школа", "special_school"),
    (
        "вищий навчальний заклад III-IV рівнів акредитації",
        "higher_edu_lvl_3_4",
    ),
    ("навчально-реабілітаційний центр", "rehab_center"),
    ("школа соціальної реабілітації", "social_rehab_school"),
    (
        "професійний коледж (коледж) спортивного профілю",
        "sports_vocational_college",
    ),
];

const SETTLEMENT_TYPES: &[(&str, &str)] = &[
    ("обласний центр", "regional_center"),
    ("місто", "city"),
    ("село", "village"),
    ("смт", "urban_village"),
    ("інше", "other"),
];

const REGIONS: &[(&str, &str)] = &[
    ("Миколаївська область", "mykolaiv"),
    ("Черкаська область", "cherkasy"),
    ("Чернігівська область", "chernihiv"),
    ("Запорізька область", "zaporizhzhia"),
    ("Луганська область", "luhansk"),
    ("Рівненська область", "rivne"),
    ("Одеська область", "odesa"),
    ("Київська область", "kyiv_region"),
    ("Вінницька область", "vinnytsia"),
    ("Тернопільська область", "ternopil"),
    ("Дніпропетровська область", "dnipropetrovsk"),
    ("м.Київ", "kyiv_city"),
    ("Львівська область", "lviv"),
    ("Хмельницька область", "khmelnytskyi"),
    ("Харківська область", "kharkiv"),
    ("Кіровоградська область", "kirovohrad"),
    ("Чернівецька область", "chernivtsi"),
    ("Волинська область", "volyn"),
    ("Івано-Франківська область", "ivano_frankivsk"),
    ("Донецька область", "donetsk"),
    ("Полтавська область", "poltava"),
    ("Херсонська область", "kherson"),
    ("Закарпатська область", "zakarpattia"),
    ("Сумська область", "sumy"),
    ("Житомирська область", "zhytomyr"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Numeric encoding the models were trained with.
    pub const fn code(self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }
}

impl FromStr for Sex {
    type Err = FeatureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "male" | "m" | "чоловіча" => Ok(Self::Male),
            "female" | "f" | "жіноча" => Ok(Self::Female),
            _ => Err(FeatureError::UnknownSex(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error("unrecognized sex '{0}' (expected male or female)")]
    UnknownSex(String),
}

/// Raw applicant answers, as collected from the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantFeatures {
    pub exam_year: i32,
    pub birth_year: i32,
    pub sex: Sex,
    pub region: String,
    pub settlement_type: String,
    pub institution_type: String,
}

impl ApplicantFeatures {
    pub fn encode(&self) -> EncodedFeatures {
        EncodedFeatures {
            region: lookup(REGIONS, &self.region),
            settlement_type: lookup(SETTLEMENT_TYPES, &self.settlement_type),
            institution_type: lookup(SCHOOL_TYPES, &self.institution_type),
            sex: self.sex.code(),
            age: self.exam_year - self.birth_year,
        }
    }
}

/// Model-ready view of [`ApplicantFeatures`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedFeatures {
    pub region: &'static str,
    pub settlement_type: &'static str,
    pub institution_type: &'static str,
    pub sex: u8,
    pub age: i32,
}

/// Accepts either the dashboard label or the category key itself.
fn lookup(table: &'static [(&'static str, &'static str)], value: &str) -> &'static str {
    let trimmed = value.trim();
    table
        .iter()
        .find(|(label, key)| *label == trimmed || *key == trimmed)
        .map(|(_, key)| *key)
        .unwrap_or(UNKNOWN_CATEGORY)
}

/// Exam sessions run in the calendar year the applicant sits them.
pub fn current_exam_year() -> i32 {
    chrono::Local::now().year()
}

pub fn region_labels() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|(label, _)| *label)
}

pub fn settlement_type_labels() -> impl Iterator<Item = &'static str> {
    SETTLEMENT_TYPES.iter().map(|(label, _)| *label)
}

pub fn institution_type_labels() -> impl Iterator<Item = &'static str> {
    SCHOOL_TYPES.iter().map(|(label, _)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant() -> ApplicantFeatures {
        ApplicantFeatures {
            exam_year: 2024,
            birth_year: 2007,
            sex: Sex::Female,
            region: "м.Київ".to_string(),
            settlement_type: "обласний центр".to_string(),
            institution_type: "ліцей".to_string(),
        }
    }

    #[test]
    fn encodes_dashboard_labels() {
        let encoded = applicant().encode();
        assert_eq!(encoded.region, "kyiv_city");
        assert_eq!(encoded.settlement_type, "regional_center");
        assert_eq!(encoded.institution_type, "lyceum");
        assert_eq!(encoded.sex, 0);
        assert_eq!(encoded.age, 17);
    }

    #[test]
    fn accepts_category_keys_directly() {
        let mut features = applicant();
        features.region = "lviv".to_string();
        features.institution_type = " gymnasium ".to_string();
        let encoded = features.encode();
        assert_eq!(encoded.region, "lviv");
        assert_eq!(encoded.institution_type, "gymnasium");
    }

    #[test]
    fn unknown_labels_fall_back() {
        let mut features = applicant();
        features.region = "Кримська область".to_string();
        assert_eq!(features.encode().region, UNKNOWN_CATEGORY);
    }

    #[test]
    fn parses_sex_in_both_languages() {
        assert_eq!("Чоловіча".parse::<Sex>(), Ok(Sex::Male));
        assert_eq!("F".parse::<Sex>(), Ok(Sex::Female));
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn label_listings_are_complete() {
        assert_eq!(region_labels().count(), 25);
        assert_eq!(settlement_type_labels().count(), 5);
        assert_eq!(institution_type_labels().count(), 31);
    }
}
