use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Qualitative admission chance, ordered best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanceCategory {
    AboveMax,
    VeryHigh,
    High,
    Good,
    Satisfactory,
    Average,
    Low,
    VeryLow,
    ExtremelyLow,
    NoProgramData,
    NoApplicantScore,
}

impl ChanceCategory {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::AboveMax,
            Self::VeryHigh,
            Self::High,
            Self::Good,
            Self::Satisfactory,
            Self::Average,
            Self::Low,
            Self::VeryLow,
            Self::ExtremelyLow,
            Self::NoProgramData,
            Self::NoApplicantScore,
        ]
    }

    /// Stable sort and filter order; 0 is the best outcome.
    pub const fn rank(self) -> u8 {
        match self {
            Self::AboveMax => 0,
            Self::VeryHigh => 1,
            Self::High => 2,
            Self::Good => 3,
            Self::Satisfactory => 4,
            Self::Average => 5,
            Self::Low => 6,
            Self::VeryLow => 7,
            Self::ExtremelyLow => 8,
            Self::NoProgramData => 9,
            Self::NoApplicantScore => 10,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::AboveMax => "above_max",
            Self::VeryHigh => "very_high",
            Self::High => "high",
            Self::Good => "good",
            Self::Satisfactory => "satisfactory",
            Self::Average => "average",
            Self::Low => "low",
            Self::VeryLow => "very_low",
            Self::ExtremelyLow => "extremely_low",
            Self::NoProgramData => "no_program_data",
            Self::NoApplicantScore => "no_applicant_score",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AboveMax => "Very high (above max)",
            Self::VeryHigh => "Very high",
            Self::High => "High",
            Self::Good => "Good",
            Self::Satisfactory => "Satisfactory",
            Self::Average => "Average (competitive)",
            Self::Low => "Low (borderline)",
            Self::VeryLow => "Very low",
            Self::ExtremelyLow => "Extremely low",
            Self::NoProgramData => "N/A (no program data)",
            Self::NoApplicantScore => "N/A (no applicant score)",
        }
    }

    /// Label shown by the Ukrainian-language dashboard.
    pub const fn label_uk(self) -> &'static str {
        match self {
            Self::AboveMax => "Дуже високий шанс (вище макс.)",
            Self::VeryHigh => "Дуже високий шанс",
            Self::High => "Високий шанс",
            Self::Good => "Хороший шанс",
            Self::Satisfactory => "Задовільний шанс",
            Self::Average => "Середній шанс (конкурсна)",
            Self::Low => "Низький шанс (на межі)",
            Self::VeryLow => "Дуже низький шанс",
            Self::ExtremelyLow => "Вкрай низький шанс",
            Self::NoProgramData => "Н/Д (немає даних по спеціальності)",
            Self::NoApplicantScore => "Н/Д (немає балу абітурієнта)",
        }
    }
}

impl PartialOrd for ChanceCategory {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChanceCategory {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for ChanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChanceCategory {
    type Err = UnknownChanceCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ordered()
            .into_iter()
            .find(|category| category.key() == needle)
            .ok_or_else(|| UnknownChanceCategory(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chance category '{0}'")]
pub struct UnknownChanceCategory(pub String);

/// Classifies `applicant` against a program's historical scores.
///
/// Thresholds are checked from the top down and the first match wins. A NaN
/// program statistic counts as missing.
pub fn classify(
    applicant: Option<f64>,
    min_score: Option<f64>,
    mean_score: Option<f64>,
    max_score: Option<f64>,
) -> ChanceCategory {
    let Some(score) = applicant else {
        return ChanceCategory::NoApplicantScore;
    };

    let present = |value: Option<f64>| value.filter(|v| !v.is_nan());
    let (Some(min), Some(mean), Some(max)) =
        (present(min_score), present(mean_score), present(max_score))
    else {
        return ChanceCategory::NoProgramData;
    };

    if score >= max {
        ChanceCategory::AboveMax
    } else if score >= mean + (max - mean) * 0.75 {
        ChanceCategory::VeryHigh
    } else if score >= mean + (max - mean) * 0.25 {
        ChanceCategory::High
    } else if score >= mean {
        ChanceCategory::Good
    } else if score >= min + (mean - min) * 0.75 {
        ChanceCategory::Satisfactory
    } else if score >= min {
        ChanceCategory::Average
    } else if score >= min * 0.95 {
        ChanceCategory::Low
    } else if score >= min * 0.90 {
        ChanceCategory::VeryLow
    } else {
        ChanceCategory::ExtremelyLow
    }
}
