use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// NMT subjects the estimator has models for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Ukrainian,
    Math,
    History,
}

impl Subject {
    pub const fn ordered() -> [Self; 3] {
        [Self::Ukrainian, Self::Math, Self::History]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Ukrainian => "ukrainian",
            Self::Math => "math",
            Self::History => "history",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ukrainian => "Ukrainian Language",
            Self::Math => "Mathematics",
            Self::History => "History of Ukraine",
        }
    }

    /// File name of the model artifact inside the models directory.
    pub const fn model_file(self) -> &'static str {
        match self {
            Self::Ukrainian => "lgbm_model_new.json",
            Self::Math => "lgbm_model_math.json",
            Self::History => "lgbm_model_hist.json",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ukrainian" | "ukr" | "new" => Ok(Self::Ukrainian),
            "math" | "mathematics" => Ok(Self::Math),
            "history" | "hist" => Ok(Self::History),
            _ => Err(UnknownSubject(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subject '{0}' (expected ukrainian, math or history)")]
pub struct UnknownSubject(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_aliases() {
        assert_eq!("Math".parse::<Subject>(), Ok(Subject::Math));
        assert_eq!(" hist ".parse::<Subject>(), Ok(Subject::History));
        assert_eq!("new".parse::<Subject>(), Ok(Subject::Ukrainian));
        assert!("physics".parse::<Subject>().is_err());
    }

    #[test]
    fn ordering_matches_canonical_listing() {
        let mut subjects = vec![Subject::History, Subject::Ukrainian, Subject::Math];
        subjects.sort();
        assert_eq!(subjects, Subject::ordered().to_vec());
    }
}
