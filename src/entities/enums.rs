//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Le quattro liste controllate che alimentano i menu a tendina del modulo
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OptionCategory {
    Operators,
    Cantieri,
    Macchine,
    Linee,
}

impl OptionCategory {
    pub const ALL: [OptionCategory; 4] = [
        OptionCategory::Operators,
        OptionCategory::Cantieri,
        OptionCategory::Macchine,
        OptionCategory::Linee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionCategory::Operators => "operators",
            OptionCategory::Cantieri => "cantieri",
            OptionCategory::Macchine => "macchine",
            OptionCategory::Linee => "linee",
        }
    }
}

impl fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionCategory {
    type Err = ();

    /// Case-insensitive, spazi ignorati
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "operators" => Ok(OptionCategory::Operators),
            "cantieri" => Ok(OptionCategory::Cantieri),
            "macchine" => Ok(OptionCategory::Macchine),
            "linee" => Ok(OptionCategory::Linee),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parsing_is_case_insensitive() {
        assert_eq!(" Macchine ".parse(), Ok(OptionCategory::Macchine));
        assert_eq!("OPERATORS".parse(), Ok(OptionCategory::Operators));
        assert!("utenti".parse::<OptionCategory>().is_err());
    }
}
