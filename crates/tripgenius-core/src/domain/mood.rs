use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Travel mood used to pick an activity template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Foodie,
    Adventure,
    Relax,
    Culture,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Foodie, Mood::Adventure, Mood::Relax, Mood::Culture];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Foodie => "foodie",
            Mood::Adventure => "adventure",
            Mood::Relax => "relax",
            Mood::Culture => "culture",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == wanted)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown mood '{}', expected one of: foodie, adventure, relax, culture",
                    s.trim()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foodie", Mood::Foodie)]
    #[case("Adventure", Mood::Adventure)]
    #[case("  RELAX ", Mood::Relax)]
    #[case("culture", Mood::Culture)]
    fn test_parse_mood(#[case] input: &str, #[case] expected: Mood) {
        assert_eq!(input.parse::<Mood>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_mood() {
        let err = "party".parse::<Mood>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("party")));
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Mood::Foodie).unwrap(), "\"foodie\"");
        let mood: Mood = serde_json::from_str("\"culture\"").unwrap();
        assert_eq!(mood, Mood::Culture);
    }
}
