//! Sleep-training methods and the rules that pick one.
//!
//! [`select`] turns a completed assessment into a [`RecommendedMethod`]: the
//! method id from the decision tree in [`selector`], plus the instructional
//! bundle from [`content`] rendered with the baby's name.

pub mod content;
pub mod selector;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use selector::{select, select_method_id, SelectionInput, FERBER_CHECK_IN_INTERVALS};

/// One of the five supported methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodId {
    Fading,
    Chair,
    Pupd,
    Ferber,
    Extinction,
}

impl MethodId {
    pub const ALL: [MethodId; 5] = [
        MethodId::Fading,
        MethodId::Chair,
        MethodId::Pupd,
        MethodId::Ferber,
        MethodId::Extinction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodId::Fading => "fading",
            MethodId::Chair => "chair",
            MethodId::Pupd => "pupd",
            MethodId::Ferber => "ferber",
            MethodId::Extinction => "extinction",
        }
    }

    /// Whether night 2 is framed as an extinction burst for this method.
    pub fn expects_night_two_burst(&self) -> bool {
        matches!(self, MethodId::Ferber | MethodId::Extinction | MethodId::Pupd)
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodId {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MethodId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| crate::error::ValidationError::UnknownTag {
                kind: "method",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Gentle,
    Moderate,
    Direct,
}

/// Static explanatory text shown alongside a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Science {
    pub summary: String,
    pub key_points: Vec<String>,
    pub why_it_works: String,
}

/// A method with its content rendered for one baby.
///
/// Derived on demand from an assessment and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedMethod {
    pub id: MethodId,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub typical_duration: String,
    pub how_it_works: Vec<String>,
    pub what_to_expect: Vec<String>,
    pub night_one_instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_intervals: Option<Vec<u32>>,
    pub science: Science,
    /// Extra notes driven by the assessment (partner, medical).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_id_string_forms_agree() {
        for id in MethodId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            assert_eq!(id.as_str().parse::<MethodId>().unwrap(), id);
        }
        assert!("cry-it-out".parse::<MethodId>().is_err());
    }

    #[test]
    fn burst_framing_methods() {
        assert!(MethodId::Ferber.expects_night_two_burst());
        assert!(MethodId::Pupd.expects_night_two_burst());
        assert!(!MethodId::Fading.expects_night_two_burst());
        assert!(!MethodId::Chair.expects_night_two_burst());
    }
}
