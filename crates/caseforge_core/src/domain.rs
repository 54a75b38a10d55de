//! crates/caseforge_core/src/domain.rs
//!
//! Defines the core data structures for the application: what the user asks the
//! generator for, what the generator hands back, and what gets stored per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Sentinel option value that unlocks a free-text override field.
pub const OTHER: &str = "Other";

//=========================================================================================
// Generation Request
//=========================================================================================

/// Difficulty tier of the requested case study.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "Beginner")]
    Easy,
    #[default]
    #[serde(alias = "Intermediate")]
    Medium,
    #[serde(alias = "Advanced")]
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Easy" | "Beginner" => Ok(Difficulty::Easy),
            "Medium" | "Intermediate" => Ok(Difficulty::Medium),
            "Hard" | "Advanced" => Ok(Difficulty::Hard),
            other => Err(format!("'{}' is not a difficulty level", other)),
        }
    }
}

/// How long the candidate gets for the case study.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeConstraint {
    #[default]
    NoLimit,
    Minutes(u32),
}

impl TimeConstraint {
    pub const NO_LIMIT_LABEL: &'static str = "No Time Limit";
}

impl fmt::Display for TimeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeConstraint::NoLimit => f.write_str(Self::NO_LIMIT_LABEL),
            TimeConstraint::Minutes(n) => write!(f, "{} minutes", n),
        }
    }
}

impl FromStr for TimeConstraint {
    type Err = String;

    /// Accepts the option labels ("No Time Limit", "30 minutes") as well as
    /// bare minute counts ("45").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::NO_LIMIT_LABEL) {
            return Ok(TimeConstraint::NoLimit);
        }
        let digits = s
            .strip_suffix("minutes")
            .or_else(|| s.strip_suffix("minute"))
            .unwrap_or(s)
            .trim();
        match digits.parse::<u32>() {
            Ok(0) => Err("a time constraint needs at least one minute".to_string()),
            Ok(n) => Ok(TimeConstraint::Minutes(n)),
            Err(_) => Err(format!("'{}' is not a time constraint", s)),
        }
    }
}

impl Serialize for TimeConstraint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeConstraint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The parameters collected by the form for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationRequest {
    pub interview_role: String,
    pub industry: String,
    pub custom_interview_role: String,
    pub custom_industry: String,
    pub difficulty: Difficulty,
    pub time_constraint: TimeConstraint,
    pub user_specifications: String,
}

/// The body shape the generator's `POST /generate` expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateEnvelope<T> {
    pub parameters: T,
}

//=========================================================================================
// Generation Result
//=========================================================================================

/// A single question-and-answer pair produced by the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationMetadata {
    pub generated_at: String,
    pub parameters: Value,
    pub case_study_length: usize,
    pub num_qa_pairs: usize,
}

/// What the generator returns. Every field tolerates being absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationResult {
    pub case_study: String,
    pub questions_and_answers: Vec<QaPair>,
    pub metadata: Option<GenerationMetadata>,
}

//=========================================================================================
// Users and Stored Records
//=========================================================================================

/// Opaque subject identifier taken from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A generated case study persisted under its owner's partition.
#[derive(Debug, Clone)]
pub struct CaseStudyRecord {
    pub id: String,
    pub user_id: UserId,
    /// The generator response exactly as it was received.
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

// Represents a tile in the archive view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveItem {
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn difficulty_accepts_both_label_sets() {
        assert_eq!("Beginner".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("Extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn time_constraint_parses_labels_and_minutes() {
        assert_eq!("No Time Limit".parse::<TimeConstraint>(), Ok(TimeConstraint::NoLimit));
        assert_eq!("30 minutes".parse::<TimeConstraint>(), Ok(TimeConstraint::Minutes(30)));
        assert_eq!("45".parse::<TimeConstraint>(), Ok(TimeConstraint::Minutes(45)));
        assert!("0".parse::<TimeConstraint>().is_err());
        assert!("soon".parse::<TimeConstraint>().is_err());
    }

    #[test]
    fn request_serializes_in_camel_case() {
        let request = GenerationRequest {
            interview_role: OTHER.to_string(),
            custom_interview_role: "Chief of Staff".to_string(),
            time_constraint: TimeConstraint::Minutes(15),
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["interviewRole"], "Other");
        assert_eq!(value["customInterviewRole"], "Chief of Staff");
        assert_eq!(value["difficulty"], "Medium");
        assert_eq!(value["timeConstraint"], "15 minutes");
    }

    #[test]
    fn result_tolerates_missing_fields() {
        let result: GenerationResult = serde_json::from_value(json!({
            "case_study": "Body",
        }))
        .unwrap();
        assert_eq!(result.case_study, "Body");
        assert!(result.questions_and_answers.is_empty());
        assert!(result.metadata.is_none());
    }
}
