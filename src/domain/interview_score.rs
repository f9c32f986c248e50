use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MIN_RUBRIC_SCORE: u8 = 1;
pub const MAX_RUBRIC_SCORE: u8 = 5;

/// Structured assessment of a whole interview.
///
/// Serializes as `{"q1": {...}, "q2": {...}, ..., "overall": {...}}`, the
/// same shape the scoring rubric asks the model to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewScore {
    pub overall: OverallAssessment,
    #[serde(flatten)]
    pub questions: BTreeMap<String, QuestionScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub score: u8,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    pub communication_clarity: u8,
    pub sales_mindset_ownership: u8,
    pub resilience_learning: u8,
    pub role_motivation: u8,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Yes")]
    StrongYes,
    Yes,
    Maybe,
    No,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreValidationError {
    #[error("{field} score {value} outside the 1..=5 rubric scale")]
    OutOfRange { field: String, value: u8 },
    #[error("missing score for question {0}")]
    MissingQuestion(String),
}

impl InterviewScore {
    /// Checks every score against the rubric scale and that each expected
    /// question key (`q1`..`qN`) is present.
    pub fn validate(&self, question_count: usize) -> Result<(), ScoreValidationError> {
        for n in 1..=question_count {
            let key = format!("q{}", n);
            if !self.questions.contains_key(&key) {
                return Err(ScoreValidationError::MissingQuestion(key));
            }
        }

        let overall = &self.overall;
        let dimensions = [
            ("communication_clarity", overall.communication_clarity),
            ("sales_mindset_ownership", overall.sales_mindset_ownership),
            ("resilience_learning", overall.resilience_learning),
            ("role_motivation", overall.role_motivation),
        ];
        let questions = self
            .questions
            .iter()
            .map(|(key, q)| (key.as_str(), q.score));

        for (field, value) in dimensions.into_iter().chain(questions) {
            if !(MIN_RUBRIC_SCORE..=MAX_RUBRIC_SCORE).contains(&value) {
                return Err(ScoreValidationError::OutOfRange {
                    field: field.to_string(),
                    value,
                });
            }
        }

        Ok(())
    }
}
