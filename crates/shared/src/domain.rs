use serde::{Deserialize, Serialize};

/// A single survey question: prompt text plus the choices offered to the
/// respondent. Choices keep their declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
}

/// The immutable survey definition loaded once at startup and shared
/// read-only across all sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyDefinition {
    pub title: String,
    pub instructions: String,
    pub questions: Vec<Question>,
}

impl SurveyDefinition {
    /// Number of questions a respondent must answer to complete the survey.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}
