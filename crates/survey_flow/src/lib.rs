//! Survey progression state machine.
//!
//! Session progress is an ordered list of answers; the answer at index i
//! belongs to question i. The phase is derived from the list length against
//! the question count, so the current question index can never drift from
//! the recorded answers. All transitions here are pure functions of
//! (survey, progress, input) so they can be tested without the HTTP layer.

use shared::{
    domain::{Question, SurveyDefinition},
    error::FlowError,
};

/// Where a session stands in the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress(usize),
    Completed,
}

/// Derive the phase from recorded progress. `None` means the session has
/// never invoked Start.
pub fn phase(survey: &SurveyDefinition, progress: Option<&[String]>) -> Phase {
    match progress {
        None => Phase::NotStarted,
        Some(answers) if answers.len() >= survey.question_count() => Phase::Completed,
        Some(answers) => Phase::InProgress(answers.len()),
    }
}

/// Begin (or restart) a survey attempt, discarding any recorded answers.
/// Always lands in `InProgress(0)`.
pub fn start(progress: &mut Vec<String>) {
    progress.clear();
}

/// Outcome of asking to display question `qid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPage<'a> {
    /// `qid` matches the current position; render this question.
    Render {
        index: usize,
        question: &'a Question,
    },
    /// No session progress exists; send the respondent to the start page.
    NotStarted,
    /// Every question is answered; completion absorbs all question requests.
    AlreadyComplete,
    /// `qid` is ahead of or behind the current position; snap back to it.
    OutOfOrder { current: usize },
}

pub fn show_question<'a>(
    survey: &'a SurveyDefinition,
    progress: Option<&[String]>,
    qid: usize,
) -> QuestionPage<'a> {
    match phase(survey, progress) {
        Phase::NotStarted => QuestionPage::NotStarted,
        Phase::Completed => QuestionPage::AlreadyComplete,
        Phase::InProgress(current) if qid != current => QuestionPage::OutOfOrder { current },
        Phase::InProgress(current) => match survey.question(current) {
            Some(question) => QuestionPage::Render {
                index: current,
                question,
            },
            // InProgress guarantees current < question_count.
            None => QuestionPage::AlreadyComplete,
        },
    }
}

/// Result of an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// More questions remain; the value is the next question index.
    Next(usize),
    /// That was the final question.
    Complete,
}

/// Append an answer to the session progress.
///
/// The answer is trimmed before any check; a blank submission is rejected
/// rather than stored. With `restrict_to_choices` set, the answer must match
/// one of the current question's declared choices; otherwise any non-empty
/// text is accepted.
pub fn submit_answer(
    survey: &SurveyDefinition,
    progress: Option<&mut Vec<String>>,
    answer: &str,
    restrict_to_choices: bool,
) -> Result<Submitted, FlowError> {
    let Some(progress) = progress else {
        return Err(FlowError::MissingSession);
    };
    let current = progress.len();
    if current >= survey.question_count() {
        return Err(FlowError::AlreadyComplete);
    }

    let answer = answer.trim();
    if answer.is_empty() {
        return Err(FlowError::EmptyAnswer);
    }
    if restrict_to_choices {
        let offered = survey
            .question(current)
            .map(|question| question.choices.as_slice())
            .unwrap_or_default();
        if !offered.iter().any(|choice| choice == answer) {
            return Err(FlowError::NotAChoice);
        }
    }

    progress.push(answer.to_string());
    if progress.len() == survey.question_count() {
        Ok(Submitted::Complete)
    } else {
        Ok(Submitted::Next(progress.len()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
