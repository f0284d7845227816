use thiserror::Error;

/// Why an answer submission was rejected. Every variant maps to a recovery
/// redirect at the HTTP layer rather than an error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("no survey session has been started")]
    MissingSession,
    #[error("the survey is already complete")]
    AlreadyComplete,
    #[error("an answer is required")]
    EmptyAnswer,
    #[error("answer is not one of the offered choices")]
    NotAChoice,
}
