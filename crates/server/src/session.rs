//! Per-session progress, keyed by a UUID carried in a cookie.
//!
//! The store is in-process only; durability across restarts is out of scope.
//! One lock guards the whole map, so a submit is a single atomic
//! read-check-append against the session's progress.

use std::{collections::HashMap, sync::Arc};

use axum::http::{header, HeaderMap};
use shared::{domain::SurveyDefinition, error::FlowError};
use survey_flow::Submitted;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "survey_session";

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, Vec<String>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or reset the progress for a session. Always leaves the session
    /// with an empty answer list.
    pub async fn reset(&self, session: Uuid) {
        let mut sessions = self.inner.lock().await;
        let progress = sessions.entry(session).or_default();
        survey_flow::start(progress);
    }

    /// Snapshot of the recorded answers, or `None` when the session has
    /// never started the survey.
    pub async fn answers(&self, session: Option<Uuid>) -> Option<Vec<String>> {
        let sessions = self.inner.lock().await;
        session.and_then(|id| sessions.get(&id).cloned())
    }

    /// Record an answer for the session under a single lock acquisition.
    pub async fn submit(
        &self,
        session: Option<Uuid>,
        survey: &SurveyDefinition,
        answer: &str,
        restrict_to_choices: bool,
    ) -> Result<Submitted, FlowError> {
        let mut sessions = self.inner.lock().await;
        let progress = session.and_then(|id| sessions.get_mut(&id));
        survey_flow::submit_answer(survey, progress, answer, restrict_to_choices)
    }
}

/// Pull the session id out of the request's `Cookie` header, if any.
pub fn session_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

/// `Set-Cookie` value binding the session id to the whole site.
pub fn session_cookie(session: Uuid) -> String {
    format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use shared::domain::Question;

    use super::*;

    fn survey() -> SurveyDefinition {
        SurveyDefinition {
            title: "t".into(),
            instructions: "i".into(),
            questions: vec![Question {
                prompt: "q".into(),
                choices: vec!["Yes".into()],
            }],
        }
    }

    #[test]
    fn cookie_value_round_trips_through_headers() {
        let session = Uuid::new_v4();
        let cookie = session_cookie(session);
        let pair = cookie.split(';').next().expect("cookie pair");

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("other=1; {pair}")).expect("header"),
        );
        assert_eq!(session_from_headers(&headers), Some(session));
    }

    #[test]
    fn missing_or_malformed_cookie_yields_no_session() {
        assert_eq!(session_from_headers(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("survey_session=not-a-uuid"),
        );
        assert_eq!(session_from_headers(&headers), None);
    }

    #[tokio::test]
    async fn reset_overwrites_existing_progress() {
        let store = SessionStore::new();
        let session = Uuid::new_v4();
        let survey = survey();

        store.reset(session).await;
        store
            .submit(Some(session), &survey, "Yes", false)
            .await
            .expect("accepted");
        assert_eq!(
            store.answers(Some(session)).await,
            Some(vec!["Yes".to_string()])
        );

        store.reset(session).await;
        assert_eq!(store.answers(Some(session)).await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn submit_without_a_known_session_is_rejected() {
        let store = SessionStore::new();
        let survey = survey();

        let unknown = store.submit(Some(Uuid::new_v4()), &survey, "Yes", false).await;
        assert_eq!(unknown, Err(FlowError::MissingSession));

        let anonymous = store.submit(None, &survey, "Yes", false).await;
        assert_eq!(anonymous, Err(FlowError::MissingSession));
    }
}
