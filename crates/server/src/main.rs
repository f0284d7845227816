use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use shared::{domain::SurveyDefinition, error::FlowError};
use survey_flow::{QuestionPage, Submitted};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

mod config;
mod session;
mod views;

use config::{load_settings, load_survey};
use session::{session_cookie, session_from_headers, SessionStore};

#[derive(Clone)]
struct AppState {
    survey: Arc<SurveyDefinition>,
    sessions: SessionStore,
    restrict_to_choices: bool,
}

#[derive(Debug, Deserialize)]
struct AnswerForm {
    #[serde(default)]
    answer: String,
}

#[derive(Debug, Deserialize)]
struct QuestionQuery {
    /// Question id of a rejected out-of-order request, echoed in a notice.
    invalid: Option<usize>,
    /// Submit validation failure being redisplayed ("empty" or "choice").
    error: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let survey = load_survey(&settings.survey_path).map_err(|err| {
        error!(
            path = %settings.survey_path,
            %err,
            "failed to load survey definition; set SURVEY_PATH or survey_path in server.toml"
        );
        err
    })?;
    info!(
        title = %survey.title,
        questions = survey.question_count(),
        "survey definition loaded"
    );

    let state = AppState {
        survey: Arc::new(survey),
        sessions: SessionStore::new(),
        restrict_to_choices: settings.restrict_to_choices,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(show_start))
        .route("/begin", post(begin))
        .route("/answer", post(submit_answer))
        .route("/questions/:qid", get(show_question))
        .route("/complete", get(show_complete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn show_start(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(views::start_page(&state.survey))
}

/// Start (or restart) the survey for this session: progress becomes the
/// empty answer list and the respondent lands on question 0. The session
/// cookie is (re)issued on every begin so a first visit gets one too.
async fn begin(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let session = session_from_headers(&headers).unwrap_or_else(Uuid::new_v4);
    state.sessions.reset(session).await;
    (
        [(header::SET_COOKIE, session_cookie(session))],
        Redirect::to("/questions/0"),
    )
}

async fn show_question(
    State(state): State<Arc<AppState>>,
    Path(qid): Path<usize>,
    Query(query): Query<QuestionQuery>,
    headers: HeaderMap,
) -> Response {
    let session = session_from_headers(&headers);
    let answers = state.sessions.answers(session).await;

    match survey_flow::show_question(&state.survey, answers.as_deref(), qid) {
        QuestionPage::NotStarted => Redirect::to("/").into_response(),
        QuestionPage::AlreadyComplete => Redirect::to("/complete").into_response(),
        QuestionPage::OutOfOrder { current } => {
            warn!(qid, current, "out-of-order question access");
            Redirect::to(&format!("/questions/{current}?invalid={qid}")).into_response()
        }
        QuestionPage::Render { index, question } => {
            let notice = notice_text(&query);
            Html(views::question_page(
                index,
                state.survey.question_count(),
                question,
                notice.as_deref(),
            ))
            .into_response()
        }
    }
}

async fn submit_answer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<AnswerForm>,
) -> Redirect {
    let session = session_from_headers(&headers);
    let submitted = state
        .sessions
        .submit(
            session,
            &state.survey,
            &form.answer,
            state.restrict_to_choices,
        )
        .await;

    match submitted {
        Ok(Submitted::Next(next)) => Redirect::to(&format!("/questions/{next}")),
        Ok(Submitted::Complete) => Redirect::to("/complete"),
        Err(FlowError::MissingSession) => {
            warn!("answer submitted without a started session");
            Redirect::to("/")
        }
        Err(FlowError::AlreadyComplete) => Redirect::to("/complete"),
        Err(err @ (FlowError::EmptyAnswer | FlowError::NotAChoice)) => {
            let current = state
                .sessions
                .answers(session)
                .await
                .map(|answers| answers.len())
                .unwrap_or(0);
            let reason = match err {
                FlowError::NotAChoice => "choice",
                _ => "empty",
            };
            Redirect::to(&format!("/questions/{current}?error={reason}"))
        }
    }
}

async fn show_complete(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(views::completion_page(&state.survey))
}

fn notice_text(query: &QuestionQuery) -> Option<String> {
    if let Some(qid) = query.invalid {
        return Some(format!("Invalid question id: {qid}."));
    }
    match query.error.as_deref() {
        Some("choice") => Some("Please pick one of the offered choices.".to_string()),
        Some(_) => Some("An answer is required.".to_string()),
        None => None,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
