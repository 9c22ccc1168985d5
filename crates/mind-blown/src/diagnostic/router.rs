use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::answers::{AnswerSheet, AnswerValue, Choice, QuestionKey};
use super::catalog::{self, QuestionPrompt};
use super::classifier::{classify, Classification};
use super::flow::{frontier, next_question, Next};
use super::progress::worst_case_remaining;
use super::repository::{SessionId, SessionRecordView, SessionStore};
use super::report::{legend, share_text, LegendEntry, ResultView};
use super::service::DiagnosticService;
use crate::error::AppError;

/// Router builder exposing the catalog, stateless evaluation, and session endpoints.
pub fn diagnostic_router<S>(service: Arc<DiagnosticService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/diagnostic/questions", get(questions_handler))
        .route("/api/v1/diagnostic/levels", get(levels_handler))
        .route("/api/v1/diagnostic/evaluate", post(evaluate_handler))
        .route("/api/v1/diagnostic/sessions", post(start_handler::<S>))
        .route(
            "/api/v1/diagnostic/sessions/:session_id",
            get(session_handler::<S>).delete(finish_handler::<S>),
        )
        .route(
            "/api/v1/diagnostic/sessions/:session_id/answers",
            post(answer_handler::<S>),
        )
        .route(
            "/api/v1/diagnostic/sessions/:session_id/bonus",
            post(bonus_handler::<S>),
        )
        .route(
            "/api/v1/diagnostic/sessions/:session_id/back",
            post(back_handler::<S>),
        )
        .route(
            "/api/v1/diagnostic/sessions/:session_id/reset",
            post(reset_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub answers: AnswerSheet,
    /// Question the caller is on. Defaults to the first unanswered question on the path.
    #[serde(default)]
    pub current: Option<QuestionKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluateResponse {
    pub classification: Classification,
    pub result: ResultView,
    pub next: Next,
    pub worst_case_remaining: u32,
    pub share_text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerRequest {
    pub question: QuestionKey,
    pub value: AnswerValue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BonusRequest {
    pub value: Choice,
}

/// Stateless evaluation of an answer snapshot.
pub fn evaluate(request: &EvaluateRequest) -> EvaluateResponse {
    let answers = &request.answers;
    let next = match request.current {
        Some(current) => next_question(current, answers),
        None => frontier(answers),
    };
    let classification = classify(answers);

    EvaluateResponse {
        result: ResultView::from_classification(&classification),
        share_text: share_text(&classification),
        worst_case_remaining: worst_case_remaining(next, answers),
        next,
        classification,
    }
}

pub(crate) async fn questions_handler() -> Json<Vec<QuestionPrompt>> {
    Json(catalog::questions())
}

pub(crate) async fn levels_handler() -> Json<Vec<LegendEntry>> {
    Json(legend())
}

pub(crate) async fn evaluate_handler(
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let Json(request) = payload?;
    Ok(Json(evaluate(&request)))
}

pub(crate) async fn start_handler<S>(
    State(service): State<Arc<DiagnosticService<S>>>,
) -> Result<(StatusCode, Json<SessionRecordView>), AppError>
where
    S: SessionStore + 'static,
{
    let record = service.start()?;
    Ok((StatusCode::CREATED, Json(record.view())))
}

pub(crate) async fn session_handler<S>(
    State(service): State<Arc<DiagnosticService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionRecordView>, AppError>
where
    S: SessionStore + 'static,
{
    let record = service.get(&SessionId(session_id))?;
    Ok(Json(record.view()))
}

pub(crate) async fn answer_handler<S>(
    State(service): State<Arc<DiagnosticService<S>>>,
    Path(session_id): Path<String>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<SessionRecordView>, AppError>
where
    S: SessionStore + 'static,
{
    let Json(request) = payload?;
    let record = service.answer(&SessionId(session_id), request.question, request.value)?;
    Ok(Json(record.view()))
}

pub(crate) async fn bonus_handler<S>(
    State(service): State<Arc<DiagnosticService<S>>>,
    Path(session_id): Path<String>,
    payload: Result<Json<BonusRequest>, JsonRejection>,
) -> Result<Json<SessionRecordView>, AppError>
where
    S: SessionStore + 'static,
{
    let Json(request) = payload?;
    let record = service.answer_bonus(&SessionId(session_id), request.value)?;
    Ok(Json(record.view()))
}

pub(crate) async fn back_handler<S>(
    State(service): State<Arc<DiagnosticService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionRecordView>, AppError>
where
    S: SessionStore + 'static,
{
    let record = service.back(&SessionId(session_id))?;
    Ok(Json(record.view()))
}

pub(crate) async fn reset_handler<S>(
    State(service): State<Arc<DiagnosticService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionRecordView>, AppError>
where
    S: SessionStore + 'static,
{
    let record = service.reset(&SessionId(session_id))?;
    Ok(Json(record.view()))
}

pub(crate) async fn finish_handler<S>(
    State(service): State<Arc<DiagnosticService<S>>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: SessionStore + 'static,
{
    service.finish(&SessionId(session_id))?;
    Ok(StatusCode::NO_CONTENT)
}
