//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::interview::generator::{
    evaluate_answer, generate_questions, EvaluationRequest, QuestionRequest,
};
use crate::interview::models::{AnswerEvaluation, Difficulty, GeneratedQuestion, InterviewStatus};
use crate::interview::store::{self, NewSession};
use crate::interview::summary::{summarize, InterviewResults};
use crate::models::interview::{InterviewAnswerRow, InterviewRow};
use crate::models::resume::ResumeRow;
use crate::state::AppState;

pub const MAX_QUESTION_COUNT: u32 = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub domain: Option<String>,
    pub difficulty: Option<String>,
    pub question_count: Option<u32>,
    /// Free-form resume data forwarded into the prompt.
    pub resume_data: Option<serde_json::Value>,
    /// Alternatively, a stored resume whose profile is forwarded.
    pub resume_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub questions: Vec<GeneratedQuestion>,
    pub session_id: String,
    pub interview_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub session_id: Option<String>,
    pub question_id: Option<i32>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub domain: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub success: bool,
    pub evaluation: AnswerEvaluation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    /// Seconds spent in the session, as measured by the client.
    pub time_spent: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub question_id: i32,
    pub answer: String,
    pub evaluation: AnswerEvaluation,
    pub timestamp: DateTime<Utc>,
}

impl From<&InterviewAnswerRow> for AnswerView {
    fn from(row: &InterviewAnswerRow) -> Self {
        AnswerView {
            question_id: row.question_id,
            answer: row.answer.clone(),
            evaluation: row.evaluation.0.clone(),
            timestamp: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub interview_id: Uuid,
    pub session_id: String,
    pub domain: String,
    pub difficulty: String,
    pub status: String,
    pub score: i32,
    pub time_spent: i32,
    pub questions: Vec<GeneratedQuestion>,
    pub answers: Vec<AnswerView>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub success: bool,
    pub results: InterviewResults,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub struct ValidGenerate {
    pub domain: String,
    pub difficulty: Difficulty,
    pub count: u32,
}

pub fn validate_generate(request: &GenerateRequest) -> Result<ValidGenerate, AppError> {
    let domain = request.domain.as_deref().map(str::trim).unwrap_or_default();
    let difficulty = request.difficulty.as_deref().map(str::trim).unwrap_or_default();
    let count = request.question_count.unwrap_or(0);
    if domain.is_empty() || difficulty.is_empty() || count == 0 {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }
    if count > MAX_QUESTION_COUNT {
        return Err(AppError::Validation(format!(
            "questionCount must be between 1 and {MAX_QUESTION_COUNT}"
        )));
    }
    let difficulty = difficulty.parse::<Difficulty>().map_err(|_| {
        AppError::Validation("difficulty must be one of beginner, intermediate, advanced".to_string())
    })?;

    Ok(ValidGenerate {
        domain: domain.to_string(),
        difficulty,
        count,
    })
}

#[derive(Debug, PartialEq)]
pub struct ValidEvaluate {
    pub session_id: String,
    pub question_id: i32,
    pub question: String,
    pub answer: String,
}

pub fn validate_evaluate(request: &EvaluateRequest) -> Result<ValidEvaluate, AppError> {
    let present = |v: &Option<String>| v.as_deref().filter(|s| !s.trim().is_empty()).map(str::to_string);
    match (
        present(&request.session_id),
        request.question_id,
        present(&request.question),
        present(&request.answer),
    ) {
        (Some(session_id), Some(question_id), Some(question), Some(answer)) => Ok(ValidEvaluate {
            session_id,
            question_id,
            question,
            answer,
        }),
        _ => Err(AppError::Validation("Missing required fields".to_string())),
    }
}

/// Free-form resume data is forwarded as-is when it is a string, as JSON otherwise.
fn resume_data_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn session_not_found(session_id: &str) -> AppError {
    AppError::NotFound(format!("Interview session {session_id} not found"))
}

async fn load_session(
    state: &AppState,
    auth: &AuthUser,
    session_id: &str,
) -> Result<InterviewRow, AppError> {
    store::find_session(&state.db, auth.user_id, session_id)
        .await?
        .ok_or_else(|| session_not_found(session_id))
}

/// Answers must target one of the session's generated questions.
fn require_known_question(session: &InterviewRow, question_id: i32) -> Result<(), AppError> {
    let known = session
        .questions
        .iter()
        .any(|q| i64::from(q.id) == i64::from(question_id));
    if known {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Question {question_id} is not part of this interview session"
        )))
    }
}

/// Maps a conditional state transition that matched no row to a conflict.
fn still_in_progress<T>(outcome: Option<T>) -> Result<T, AppError> {
    outcome.ok_or_else(|| {
        AppError::Conflict("Interview session is no longer in progress".to_string())
    })
}

fn require_in_progress(session: &InterviewRow) -> Result<(), AppError> {
    if session.status == InterviewStatus::InProgress.as_str() {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "Interview session is {}, not in progress",
            session.status
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let valid = validate_generate(&request)?;

    let resume_data = match (request.resume_id, &request.resume_data) {
        (Some(resume_id), _) => {
            let resume = sqlx::query_as::<_, ResumeRow>(
                "SELECT * FROM resumes WHERE id = $1 AND user_id = $2",
            )
            .bind(resume_id)
            .bind(auth.user_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
            Some(serde_json::to_string(&resume.profile.0).map_err(anyhow::Error::from)?)
        }
        (None, Some(value)) if !value.is_null() => Some(resume_data_text(value)),
        _ => None,
    };

    let questions = generate_questions(
        state.llm.as_ref(),
        &QuestionRequest {
            domain: &valid.domain,
            difficulty: valid.difficulty,
            count: valid.count,
            resume_data: resume_data.as_deref(),
        },
    )
    .await?;

    let session = store::create_session(
        &state.db,
        NewSession {
            user_id: auth.user_id,
            domain: &valid.domain,
            difficulty: valid.difficulty,
            questions: &questions,
        },
    )
    .await?;

    Ok(Json(GenerateResponse {
        success: true,
        questions,
        session_id: session.session_id,
        interview_id: session.id,
    }))
}

/// POST /api/v1/interviews/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let valid = validate_evaluate(&request)?;
    let session = load_session(&state, &auth, &valid.session_id).await?;
    require_in_progress(&session)?;
    require_known_question(&session, valid.question_id)?;

    let domain = request
        .domain
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(&session.domain);
    let difficulty = request
        .difficulty
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(&session.difficulty);

    let evaluation = evaluate_answer(
        state.llm.as_ref(),
        &EvaluationRequest {
            question: &valid.question,
            answer: &valid.answer,
            domain,
            difficulty,
        },
    )
    .await?;

    let appended = store::append_answer(
        &state.db,
        session.id,
        valid.question_id,
        &valid.answer,
        &evaluation,
    )
    .await?;
    still_in_progress(appended)?;

    Ok(Json(EvaluateResponse {
        success: true,
        evaluation,
    }))
}

/// GET /api/v1/interviews/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = load_session(&state, &auth, &session_id).await?;
    let answers = store::list_answers(&state.db, session.id).await?;

    Ok(Json(SessionResponse {
        success: true,
        session: SessionView {
            interview_id: session.id,
            session_id: session.session_id,
            domain: session.domain,
            difficulty: session.difficulty,
            status: session.status,
            score: session.score,
            time_spent: session.time_spent,
            questions: session.questions.0,
            answers: answers.iter().map(AnswerView::from).collect(),
            created_at: session.created_at,
            completed_at: session.completed_at,
        },
    }))
}

/// POST /api/v1/interviews/:session_id/complete
pub async fn handle_complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
    Json(request): Json<CompleteRequest>,
) -> Result<Json<ResultsResponse>, AppError> {
    let time_spent = request.time_spent.unwrap_or(0);
    if time_spent < 0 {
        return Err(AppError::Validation("timeSpent cannot be negative".to_string()));
    }

    let session = load_session(&state, &auth, &session_id).await?;
    require_in_progress(&session)?;

    let (session, answers) =
        still_in_progress(store::complete_session(&state.db, session.id, time_spent).await?)?;

    tracing::info!(
        user_id = %auth.user_id,
        session_id = %session.session_id,
        score = session.score,
        "Interview session completed"
    );

    Ok(Json(ResultsResponse {
        success: true,
        results: summarize(&session, &answers),
    }))
}

/// POST /api/v1/interviews/:session_id/abandon
pub async fn handle_abandon(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = load_session(&state, &auth, &session_id).await?;
    require_in_progress(&session)?;
    let session = still_in_progress(store::abandon_session(&state.db, session.id).await?)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "sessionId": session.session_id,
        "status": session.status,
    })))
}

/// GET /api/v1/interviews/:session_id/results
pub async fn handle_results(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<ResultsResponse>, AppError> {
    let session = load_session(&state, &auth, &session_id).await?;
    let answers = store::list_answers(&state.db, session.id).await?;

    Ok(Json(ResultsResponse {
        success: true,
        results: summarize(&session, &answers),
    }))
}
