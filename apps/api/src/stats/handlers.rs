use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::interview::store::list_sessions;
use crate::models::interview::InterviewRow;
use crate::stats::{compute_user_stats, UserStats};
use crate::state::AppState;

const RECENT_SESSIONS: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentInterview {
    pub session_id: String,
    pub domain: String,
    pub difficulty: String,
    pub score: i32,
    pub questions: usize,
    pub time_spent: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&InterviewRow> for RecentInterview {
    fn from(row: &InterviewRow) -> Self {
        RecentInterview {
            session_id: row.session_id.clone(),
            domain: row.domain.clone(),
            difficulty: row.difficulty.clone(),
            score: row.score,
            questions: row.questions.len(),
            time_spent: row.time_spent,
            status: row.status.clone(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    pub stats: UserStats,
    pub recent_interviews: Vec<RecentInterview>,
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let sessions = list_sessions(&state.db, auth.user_id).await?;
    let stats = compute_user_stats(&sessions, Utc::now().date_naive());

    Ok(Json(DashboardResponse {
        success: true,
        stats,
        recent_interviews: sessions
            .iter()
            .take(RECENT_SESSIONS)
            .map(RecentInterview::from)
            .collect(),
    }))
}
