#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::interview::models::{AnswerEvaluation, GeneratedQuestion};

#[derive(Debug, Clone, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: String,
    pub domain: String,
    pub difficulty: String,
    pub questions: Json<Vec<GeneratedQuestion>>,
    /// Percentage, set when the session is completed.
    pub score: i32,
    /// Seconds, reported by the client on completion.
    pub time_spent: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct InterviewAnswerRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub question_id: i32,
    pub answer: String,
    pub evaluation: Json<AnswerEvaluation>,
    pub created_at: DateTime<Utc>,
}
