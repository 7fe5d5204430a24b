//! Interview session persistence.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::interview::models::{AnswerEvaluation, Difficulty, GeneratedQuestion, InterviewStatus};
use crate::interview::summary::{latest_answers, session_score};
use crate::models::interview::{InterviewAnswerRow, InterviewRow};

pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub domain: &'a str,
    pub difficulty: Difficulty,
    pub questions: &'a [GeneratedQuestion],
}

/// `session_<unix-millis>_<user id>`
pub fn session_id_for(user_id: Uuid, at: DateTime<Utc>) -> String {
    format!("session_{}_{}", at.timestamp_millis(), user_id)
}

pub async fn create_session(
    pool: &PgPool,
    session: NewSession<'_>,
) -> Result<InterviewRow, sqlx::Error> {
    let session_id = session_id_for(session.user_id, Utc::now());

    let row = sqlx::query_as::<_, InterviewRow>(
        r#"
        INSERT INTO interviews (id, user_id, session_id, domain, difficulty, questions, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(session.user_id)
    .bind(&session_id)
    .bind(session.domain)
    .bind(session.difficulty.as_str())
    .bind(Json(session.questions))
    .bind(InterviewStatus::InProgress.as_str())
    .fetch_one(pool)
    .await?;

    info!(
        user_id = %session.user_id,
        session_id = %row.session_id,
        questions = session.questions.len(),
        "Created interview session"
    );
    Ok(row)
}

/// Looks a session up by its public id, scoped to its owner.
pub async fn find_session(
    pool: &PgPool,
    user_id: Uuid,
    session_id: &str,
) -> Result<Option<InterviewRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewRow>(
        "SELECT * FROM interviews WHERE session_id = $1 AND user_id = $2",
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// All sessions of a user, newest first.
pub async fn list_sessions(pool: &PgPool, user_id: Uuid) -> Result<Vec<InterviewRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewRow>(
        "SELECT * FROM interviews WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Appends to the session's answer log while the session is in progress.
/// Existing answers are never updated. `None` means the session has left
/// `in_progress`; the share lock makes a concurrent completion wait for this insert.
pub async fn append_answer(
    pool: &PgPool,
    interview_id: Uuid,
    question_id: i32,
    answer: &str,
    evaluation: &AnswerEvaluation,
) -> Result<Option<InterviewAnswerRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewAnswerRow>(
        r#"
        INSERT INTO interview_answers (id, interview_id, question_id, answer, evaluation)
        SELECT $1, $2, $3, $4, $5
        WHERE EXISTS (
            SELECT 1 FROM interviews WHERE id = $2 AND status = $6 FOR SHARE
        )
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(interview_id)
    .bind(question_id)
    .bind(answer)
    .bind(Json(evaluation))
    .bind(InterviewStatus::InProgress.as_str())
    .fetch_optional(pool)
    .await
}

/// The answer log in submission order.
pub async fn list_answers(
    pool: &PgPool,
    interview_id: Uuid,
) -> Result<Vec<InterviewAnswerRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewAnswerRow>(
        "SELECT * FROM interview_answers WHERE interview_id = $1 ORDER BY created_at, id",
    )
    .bind(interview_id)
    .fetch_all(pool)
    .await
}

/// Moves an in-progress session to `completed` and fixes its score from the
/// answer log, in one transaction. `None` when the session was not in progress.
pub async fn complete_session(
    pool: &PgPool,
    interview_id: Uuid,
    time_spent: i32,
) -> Result<Option<(InterviewRow, Vec<InterviewAnswerRow>)>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    // The row lock taken here is held until commit, so no answer can be
    // appended between reading the log and storing the score.
    let claimed = sqlx::query_as::<_, InterviewRow>(
        r#"
        UPDATE interviews
        SET status = $1, time_spent = $2, completed_at = $3
        WHERE id = $4 AND status = $5
        RETURNING *
        "#,
    )
    .bind(InterviewStatus::Completed.as_str())
    .bind(time_spent)
    .bind(Utc::now())
    .bind(interview_id)
    .bind(InterviewStatus::InProgress.as_str())
    .fetch_optional(&mut *tx)
    .await?;
    let Some(claimed) = claimed else {
        return Ok(None);
    };

    let answers = sqlx::query_as::<_, InterviewAnswerRow>(
        "SELECT * FROM interview_answers WHERE interview_id = $1 ORDER BY created_at, id",
    )
    .bind(interview_id)
    .fetch_all(&mut *tx)
    .await?;
    let score = session_score(&latest_answers(&claimed.questions, &answers));

    let row = sqlx::query_as::<_, InterviewRow>(
        "UPDATE interviews SET score = $1 WHERE id = $2 RETURNING *",
    )
    .bind(score)
    .bind(interview_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some((row, answers)))
}

/// `None` when the session was not in progress.
pub async fn abandon_session(
    pool: &PgPool,
    interview_id: Uuid,
) -> Result<Option<InterviewRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewRow>(
        "UPDATE interviews SET status = $1 WHERE id = $2 AND status = $3 RETURNING *",
    )
    .bind(InterviewStatus::Abandoned.as_str())
    .bind(interview_id)
    .bind(InterviewStatus::InProgress.as_str())
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_id_format() {
        let user_id = Uuid::nil();
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            session_id_for(user_id, at),
            "session_1700000000123_00000000-0000-0000-0000-000000000000"
        );
    }
}
