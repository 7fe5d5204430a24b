//! Dashboard statistics derived from a user's interview sessions.
//!
//! Computed on read from the sessions table; nothing is denormalized onto the user.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::interview::InterviewRow;

pub mod handlers;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Completed sessions.
    pub total_interviews: usize,
    /// Mean completed-session score, rounded percentage.
    pub average_score: i32,
    pub total_time_seconds: i64,
    /// Consecutive days with a completed session, ending today or yesterday.
    pub streak: u32,
}

pub fn compute_user_stats(sessions: &[InterviewRow], today: NaiveDate) -> UserStats {
    let completed: Vec<&InterviewRow> = sessions
        .iter()
        .filter(|s| s.status == "completed")
        .collect();

    let average_score = if completed.is_empty() {
        0
    } else {
        let total: i64 = completed.iter().map(|s| i64::from(s.score)).sum();
        (total as f64 / completed.len() as f64).round() as i32
    };

    let active_days: BTreeSet<NaiveDate> = completed
        .iter()
        .map(|s| s.completed_at.unwrap_or(s.created_at).date_naive())
        .collect();

    UserStats {
        total_interviews: completed.len(),
        average_score,
        total_time_seconds: completed.iter().map(|s| i64::from(s.time_spent)).sum(),
        streak: streak_ending(&active_days, today),
    }
}

/// A streak still counts when today has no session yet but yesterday does.
fn streak_ending(active_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut day = if active_days.contains(&today) {
        today
    } else if active_days.contains(&(today - Duration::days(1))) {
        today - Duration::days(1)
    } else {
        return 0;
    };

    let mut streak = 0;
    while active_days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sqlx::types::Json;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn session(status: &str, score: i32, time_spent: i32, completed_day: u32) -> InterviewRow {
        let at = Utc.with_ymd_and_hms(2024, 1, completed_day, 15, 0, 0).unwrap();
        InterviewRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            session_id: format!("session_{completed_day}"),
            domain: "DevOps".to_string(),
            difficulty: "advanced".to_string(),
            questions: Json(vec![]),
            score,
            time_spent,
            status: status.to_string(),
            created_at: at,
            completed_at: (status == "completed").then_some(at),
        }
    }

    #[test]
    fn test_no_sessions() {
        let stats = compute_user_stats(&[], day(15));
        assert_eq!(
            stats,
            UserStats {
                total_interviews: 0,
                average_score: 0,
                total_time_seconds: 0,
                streak: 0,
            }
        );
    }

    #[test]
    fn test_only_completed_sessions_count() {
        let sessions = [
            session("completed", 88, 2700, 15),
            session("completed", 92, 3600, 14),
            session("completed", 76, 2100, 13),
            session("in_progress", 0, 0, 15),
            session("abandoned", 0, 600, 12),
        ];
        let stats = compute_user_stats(&sessions, day(15));
        assert_eq!(stats.total_interviews, 3);
        assert_eq!(stats.average_score, 85);
        assert_eq!(stats.total_time_seconds, 8400);
        assert_eq!(stats.streak, 3);
    }

    #[test]
    fn test_streak_survives_until_end_of_next_day() {
        let sessions = [session("completed", 80, 60, 13), session("completed", 80, 60, 14)];
        assert_eq!(compute_user_stats(&sessions, day(15)).streak, 2);
        assert_eq!(compute_user_stats(&sessions, day(16)).streak, 0);
    }

    #[test]
    fn test_streak_breaks_on_gap() {
        let sessions = [
            session("completed", 80, 60, 10),
            session("completed", 80, 60, 12),
            session("completed", 80, 60, 12),
            session("completed", 80, 60, 13),
        ];
        assert_eq!(compute_user_stats(&sessions, day(13)).streak, 2);
    }
}
