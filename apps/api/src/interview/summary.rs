//! Session results: per-answer status, session score, aggregated feedback.

use serde::Serialize;

use crate::interview::models::GeneratedQuestion;
use crate::models::interview::{InterviewAnswerRow, InterviewRow};

const CORRECT_MIN_SCORE: u8 = 8;
const PARTIAL_MIN_SCORE: u8 = 5;
const MAX_HIGHLIGHTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Correct,
    Partial,
    Incorrect,
}

pub fn answer_status(score: u8) -> AnswerStatus {
    if score >= CORRECT_MIN_SCORE {
        AnswerStatus::Correct
    } else if score >= PARTIAL_MIN_SCORE {
        AnswerStatus::Partial
    } else {
        AnswerStatus::Incorrect
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: i32,
    pub question: String,
    pub status: AnswerStatus,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResults {
    pub session_id: String,
    pub status: String,
    /// Percentage.
    pub score: i32,
    pub total_questions: usize,
    pub answered_questions: usize,
    pub correct_answers: usize,
    /// Seconds.
    pub time_spent: i32,
    pub domain: String,
    pub difficulty: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_results: Vec<QuestionResult>,
}

fn find_question(questions: &[GeneratedQuestion], question_id: i32) -> Option<&GeneratedQuestion> {
    questions
        .iter()
        .find(|q| i64::from(q.id) == i64::from(question_id))
}

/// The most recent answer per session question, ordered by first submission.
/// Answers to ids outside `questions` are ignored.
pub fn latest_answers<'a>(
    questions: &[GeneratedQuestion],
    answers: &'a [InterviewAnswerRow],
) -> Vec<&'a InterviewAnswerRow> {
    let mut latest: Vec<&InterviewAnswerRow> = Vec::new();
    for answer in answers {
        if find_question(questions, answer.question_id).is_none() {
            continue;
        }
        match latest.iter_mut().find(|a| a.question_id == answer.question_id) {
            Some(slot) => *slot = answer,
            None => latest.push(answer),
        }
    }
    latest
}

/// Mean evaluation score scaled to a percentage; 0 with no answers.
pub fn session_score(answers: &[&InterviewAnswerRow]) -> i32 {
    if answers.is_empty() {
        return 0;
    }
    let total: u32 = answers.iter().map(|a| u32::from(a.evaluation.score)).sum();
    (total as f64 * 10.0 / answers.len() as f64).round() as i32
}

pub fn summarize(session: &InterviewRow, answers: &[InterviewAnswerRow]) -> InterviewResults {
    let latest = latest_answers(&session.questions, answers);

    let detailed_results: Vec<QuestionResult> = latest
        .iter()
        .filter_map(|a| {
            find_question(&session.questions, a.question_id).map(|q| QuestionResult {
                question_id: a.question_id,
                question: q.text.clone(),
                status: answer_status(a.evaluation.score),
                score: a.evaluation.score,
            })
        })
        .collect();

    let correct_answers = detailed_results
        .iter()
        .filter(|r| r.status == AnswerStatus::Correct)
        .count();

    // Completed sessions keep the score stored at completion time.
    let score = if session.status == "completed" {
        session.score
    } else {
        session_score(&latest)
    };

    InterviewResults {
        session_id: session.session_id.clone(),
        status: session.status.clone(),
        score,
        total_questions: session.questions.len(),
        answered_questions: latest.len(),
        correct_answers,
        time_spent: session.time_spent,
        domain: session.domain.clone(),
        difficulty: session.difficulty.clone(),
        strengths: highlights(latest.iter().flat_map(|a| a.evaluation.strengths.iter())),
        improvements: highlights(latest.iter().flat_map(|a| a.evaluation.improvements.iter())),
        detailed_results,
    }
}

/// First `MAX_HIGHLIGHTS` distinct entries, compared case-insensitively.
fn highlights<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() || seen.iter().any(|s| s.eq_ignore_ascii_case(trimmed)) {
            continue;
        }
        seen.push(trimmed.to_string());
        if seen.len() == MAX_HIGHLIGHTS {
            break;
        }
    }
    seen
}
