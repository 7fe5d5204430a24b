//! AI Exchange Reconciler: turns whatever text the model returned into a
//! well-typed value.
//!
//! Parsing yields `Reconciled::Parsed` or `Reconciled::Malformed`; fallback
//! values are built only in the `Malformed` branch. A parse failure is never an
//! error for the caller, only a warning in the log. Synchronous, no I/O.

use serde::Deserialize;
use tracing::warn;

use crate::interview::models::{
    AnswerEvaluation, Difficulty, GeneratedQuestion, DEFAULT_TIME_LIMIT_SECONDS,
};
use crate::llm_client::strip_json_fences;

const MAX_SCORE: u8 = 10;

/// Outcome of parsing a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled<T> {
    Parsed(T),
    /// Carries the raw reply for diagnostics.
    Malformed(String),
}

impl<T> Reconciled<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Reconciled::Parsed(_))
    }

    /// Returns the parsed value, or builds one from the raw reply.
    pub fn or_fallback(self, fallback: impl FnOnce(&str) -> T) -> T {
        match self {
            Reconciled::Parsed(value) => value,
            Reconciled::Malformed(raw) => fallback(&raw),
        }
    }
}

/// Accepts either a bare array or `{"questions": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsPayload {
    List(Vec<GeneratedQuestion>),
    Wrapped { questions: Vec<GeneratedQuestion> },
}

pub fn parse_questions(raw: &str) -> Reconciled<Vec<GeneratedQuestion>> {
    match serde_json::from_str::<QuestionsPayload>(strip_json_fences(raw)) {
        Ok(QuestionsPayload::List(questions) | QuestionsPayload::Wrapped { questions })
            if !questions.is_empty() =>
        {
            Reconciled::Parsed(questions)
        }
        _ => Reconciled::Malformed(raw.to_string()),
    }
}

pub fn parse_evaluation(raw: &str) -> Reconciled<AnswerEvaluation> {
    match serde_json::from_str::<AnswerEvaluation>(strip_json_fences(raw)) {
        Ok(evaluation) if evaluation.score <= MAX_SCORE => Reconciled::Parsed(evaluation),
        _ => Reconciled::Malformed(raw.to_string()),
    }
}

pub fn reconcile_questions(
    raw: &str,
    domain: &str,
    difficulty: Difficulty,
    count: u32,
) -> Vec<GeneratedQuestion> {
    let parsed = parse_questions(raw);
    if !parsed.is_parsed() {
        warn!(domain, count, "Question reply was not valid JSON, using placeholder questions");
    }
    parsed.or_fallback(|_| fallback_questions(domain, difficulty, count))
}

pub fn reconcile_evaluation(raw: &str) -> AnswerEvaluation {
    let parsed = parse_evaluation(raw);
    if !parsed.is_parsed() {
        warn!("Evaluation reply was not valid JSON, using placeholder evaluation");
    }
    parsed.or_fallback(|_| fallback_evaluation())
}

/// Exactly `count` placeholder questions numbered from 1.
pub fn fallback_questions(domain: &str, difficulty: Difficulty, count: u32) -> Vec<GeneratedQuestion> {
    (1..=count)
        .map(|i| GeneratedQuestion {
            id: i,
            text: format!("Sample {domain} question {i} at {difficulty} level"),
            domain: domain.to_string(),
            difficulty,
            expected_answer_outline: "Sample expected answer".to_string(),
            keywords: vec!["sample".to_string(), "keyword".to_string()],
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
        })
        .collect()
}

pub fn fallback_evaluation() -> AnswerEvaluation {
    AnswerEvaluation {
        score: 7,
        strengths: vec!["Good understanding of concepts".to_string()],
        improvements: vec!["Could provide more specific examples".to_string()],
        feedback: "Solid answer with room for improvement".to_string(),
        keywords_covered: vec!["basic concepts".to_string()],
        overall_assessment: "Satisfactory response".to_string(),
    }
}
