//! Question generation and answer evaluation: prompt → text generator → reconciler.
//!
//! Provider failures surface as `AppError::Llm`; unparseable replies never do.

use tracing::info;

use crate::errors::AppError;
use crate::interview::models::{AnswerEvaluation, Difficulty, GeneratedQuestion};
use crate::interview::prompts::{evaluation_prompt, evaluation_system, question_prompt, question_system};
use crate::interview::reconciler::{reconcile_evaluation, reconcile_questions};
use crate::llm_client::TextGenerator;

pub struct QuestionRequest<'a> {
    pub domain: &'a str,
    pub difficulty: Difficulty,
    pub count: u32,
    /// Serialized resume profile, when the session is resume-driven.
    pub resume_data: Option<&'a str>,
}

pub struct EvaluationRequest<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub domain: &'a str,
    pub difficulty: &'a str,
}

pub async fn generate_questions(
    llm: &dyn TextGenerator,
    request: &QuestionRequest<'_>,
) -> Result<Vec<GeneratedQuestion>, AppError> {
    let prompt = question_prompt(
        request.domain,
        request.difficulty,
        request.count,
        request.resume_data,
    );
    let raw = llm
        .generate(&prompt, &question_system())
        .await
        .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;

    let questions = reconcile_questions(&raw, request.domain, request.difficulty, request.count);

    info!(
        domain = request.domain,
        generated = questions.len(),
        "Generated interview questions"
    );
    Ok(questions)
}

pub async fn evaluate_answer(
    llm: &dyn TextGenerator,
    request: &EvaluationRequest<'_>,
) -> Result<AnswerEvaluation, AppError> {
    let prompt = evaluation_prompt(
        request.question,
        request.answer,
        request.domain,
        request.difficulty,
    );
    let raw = llm
        .generate(&prompt, &evaluation_system())
        .await
        .map_err(|e| AppError::Llm(format!("Answer evaluation failed: {e}")))?;

    Ok(reconcile_evaluation(&raw))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{LlmError, TextGenerator};

    /// Replies with fixed text and records the prompts it was given.
    pub struct CannedGenerator {
        reply: Option<String>,
        pub prompts: Mutex<Vec<(String, String)>>,
    }

    impl CannedGenerator {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Every call fails with a timeout.
        pub fn timing_out() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), system.to_string()));
            self.reply.clone().ok_or(LlmError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::CannedGenerator;
    use super::*;
    use crate::interview::reconciler::fallback_evaluation;

    fn request(count: u32) -> QuestionRequest<'static> {
        QuestionRequest {
            domain: "DevOps",
            difficulty: Difficulty::Intermediate,
            count,
            resume_data: None,
        }
    }

    #[tokio::test]
    async fn test_malformed_reply_yields_placeholders() {
        let llm = CannedGenerator::replying("I'm sorry, I can't do that.");
        let questions = generate_questions(&llm, &request(4)).await.unwrap();
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[3].text, "Sample DevOps question 4 at intermediate level");
    }

    #[tokio::test]
    async fn test_valid_reply_is_used() {
        let llm = CannedGenerator::replying(
            r#"```json
            [{"id": 1, "question": "What is a pod?", "domain": "DevOps",
              "difficulty": "intermediate", "expectedAnswer": "Smallest unit", "keywords": ["k8s"], "timeLimit": 180}]
            ```"#,
        );
        let questions = generate_questions(&llm, &request(1)).await.unwrap();
        assert_eq!(questions[0].text, "What is a pod?");

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.starts_with("Generate 1 intermediate level interview questions for DevOps"));
        assert!(prompts[0].1.contains("expert technical interviewer"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_llm_error() {
        let llm = CannedGenerator::timing_out();
        let err = generate_questions(&llm, &request(2)).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[tokio::test]
    async fn test_evaluation_falls_back() {
        let llm = CannedGenerator::replying("Score: 8/10, nice work");
        let evaluation = evaluate_answer(
            &llm,
            &EvaluationRequest {
                question: "What is a pod?",
                answer: "A group of containers",
                domain: "DevOps",
                difficulty: "intermediate",
            },
        )
        .await
        .unwrap();
        assert_eq!(evaluation, fallback_evaluation());
    }

    #[tokio::test]
    async fn test_evaluation_provider_failure() {
        let llm = CannedGenerator::timing_out();
        let result = evaluate_answer(
            &llm,
            &EvaluationRequest {
                question: "q",
                answer: "a",
                domain: "d",
                difficulty: "beginner",
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
