// Interview LLM prompt templates. Placeholders in braces are replaced before sending.

use crate::interview::models::Difficulty;
use crate::llm_client::prompts::{INTERVIEWER_PERSONA, JSON_ONLY_INSTRUCTION};

const QUESTION_SYSTEM_TAIL: &str = "Generate high-quality, relevant interview questions \
    that test both theoretical knowledge and practical skills. \
    Make questions challenging but fair.";

const EVALUATION_SYSTEM_TAIL: &str = "Provide constructive, detailed feedback on interview \
    answers. Be fair but thorough in your evaluation.";

const RESUME_QUESTION_PROMPT: &str = "Based on this resume data: {resume_data}, generate {count} \
    {difficulty} level interview questions for a {domain} role. \
    Focus on the candidate's experience and skills mentioned in the resume.";

const GENERAL_QUESTION_PROMPT: &str = "Generate {count} {difficulty} level interview questions \
    for {domain}. Include a mix of theoretical concepts, practical scenarios, and coding problems.";

const QUESTION_FORMAT: &str = r#"

Format the response as a JSON array with this structure:
[
  {
    "id": 1,
    "question": "Question text here",
    "domain": "{domain}",
    "difficulty": "{difficulty}",
    "expectedAnswer": "Brief expected answer outline",
    "keywords": ["keyword1", "keyword2"],
    "timeLimit": 300
  }
]"#;

const EVALUATION_PROMPT: &str = r#"Evaluate this interview answer:

Question: {question}
Answer: {answer}
Domain: {domain}
Difficulty: {difficulty}

Provide a detailed evaluation including:
1. Score out of 10
2. Strengths in the answer
3. Areas for improvement
4. Specific feedback
5. Keywords covered

Format as JSON:
{
  "score": 8,
  "strengths": ["strength1", "strength2"],
  "improvements": ["improvement1", "improvement2"],
  "feedback": "Detailed feedback text",
  "keywordsCovered": ["keyword1", "keyword2"],
  "overallAssessment": "Brief overall assessment"
}"#;

pub fn question_system() -> String {
    format!("{INTERVIEWER_PERSONA} {QUESTION_SYSTEM_TAIL} {JSON_ONLY_INSTRUCTION}")
}

pub fn evaluation_system() -> String {
    format!("{INTERVIEWER_PERSONA} {EVALUATION_SYSTEM_TAIL} {JSON_ONLY_INSTRUCTION}")
}

/// `resume_data` switches to the resume-focused template.
pub fn question_prompt(
    domain: &str,
    difficulty: Difficulty,
    count: u32,
    resume_data: Option<&str>,
) -> String {
    let template = match resume_data {
        Some(_) => RESUME_QUESTION_PROMPT,
        None => GENERAL_QUESTION_PROMPT,
    };
    let prompt = format!("{template}{QUESTION_FORMAT}")
        .replace("{count}", &count.to_string())
        .replace("{difficulty}", difficulty.as_str())
        .replace("{domain}", domain);
    match resume_data {
        Some(data) => prompt.replace("{resume_data}", data),
        None => prompt,
    }
}

pub fn evaluation_prompt(question: &str, answer: &str, domain: &str, difficulty: &str) -> String {
    // Answer last: user text must not be re-scanned for placeholders.
    EVALUATION_PROMPT
        .replace("{domain}", domain)
        .replace("{difficulty}", difficulty)
        .replace("{question}", question)
        .replace("{answer}", answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_question_prompt() {
        let prompt = question_prompt("DevOps", Difficulty::Advanced, 5, None);
        assert!(prompt.starts_with("Generate 5 advanced level interview questions for DevOps."));
        assert!(prompt.contains(r#""domain": "DevOps""#));
        assert!(prompt.contains(r#""difficulty": "advanced""#));
        assert!(!prompt.contains("{count}"));
        assert!(!prompt.contains("resume data"));
    }

    #[test]
    fn test_resume_question_prompt() {
        let prompt = question_prompt(
            "Frontend Development",
            Difficulty::Beginner,
            3,
            Some(r#"{"skills":["react"]}"#),
        );
        assert!(prompt.starts_with(r#"Based on this resume data: {"skills":["react"]}, generate 3 beginner"#));
        assert!(prompt.contains("for a Frontend Development role"));
    }

    #[test]
    fn test_evaluation_prompt_fills_fields() {
        let prompt = evaluation_prompt("What is Rust?", "A language", "Backend Development", "advanced");
        assert!(prompt.contains("Question: What is Rust?"));
        assert!(prompt.contains("Answer: A language"));
        assert!(prompt.contains("Domain: Backend Development"));
        assert!(prompt.contains("Difficulty: advanced"));
    }

    #[test]
    fn test_answer_text_is_not_treated_as_template() {
        let prompt = evaluation_prompt("Q", "I would use {domain} here", "DevOps", "beginner");
        assert!(prompt.contains("Answer: I would use {domain} here"));
    }

    #[test]
    fn test_system_prompts_demand_json() {
        assert!(question_system().contains("valid JSON only"));
        assert!(evaluation_system().starts_with("You are an expert technical interviewer."));
    }
}
