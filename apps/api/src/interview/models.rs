use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Question difficulty. Accepted case-insensitively, always emitted lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl InterviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Abandoned => "abandoned",
        }
    }
}

impl FromStr for InterviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(InterviewStatus::InProgress),
            "completed" => Ok(InterviewStatus::Completed),
            "abandoned" => Ok(InterviewStatus::Abandoned),
            other => Err(format!("unknown interview status '{other}'")),
        }
    }
}

/// One generated interview question, in the shape the model is asked to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub id: u32,
    #[serde(rename = "question")]
    pub text: String,
    pub domain: String,
    pub difficulty: Difficulty,
    #[serde(rename = "expectedAnswer")]
    pub expected_answer_outline: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "timeLimit", default = "default_time_limit")]
    pub time_limit_seconds: u32,
}

pub const DEFAULT_TIME_LIMIT_SECONDS: u32 = 300;

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_SECONDS
}

/// AI feedback for one submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvaluation {
    /// 0–10
    pub score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub feedback: String,
    pub keywords_covered: Vec<String>,
    pub overall_assessment: String,
}
