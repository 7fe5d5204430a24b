//! Resume Profiler: deterministic keyword scan of extracted resume text.
//!
//! `analyze` is total: every input, including the empty string, yields a profile.
//! No I/O, no shared state.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Technology vocabulary, tested in this order by substring search on the
/// case-folded text. Substring semantics mean "javascript" also yields "java".
pub const SKILL_VOCABULARY: &[&str] = &[
    "javascript",
    "python",
    "java",
    "react",
    "node.js",
    "mongodb",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "html",
    "css",
    "typescript",
    "angular",
    "vue",
    "express",
    "django",
    "flask",
    "spring",
    "mysql",
    "postgresql",
    "redis",
    "elasticsearch",
    "jenkins",
    "terraform",
];

const EDUCATION_KEYWORDS: &[&str] = &["bachelor", "master", "phd", "degree", "university", "college"];

const EXCERPT_CHARS: usize = 1000;
const HIGH_CONFIDENCE: f64 = 0.85;
const LOW_CONFIDENCE: f64 = 0.65;
/// More than this many skills earns the high confidence level.
const HIGH_CONFIDENCE_MIN_EXCLUSIVE: usize = 3;

pub const DEFAULT_DOMAIN: &str = "Full Stack";
pub const DEFAULT_ROLE: &str = "Software Developer";

/// One row of the domain table: fires when any listed skill was extracted.
#[derive(Debug, Clone, Copy)]
pub struct DomainRule {
    pub any_of: &'static [&'static str],
    pub domain: &'static str,
    pub role: &'static str,
}

/// Ordered domain rules, first match wins.
///
/// The MERN row is unreachable for any skill set that also contains react,
/// node.js or express, because the frontend and backend rows are checked first.
/// Likewise "machine learning", "tensorflow" and "pytorch" are not in
/// `SKILL_VOCABULARY`, so only python can fire the AI/ML row. Both are kept as
/// observed product behavior; reordering is a product decision.
pub const DOMAIN_RULES: &[DomainRule] = &[
    DomainRule {
        any_of: &["react", "angular", "vue"],
        domain: "Frontend Development",
        role: "Frontend Developer",
    },
    DomainRule {
        any_of: &["node.js", "express", "django", "flask"],
        domain: "Backend Development",
        role: "Backend Developer",
    },
    DomainRule {
        any_of: &["react", "node.js", "mongodb", "express"],
        domain: "MERN Stack",
        role: "MERN Stack Developer",
    },
    DomainRule {
        any_of: &["aws", "docker", "kubernetes", "jenkins"],
        domain: "DevOps",
        role: "DevOps Engineer",
    },
    DomainRule {
        any_of: &["python", "machine learning", "tensorflow", "pytorch"],
        domain: "AI/ML",
        role: "ML Engineer",
    },
];

static EXPERIENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)[\s+]*years?\s+(?:of\s+)?experience")
        .expect("Invalid regex: experience pattern")
});

/// Structured summary derived from a resume's text. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeProfile {
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub has_education_signal: bool,
    pub suggested_role: String,
    pub suggested_domain: String,
    pub confidence_score: f64,
    pub excerpt: String,
}

pub fn analyze(text: &str) -> ResumeProfile {
    let folded = text.to_lowercase();

    let skills = extract_skills(&folded);
    let (suggested_domain, suggested_role) = suggest_domain(&skills);

    let confidence_score = if skills.len() > HIGH_CONFIDENCE_MIN_EXCLUSIVE {
        HIGH_CONFIDENCE
    } else {
        LOW_CONFIDENCE
    };

    ResumeProfile {
        experience_years: extract_experience_years(text),
        has_education_signal: EDUCATION_KEYWORDS.iter().any(|k| folded.contains(k)),
        suggested_role: suggested_role.to_string(),
        suggested_domain: suggested_domain.to_string(),
        confidence_score,
        excerpt: text.chars().take(EXCERPT_CHARS).collect(),
        skills,
    }
}

/// Vocabulary terms present in `folded`, in vocabulary order.
pub fn extract_skills(folded: &str) -> Vec<String> {
    SKILL_VOCABULARY
        .iter()
        .filter(|term| folded.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

/// Returns `(domain, role)` for the first rule whose predicate matches.
pub fn suggest_domain(skills: &[String]) -> (&'static str, &'static str) {
    DOMAIN_RULES
        .iter()
        .find(|rule| skills.iter().any(|s| rule.any_of.contains(&s.as_str())))
        .map(|rule| (rule.domain, rule.role))
        .unwrap_or((DEFAULT_DOMAIN, DEFAULT_ROLE))
}

/// First "<n> year(s) [of] experience" mention; 0 when absent.
/// Only ASCII digits count. Digit runs too large for `u32` saturate.
pub fn extract_experience_years(text: &str) -> u32 {
    EXPERIENCE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_text_yields_defaults() {
        let profile = analyze("");
        assert!(profile.skills.is_empty());
        assert_eq!(profile.experience_years, 0);
        assert!(!profile.has_education_signal);
        assert_eq!(profile.suggested_domain, "Full Stack");
        assert_eq!(profile.suggested_role, "Software Developer");
        assert!((profile.confidence_score - 0.65).abs() < f64::EPSILON);
        assert_eq!(profile.excerpt, "");
    }

    #[test]
    fn test_experience_education_and_skills() {
        let profile =
            analyze("I have 5 years experience with React and MongoDB and a Bachelor degree");
        assert_eq!(profile.experience_years, 5);
        assert!(profile.has_education_signal);
        assert!(profile.skills.contains(&"react".to_string()));
        assert!(profile.skills.contains(&"mongodb".to_string()));
        assert_eq!(profile.suggested_domain, "Frontend Development");
    }

    #[test]
    fn test_mern_skill_set_classifies_as_frontend() {
        let (domain, role) = suggest_domain(&skills(&["react", "node.js", "mongodb", "express"]));
        assert_eq!(domain, "Frontend Development");
        assert_eq!(role, "Frontend Developer");
    }

    #[test]
    fn test_mern_rule_reachable_only_through_mongodb_alone() {
        let (domain, role) = suggest_domain(&skills(&["mongodb", "git"]));
        assert_eq!(domain, "MERN Stack");
        assert_eq!(role, "MERN Stack Developer");
    }

    #[test]
    fn test_backend_rule() {
        let profile = analyze("Built REST services in Django and Flask on PostgreSQL");
        assert_eq!(profile.suggested_domain, "Backend Development");
        assert_eq!(profile.suggested_role, "Backend Developer");
    }

    #[test]
    fn test_devops_rule() {
        let profile = analyze("Maintained Jenkins pipelines, Docker images and Terraform on AWS");
        assert_eq!(profile.suggested_domain, "DevOps");
        assert_eq!(profile.suggested_role, "DevOps Engineer");
    }

    #[test]
    fn test_python_fires_ai_ml_rule() {
        let profile = analyze("Data pipelines in Python");
        assert_eq!(profile.suggested_domain, "AI/ML");
        assert_eq!(profile.suggested_role, "ML Engineer");
    }

    #[test]
    fn test_ml_terms_outside_vocabulary_do_not_classify() {
        let profile = analyze("Deep learning with TensorFlow and PyTorch");
        assert!(profile.skills.is_empty());
        assert_eq!(profile.suggested_domain, "Full Stack");
    }

    #[test]
    fn test_skills_follow_vocabulary_order_without_duplicates() {
        let profile = analyze("Vue, React, react again, JavaScript and TypeScript");
        assert_eq!(
            profile.skills,
            skills(&["javascript", "java", "react", "typescript", "vue"])
        );
    }

    #[test]
    fn test_substring_matching_is_preserved() {
        let profile = analyze("MySQL admin");
        assert_eq!(profile.skills, skills(&["sql", "mysql"]));
    }

    #[test]
    fn test_confidence_levels() {
        let low = analyze("git html css");
        assert_eq!(low.skills.len(), 3);
        assert!((low.confidence_score - 0.65).abs() < f64::EPSILON);

        let high = analyze("git html css redis");
        assert_eq!(high.skills.len(), 4);
        assert!((high.confidence_score - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_experience_pattern_variants() {
        assert_eq!(extract_experience_years("3 Years of Experience in Go"), 3);
        assert_eq!(extract_experience_years("10+ years experience"), 10);
        assert_eq!(extract_experience_years("1 year experience"), 1);
        assert_eq!(extract_experience_years("2 years of work experience"), 0);
        assert_eq!(extract_experience_years("experience: 4 years"), 0);
    }

    #[test]
    fn test_first_experience_match_wins() {
        assert_eq!(
            extract_experience_years("2 years experience in Java, 7 years experience overall"),
            2
        );
    }

    #[test]
    fn test_experience_overflow_saturates() {
        assert_eq!(
            extract_experience_years("99999999999 years experience"),
            u32::MAX
        );
    }

    #[test]
    fn test_non_ascii_digits_are_not_experience() {
        assert_eq!(extract_experience_years("\u{0665} years experience"), 0);
        assert_eq!(analyze("Fullwidth \u{FF13} years experience").experience_years, 0);
        assert_eq!(extract_experience_years("\u{0665} years experience, 4 years experience"), 4);
    }

    #[test]
    fn test_excerpt_keeps_original_case_and_is_bounded() {
        let text = format!("Jane DOE {}", "x".repeat(2000));
        let profile = analyze(&text);
        assert_eq!(profile.excerpt.chars().count(), 1000);
        assert!(profile.excerpt.starts_with("Jane DOE"));
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let text = "é".repeat(1500);
        let profile = analyze(&text);
        assert_eq!(profile.excerpt.chars().count(), 1000);
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let value = serde_json::to_value(analyze("React")).unwrap();
        assert!(value.get("suggestedDomain").is_some());
        assert!(value.get("experienceYears").is_some());
        assert!(value.get("hasEducationSignal").is_some());
    }
}
