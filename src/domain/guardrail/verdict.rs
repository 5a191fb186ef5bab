//! Safety verdicts, failure policy and disclaimers

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Category, DomainError};

/// Returned in place of an empty answer
pub const EMPTY_RESPONSE_MESSAGE: &str = "I apologize, but I cannot provide a response to that query.";

/// Outcome of an input safety check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyVerdict {
    pub safe: bool,
    /// The original query when safe, otherwise the refusal shown to the caller
    pub message: String,
}

impl SafetyVerdict {
    pub fn safe(query: impl Into<String>) -> Self {
        Self {
            safe: true,
            message: query.into(),
        }
    }

    pub fn unsafe_with(message: impl Into<String>) -> Self {
        Self {
            safe: false,
            message: message.into(),
        }
    }
}

/// What the guardrail does when its own check fails internally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Let the query through
    #[default]
    Open,
    /// Block the query with a generic message
    Closed,
}

impl FromStr for FailurePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(DomainError::configuration(format!(
                "Unknown guardrail failure policy '{}'",
                other
            ))),
        }
    }
}

/// Disclaimer appended to every answer in `category`
pub fn disclaimer(category: Category) -> &'static str {
    match category {
        Category::Medical => {
            "\n\n⚠️ Disclaimer: This information is for educational purposes only. Please consult with a qualified healthcare professional for medical advice, diagnosis, or treatment."
        }
        Category::Legal => {
            "\n\n⚠️ Disclaimer: This is general legal information only and should not be considered legal advice. Please consult with a qualified attorney for specific legal matters."
        }
        Category::Engineering => {
            "\n\n💡 Note: This is technical guidance. Always test thoroughly and consider your specific requirements and constraints."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!("open".parse::<FailurePolicy>().unwrap(), FailurePolicy::Open);
        assert_eq!(" Closed".parse::<FailurePolicy>().unwrap(), FailurePolicy::Closed);
        assert!("maybe".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::Open);
    }

    #[test]
    fn test_disclaimers_start_with_blank_line() {
        for category in Category::all() {
            assert!(disclaimer(category).starts_with("\n\n"));
        }
        assert!(disclaimer(Category::Engineering).contains("💡 Note"));
    }
}
