//! Keyword, pattern and profanity based input guardrail

use regex::{Regex, RegexBuilder};
use tracing::{error, warn};

use crate::domain::guardrail::{disclaimer, EMPTY_RESPONSE_MESSAGE};
use crate::domain::{Category, FailurePolicy, SafetyVerdict};

const HARMFUL_KEYWORDS: [&str; 35] = [
    // violence
    "hack", "virus", "bomb", "kill", "murder", "suicide", "self-harm", "hurt", "violence",
    "attack", "assault", "weapon", "gun", "knife", "explosive",
    // illegal activity
    "illegal drugs", "cocaine", "heroin", "meth", "steal", "robbery", "fraud",
    "money laundering", "tax evasion", "piracy", "copyright infringement",
    // inappropriate content
    "sexual content", "pornography", "adult content", "nsfw",
    // personal data
    "password", "social security", "credit card", "bank account", "private key",
];

const HARMFUL_PATTERNS: [&str; 5] = [
    r"how to (hack|break into|steal)",
    r"make (bomb|explosive|weapon)",
    r"illegal ways to",
    r"bypass security",
    r"crack password",
];

const PROFANITY: [&str; 5] = ["fuck", "shit", "damn", "bitch", "asshole"];
const PROFANITY_LIMIT: usize = 2;

pub const HARMFUL_KEYWORD_MESSAGE: &str = "I cannot help with requests that may involve harmful or illegal activities. Please ask about engineering, medical, or legal topics in a constructive way.";
pub const HARMFUL_PATTERN_MESSAGE: &str = "I cannot provide guidance on potentially harmful activities. Please rephrase your question in a constructive manner.";
pub const PROFANITY_MESSAGE: &str = "Please keep the conversation professional and respectful.";
pub const CHECK_UNAVAILABLE_MESSAGE: &str =
    "I cannot process this request right now. Please try again later.";

/// Screens queries before routing and decorates answers afterwards
#[derive(Debug, Clone)]
pub struct SafetyGuardrail {
    policy: FailurePolicy,
    patterns: Result<Vec<Regex>, String>,
}

impl Default for SafetyGuardrail {
    fn default() -> Self {
        Self::new(FailurePolicy::default())
    }
}

impl SafetyGuardrail {
    pub fn new(policy: FailurePolicy) -> Self {
        Self::with_patterns(policy, &HARMFUL_PATTERNS)
    }

    /// Guardrail using `patterns` instead of the built-in harmful patterns
    ///
    /// A pattern that fails to compile is reported on every check through the
    /// failure policy.
    pub fn with_patterns(policy: FailurePolicy, patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!(error = %e, "Failed to compile guardrail pattern");
                e.to_string()
            });

        Self { policy, patterns }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Screen `query`; never fails
    pub fn check_input(&self, query: &str) -> SafetyVerdict {
        let lower = query.to_lowercase();

        if let Some(keyword) = HARMFUL_KEYWORDS.iter().find(|k| lower.contains(*k)) {
            warn!(keyword, "Query blocked by keyword filter");
            return SafetyVerdict::unsafe_with(HARMFUL_KEYWORD_MESSAGE);
        }

        let patterns = match &self.patterns {
            Ok(patterns) => patterns,
            Err(e) => return self.on_fault(query, e),
        };

        if patterns.iter().any(|p| p.is_match(query)) {
            warn!("Query blocked by pattern filter");
            return SafetyVerdict::unsafe_with(HARMFUL_PATTERN_MESSAGE);
        }

        let profanity = PROFANITY.iter().filter(|w| lower.contains(*w)).count();
        if profanity > PROFANITY_LIMIT {
            warn!(terms = profanity, "Query blocked by profanity filter");
            return SafetyVerdict::unsafe_with(PROFANITY_MESSAGE);
        }

        SafetyVerdict::safe(query)
    }

    fn on_fault(&self, query: &str, fault: &str) -> SafetyVerdict {
        match self.policy {
            FailurePolicy::Open => {
                warn!(error = fault, "Safety check failed, allowing query");
                SafetyVerdict::safe(query)
            }
            FailurePolicy::Closed => {
                warn!(error = fault, "Safety check failed, blocking query");
                SafetyVerdict::unsafe_with(CHECK_UNAVAILABLE_MESSAGE)
            }
        }
    }

    /// Append the disclaimer of `category`, or apologise for an empty answer
    pub fn filter_response(&self, answer: &str, category: Category) -> String {
        if answer.trim().is_empty() {
            return EMPTY_RESPONSE_MESSAGE.to_string();
        }

        format!("{}{}", answer, disclaimer(category))
    }
}
