//! Specialist outputs

use serde::Serialize;
use thiserror::Error;

use crate::domain::Category;

/// Reply given when generation fails; carries no internal detail
pub const GENERATION_APOLOGY: &str = "I apologize, but I cannot provide a response";

/// Answer produced by a specialist before disclaimers are applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialistAnswer {
    pub text: String,
    /// Whether the text was generated from retrieved knowledge
    pub grounded: bool,
}

impl SpecialistAnswer {
    pub fn grounded(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grounded: true,
        }
    }

    pub fn refusal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grounded: false,
        }
    }
}

/// Specialist failures
#[derive(Debug, Error)]
pub enum SpecialistError {
    #[error("Generation failed for {category}: {message}")]
    Generation { category: Category, message: String },
}

impl SpecialistError {
    pub fn generation(category: Category, message: impl Into<String>) -> Self {
        Self::Generation {
            category,
            message: message.into(),
        }
    }

    /// Short caller-facing description
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Generation { .. } => GENERATION_APOLOGY,
        }
    }
}

/// Routed answer with the domain disclaimer applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentResponse {
    pub category: Category,
    pub specialist: &'static str,
    /// Specialist answer before the disclaimer
    pub answer: String,
    pub grounded: bool,
    /// Disclaimer-appended text shown to the caller
    pub text: String,
}

impl AgentResponse {
    pub fn new(category: Category, answer: SpecialistAnswer, text: impl Into<String>) -> Self {
        Self {
            category,
            specialist: category.specialist_id(),
            answer: answer.text,
            grounded: answer.grounded,
            text: text.into(),
        }
    }
}
