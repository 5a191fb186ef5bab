//! Classification results and label resolution

use serde::{Deserialize, Serialize};

use crate::domain::Category;

/// Which resolution tier produced a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationResolution {
    /// The `category` field was exactly one of the wire names
    Strict,
    /// A name or synonym was found inside the label or raw completion
    Recovered,
    /// Nothing matched, or the completion call failed
    Default,
}

/// Outcome of classifying a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub query: String,
    pub category: Category,
    /// Identifier of the specialist that will answer
    pub specialist: &'static str,
    pub resolution: ClassificationResolution,
}

impl ClassificationResult {
    pub fn new(
        query: impl Into<String>,
        category: Category,
        resolution: ClassificationResolution,
    ) -> Self {
        Self {
            query: query.into(),
            category,
            specialist: category.specialist_id(),
            resolution,
        }
    }

    /// Result used when the classifier could not be reached
    pub fn fallback(query: impl Into<String>) -> Self {
        Self::new(query, Category::default(), ClassificationResolution::Default)
    }
}

/// Resolve a raw classifier completion into a category
///
/// Tiers, in order: exact wire name in the JSON `category` field; name or
/// synonym found in that label (or in the raw text when it is not JSON);
/// the default category.
pub fn resolve_label(raw: &str) -> (Category, ClassificationResolution) {
    let label = serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|value| {
            value
                .get("category")
                .and_then(|c| c.as_str())
                .map(|c| c.trim().to_lowercase())
        });

    if let Some(label) = &label {
        if let Ok(category) = label.parse::<Category>() {
            return (category, ClassificationResolution::Strict);
        }
    }

    let haystack = label.as_deref().unwrap_or(raw);

    match Category::recover_from_text(haystack) {
        Some(category) => (category, ClassificationResolution::Recovered),
        None => (Category::default(), ClassificationResolution::Default),
    }
}

fn category_lines(describe: fn(&Category) -> &'static str) -> String {
    Category::all()
        .iter()
        .map(|c| format!("- {}: {}", c.as_str(), describe(c)))
        .collect::<Vec<_>>()
        .join("\n")
}

const RESPONSE_SHAPE: &str = r#"Return your response in JSON format with this exact structure:
{"category": "engineering|medical|legal"}"#;

/// Prompt asking the model to classify a user query
pub fn query_classification_prompt(query: &str) -> String {
    format!(
        "Classify the following query into one of these categories:\n{}\n\nQuery: {}\n\n{}",
        category_lines(Category::query_description),
        query,
        RESPONSE_SHAPE
    )
}

/// Prompt asking the model to classify a document from a content sample
pub fn document_classification_prompt(filename: &str, sample: &str) -> String {
    format!(
        "Analyze the following document content and classify it into one of these categories:\n{}\n\nDocument filename: {}\nContent sample: {}\n\n{}",
        category_lines(Category::document_description),
        filename,
        sample,
        RESPONSE_SHAPE
    )
}
