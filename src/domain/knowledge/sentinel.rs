//! Fixed strings the store returns when a search finds nothing usable

use crate::domain::Category;

/// Returned when the store holds no chunks at all
pub const NO_DOCUMENTS_UPLOADED: &str = "No PDF documents uploaded yet.";

/// Returned by an uncategorised search that found nothing
pub const NO_RELEVANT_CONTENT: &str = "No relevant content found in documents.";

/// Category-specific "nothing found" marker
pub fn no_content_for(category: Category) -> String {
    format!("No relevant content found in {} documents.", category)
}

/// Whether a search result carries no usable content for `category`
pub fn is_no_content(result: &str, category: Category) -> bool {
    if result.trim().is_empty() {
        return true;
    }

    [
        no_content_for(category).as_str(),
        NO_RELEVANT_CONTENT,
        NO_DOCUMENTS_UPLOADED,
    ]
    .iter()
    .any(|sentinel| result.contains(sentinel))
}
