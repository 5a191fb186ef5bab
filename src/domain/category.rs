//! Knowledge categories
//!
//! The closed set of professional domains used to partition both stored
//! knowledge and specialist behaviour. Every category-keyed lookup (storage
//! folder, vector collection, specialist, disclaimer) is an exhaustive match
//! over [`Category`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Professional domain a document or query belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Software development, programming, technical solutions
    #[default]
    Engineering,
    /// Health, symptoms, diseases, treatments
    Medical,
    /// Law, contracts, rights, legal procedures
    Legal,
}

impl Category {
    /// All categories in classification order
    pub fn all() -> [Category; 3] {
        [Self::Engineering, Self::Medical, Self::Legal]
    }

    /// Wire name used in classification output and metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engineering => "engineering",
            Self::Medical => "medical",
            Self::Legal => "legal",
        }
    }

    /// Identifier of the specialist that answers this category
    pub fn specialist_id(&self) -> &'static str {
        match self {
            Self::Engineering => "engineer",
            Self::Medical => "doctor",
            Self::Legal => "lawyer",
        }
    }

    /// Folder name under the storage root
    pub fn folder_name(&self) -> &'static str {
        match self {
            Self::Engineering => "Engineer",
            Self::Medical => "Doctor",
            Self::Legal => "Lawyer",
        }
    }

    /// Base name of the per-scope vector collection
    pub fn collection_base(&self) -> &'static str {
        match self {
            Self::Engineering => "engineer_knowledge",
            Self::Medical => "doctor_knowledge",
            Self::Legal => "lawyer_knowledge",
        }
    }

    /// Short description used in classification prompts
    pub fn query_description(&self) -> &'static str {
        match self {
            Self::Engineering => "software development, programming, technical solutions, coding",
            Self::Medical => "health, symptoms, medical advice, diseases, treatments",
            Self::Legal => "law, legal advice, contracts, rights, legal procedures",
        }
    }

    /// Longer description used when classifying whole documents
    pub fn document_description(&self) -> &'static str {
        match self {
            Self::Engineering => {
                "software development, programming, technical documentation, DevOps, system design, technology"
            }
            Self::Medical => {
                "health, medical procedures, anatomy, diseases, treatments, medical research, healthcare"
            }
            Self::Legal => {
                "law, contracts, legal procedures, regulations, court documents, legal advice, compliance"
            }
        }
    }

    /// Names and synonyms that identify this category inside free text
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::Engineering => &["engineer", "technical"],
            Self::Medical => &["medical", "health"],
            Self::Legal => &["legal", "law"],
        }
    }

    /// Find the first category whose name or synonym occurs in `text`
    pub fn recover_from_text(text: &str) -> Option<Category> {
        let lower = text.to_lowercase();

        Self::all()
            .into_iter()
            .find(|category| category.synonyms().iter().any(|s| lower.contains(s)))
    }

    /// Map a specialist identifier back to its category
    pub fn from_specialist_id(id: &str) -> Option<Category> {
        Self::all()
            .into_iter()
            .find(|category| category.specialist_id().eq_ignore_ascii_case(id.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    /// Strict parse: only the exact wire names are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "engineering" => Ok(Self::Engineering),
            "medical" => Ok(Self::Medical),
            "legal" => Ok(Self::Legal),
            other => Err(DomainError::validation(format!(
                "Unknown category '{}'",
                other
            ))),
        }
    }
}
