//! Specialist catalogue

use serde::Serialize;

use crate::domain::Category;

/// Public description of a specialist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialistProfile {
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub specialties: &'static [&'static str],
}

impl SpecialistProfile {
    pub fn for_category(category: Category) -> Self {
        let (description, specialties): (&'static str, &'static [&'static str]) = match category {
            Category::Engineering => (
                "Software engineering and technical expertise",
                &["programming", "system design", "devops", "security"],
            ),
            Category::Medical => (
                "Medical knowledge and health advice",
                &["symptoms", "preventive care", "first aid", "mental health"],
            ),
            Category::Legal => (
                "Legal guidance and advice",
                &["contract law", "employment law", "criminal law", "business law"],
            ),
        };

        Self {
            name: category.specialist_id(),
            category,
            description,
            specialties,
        }
    }
}

/// Profiles of every specialist, in classification order
pub fn specialist_catalogue() -> Vec<SpecialistProfile> {
    Category::all()
        .into_iter()
        .map(SpecialistProfile::for_category)
        .collect()
}
