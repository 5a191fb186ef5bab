//! Domain specialist contracts
//!
//! A specialist answers queries for exactly one [`Category`](crate::domain::Category),
//! grounding its answer in retrieved knowledge or refusing with a fixed
//! template when none is available.

pub mod answer;
pub mod catalogue;
pub mod persona;

pub use answer::{AgentResponse, SpecialistAnswer, SpecialistError, GENERATION_APOLOGY};
pub use catalogue::{specialist_catalogue, SpecialistProfile};
pub use persona::{grounded_prompt, parse_generated_answer, refusal_template};

use async_trait::async_trait;

use crate::domain::Category;
use crate::domain::knowledge::Scope;

/// A category-specific answerer
#[async_trait]
pub trait Specialist: Send + Sync + std::fmt::Debug {
    /// Category this specialist serves
    fn category(&self) -> Category;

    /// Answer `query` from knowledge stored under `scope`
    async fn answer(&self, query: &str, scope: &Scope) -> Result<SpecialistAnswer, SpecialistError>;
}
