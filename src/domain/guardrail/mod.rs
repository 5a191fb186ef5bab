//! Safety guardrail domain types

pub mod verdict;

pub use verdict::{disclaimer, FailurePolicy, SafetyVerdict, EMPTY_RESPONSE_MESSAGE};
