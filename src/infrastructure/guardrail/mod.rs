//! Safety guardrail implementation

pub mod safety;

pub use safety::SafetyGuardrail;
