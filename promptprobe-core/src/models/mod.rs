//! Domain models for promptprobe.
//!
//! ## Submodules
//!
//! - [`candidate`] - Endpoint templates, candidates, and the candidate plan
//! - [`credential`] - The API key newtype
//! - [`generation`] - Sampling parameters
//! - [`probe`] - Probe requests, answers, and attempt records

pub mod candidate;
pub mod credential;
pub mod generation;
pub mod probe;

pub use candidate::{Candidate, CandidatePlan, EndpointTemplate, KEY_PLACEHOLDER, MODEL_PLACEHOLDER};
pub use credential::ApiKey;
pub use generation::GenerationParams;
pub use probe::{Answer, AttemptFailure, ProbeAttempt, ProbeRequest};
#[cfg(test)]
mod serde_tests;
