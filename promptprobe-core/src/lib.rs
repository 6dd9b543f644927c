// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `promptprobe` Core
//!
//! Core types for the `promptprobe` workspace. Nothing in this crate
//! performs I/O.
//!
//! ## Key Types
//!
//! ### Candidates
//! - [`EndpointTemplate`] - URL template with `{model}` and `{key}` placeholders
//! - [`Candidate`] - One `(template, model)` pair
//! - [`CandidatePlan`] - Ordered templates and models, yielding candidates
//!
//! ### Probing
//! - [`ProbeRequest`] - The question to send
//! - [`Answer`] - A successful result and the candidate that produced it
//! - [`ProbeAttempt`] - Per-candidate attempt record
//! - [`AttemptFailure`] - A candidate and the error it produced
//!
//! ### Upstream
//! - [`ApiKey`] - Secret that never prints itself
//! - [`GenerationParams`] - Sampling parameters

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Candidates
    Candidate,
    CandidatePlan,
    EndpointTemplate,
    KEY_PLACEHOLDER,
    MODEL_PLACEHOLDER,
    // Probing
    Answer,
    AttemptFailure,
    ProbeAttempt,
    ProbeRequest,
    // Upstream
    ApiKey,
    GenerationParams,
};
