// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # promptprobe Fetch
//!
//! The fallback prober and the host APIs it runs on.
//!
//! ## Host APIs
//!
//! The [`host`] module provides abstractions for system interactions:
//!
//! - [`host::http`] - HTTP transport trait and reqwest client with domain allowlist
//! - [`host::credential`] - Credential sources (environment, keychain, static)
//!
//! ## Prober
//!
//! - [`prober::FallbackProber`] - Tries candidates in order until one answers
//! - [`prober::ProbeSettings`] - Per-call timeout, outer deadline, prompt, sampling
//! - [`prober::ProbeOutcome`] - Answer or terminal error, plus the attempt log
//! - [`wire`] - Upstream request and response envelopes
//!
//! ## Example
//!
//! ```ignore
//! use promptprobe_fetch::{EnvCredentials, FallbackProber};
//!
//! let prober = FallbackProber::builder()
//!     .plan(plan)
//!     .build(&EnvCredentials::new())
//!     .await?;
//!
//! let answer = prober.probe("What is the derivative of x^2?").await?;
//! println!("{} (via {})", answer.text, answer.candidate.model);
//! ```

pub mod error;
pub mod host;
pub mod prober;
pub mod wire;

// Errors
pub use error::{AttemptError, CredentialError, HttpError, ProbeError};

// Host APIs
pub use host::{
    credential::{
        CredentialSource, EnvCredentials, StaticCredential, SystemKeychain, API_KEY_ACCOUNT,
        DEFAULT_CREDENTIAL_NAME,
    },
    http::{HttpClient, HttpTransport, TransportResponse},
};

// Prober
pub use prober::{FallbackProber, FallbackProberBuilder, ProbeOutcome, ProbeSettings};
