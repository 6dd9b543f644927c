// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # promptprobe Store
//!
//! Configuration for the promptprobe command line.
//!
//! This crate provides:
//!
//! - **Config**: Upstream plan, credential source, probe timing, sampling
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use promptprobe_store::Config;
//! use promptprobe_fetch::FallbackProber;
//!
//! let config = Config::load().await?;
//! let prober = FallbackProber::builder()
//!     .plan(config.plan()?)
//!     .settings(config.probe_settings())
//!     .credential_name(&config.credential.name)
//!     .build(config.credential_source().as_ref())
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    Config, CredentialConfig, CredentialSourceKind, GeneralConfig, ProbeConfig, UpstreamConfig,
};
pub use error::StoreError;
pub use persistence::{default_config_dir, default_config_path, load_json, save_json};

#[cfg(test)]
mod persistence_tests;
