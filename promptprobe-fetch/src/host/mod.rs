//! Host APIs for the prober.
//!
//! - [`http`] - HTTP transport trait and the reqwest client with domain allowlist
//! - [`credential`] - Credential sources (environment, system keychain, static)

pub mod credential;
pub mod http;

// Re-export key types
pub use credential::{CredentialSource, EnvCredentials, StaticCredential, SystemKeychain};
pub use http::{HttpClient, HttpTransport, TransportResponse};
