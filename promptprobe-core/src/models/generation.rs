//! Generation parameters sent with every upstream request.

use serde::{Deserialize, Serialize};

/// Sampling parameters for the generative API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum number of output tokens.
    pub max_output_tokens: u32,
    /// Nucleus sampling probability mass.
    pub top_p: f64,
    /// Top-k sampling cutoff.
    pub top_k: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2000,
            top_p: 0.95,
            top_k: 40,
        }
    }
}

impl GenerationParams {
    /// Sets the temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the output token limit.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }
}
