//! Data models and configuration
//!
//! Defines the structured model output shape and the environment-driven
//! application configuration.

use serde::Deserialize;

/// Required shape of the model's structured output.
///
/// The model is instructed to answer with a JSON object holding a single
/// `poem` field; anything else fails response validation.
#[derive(Debug, Clone, Deserialize)]
pub struct PoemResponse {
    pub poem: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub poem_model: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?,
            poem_model: std::env::var("POEM_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
        })
    }
}
