//! AI service integration for poem generation
//!
//! Provides the poem-generation service boundary and its Gemini-backed
//! implementation. The client is an explicitly constructed object so
//! callers (and tests) choose what to inject.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiPoemClient;
pub use mock::MockPoemClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PoemService: Send + Sync {
    /// Generate a poem describing the photo.
    ///
    /// `photo_data_uri` must be a `data:<mime>;base64,<payload>` image
    /// descriptor. Returns the poem text verbatim; the text is never empty
    /// on success.
    async fn generate_poem(&self, photo_data_uri: &str) -> Result<String>;
}
