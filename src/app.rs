//! Application orchestration for the command-line front end.

use crate::ai::{GeminiPoemClient, PoemService};
use crate::models::Config;
use crate::photo::PhotoDataUri;
use crate::session::UploadSession;
use crate::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Wires the poem service and the upload session together for one run.
pub struct App {
    poem_service: Box<dyn PoemService>,
    session: UploadSession,
}

impl App {
    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;

        info!("Poem provider: Gemini (model: {})", config.poem_model);
        let client = GeminiPoemClient::new(config.gemini_api_key, config.poem_model);

        Ok(Self::with_service(Box::new(client)))
    }

    /// Build an app around an injected poem service.
    ///
    /// This is primarily useful for integration tests and local harnesses
    /// that need to substitute a mock model.
    pub fn with_service(poem_service: Box<dyn PoemService>) -> Self {
        Self {
            poem_service,
            session: UploadSession::new(),
        }
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    /// Generate a poem for the photo at `path`.
    ///
    /// Reads and validates the file, drives the session through select and
    /// generate, and returns the poem text. Validation refusals and model
    /// failures come back as errors carrying the user-facing message.
    pub async fn run(&mut self, path: &Path) -> Result<String> {
        let bytes = fs::read(path)?;
        let photo = PhotoDataUri::from_bytes(&bytes)?;

        self.session
            .select(photo)
            .map_err(|e| Error::Validation(e.to_string()))?;

        self.session
            .run_generation(self.poem_service.as_ref())
            .await;

        if let Some(poem) = self.session.poem() {
            return Ok(poem.to_string());
        }

        let message = self
            .session
            .error()
            .unwrap_or("generation did not produce a result");
        Err(Error::AiProvider(message.to_string()))
    }
}
