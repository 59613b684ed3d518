use super::PoemService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum ScriptedOutcome {
    Poem(String),
    Failure(String),
}

pub struct MockPoemClient {
    outcomes: Arc<Mutex<Vec<ScriptedOutcome>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockPoemClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_poem_response(self, poem: String) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(ScriptedOutcome::Poem(poem));
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(ScriptedOutcome::Failure(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockPoemClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PoemService for MockPoemClient {
    async fn generate_poem(&self, photo_data_uri: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            // Default mock response
            return Ok(format!(
                "A quiet verse for a photo of {} characters",
                photo_data_uri.len()
            ));
        }

        let index = (*count - 1) % outcomes.len();
        match &outcomes[index] {
            ScriptedOutcome::Poem(poem) => Ok(poem.clone()),
            ScriptedOutcome::Failure(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}
