use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, InlineData, Part};
use crate::ai::PoemService;
use crate::models::PoemResponse;
use crate::photo::PhotoDataUri;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct PoemRequest {
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: Option<PoemGenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PoemGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

pub struct GeminiPoemClient {
    http: GeminiHttpClient,
}

impl GeminiPoemClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(30),
                client,
            ),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        response.candidates.first().and_then(|c| {
            c.content.parts.iter().find_map(|p| match p {
                Part::Text { text } => Some(text.clone()),
                Part::InlineData { .. } => None,
            })
        })
    }
}

#[async_trait]
impl PoemService for GeminiPoemClient {
    async fn generate_poem(&self, photo_data_uri: &str) -> Result<String> {
        let photo = PhotoDataUri::parse(photo_data_uri)?;
        if !photo.is_image() {
            return Err(Error::Validation(format!(
                "expected an image MIME type, got '{}'",
                photo.mime_type()
            )));
        }

        tracing::debug!(
            "Requesting poem for photo ({} bytes, {}) from model {}",
            photo.decoded_len(),
            photo.mime_type(),
            self.http.model()
        );

        let request = PoemRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text {
                    text: prompts::POEM_SYSTEM.to_string(),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: photo.mime_type().to_string(),
                            data: photo.base64_data().to_string(),
                        },
                    },
                    Part::Text {
                        text: prompts::POEM_USER.to_string(),
                    },
                ],
            }],
            generation_config: Some(PoemGenerationConfig {
                response_mime_type: Some("application/json".to_string()),
            }),
        };

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let text = Self::extract_text(&response)
            .ok_or_else(|| Error::AiProvider("No text in Gemini poem response".to_string()))?;

        let poem: PoemResponse = serde_json::from_str(&text).map_err(|e| {
            Error::AiProvider(format!("Failed to parse Gemini poem response: {}", e))
        })?;

        if poem.poem.trim().is_empty() {
            return Err(Error::AiProvider(
                "Gemini returned an empty poem".to_string(),
            ));
        }

        tracing::info!("Generated poem ({} characters)", poem.poem.len());

        Ok(poem.poem)
    }
}
