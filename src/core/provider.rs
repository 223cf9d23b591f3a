//! The seam between conversation logic and the hosted model API.

use crate::api::generate::generate_content;
use crate::api::models::fetch_models;
use crate::api::{ApiError, Content, GenerateContentRequest, ModelInfo};
use crate::core::config::Config;
use crate::core::credentials::ApiKey;
use crate::core::message::Turn;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Everything one model call needs. The history is replayed explicitly on
/// every call; no conversational state lives on the provider side.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub history: &'a [Turn],
    pub text: &'a str,
}

impl GenerateRequest<'_> {
    pub fn to_api_request(&self) -> GenerateContentRequest {
        let system_instruction = if self.system_prompt.trim().is_empty() {
            None
        } else {
            Some(Content::text(None, self.system_prompt))
        };

        let mut contents: Vec<Content> = self
            .history
            .iter()
            .map(|turn| Content::text(Some(turn.role.to_api_role()), turn.content.as_str()))
            .collect();
        contents.push(Content::text(Some("user"), self.text));

        GenerateContentRequest {
            system_instruction,
            contents,
        }
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// All models visible to the configured key.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError>;

    /// One blocking round trip: returns the reply text.
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ApiError>;
}

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl GeminiProvider {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_config(config: &Config, api_key: ApiKey) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::new(client, config.base_url(), api_key))
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        fetch_models(&self.client, &self.base_url, self.api_key.expose()).await
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ApiError> {
        debug!(
            model = request.model,
            history = request.history.len(),
            "sending generateContent request"
        );
        let body = request.to_api_request();
        generate_content(
            &self.client,
            &self.base_url,
            self.api_key.expose(),
            request.model,
            &body,
        )
        .await
    }
}
