mod client;
pub(crate) mod schema;
pub(crate) mod types;

pub use schema::StructuredOutput;
pub use types::{ImageQuality, ImageSize};

use std::time::Duration;

use crate::error::AiError;
use client::OpenAiClient;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const IMAGE_MODEL: &str = "dall-e-3";

/// OpenAI-backed language model handle. Cheap to clone; one per process
/// is typical, created from config at startup.
#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    base_url: Option<String>,
    timeout: Duration,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self, AiError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AiError::Config("OPENAI_API_KEY environment variable not set".to_string()))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key, self.timeout);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Plain chat completion.
    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f32,
    ) -> Result<String, AiError> {
        let mut request = types::ChatRequest::new(&self.model)
            .message(types::WireMessage::system(system))
            .message(types::WireMessage::user(user));

        if types::uses_max_completion_tokens(&self.model) {
            request = request.max_completion_tokens(4096);
        } else {
            request = request.max_tokens(4096).temperature(temperature);
        }

        let response = self.client().chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::Api("No response from OpenAI".to_string()))
    }

    /// Completion constrained to a raw JSON schema. Returns the raw JSON
    /// string; callers decode it against their own types.
    pub async fn structured_output(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        schema: serde_json::Value,
    ) -> Result<String, AiError> {
        let request = types::StructuredRequest {
            model: self.model.clone(),
            messages: vec![
                types::WireMessage::system(system),
                types::WireMessage::user(user),
            ],
            temperature: if self.model.starts_with("gpt-5") {
                None
            } else {
                Some(temperature)
            },
            response_format: types::ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: types::JsonSchemaFormat {
                    name: "structured_response".to_string(),
                    strict: true,
                    schema,
                },
            },
        };

        self.client().structured_output(&request).await
    }

    /// Type-safe structured output extraction.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<T, AiError> {
        let json_str = self
            .structured_output(system, user, temperature, T::openai_schema())
            .await?;

        serde_json::from_str(&json_str)
            .map_err(|e| AiError::Parse(format!("Failed to deserialize response: {e}")))
    }

    /// Generate a single image and return its URL. The endpoint is fixed
    /// to n = 1 for dall-e-3.
    pub async fn generate_image(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> Result<String, AiError> {
        let request = types::ImageRequest {
            model: IMAGE_MODEL.to_string(),
            prompt: prompt.to_string(),
            n: 1,
            size,
            quality,
        };

        self.client().generate_image(&request).await
    }
}
