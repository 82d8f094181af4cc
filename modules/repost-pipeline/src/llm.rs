use ai_client::OpenAi;
use anyhow::Result;
use async_trait::async_trait;

/// Object-safe seam over the completion API. The pipeline stages hold a
/// `dyn CompletionModel` so tests can script responses and count calls.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Plain text completion.
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String>;

    /// Completion constrained to the given JSON schema; returns the raw
    /// JSON string for typed decoding by the caller.
    async fn structured(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        schema: serde_json::Value,
    ) -> Result<String>;
}

#[async_trait]
impl CompletionModel for OpenAi {
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        Ok(self.chat_completion(system, user, temperature).await?)
    }

    async fn structured(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        schema: serde_json::Value,
    ) -> Result<String> {
        Ok(self
            .structured_output(system, user, temperature, schema)
            .await?)
    }
}
