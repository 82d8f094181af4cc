use ai_client::{ImageQuality, ImageSize, OpenAi};
use tracing::info;

use repost_common::RepostError;

/// Thin wrapper over the image-generation endpoint. No pipeline logic
/// lives here; the UI layer decides what to do with the URLs.
pub struct ImageGenerator {
    ai: OpenAi,
}

impl ImageGenerator {
    pub fn new(ai: OpenAi) -> Self {
        Self { ai }
    }

    pub async fn create_image(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> Result<String, RepostError> {
        self.ai
            .generate_image(prompt, size, quality)
            .await
            .map_err(|e| RepostError::Image(e.to_string()))
    }

    /// Generate `count` images for a topic, sequentially (the endpoint is
    /// n = 1 per request).
    pub async fn generate_social_images(
        &self,
        topic: &str,
        summary: &str,
        count: usize,
    ) -> Result<Vec<String>, RepostError> {
        let prompt = image_prompt(topic, summary);
        let mut urls = Vec::with_capacity(count);

        for _ in 0..count {
            let url = self
                .create_image(&prompt, ImageSize::Square, ImageQuality::Standard)
                .await?;
            urls.push(url);
        }

        info!(topic, images = urls.len(), "Image generation complete");
        Ok(urls)
    }
}

fn image_prompt(topic: &str, summary: &str) -> String {
    format!("Generate an image for {topic}. {summary}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_prompt_embeds_topic_and_summary() {
        let prompt = image_prompt("Google Ads", "How to get started.");
        assert_eq!(
            prompt,
            "Generate an image for Google Ads. How to get started."
        );
    }
}
