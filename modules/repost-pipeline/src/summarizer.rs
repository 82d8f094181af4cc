use std::sync::Arc;

use tracing::{info, warn};

use repost_common::{DocumentChunk, RepostError, SummaryResult};

use crate::llm::CompletionModel;
use crate::tokens::{count_tokens, Tokenizer};

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a precise summarizer. Respect the token budget you are given and return only the summary text.";

/// Token-gated summarization: content over the threshold is refused with a
/// sentinel result and never sent to the model.
pub struct Summarizer {
    model: Arc<dyn CompletionModel>,
    tokenizer: Arc<dyn Tokenizer>,
    temperature: f32,
    token_limit_threshold: usize,
    summary_token_budget: usize,
}

impl Summarizer {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        tokenizer: Arc<dyn Tokenizer>,
        temperature: f32,
        token_limit_threshold: usize,
        summary_token_budget: usize,
    ) -> Self {
        Self {
            model,
            tokenizer,
            temperature,
            token_limit_threshold,
            summary_token_budget,
        }
    }

    /// Summarize an ordered chunk sequence, carrying the originating
    /// document's topic and URL into the result.
    pub async fn summarize(
        &self,
        chunks: &[DocumentChunk],
        topic: &str,
        source_url: &str,
    ) -> Result<SummaryResult, RepostError> {
        let token_size = count_tokens(chunks, self.tokenizer.as_ref());
        info!(
            token_size,
            threshold = self.token_limit_threshold,
            tokenizer = self.tokenizer.name(),
            "Token gate check"
        );

        if token_size > self.token_limit_threshold {
            warn!(
                token_size,
                threshold = self.token_limit_threshold,
                "Content over token limit, refusing to summarize"
            );
            return Ok(SummaryResult {
                summary: format!(
                    "CONTENT TOKEN SIZE TOO LARGE ... NO MORE THAN {} ALLOWED, FOUND {}",
                    self.token_limit_threshold, token_size
                ),
                final_token_size: None,
                source_url: source_url.to_string(),
                topic: topic.to_string(),
            });
        }

        // stuff all chunks, in order, into a single completion request
        let context = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let summary = self
            .model
            .complete(
                SUMMARY_SYSTEM_PROMPT,
                &self.summary_prompt(&context),
                self.temperature,
            )
            .await
            .map_err(|e| RepostError::Summarization(e.to_string()))?;

        let final_token_size = self.tokenizer.count(&summary);
        info!(final_token_size, "Summary produced");

        Ok(SummaryResult {
            summary,
            final_token_size: Some(final_token_size),
            source_url: source_url.to_string(),
            topic: topic.to_string(),
        })
    }

    fn summary_prompt(&self, context: &str) -> String {
        format!(
            "Please summarize the following content, ensuring that the summary is concise and does not exceed {} tokens.\n\nContent: {}\n\nSummary:",
            self.summary_token_budget, context
        )
    }
}
