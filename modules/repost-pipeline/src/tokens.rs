use repost_common::{DocumentChunk, RepostError};
use tiktoken_rs::CoreBPE;

/// Model-specific token counting seam. The real implementation delegates
/// to the model's BPE; tests substitute deterministic fakes.
pub trait Tokenizer: Send + Sync {
    fn count(&self, text: &str) -> usize;
    fn name(&self) -> &str;
}

/// Tokenizer backed by the tiktoken BPE for a given OpenAI model.
pub struct TiktokenTokenizer {
    bpe: CoreBPE,
    model: String,
}

impl std::fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl TiktokenTokenizer {
    pub fn for_model(model: &str) -> Result<Self, RepostError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|e| RepostError::Tokenizer(format!("No tokenizer for model {model}: {e}")))?;
        Ok(Self {
            bpe,
            model: model.to_string(),
        })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Total token cost of an ordered chunk sequence. The counting algorithm
/// itself is the tokenizer's; this only sums per-chunk counts.
pub fn count_tokens(chunks: &[DocumentChunk], tokenizer: &dyn Tokenizer) -> usize {
    chunks.iter().map(|c| tokenizer.count(&c.content)).sum()
}
