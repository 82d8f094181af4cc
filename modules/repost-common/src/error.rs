use thiserror::Error;

use crate::types::Platform;

#[derive(Error, Debug)]
pub enum RepostError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("Post generation error ({platform}): {message}")]
    PostGeneration { platform: Platform, message: String },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Image generation error: {0}")]
    Image(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
