use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Documents ---

/// A fetched page: extracted text content plus the metadata carried
/// through the pipeline (canonical URL and page title, used as the topic).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub source_url: String,
    pub title: String,
}

/// A bounded-size, possibly overlapping slice of a document's content.
/// Chunk order matters: the summarizer reconstructs the document from the
/// sequence as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
}

// --- Summary ---

/// Output of the summarization stage. Either a genuine summary with its
/// measured token count, or the oversize-rejection sentinel with
/// `final_token_size: None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub final_token_size: Option<usize>,
    pub source_url: String,
    pub topic: String,
}

impl SummaryResult {
    /// True when the token gate refused the content and `summary` holds
    /// the rejection message rather than an LLM summary.
    pub fn was_rejected(&self) -> bool {
        self.final_token_size.is_none()
    }
}

// --- Social posts ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Facebook,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Twitter => write!(f, "twitter"),
            Platform::Facebook => write!(f, "facebook"),
        }
    }
}

/// One Twitter/X post. The 280-character limit (URL included) is
/// instructed to the model, not enforced here; callers that care must
/// check `tweet.chars().count()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TwitterPost {
    /// Text content of a Twitter post
    pub tweet: String,
}

/// One Facebook post. No hard length constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FacebookPost {
    /// Text content of a Facebook post
    pub fb_post: String,
}

/// Per-platform post sequences. Each branch is produced independently;
/// a failed branch holds a single substitute post carrying the error
/// message. The per-platform count is whatever the model returned
/// (three is asked for, not guaranteed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostBranches {
    pub twitter: Vec<TwitterPost>,
    pub facebook: Vec<FacebookPost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPosts {
    pub branches: PostBranches,
}
