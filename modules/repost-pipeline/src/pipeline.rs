use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use repost_common::{RepostError, SocialPosts, SummaryResult};

use crate::fetcher::PageFetcher;
use crate::posts::PostGenerator;
use crate::splitter::TextSplitter;
use crate::summarizer::Summarizer;

/// Everything one request produces. `posts` is `None` when the token gate
/// refused the content (the sentinel lives in `summary.summary`).
#[derive(Debug, Clone, Serialize)]
pub struct RepurposeResult {
    pub summary: SummaryResult,
    pub posts: Option<SocialPosts>,
}

/// Request-scoped orchestration: fetch, split and summarize run
/// sequentially, then the two post branches run concurrently. All
/// intermediate state is dropped with the result.
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    splitter: TextSplitter,
    summarizer: Summarizer,
    posts: PostGenerator,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        splitter: TextSplitter,
        summarizer: Summarizer,
        posts: PostGenerator,
    ) -> Self {
        Self {
            fetcher,
            splitter,
            summarizer,
            posts,
        }
    }

    pub async fn run(&self, url: &str) -> Result<RepurposeResult, RepostError> {
        let documents = self.fetcher.fetch(url).await?;

        // topic and canonical URL carry over from the first fetched page
        let (topic, source_url) = documents
            .first()
            .map(|d| (d.title.clone(), d.source_url.clone()))
            .ok_or_else(|| RepostError::Fetch(format!("No documents fetched for {url}")))?;

        let chunks = self.splitter.split(&documents);
        info!(
            documents = documents.len(),
            chunks = chunks.len(),
            "Split documents"
        );

        let summary = self.summarizer.summarize(&chunks, &topic, &source_url).await?;

        if summary.was_rejected() {
            info!(url, "Content rejected by token gate, skipping post generation");
            return Ok(RepurposeResult {
                summary,
                posts: None,
            });
        }

        let posts = self
            .posts
            .generate(&summary.summary, &topic, &source_url)
            .await;

        Ok(RepurposeResult {
            summary,
            posts: Some(posts),
        })
    }
}
