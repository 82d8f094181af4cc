//! End-to-end pipeline scenarios over scripted fetcher/model/tokenizer
//! substitutes: the summarize path, the token-gate rejection path, and
//! branch isolation through the whole pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use repost_common::{Document, RepostError};
use repost_pipeline::fetcher::PageFetcher;
use repost_pipeline::llm::CompletionModel;
use repost_pipeline::posts::PostGenerator;
use repost_pipeline::splitter::TextSplitter;
use repost_pipeline::summarizer::Summarizer;
use repost_pipeline::tokens::Tokenizer;
use repost_pipeline::Pipeline;

/// Serves a fixed page for any URL.
struct FixedFetcher {
    content: String,
}

impl FixedFetcher {
    fn with_word_count(words: usize) -> Arc<Self> {
        Arc::new(Self {
            content: vec!["word"; words].join(" "),
        })
    }
}

#[async_trait]
impl PageFetcher for FixedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<Document>, RepostError> {
        Ok(vec![Document {
            content: self.content.clone(),
            source_url: url.to_string(),
            title: "Test Article".to_string(),
        }])
    }
}

/// One token per whitespace-separated word.
struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn name(&self) -> &str {
        "words"
    }
}

/// Scripted responses with a call counter shared across both endpoints.
struct ScriptedModel {
    calls: AtomicUsize,
    summary: String,
}

impl ScriptedModel {
    fn new(summary: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            summary: summary.to_string(),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.summary.clone())
    }

    async fn structured(
        &self,
        _system: &str,
        user: &str,
        _temperature: f32,
        _schema: serde_json::Value,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let json = if user.contains("Twitter") {
            serde_json::json!({"posts": [
                {"tweet": "One #topic https://example.com"},
                {"tweet": "Two #topic https://example.com"},
                {"tweet": "Three #topic https://example.com"},
            ]})
        } else {
            serde_json::json!({"posts": [
                {"fb_post": "Story one. https://example.com"},
                {"fb_post": "Story two. https://example.com"},
                {"fb_post": "Story three. https://example.com"},
            ]})
        };
        Ok(json.to_string())
    }
}

fn pipeline(
    fetcher: Arc<FixedFetcher>,
    model: Arc<ScriptedModel>,
    chunk_size: usize,
) -> Pipeline {
    let tokenizer = Arc::new(WordTokenizer);
    Pipeline::new(
        fetcher,
        TextSplitter::new(chunk_size, 200),
        Summarizer::new(model.clone(), tokenizer, 0.0, 25_000, 5_000),
        PostGenerator::new(model, 0.7),
    )
}

#[tokio::test]
async fn test_small_page_flows_through_to_posts() {
    // 1500 tokens, fits in one oversized chunk: gate passes, one
    // summarization call plus one per platform branch
    let fetcher = FixedFetcher::with_word_count(1_500);
    let model = ScriptedModel::new("a tight three word summary");
    let p = pipeline(fetcher, model.clone(), 1_000_000);

    let result = p.run("https://example.com/article").await.unwrap();

    assert_eq!(result.summary.summary, "a tight three word summary");
    assert_eq!(result.summary.final_token_size, Some(5));
    assert_eq!(result.summary.topic, "Test Article");
    assert_eq!(result.summary.source_url, "https://example.com/article");

    let posts = result.posts.expect("posts generated for accepted content");
    assert_eq!(posts.branches.twitter.len(), 3);
    assert_eq!(posts.branches.facebook.len(), 3);

    // summarize + twitter + facebook
    assert_eq!(model.call_count(), 3);
}

#[tokio::test]
async fn test_oversized_page_is_rejected_without_any_llm_call() {
    let fetcher = FixedFetcher::with_word_count(30_000);
    let model = ScriptedModel::new("unused");
    let p = pipeline(fetcher, model.clone(), 1_000_000);

    let result = p.run("https://example.com/big").await.unwrap();

    assert_eq!(
        result.summary.summary,
        "CONTENT TOKEN SIZE TOO LARGE ... NO MORE THAN 25000 ALLOWED, FOUND 30000"
    );
    assert_eq!(result.summary.final_token_size, None);
    assert!(result.summary.was_rejected());
    assert!(result.posts.is_none());
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_chunked_page_still_summarizes() {
    // realistic chunk size: the 1500-word page splits into several
    // overlapping chunks and the gate counts the post-split total
    let fetcher = FixedFetcher::with_word_count(1_500);
    let model = ScriptedModel::new("summary");
    let p = pipeline(fetcher, model.clone(), 2_000);

    let result = p.run("https://example.com/article").await.unwrap();

    assert!(!result.summary.was_rejected());
    assert!(result.posts.is_some());
    assert_eq!(model.call_count(), 3);
}
