use std::sync::Arc;

use ai_client::StructuredOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use repost_common::{
    FacebookPost, Platform, PostBranches, RepostError, SocialPosts, TwitterPost,
};

use crate::llm::CompletionModel;

const POSTS_SYSTEM_PROMPT: &str =
    "You are a social media copywriter. Respond with JSON matching the requested schema exactly.";

/// How many posts each platform prompt asks for. Advisory to the model;
/// the result carries whatever came back.
const POSTS_PER_PLATFORM: usize = 3;

/// What the LLM returns for the Twitter branch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct TwitterPostSet {
    posts: Vec<TwitterPost>,
}

/// What the LLM returns for the Facebook branch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct FacebookPostSet {
    posts: Vec<FacebookPost>,
}

/// Generates platform-specific posts from a summary. The two platform
/// branches run concurrently and fail independently: a failed branch is
/// replaced by a single post carrying the error message.
pub struct PostGenerator {
    model: Arc<dyn CompletionModel>,
    temperature: f32,
}

impl PostGenerator {
    pub fn new(model: Arc<dyn CompletionModel>, temperature: f32) -> Self {
        Self { model, temperature }
    }

    pub async fn generate(&self, summary: &str, topic: &str, url: &str) -> SocialPosts {
        let (twitter, facebook) = tokio::join!(
            self.twitter_branch(summary, topic, url),
            self.facebook_branch(summary, topic, url),
        );

        info!(
            twitter = twitter.len(),
            facebook = facebook.len(),
            "Post generation complete"
        );

        SocialPosts {
            branches: PostBranches { twitter, facebook },
        }
    }

    async fn twitter_branch(&self, summary: &str, topic: &str, url: &str) -> Vec<TwitterPost> {
        match self.generate_twitter(summary, topic, url).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(platform = %Platform::Twitter, error = %e, "Branch failed, substituting error post");
                vec![TwitterPost {
                    tweet: format!("Error generating Twitter posts: {e}"),
                }]
            }
        }
    }

    async fn facebook_branch(&self, summary: &str, topic: &str, url: &str) -> Vec<FacebookPost> {
        match self.generate_facebook(summary, topic, url).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(platform = %Platform::Facebook, error = %e, "Branch failed, substituting error post");
                vec![FacebookPost {
                    fb_post: format!("Error generating Facebook posts: {e}"),
                }]
            }
        }
    }

    async fn generate_twitter(
        &self,
        summary: &str,
        topic: &str,
        url: &str,
    ) -> Result<Vec<TwitterPost>, RepostError> {
        let raw = self
            .model
            .structured(
                POSTS_SYSTEM_PROMPT,
                &twitter_prompt(summary, topic, url),
                self.temperature,
                TwitterPostSet::openai_schema(),
            )
            .await
            .map_err(|e| RepostError::PostGeneration {
                platform: Platform::Twitter,
                message: e.to_string(),
            })?;

        let set: TwitterPostSet = serde_json::from_str(&raw)
            .map_err(|e| RepostError::Schema(format!("Twitter response: {e}")))?;

        if set.posts.len() != POSTS_PER_PLATFORM {
            warn!(
                count = set.posts.len(),
                expected = POSTS_PER_PLATFORM,
                "Unexpected Twitter post count"
            );
        }

        Ok(set.posts)
    }

    async fn generate_facebook(
        &self,
        summary: &str,
        topic: &str,
        url: &str,
    ) -> Result<Vec<FacebookPost>, RepostError> {
        let raw = self
            .model
            .structured(
                POSTS_SYSTEM_PROMPT,
                &facebook_prompt(summary, topic, url),
                self.temperature,
                FacebookPostSet::openai_schema(),
            )
            .await
            .map_err(|e| RepostError::PostGeneration {
                platform: Platform::Facebook,
                message: e.to_string(),
            })?;

        let set: FacebookPostSet = serde_json::from_str(&raw)
            .map_err(|e| RepostError::Schema(format!("Facebook response: {e}")))?;

        if set.posts.len() != POSTS_PER_PLATFORM {
            warn!(
                count = set.posts.len(),
                expected = POSTS_PER_PLATFORM,
                "Unexpected Facebook post count"
            );
        }

        Ok(set.posts)
    }
}

fn twitter_prompt(summary: &str, topic: &str, url: &str) -> String {
    format!(
        r#"{summary}

Based on the above content about {topic}, craft three highly engaging, concise, and impactful Twitter posts.
Ensure each tweet:
- Is within Twitter's 280-character limit, including the URL.
- Includes relevant hashtags related to {topic}.
- Has a brief call to action, encouraging followers to engage or learn more.
- Includes the following URL at the end of each tweet: {url}.
- Uses a tone that is both professional and approachable.
- Focus on the text, keeping each message engaging and concise.

Return exactly 3 posts."#
    )
}

fn facebook_prompt(summary: &str, topic: &str, url: &str) -> String {
    format!(
        r#"{summary}

Based on the above content about {topic}, craft three highly engaging and informative Facebook posts.
Ensure each post:
- Is engaging and encourages interaction, such as likes, comments, and shares.
- Can be more detailed and longer than a tweet, with a narrative or story-like structure.
- Includes a clear call to action, encouraging followers to engage or learn more.
- Includes the following URL at the end of the post: {url}.
- Uses a tone that is professional, yet conversational and approachable.
- Optionally includes relevant hashtags related to {topic}.

Return exactly 3 posts."#
    )
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;

    use super::*;

    /// Scripted per-branch responses; `None` simulates a failed request.
    struct BranchModel {
        twitter: Option<String>,
        facebook: Option<String>,
    }

    impl BranchModel {
        fn new(twitter: Option<&str>, facebook: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                twitter: twitter.map(String::from),
                facebook: facebook.map(String::from),
            })
        }
    }

    #[async_trait]
    impl CompletionModel for BranchModel {
        async fn complete(&self, _s: &str, _u: &str, _t: f32) -> Result<String> {
            anyhow::bail!("not used by the post generator");
        }

        async fn structured(
            &self,
            _system: &str,
            user: &str,
            _temperature: f32,
            _schema: serde_json::Value,
        ) -> Result<String> {
            let scripted = if user.contains("Twitter") {
                &self.twitter
            } else {
                &self.facebook
            };
            scripted
                .clone()
                .ok_or_else(|| anyhow::anyhow!("backend unavailable"))
        }
    }

    fn twitter_json() -> String {
        serde_json::to_string(&serde_json::json!({
            "posts": [
                {"tweet": "First take #news https://example.com"},
                {"tweet": "Second take #news https://example.com"},
                {"tweet": "Third take #news https://example.com"},
            ]
        }))
        .unwrap()
    }

    fn facebook_json() -> String {
        serde_json::to_string(&serde_json::json!({
            "posts": [
                {"fb_post": "A longer story one. https://example.com"},
                {"fb_post": "A longer story two. https://example.com"},
                {"fb_post": "A longer story three. https://example.com"},
            ]
        }))
        .unwrap()
    }

    async fn generate(model: Arc<BranchModel>) -> SocialPosts {
        PostGenerator::new(model, 0.7)
            .generate("A summary.", "AI", "https://example.com")
            .await
    }

    #[tokio::test]
    async fn test_both_branches_succeed() {
        let posts = generate(BranchModel::new(
            Some(&twitter_json()),
            Some(&facebook_json()),
        ))
        .await;

        assert_eq!(posts.branches.twitter.len(), 3);
        assert_eq!(posts.branches.facebook.len(), 3);
        assert_eq!(
            posts.branches.twitter[0].tweet,
            "First take #news https://example.com"
        );
        assert_eq!(
            posts.branches.facebook[2].fb_post,
            "A longer story three. https://example.com"
        );
    }

    #[tokio::test]
    async fn test_twitter_failure_does_not_block_facebook() {
        let posts = generate(BranchModel::new(None, Some(&facebook_json()))).await;

        assert_eq!(posts.branches.facebook.len(), 3);
        assert_eq!(posts.branches.twitter.len(), 1);
        assert!(posts.branches.twitter[0]
            .tweet
            .starts_with("Error generating Twitter posts:"));
    }

    #[tokio::test]
    async fn test_facebook_failure_does_not_block_twitter() {
        let posts = generate(BranchModel::new(Some(&twitter_json()), None)).await;

        assert_eq!(posts.branches.twitter.len(), 3);
        assert_eq!(posts.branches.facebook.len(), 1);
        assert!(posts.branches.facebook[0]
            .fb_post
            .starts_with("Error generating Facebook posts:"));
    }

    #[tokio::test]
    async fn test_malformed_json_becomes_substitute_post() {
        let posts = generate(BranchModel::new(
            Some("{\"posts\": [{\"wrong_field\": 1}]}"),
            Some(&facebook_json()),
        ))
        .await;

        assert_eq!(posts.branches.twitter.len(), 1);
        assert!(posts.branches.twitter[0].tweet.contains("Schema error"));
        assert_eq!(posts.branches.facebook.len(), 3);
    }

    #[tokio::test]
    async fn test_over_limit_tweets_pass_through_untruncated() {
        // length enforcement is delegated to the model; the pipeline must
        // not silently truncate what came back
        let long_tweet = format!("{} https://example.com", "x".repeat(300));
        let json = serde_json::to_string(&serde_json::json!({
            "posts": [{"tweet": long_tweet}]
        }))
        .unwrap();

        let posts = generate(BranchModel::new(Some(&json), Some(&facebook_json()))).await;

        assert_eq!(posts.branches.twitter.len(), 1);
        assert_eq!(posts.branches.twitter[0].tweet, long_tweet);
        assert!(posts.branches.twitter[0].tweet.chars().count() > 280);
    }

    #[test]
    fn test_prompts_embed_inputs_and_constraints() {
        let t = twitter_prompt("S.", "Rust", "https://example.com/a");
        assert!(t.contains("280-character limit"));
        assert!(t.contains("https://example.com/a"));
        assert!(t.contains("hashtags related to Rust"));

        let f = facebook_prompt("S.", "Rust", "https://example.com/a");
        assert!(f.contains("narrative or story-like structure"));
        assert!(f.contains("https://example.com/a"));
    }
}
