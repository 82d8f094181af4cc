use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::OpenAi;
use repost_common::Config;
use repost_pipeline::fetcher::HttpFetcher;
use repost_pipeline::images::ImageGenerator;
use repost_pipeline::posts::PostGenerator;
use repost_pipeline::splitter::TextSplitter;
use repost_pipeline::summarizer::Summarizer;
use repost_pipeline::tokens::TiktokenTokenizer;
use repost_pipeline::Pipeline;

/// Turn a web article into a summary and platform-ready social media posts.
#[derive(Parser)]
#[command(name = "repost")]
struct Args {
    /// Article URL to repurpose
    url: String,

    /// Also generate this many topic images
    #[arg(long, default_value_t = 0)]
    images: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("repost_pipeline=info".parse()?),
        )
        .init();

    let args = Args::parse();

    // Load config
    let config = Config::from_env();
    config.log_redacted();

    let ai = OpenAi::new(&config.openai_api_key, &config.model_name)
        .with_timeout(Duration::from_secs(config.llm_timeout_secs));
    let model: Arc<OpenAi> = Arc::new(ai.clone());
    let tokenizer = Arc::new(TiktokenTokenizer::for_model(&config.model_name)?);

    let pipeline = Pipeline::new(
        Arc::new(HttpFetcher::new(Duration::from_secs(config.http_timeout_secs))),
        TextSplitter::new(config.chunk_size, config.chunk_overlap),
        Summarizer::new(
            model.clone(),
            tokenizer,
            config.summary_temperature,
            config.token_limit_threshold,
            config.summary_token_budget,
        ),
        PostGenerator::new(model, config.post_temperature),
    );

    let result = pipeline.run(&args.url).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if args.images > 0 {
        if result.summary.was_rejected() {
            info!("Skipping image generation for rejected content");
        } else {
            let images = ImageGenerator::new(ai);
            let urls = images
                .generate_social_images(&result.summary.topic, &result.summary.summary, args.images)
                .await?;
            for url in urls {
                println!("{url}");
            }
        }
    }

    Ok(())
}
