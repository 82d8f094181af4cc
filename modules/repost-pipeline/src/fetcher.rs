use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use tracing::{info, warn};

use repost_common::{Document, RepostError};

use crate::text::normalize;

/// Retrieves a page's text content and metadata. Object-safe so tests can
/// substitute canned documents.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<Document>, RepostError>;
}

/// Fetcher that issues a plain HTTP GET and extracts the main article text
/// with Readability.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<Document>, RepostError> {
        let parsed = url::Url::parse(url)
            .map_err(|e| RepostError::Fetch(format!("Invalid URL {url}: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RepostError::Fetch(format!(
                "Only http/https URLs are allowed, got: {}",
                parsed.scheme()
            )));
        }

        info!(url, "Fetching page");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| RepostError::Fetch(format!("Request failed for {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepostError::Fetch(format!("HTTP {status} for {url}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_text_content(&content_type) {
            return Err(RepostError::Fetch(format!(
                "Unsupported content type {content_type:?} for {url}"
            )));
        }

        // canonical URL after redirects
        let source_url = response.url().to_string();

        let html = response
            .text()
            .await
            .map_err(|e| RepostError::Fetch(format!("Failed to read body for {url}: {e}")))?;
        if html.trim().is_empty() {
            return Err(RepostError::Fetch(format!("Empty response body for {url}")));
        }

        let title = extract_title(&html).unwrap_or_else(|| source_url.clone());

        let parsed_url = url::Url::parse(&source_url).ok();
        let config = TransformConfig {
            readability: true,
            main_content: true,
            return_format: ReturnFormat::Markdown,
            filter_images: true,
            filter_svg: true,
            clean_html: true,
        };
        let input = TransformInput {
            url: parsed_url.as_ref(),
            content: html.as_bytes(),
            screenshot_bytes: None,
            encoding: None,
            selector_config: None,
            ignore_tags: None,
        };

        let text = transform_content_input(input, &config);
        let content = normalize(&text);

        if content.is_empty() {
            warn!(url, "Empty content after Readability extraction");
            return Err(RepostError::Fetch(format!(
                "No text content extracted from {url}"
            )));
        }

        info!(
            url,
            chars = content.len(),
            title = title.as_str(),
            "Fetched page"
        );

        Ok(vec![Document {
            content,
            source_url,
            title,
        }])
    }
}

fn is_text_content(content_type: &str) -> bool {
    // missing header: assume HTML rather than refuse
    content_type.is_empty()
        || content_type.contains("text/")
        || content_type.contains("html")
        || content_type.contains("xml")
}

/// Pull the page title out of raw HTML, normalized and with the common
/// entities decoded.
pub fn extract_title(html: &str) -> Option<String> {
    let title_re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex");
    let raw = title_re.captures(html)?.get(1)?.as_str();
    let title = normalize(&decode_entities(raw));
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let html = "<html><head><title>  Unlock the Power\nof Ads </title></head></html>";
        assert_eq!(
            extract_title(html),
            Some("Unlock the Power of Ads".to_string())
        );
    }

    #[test]
    fn test_extract_title_decodes_entities() {
        let html = "<title>Ben &amp; Jerry&#39;s Guide</title>";
        assert_eq!(extract_title(html), Some("Ben & Jerry's Guide".to_string()));
    }

    #[test]
    fn test_extract_title_missing_or_empty() {
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
    }

    #[test]
    fn test_is_text_content() {
        assert!(is_text_content("text/html; charset=utf-8"));
        assert!(is_text_content("application/xhtml+xml"));
        assert!(is_text_content(""));
        assert!(!is_text_content("application/pdf"));
        assert!(!is_text_content("image/png"));
    }
}
