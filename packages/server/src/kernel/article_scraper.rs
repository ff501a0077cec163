//! Article scraper - local HTTP fetch + HTML text extraction
//!
//! Extraction order:
//! 1. caller-supplied CSS selector
//! 2. main content containers (`article`, `main`, `.entry-content`, ...) with
//!    navigation and script subtrees skipped
//! 3. blind tag stripping of the raw HTML
//!
//! The result is whitespace-collapsed and capped at [`MAX_ARTICLE_CHARS`].
//! No JavaScript rendering.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

use super::{BaseArticleScraper, BasePageFetcher};
use crate::common::utils::{collapse_whitespace, take_chars};

/// Upper bound on returned text, keeps downstream prompts within token limits
pub const MAX_ARTICLE_CHARS: usize = 15_000;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const MAIN_SELECTORS: [&str; 9] = [
    "article",
    "main",
    "[role='main']",
    ".article-body",
    ".post-content",
    ".entry-content",
    "#content",
    ".content",
    "body",
];

const SKIPPED_TAGS: [&str; 10] = [
    "script", "style", "noscript", "iframe", "nav", "header", "footer", "aside", "form", "svg",
];

lazy_static! {
    static ref SCRIPT_BLOCK: Regex = Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("static regex");
    static ref STYLE_BLOCK: Regex = Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("static regex");
    static ref TAG: Regex = Regex::new(r"<[^>]+>").expect("static regex");
}

pub struct ArticleScraper {
    client: reqwest::Client,
}

impl ArticleScraper {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.9,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Normalize URL by adding https:// if no scheme is present
    fn normalize_url(url: &str) -> String {
        let url = url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }

    /// Extract article text from an HTML document (steps 1-3 above, uncapped).
    pub fn extract_text(html: &str, selector: Option<&str>) -> String {
        let document = Html::parse_document(html);

        if let Some(selector_str) = selector {
            match Selector::parse(selector_str) {
                Ok(selector) => {
                    if let Some(target) = document.select(&selector).next() {
                        let text = collapse_whitespace(&target.text().collect::<String>());
                        if !text.is_empty() {
                            return text;
                        }
                    }
                    debug!(selector = %selector_str, "Custom selector matched nothing");
                }
                Err(_) => warn!(selector = %selector_str, "Invalid custom selector"),
            }
        }

        for selector_str in MAIN_SELECTORS {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            if let Some(container) = document.select(&selector).next() {
                let mut text = String::new();
                collect_visible_text(container, &mut text);
                let text = collapse_whitespace(&text);
                if !text.is_empty() {
                    return text;
                }
            }
        }

        Self::strip_tags(html)
    }

    fn strip_tags(html: &str) -> String {
        let without_scripts = SCRIPT_BLOCK.replace_all(html, "");
        let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
        collapse_whitespace(&TAG.replace_all(&without_styles, " "))
    }
}

/// Append the text of `element`, skipping non-content subtrees.
fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !SKIPPED_TAGS.contains(&child_element.value().name()) {
                collect_visible_text(child_element, out);
            }
        }
    }
}

#[async_trait]
impl BasePageFetcher for ArticleScraper {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

#[async_trait]
impl BaseArticleScraper for ArticleScraper {
    async fn scrape_article(&self, url: &str, selector: Option<&str>) -> Result<String> {
        let url = Self::normalize_url(url);
        debug!(url = %url, "Scraping article");

        let html = self.fetch_text(&url).await?;
        let text = take_chars(&Self::extract_text(&html, selector), MAX_ARTICLE_CHARS);

        if text.chars().count() < 100 {
            warn!(url = %url, length = text.chars().count(), "Article has minimal content");
        }

        Ok(text)
    }
}
