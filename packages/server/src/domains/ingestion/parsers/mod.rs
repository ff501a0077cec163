//! Source parsers turning a fetched feed or page into news candidates.
//!
//! Parsers are pure: the runner fetches the body and hands it over.

pub mod html;
pub mod rss;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use url::Url;

use super::models::{IngestionSource, SourceType};
pub use html::{HtmlPreset, HtmlSelectors};

/// One candidate found on a source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedItem {
    pub title: Option<String>,
    /// Absolute article URL, used for deduplication
    pub link: String,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub source_name: String,
}

/// How a source's body is parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceParser {
    Rss,
    Html(HtmlSelectors),
    Preset(HtmlPreset),
}

impl SourceParser {
    /// Pick the parser for a source.
    ///
    /// `selectors.legacy_parser` overrides the type-based choice. Returns
    /// `Ok(None)` for an unknown legacy parser name.
    pub fn for_source(source: &IngestionSource) -> Result<Option<Self>> {
        let legacy = source
            .selectors
            .as_ref()
            .and_then(|s| s.get("legacy_parser"))
            .and_then(|v| v.as_str());

        match legacy {
            Some("generic-rss") => return Ok(Some(Self::Rss)),
            Some("html-universal") => {}
            Some(name) => return Ok(HtmlPreset::by_name(name).map(Self::Preset)),
            None if source.source_type == SourceType::Rss => return Ok(Some(Self::Rss)),
            None => {}
        }

        let selectors = source
            .selectors
            .clone()
            .context("Missing selectors config for universal parser")?;
        let selectors: HtmlSelectors = serde_json::from_value(selectors)
            .context("Missing selectors config for universal parser")?;
        Ok(Some(Self::Html(selectors)))
    }

    pub fn parse(&self, source: &IngestionSource, body: &str) -> Result<Vec<ParsedItem>> {
        match self {
            Self::Rss => rss::parse_feed(body, &source.url),
            Self::Html(selectors) => html::parse_with_selectors(body, selectors, source),
            Self::Preset(preset) => Ok(html::parse_with_preset(body, preset)),
        }
    }
}

/// Host of a URL without a leading `www.`.
pub fn display_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|h| h.trim_start_matches("www.").to_string())
}
