//! Feed item extraction for RSS 2.0, RSS 1.0 and Atom.

use anyhow::{Context, Result};
use chrono::Utc;
use feed_rs::model::{Entry, Link};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::{display_host, ParsedItem};
use crate::common::utils::{collapse_whitespace, take_chars};

/// Longest stored summary, in characters.
pub const MAX_SUMMARY_CHARS: usize = 500;

lazy_static! {
    static ref IMG_SRC: Regex =
        Regex::new(r#"(?is)<img\b[^>]*\bsrc\s*=\s*["']([^"']+)["']"#).expect("static regex");
    static ref TAG: Regex = Regex::new(r"<[^>]+>").expect("static regex");
    static ref NUMERIC_ENTITY: Regex = Regex::new(r"&#(x?)([0-9a-fA-F]+);").expect("static regex");
}

/// Decode the HTML entities left in text after XML unescaping.
fn decode_entities(text: &str) -> String {
    let decoded = NUMERIC_ENTITY.replace_all(text, |caps: &Captures| {
        let radix = if caps[1].is_empty() { 10 } else { 16 };
        u32::from_str_radix(&caps[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Plain-text snippet of an HTML fragment.
fn snippet(html: &str) -> String {
    collapse_whitespace(&decode_entities(&TAG.replace_all(html, " ")))
}

/// The article link: `alternate` (or unqualified) first, then any link, then
/// a URL-shaped id (RSS `<guid isPermaLink>`).
fn article_link(entry: &Entry) -> String {
    let is_alternate = |l: &&Link| l.rel.as_deref().map_or(true, |rel| rel == "alternate");
    entry
        .links
        .iter()
        .find(is_alternate)
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .or_else(|| Some(entry.id.trim().to_string()).filter(|id| id.starts_with("http")))
        .unwrap_or_default()
}

fn image_url(entry: &Entry, content: Option<&str>) -> Option<String> {
    let media = entry.media.iter().find_map(|m| {
        m.content
            .iter()
            .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
            .or_else(|| m.thumbnails.first().map(|t| t.image.uri.clone()))
    });
    media.or_else(|| {
        content
            .and_then(|html| IMG_SRC.captures(html))
            .map(|c| c[1].to_string())
    })
}

/// Parse every entry of a feed.
///
/// Entries without a parseable date get the scan time. The source name is
/// the feed host without `www.`.
pub fn parse_feed(body: &str, feed_url: &str) -> Result<Vec<ParsedItem>> {
    let feed = feed_rs::parser::parse(body.as_bytes()).context("Response is not an RSS or Atom feed")?;

    let source_name = display_host(feed_url).unwrap_or_else(|| feed_url.to_string());
    let now = Utc::now();

    let items = feed
        .entries
        .iter()
        .map(|entry| {
            let content = entry
                .content
                .as_ref()
                .and_then(|c| c.body.clone())
                .or_else(|| entry.summary.as_ref().map(|s| s.content.clone()))
                .filter(|c| !c.trim().is_empty());

            let summary = content
                .as_deref()
                .map(|html| take_chars(&snippet(html), MAX_SUMMARY_CHARS))
                .filter(|s| !s.is_empty());

            ParsedItem {
                title: entry
                    .title
                    .as_ref()
                    .map(|t| snippet(&t.content))
                    .filter(|t| !t.is_empty()),
                link: article_link(entry),
                summary,
                published_at: Some(entry.published.or(entry.updated).unwrap_or(now)),
                image_url: image_url(entry, content.as_deref()),
                source_name: source_name.clone(),
            }
        })
        .collect();

    Ok(items)
}
