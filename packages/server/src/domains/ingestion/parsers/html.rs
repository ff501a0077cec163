//! HTML list-page parsing: configurable selectors and built-in site presets.

use anyhow::{Context, Result};
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use super::{display_host, ParsedItem};
use crate::common::utils::collapse_whitespace;
use crate::domains::ingestion::models::IngestionSource;

/// Selector config stored in `ingestion_sources.selectors`.
///
/// Every selector except `container` is evaluated inside each container
/// match. `"null"` is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlSelectors {
    pub container: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Where a preset takes the item title from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleFrom {
    LinkText,
    Selector(&'static str),
}

/// Hand-written parser for one site's news listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlPreset {
    pub name: &'static str,
    pub container: &'static str,
    /// `None` when the container is the link itself
    pub link: Option<&'static str>,
    pub title: TitleFrom,
    pub summary: Option<&'static str>,
    pub image: Option<&'static str>,
    /// Image attributes in preference order (lazy-loading sites use `data-src`)
    pub image_attrs: &'static [&'static str],
    /// Prefix for site-relative links
    pub base_url: &'static str,
    pub source_name: &'static str,
    /// hrefs containing any of these are pagination or archive links
    pub skip_hrefs: &'static [&'static str],
    /// The listing shows no parseable date; stamp items with the scan time
    pub stamp_scan_time: bool,
}

pub const PRESETS: [HtmlPreset; 4] = [
    HtmlPreset {
        name: "hunting-ru-news",
        container: ".content__central .record.btn-hidden-wrap",
        link: Some("a.record__title"),
        title: TitleFrom::LinkText,
        summary: Some(".record__text"),
        image: Some(".record__img-wrapper img"),
        image_attrs: &["src"],
        base_url: "https://www.hunting.ru",
        source_name: "hunting.ru",
        skip_hrefs: &[],
        stamp_scan_time: true,
    },
    HtmlPreset {
        name: "mooir-ru-news",
        container: "a[href^=\"/official/world-news/\"]",
        link: None,
        title: TitleFrom::LinkText,
        summary: None,
        image: None,
        image_attrs: &[],
        base_url: "https://mooir.ru",
        source_name: "mooir.ru",
        skip_hrefs: &["?page=", "archive/"],
        stamp_scan_time: false,
    },
    HtmlPreset {
        name: "mooir-ru-prikras",
        container: "a[href^=\"/official/prikras/\"]",
        link: None,
        title: TitleFrom::LinkText,
        summary: None,
        image: None,
        image_attrs: &[],
        base_url: "https://mooir.ru",
        source_name: "mooir.ru",
        skip_hrefs: &[],
        stamp_scan_time: false,
    },
    HtmlPreset {
        name: "ohotniki-ru-search",
        container: "ul.listing__body article.read-material",
        link: Some("a.cursor:not(.read-material__img)"),
        title: TitleFrom::Selector("h3.read-material__title"),
        summary: Some("p.read-material__text"),
        image: Some("a.read-material__img img"),
        image_attrs: &["data-src", "src"],
        base_url: "https://www.ohotniki.ru",
        source_name: "ohotniki.ru",
        skip_hrefs: &[],
        stamp_scan_time: false,
    },
];

impl HtmlPreset {
    pub fn by_name(name: &str) -> Option<Self> {
        PRESETS.iter().find(|p| p.name == name).copied()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow::anyhow!("Invalid selector '{}': {}", selector, e))
}

/// Optional selector, skipping absent and `"null"` values.
fn optional_selector(selector: Option<&str>) -> Result<Option<Selector>> {
    match selector.map(str::trim) {
        None | Some("") | Some("null") => Ok(None),
        Some(s) => parse_selector(s).map(Some),
    }
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = collapse_whitespace(&element.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

fn first_text(scope: ElementRef<'_>, selector: Option<&Selector>) -> Option<String> {
    scope.select(selector?).next().and_then(element_text)
}

fn first_attr(scope: ElementRef<'_>, selector: Option<&Selector>, attrs: &[&str]) -> Option<String> {
    let element = scope.select(selector?).next()?;
    attrs
        .iter()
        .filter_map(|attr| element.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolve a listing href against the page's origin.
fn absolutize(href: &str, page_url: &Url) -> Option<String> {
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    let origin = Url::parse(&page_url.origin().ascii_serialization()).ok()?;
    origin.join(href).ok().map(String::from)
}

/// Universal parser driven by [`HtmlSelectors`].
pub fn parse_with_selectors(
    body: &str,
    selectors: &HtmlSelectors,
    source: &IngestionSource,
) -> Result<Vec<ParsedItem>> {
    let page_url = Url::parse(&source.url).context("Source URL is not valid")?;
    let container = parse_selector(&selectors.container)?;
    let link_selector = optional_selector(selectors.link.as_deref())?;
    let title = optional_selector(selectors.title.as_deref())?;
    let summary = optional_selector(selectors.summary.as_deref())?;
    let image = optional_selector(selectors.image.as_deref())?;

    let source_name = if source.name.trim().is_empty() {
        display_host(&source.url).unwrap_or_default()
    } else {
        source.name.clone()
    };

    let document = Html::parse_document(body);
    let items = document
        .select(&container)
        .filter_map(|el| {
            let href = first_attr(el, link_selector.as_ref(), &["href"])?;
            let link = absolutize(&href, &page_url)?;
            Some(ParsedItem {
                title: first_text(el, title.as_ref()),
                link,
                summary: first_text(el, summary.as_ref()),
                published_at: None,
                image_url: first_attr(el, image.as_ref(), &["src"]),
                source_name: source_name.clone(),
            })
        })
        .collect();

    Ok(items)
}

fn preset_link(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url, href)
    } else {
        format!("{}/{}", base_url, href)
    }
}

struct CompiledPreset {
    container: Selector,
    link: Option<Selector>,
    title: Option<Selector>,
    summary: Option<Selector>,
    image: Option<Selector>,
}

impl CompiledPreset {
    fn compile(preset: &HtmlPreset) -> Result<Self> {
        Ok(Self {
            container: parse_selector(preset.container)?,
            link: optional_selector(preset.link)?,
            title: match preset.title {
                TitleFrom::Selector(s) => Some(parse_selector(s)?),
                TitleFrom::LinkText => None,
            },
            summary: optional_selector(preset.summary)?,
            image: optional_selector(preset.image)?,
        })
    }
}

/// Built-in site parser. An invalid preset selector is logged and yields nothing.
pub fn parse_with_preset(body: &str, preset: &HtmlPreset) -> Vec<ParsedItem> {
    let selectors = match CompiledPreset::compile(preset) {
        Ok(selectors) => selectors,
        Err(e) => {
            warn!(preset = preset.name, error = %e, "Preset selectors failed to compile");
            return Vec::new();
        }
    };

    let scanned_at = preset.stamp_scan_time.then(Utc::now);
    let document = Html::parse_document(body);

    document
        .select(&selectors.container)
        .filter_map(|el| {
            let link_el = match &selectors.link {
                Some(selector) => el.select(selector).next()?,
                None => el,
            };
            let href = link_el.value().attr("href")?.trim();
            if href.is_empty() || preset.skip_hrefs.iter().any(|skip| href.contains(skip)) {
                return None;
            }

            let title = match preset.title {
                TitleFrom::LinkText => element_text(link_el),
                TitleFrom::Selector(_) => first_text(el, selectors.title.as_ref()),
            };

            Some(ParsedItem {
                title,
                link: preset_link(preset.base_url, href),
                summary: first_text(el, selectors.summary.as_ref()),
                published_at: scanned_at,
                image_url: first_attr(el, selectors.image.as_ref(), preset.image_attrs),
                source_name: preset.source_name.to_string(),
            })
        })
        .collect()
}
