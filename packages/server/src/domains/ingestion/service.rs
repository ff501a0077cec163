//! Ingestion runner: scan sources, store new candidates.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::models::{IngestionSource, RunStatus};
use super::parsers::{ParsedItem, SourceParser};
use crate::common::utils::{is_web_url, take_chars};
use crate::common::IngestionSourceId;
use crate::domains::content::models::{ContentItem, NewContentItem};
use crate::kernel::{log_system_event, ServerDeps, SystemEventKind};

/// Characters of summary or link used when an item has no title.
const TITLE_FALLBACK_CHARS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    pub total_found: usize,
    pub new_inserted: usize,
    /// `"{source name}: {error}"` per failed source
    pub errors: Vec<String>,
}

fn to_new_item(item: ParsedItem) -> NewContentItem {
    let title = item
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            item.summary
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| take_chars(s, TITLE_FALLBACK_CHARS))
        })
        .unwrap_or_else(|| take_chars(&item.link, TITLE_FALLBACK_CHARS));

    NewContentItem {
        title,
        canonical_url: item.link.trim().to_string(),
        source_name: Some(item.source_name).filter(|s| !s.is_empty()),
        rss_summary: item.summary,
        published_at: item.published_at,
        image_url: item.image_url.filter(|u| is_web_url(u)),
    }
}

/// Fetch, parse and store one source. Returns `(found, inserted)`.
async fn ingest_source(source: &IngestionSource, deps: &ServerDeps) -> Result<(usize, usize)> {
    let Some(parser) = SourceParser::for_source(source)? else {
        warn!(source = %source.name, "Unknown legacy parser, skipping");
        return Ok((0, 0));
    };

    let body = deps.fetcher.fetch_text(&source.url).await?;
    let items = parser.parse(source, &body)?;
    let found = items.len();

    let mut inserted = 0;
    for item in items {
        if !is_web_url(&item.link) {
            debug!(source = %source.name, link = %item.link, "Skipping item without a web link");
            continue;
        }
        if ContentItem::insert_if_new(&to_new_item(item), &deps.db_pool).await? {
            inserted += 1;
        }
    }

    Ok((found, inserted))
}

/// Scan active sources (or only `source_ids` among them).
///
/// A failing source is recorded in the report and on its row; the run goes on.
pub async fn run_ingestion(
    source_ids: Option<&[IngestionSourceId]>,
    deps: &ServerDeps,
) -> Result<IngestionReport> {
    let mut sources = IngestionSource::find_active(&deps.db_pool).await?;
    if let Some(ids) = source_ids {
        sources.retain(|s| ids.contains(&s.id));
    }

    info!(sources = sources.len(), "Starting ingestion");
    log_system_event(
        &deps.stream_hub,
        format!("Scanning {} sources...", sources.len()),
        SystemEventKind::Wait,
    )
    .await;

    let mut report = IngestionReport::default();

    for source in &sources {
        info!(source = %source.name, url = %source.url, "Ingesting source");

        let (status, error_message) = match ingest_source(source, deps).await {
            Ok((found, inserted)) => {
                info!(source = %source.name, found, inserted, "Source processed");
                report.total_found += found;
                report.new_inserted += inserted;
                (RunStatus::Success, None)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(source = %source.name, error = %message, "Source ingestion failed");
                report.errors.push(format!("{}: {}", source.name, message));
                (RunStatus::Error, Some(message))
            }
        };

        if let Err(e) =
            IngestionSource::record_run(source.id, status, error_message.as_deref(), &deps.db_pool).await
        {
            warn!(source = %source.name, error = %e, "Failed to record source run");
        }
    }

    let (summary, kind) = if report.errors.is_empty() {
        (
            format!(
                "Ingestion finished: {} new of {} found",
                report.new_inserted, report.total_found
            ),
            SystemEventKind::Success,
        )
    } else {
        (
            format!(
                "Ingestion finished with {} errors: {} new of {} found",
                report.errors.len(),
                report.new_inserted,
                report.total_found
            ),
            SystemEventKind::Error,
        )
    };
    info!(
        found = report.total_found,
        inserted = report.new_inserted,
        errors = report.errors.len(),
        "Ingestion finished"
    );
    log_system_event(&deps.stream_hub, summary, kind).await;

    Ok(report)
}
