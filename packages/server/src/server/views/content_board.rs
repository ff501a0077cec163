//! Server-rendered Approve 1 board.
//!
//! Tabs with counters, one card per item with approve/reject buttons, and a
//! realtime subscription on `news_items` that reloads the page after a burst
//! of changes.

use crate::common::utils::{escape_html, is_web_url, truncate_with_ellipsis};
use crate::domains::content::{Approve1Decision, ContentFilter, ContentItem, ContentStats};

use super::components::{button_with_attrs, labeled_badge, loading_dots, ButtonVariant};

const SUMMARY_PREVIEW_CHARS: usize = 280;

const TABS: [(ContentFilter, &str); 4] = [
    (ContentFilter::Pending, "Ожидание"),
    (ContentFilter::All, "Все"),
    (ContentFilter::Approved, "Одобрено"),
    (ContentFilter::Rejected, "Отклонено"),
];

fn tab_count(stats: &ContentStats, filter: ContentFilter) -> i64 {
    match filter {
        ContentFilter::All => stats.total,
        ContentFilter::Pending => stats.pending,
        ContentFilter::Approved => stats.approved,
        ContentFilter::Rejected => stats.rejected,
    }
}

/// Gate 1 score color: green from 80, yellow from 50, red below.
pub fn score_color(score: Option<f32>) -> &'static str {
    match score {
        None => "bg-gray-500",
        Some(s) if s == 0.0 => "bg-gray-500",
        Some(s) if s >= 80.0 => "bg-green-500",
        Some(s) if s >= 50.0 => "bg-yellow-500",
        Some(_) => "bg-red-500",
    }
}

/// Badge label and tone for the Approve 1 decision.
fn decision_badge(item: &ContentItem) -> String {
    match item.approve1_decision {
        Some(Approve1Decision::Approved) => labeled_badge("Одобрено", "published"),
        Some(Approve1Decision::Rejected) => labeled_badge("Отклонено", "error"),
        None => labeled_badge("Ожидание", "queued"),
    }
}

fn render_tabs(active: ContentFilter, stats: &ContentStats) -> String {
    TABS.iter()
        .map(|(filter, label)| {
            let variant = if *filter == active {
                ButtonVariant::Default
            } else {
                ButtonVariant::Ghost
            };
            format!(
                r#"<a href="/content?filter={}">{}</a>"#,
                filter,
                button_with_attrs(
                    &format!("{} ({})", label, tab_count(stats, *filter)),
                    variant,
                    ""
                )
            )
        })
        .collect()
}

/// Link target for a stored URL; non-web schemes never reach `href`.
fn safe_href(url: &str) -> String {
    if is_web_url(url) {
        escape_html(url.trim())
    } else {
        "#".to_string()
    }
}

fn render_card(item: &ContentItem) -> String {
    let summary = item
        .rss_summary
        .as_deref()
        .map(|s| escape_html(&truncate_with_ellipsis(s, SUMMARY_PREVIEW_CHARS)))
        .unwrap_or_default();

    let score = match item.gate1_score {
        Some(score) => format!(
            r#"<span class="{} text-white text-xs rounded px-2 py-0.5">{:.0}</span>"#,
            score_color(Some(score)),
            score
        ),
        None => String::new(),
    };

    let tags: String = item
        .gate1_tags
        .iter()
        .flatten()
        .map(|tag| format!(r#"<span class="text-xs text-zinc-400">#{}</span> "#, escape_html(tag)))
        .collect();

    let actions = if item.approve1_decision.is_none() {
        let id_attr = format!(r#"data-news-id="{}""#, item.id);
        format!(
            r#"<div class="flex gap-2 mt-3">{}{}</div>"#,
            button_with_attrs(
                "Одобрить",
                ButtonVariant::Default,
                &format!(r#"{} data-action="approve""#, id_attr)
            ),
            button_with_attrs(
                "Отклонить",
                ButtonVariant::Outline,
                &format!(r#"{} data-action="reject""#, id_attr)
            ),
        )
    } else {
        String::new()
    };

    let new_marker = if item.is_viewed {
        ""
    } else {
        r#"<span class="w-2 h-2 rounded-full bg-blue-500 inline-block"></span>"#
    };

    format!(
        r#"<article class="rounded-lg border border-zinc-800 p-4" id="item-{id}">
  <div class="flex items-center gap-2 text-xs text-zinc-400">{new_marker}<span>{source}</span>{score}{badge}</div>
  <h3 class="text-lg font-semibold mt-1"><a href="{url}" target="_blank" rel="noopener">{title}</a></h3>
  <p class="text-sm text-zinc-300 mt-2">{summary}</p>
  <div class="mt-2">{tags}</div>
  {actions}
</article>"#,
        id = item.id,
        new_marker = new_marker,
        source = escape_html(item.source_name.as_deref().unwrap_or("Unknown")),
        score = score,
        badge = decision_badge(item),
        url = safe_href(&item.canonical_url),
        title = escape_html(&item.title),
        summary = summary,
        tags = tags,
        actions = actions,
    )
}

const BOARD_SCRIPT: &str = r#"
document.querySelectorAll('button[data-news-id]').forEach(function (btn) {
  btn.addEventListener('click', async function () {
    var id = btn.dataset.newsId;
    document.getElementById('pending').classList.remove('hidden');
    var res = await fetch('/api/content/' + id + '/' + btn.dataset.action, { method: 'POST' });
    var body = await res.json();
    document.getElementById('pending').classList.add('hidden');
    if (!body.success) { alert(body.error.message); }
    location.reload();
  });
});
var source = new EventSource('/api/realtime/news_items');
source.addEventListener('changed', function () { location.reload(); });
"#;

/// Whole board page for one tab.
pub fn render(filter: ContentFilter, stats: &ContentStats, items: &[ContentItem]) -> String {
    let cards: String = if items.is_empty() {
        r#"<p class="text-zinc-500">Нет новостей</p>"#.to_string()
    } else {
        items.iter().map(render_card).collect()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>AiNews Control Center</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-zinc-950 text-zinc-50">
  <main class="max-w-5xl mx-auto p-6">
    <h1 class="text-2xl font-bold">Модерация контента</h1>
    <p class="text-zinc-400">Одобряйте или отклоняйте новости, прошедшие AI-фильтр</p>
    <nav class="flex gap-2 my-4">{tabs}</nav>
    <div id="pending" class="hidden my-4">{dots}</div>
    <section class="grid gap-4">{cards}</section>
  </main>
  <script>{script}</script>
</body>
</html>"#,
        tabs = render_tabs(filter, stats),
        dots = loading_dots(),
        cards = cards,
        script = BOARD_SCRIPT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::NewsItemId;
    use chrono::Utc;

    fn item(title: &str) -> ContentItem {
        ContentItem {
            id: NewsItemId::new(),
            title: title.to_string(),
            source_name: Some("hunting.ru".into()),
            canonical_url: "https://hunting.ru/news/1".into(),
            published_at: None,
            rss_summary: Some("Summary".into()),
            image_url: None,
            gate1_decision: None,
            gate1_score: Some(86.0),
            gate1_tags: Some(vec!["duck".into()]),
            gate1_reason: None,
            gate1_processed_at: None,
            approve1_decision: None,
            approve1_decided_at: None,
            approve1_decided_by: None,
            sent_to_approve1_at: None,
            approve1_message_id: None,
            approve1_chat_id: None,
            status: "found".into(),
            is_viewed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_score_color_thresholds() {
        assert_eq!(score_color(None), "bg-gray-500");
        assert_eq!(score_color(Some(80.0)), "bg-green-500");
        assert_eq!(score_color(Some(50.0)), "bg-yellow-500");
        assert_eq!(score_color(Some(12.0)), "bg-red-500");
    }

    #[test]
    fn test_render_escapes_and_counts() {
        let stats = ContentStats {
            total: 7,
            pending: 3,
            approved: 2,
            rejected: 2,
        };
        let html = render(
            ContentFilter::Pending,
            &stats,
            &[item("Ducks & <geese>")],
        );

        assert!(html.contains("Ожидание (3)"));
        assert!(html.contains("Все (7)"));
        assert!(html.contains("Ducks &amp; &lt;geese&gt;"));
        assert!(html.contains(r#"data-action="approve""#));
        assert!(html.contains("#duck"));
    }

    #[test]
    fn test_decided_items_have_no_actions() {
        let mut decided = item("Done");
        decided.approve1_decision = Some(Approve1Decision::Rejected);
        let html = render_card(&decided);
        assert!(!html.contains("data-action"));
        assert!(html.contains("Отклонено"));
    }

    #[test]
    fn test_non_web_links_are_not_rendered_as_href() {
        let mut hostile = item("Click me");
        hostile.canonical_url = "javascript:alert(document.cookie)".into();
        let html = render_card(&hostile);
        assert!(html.contains(r##"href="#""##));
        assert!(!html.contains("javascript:"));

        let html = render_card(&item("Fine"));
        assert!(html.contains(r#"href="https://hunting.ru/news/1""#));
    }

    #[test]
    fn test_empty_board() {
        let html = render(ContentFilter::Approved, &ContentStats::default(), &[]);
        assert!(html.contains("Нет новостей"));
    }
}
