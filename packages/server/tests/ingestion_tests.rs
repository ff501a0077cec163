//! Integration tests for the ingestion runner.
//!
//! Sources are fetched through `MockPageFetcher`; every test restricts the run
//! to its own source ids so parallel tests never scan each other's sources.

mod common;

use crate::common::TestHarness;
use control_center::common::NewsItemId;
use control_center::domains::content::ContentItem;
use control_center::domains::ingestion::actions::trigger_ingestion;
use control_center::domains::ingestion::{run_ingestion, IngestionSource, SourceType};
use control_center::kernel::test_dependencies::MockPageFetcher;
use control_center::kernel::TestDependencies;
use serde_json::json;
use test_context::test_context;
use uuid::Uuid;

fn feed(base: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item>
    <title>Весенняя охота открыта</title>
    <link>{base}/news/1</link>
    <description>Сроки и правила весенней охоты</description>
    <pubDate>Tue, 10 Jun 2025 09:30:00 +0300</pubDate>
  </item>
  <item>
    <link>{base}/news/2</link>
    <description>Новость без заголовка, но с описанием достаточной длины для заголовка</description>
  </item>
</channel></rss>"#,
        base = base
    )
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rss_source_inserts_new_items_once(ctx: &TestHarness) {
    let base = format!("https://rss-{}.example.org", Uuid::new_v4().simple());
    let feed_url = format!("{}/rss", base);
    let source = IngestionSource::create("Test RSS", SourceType::Rss, &feed_url, None, &ctx.db_pool)
        .await
        .unwrap();
    let deps = ctx.deps(
        TestDependencies::new().mock_fetcher(MockPageFetcher::new().with_page(&feed_url, &feed(&base))),
    );

    let report = run_ingestion(Some([source.id].as_slice()), &deps).await.unwrap();
    assert_eq!(report.total_found, 2);
    assert_eq!(report.new_inserted, 2);
    assert!(report.errors.is_empty());

    let again = run_ingestion(Some([source.id].as_slice()), &deps).await.unwrap();
    assert_eq!(again.total_found, 2);
    assert_eq!(again.new_inserted, 0);

    let url = format!("{}/news/2", base);
    let id: NewsItemId =
        sqlx::query_scalar("SELECT id FROM news_items WHERE canonical_url = $1")
            .bind(&url)
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    let item = ContentItem::find_by_id(id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(item.status, "found");
    assert_eq!(item.title.chars().count(), 50);
    assert!(item.title.starts_with("Новость без заголовка"));

    let source = IngestionSource::find_by_id(source.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(source.last_status.as_deref(), Some("success"));
    assert!(source.last_run_at.is_some());
    assert!(source.error_message.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn html_source_uses_configured_selectors(ctx: &TestHarness) {
    let base = format!("https://html-{}.example.org", Uuid::new_v4().simple());
    let page_url = format!("{}/news", base);
    let page = r#"<html><body>
        <div class="card"><a class="title" href="/news/a">Лоси на трассе</a><p>Осторожно</p></div>
        <div class="card"><a class="title" href="/news/b">Новые квоты</a></div>
        <div class="card"><span>no link</span></div>
    </body></html>"#;
    let source = IngestionSource::create(
        "Test HTML",
        SourceType::Html,
        &page_url,
        Some(json!({"container": ".card", "link": "a.title", "title": "a.title", "summary": "p"})),
        &ctx.db_pool,
    )
    .await
    .unwrap();
    let deps = ctx.deps(
        TestDependencies::new().mock_fetcher(MockPageFetcher::new().with_page(&page_url, page)),
    );

    let report = run_ingestion(Some([source.id].as_slice()), &deps).await.unwrap();

    assert_eq!(report.total_found, 2);
    assert_eq!(report.new_inserted, 2);
    let exists = ContentItem::exists_by_canonical_url(&format!("{}/news/a", base), &ctx.db_pool)
        .await
        .unwrap();
    assert!(exists);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failing_source_is_recorded_and_run_continues(ctx: &TestHarness) {
    let base = format!("https://mixed-{}.example.org", Uuid::new_v4().simple());
    let good_url = format!("{}/rss", base);
    let good = IngestionSource::create("Good", SourceType::Rss, &good_url, None, &ctx.db_pool)
        .await
        .unwrap();
    let broken = IngestionSource::create(
        "Broken",
        SourceType::Rss,
        &format!("{}/gone", base),
        None,
        &ctx.db_pool,
    )
    .await
    .unwrap();
    let deps = ctx.deps(
        TestDependencies::new().mock_fetcher(MockPageFetcher::new().with_page(&good_url, &feed(&base))),
    );

    let report = run_ingestion(Some([good.id, broken.id].as_slice()), &deps).await.unwrap();

    assert_eq!(report.new_inserted, 2);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("Broken: "));

    let broken = IngestionSource::find_by_id(broken.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(broken.last_status.as_deref(), Some("error"));
    assert!(broken.error_message.unwrap().contains("404"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn inactive_sources_are_skipped(ctx: &TestHarness) {
    let url = format!("https://off-{}.example.org/rss", Uuid::new_v4().simple());
    let source = IngestionSource::create("Off", SourceType::Rss, &url, None, &ctx.db_pool)
        .await
        .unwrap();
    IngestionSource::set_active(source.id, false, &ctx.db_pool).await.unwrap();
    let test_deps = TestDependencies::new();
    let fetcher = test_deps.fetcher.clone();
    let deps = ctx.deps(test_deps);

    let result = trigger_ingestion(Some(vec![source.id]), &deps).await;

    let report = result.into_data().unwrap();
    assert_eq!(report.total_found, 0);
    assert!(fetcher.calls().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn universal_source_without_selectors_is_an_error(ctx: &TestHarness) {
    let url = format!("https://bare-{}.example.org/", Uuid::new_v4().simple());
    let source = IngestionSource::create("Bare", SourceType::Html, &url, None, &ctx.db_pool)
        .await
        .unwrap();
    let deps = ctx.deps(TestDependencies::new());

    let report = trigger_ingestion(Some(vec![source.id]), &deps)
        .await
        .into_data()
        .unwrap();

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("Missing selectors config for universal parser"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn atom_feed_is_ingested_as_rss_source(ctx: &TestHarness) {
    let base = format!("https://atom-{}.example.org", Uuid::new_v4().simple());
    let feed_url = format!("{}/atom.xml", base);
    let atom = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Рыбалка</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93c-0003939e0af6</id>
  <updated>2025-06-11T08:00:00Z</updated>
  <entry>
    <title>Запрет на ловлю щуки</title>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <link rel="alternate" href="{base}/pike"/>
    <updated>2025-06-11T08:00:00Z</updated>
    <summary>Нерестовый запрет начинается в понедельник</summary>
  </entry>
</feed>"#,
        base = base
    );
    let source = IngestionSource::create("Test Atom", SourceType::Rss, &feed_url, None, &ctx.db_pool)
        .await
        .unwrap();
    let deps = ctx.deps(
        TestDependencies::new().mock_fetcher(MockPageFetcher::new().with_page(&feed_url, &atom)),
    );

    let report = run_ingestion(Some([source.id].as_slice()), &deps).await.unwrap();
    assert_eq!(report.total_found, 1);
    assert_eq!(report.new_inserted, 1);
    assert!(report.errors.is_empty());
    assert!(
        ContentItem::exists_by_canonical_url(&format!("{}/pike", base), &ctx.db_pool)
            .await
            .unwrap()
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn non_web_links_are_never_stored(ctx: &TestHarness) {
    let base = format!("https://xss-{}.example.org", Uuid::new_v4().simple());
    let feed_url = format!("{}/rss", base);
    let body = format!(
        r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item>
    <title>Hostile</title>
    <link>javascript:alert(document.cookie)</link>
  </item>
  <item>
    <title>Regular news</title>
    <link>{base}/news/ok</link>
    <enclosure url="javascript:alert(1)" type="image/jpeg" length="1"/>
  </item>
</channel></rss>"#,
        base = base
    );
    let source = IngestionSource::create("Test XSS", SourceType::Rss, &feed_url, None, &ctx.db_pool)
        .await
        .unwrap();
    let deps = ctx.deps(
        TestDependencies::new().mock_fetcher(MockPageFetcher::new().with_page(&feed_url, &body)),
    );

    let report = run_ingestion(Some([source.id].as_slice()), &deps).await.unwrap();
    assert_eq!(report.total_found, 2);
    assert_eq!(report.new_inserted, 1);

    assert!(
        !ContentItem::exists_by_canonical_url("javascript:alert(document.cookie)", &ctx.db_pool)
            .await
            .unwrap()
    );
    let image: Option<String> =
        sqlx::query_scalar("SELECT image_url FROM news_items WHERE canonical_url = $1")
            .bind(format!("{}/news/ok", base))
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    assert!(image.is_none());
}
