//! Integration tests for prompt actions and the key cleanup.

mod common;

use crate::common::{create_prompt, unique_key, TestHarness};
use control_center::common::ActionErrorCode;
use control_center::domains::prompts::actions::{
    fix_prompt_keys, get_system_prompt_by_key, get_system_prompts, update_system_prompt,
};
use control_center::domains::prompts::{SystemPrompt, SystemPromptUpdate};
use control_center::kernel::TestDependencies;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn prompts_are_ordered_by_category_then_key(ctx: &TestHarness) {
    let b = create_prompt(&ctx.db_pool, &unique_key("zz_b"), "zz-order").await.unwrap();
    let a = create_prompt(&ctx.db_pool, &unique_key("zz_a"), "zz-order").await.unwrap();
    let deps = ctx.deps(TestDependencies::new());

    let prompts = get_system_prompts(&deps).await.into_data().unwrap();

    let ours: Vec<i64> = prompts
        .iter()
        .filter(|p| p.category.as_deref() == Some("zz-order"))
        .map(|p| p.id)
        .collect();
    assert_eq!(ours, vec![a, b]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_changes_only_provided_fields(ctx: &TestHarness) {
    let id = create_prompt(&ctx.db_pool, &unique_key("partial"), "news").await.unwrap();
    let deps = ctx.deps(TestDependencies::new());

    let changes = SystemPromptUpdate {
        content: Some("Rewrite the headline.".into()),
        temperature: Some(0.2),
        ..Default::default()
    };
    let result = update_system_prompt(id, changes, &deps).await;
    assert!(result.is_success(), "{:?}", result);

    let prompt = SystemPrompt::find_by_id(id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(prompt.content, "Rewrite the headline.");
    assert_eq!(prompt.temperature, Some(0.2));
    assert_eq!(prompt.model.as_deref(), Some("gpt-4o"));
    assert_eq!(prompt.category.as_deref(), Some("news"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn empty_update_is_rejected(ctx: &TestHarness) {
    let id = create_prompt(&ctx.db_pool, &unique_key("empty"), "news").await.unwrap();
    let deps = ctx.deps(TestDependencies::new());

    let result = update_system_prompt(id, SystemPromptUpdate::default(), &deps).await;

    assert_eq!(result.error().unwrap().code, ActionErrorCode::InvalidRequest);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_of_unknown_prompt_is_not_found(ctx: &TestHarness) {
    let deps = ctx.deps(TestDependencies::new());
    let changes = SystemPromptUpdate {
        model: Some("gpt-4o-mini".into()),
        ..Default::default()
    };

    let result = update_system_prompt(i64::MAX, changes, &deps).await;

    assert_eq!(result.error().unwrap().code, ActionErrorCode::NotFound);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn lookup_by_key_tolerates_trailing_whitespace(ctx: &TestHarness) {
    let key = unique_key("news_writer");
    let id = create_prompt(&ctx.db_pool, &format!("{}  ", key), "news").await.unwrap();
    let deps = ctx.deps(TestDependencies::new());

    let prompt = get_system_prompt_by_key(&key, &deps).await.into_data().unwrap();
    assert_eq!(prompt.id, id);

    let missing = get_system_prompt_by_key(&unique_key("missing"), &deps).await;
    assert_eq!(missing.error().unwrap().code, ActionErrorCode::NotFound);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn fix_prompt_keys_trims_whitespace(ctx: &TestHarness) {
    let key = unique_key("padded");
    let id = create_prompt(&ctx.db_pool, &format!(" {}\n", key), "news").await.unwrap();

    let planned = fix_prompt_keys(true, &ctx.db_pool).await.unwrap();
    let fix = planned.iter().find(|f| f.id == id).expect("fix planned");
    assert_eq!(fix.to, key);
    let untouched = SystemPrompt::find_by_id(id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(untouched.key, format!(" {}\n", key));

    fix_prompt_keys(false, &ctx.db_pool).await.unwrap();
    let fixed = SystemPrompt::find_by_id(id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(fixed.key, key);
}
