//! Content domain actions - entry points called from the HTTP routes

pub mod queries;
pub mod review;

pub use queries::{get_content_items, get_content_stats, get_content_stats_by_source};
pub use review::{approve_content_item, mark_content_viewed, reject_content_item};
