//! Content domain - news candidates and the Approve 1 review step

pub mod actions;
pub mod models;

pub use models::{
    Approve1Decision, ContentFilter, ContentItem, ContentStats, Gate1Decision, SourceCount,
};
