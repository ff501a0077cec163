pub mod content_item;

pub use content_item::{
    Approve1Decision, ContentFilter, ContentItem, ContentStats, Gate1Decision, NewContentItem,
    SourceCount, PENDING_STATUS,
};
