//! Ingestion domain - scanning RSS feeds and HTML listings for news candidates

pub mod actions;
pub mod models;
pub mod parsers;
pub mod service;

pub use models::{IngestionSource, RunStatus, SourceType};
pub use service::{run_ingestion, IngestionReport};
