pub mod ingestion_source;

pub use ingestion_source::{IngestionSource, RunStatus, SourceType};
