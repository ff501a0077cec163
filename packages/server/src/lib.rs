// AiNews Control Center - API Core
//
// Backend for the content-curation dashboard: ingestion of news candidates,
// Approve 1 review, prompt management and realtime change streams.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
