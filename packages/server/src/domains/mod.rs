// Business domains
pub mod client_errors;
pub mod content;
pub mod ingestion;
pub mod prompts;
pub mod review;
pub mod settings;
