//! Review domain - generated drafts awaiting editorial review

pub mod models;

pub use models::{DraftImage, ReviewItem};
