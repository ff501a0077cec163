// Common types and utilities shared across the application

pub mod action_result;
pub mod ids;
pub mod utils;

pub use action_result::{ActionError, ActionErrorCode, ActionResult};
pub use ids::*;
