// HTTP server setup (Axum + JSON actions + SSE)
pub mod app;
pub mod error;
pub mod routes;
pub mod views;

pub use app::*;
