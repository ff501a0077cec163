// HTTP routes
pub mod actions;
pub mod board;
pub mod client_errors;
pub mod debug;
pub mod health;
pub mod integrations;
pub mod realtime;
pub mod scraper;
pub mod stream;

pub use actions::*;
pub use board::*;
pub use client_errors::*;
pub use debug::*;
pub use health::*;
pub use integrations::*;
pub use realtime::*;
pub use scraper::*;
pub use stream::*;
