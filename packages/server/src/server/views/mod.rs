// Server-rendered HTML
pub mod components;
pub mod content_board;

pub use components::{
    button, button_with_attrs, labeled_badge, loading_dots, status_badge, ButtonVariant,
};
