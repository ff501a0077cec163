//! Presentational HTML fragments shared by the dashboard pages.

use std::fmt;

use crate::common::utils::escape_html;

const BADGE_BASE: &str = "px-2 py-1 rounded-full text-xs font-medium border";

const BUTTON_BASE: &str = "inline-flex items-center justify-center whitespace-nowrap rounded-md text-sm font-medium ring-offset-background transition-colors focus-visible:outline-none focus-visible:ring-2 focus-visible:ring-ring focus-visible:ring-offset-2 disabled:pointer-events-none disabled:opacity-50 h-10 px-4 py-2";

/// Tone classes per pipeline status. Unknown statuses use the `queued` tone.
pub fn status_tone(status: &str) -> &'static str {
    match status {
        "processing" => "bg-blue-500/10 text-blue-500 border-blue-500/20",
        "published" => "bg-green-500/10 text-green-500 border-green-500/20",
        "error" => "bg-red-500/10 text-red-500 border-red-500/20",
        _ => "bg-yellow-500/10 text-yellow-500 border-yellow-500/20",
    }
}

/// Pill showing a status label.
pub fn status_badge(status: &str) -> String {
    labeled_badge(status, status)
}

/// Pill with the tone of `status` and a custom label.
pub fn labeled_badge(label: &str, status: &str) -> String {
    format!(
        r#"<span class="{} {}">{}</span>"#,
        BADGE_BASE,
        status_tone(status),
        escape_html(label)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Default,
    Ghost,
    Outline,
    Secondary,
}

impl ButtonVariant {
    pub fn classes(&self) -> &'static str {
        match self {
            Self::Default => "bg-zinc-100 text-zinc-900 hover:bg-zinc-100/90",
            Self::Ghost => "hover:bg-zinc-800 hover:text-zinc-50",
            Self::Outline => "border border-zinc-800 bg-transparent hover:bg-zinc-800",
            Self::Secondary => "bg-zinc-800 text-zinc-50 hover:bg-zinc-800/80",
        }
    }
}

/// Button markup. `attrs` is inserted verbatim and must already be escaped.
pub fn button_with_attrs(label: &str, variant: ButtonVariant, attrs: &str) -> String {
    let attrs = if attrs.is_empty() {
        String::new()
    } else {
        format!(" {}", attrs)
    };
    format!(
        r#"<button type="button" class="{} {}"{}>{}</button>"#,
        BUTTON_BASE,
        variant.classes(),
        attrs,
        escape_html(label)
    )
}

pub fn button(label: &str, variant: ButtonVariant) -> String {
    button_with_attrs(label, variant, "")
}

/// Three pulsing dots, staggered by 0.15s.
pub fn loading_dots() -> String {
    let dots: String = (0..3)
        .map(|i| {
            format!(
                r#"<div class="w-2.5 h-2.5 rounded-full bg-current animate-premium-dot" style="animation-delay: {}s"></div>"#,
                DotDelay(i)
            )
        })
        .collect();
    format!(
        r#"<div class="flex items-center justify-center gap-1.5">{}</div>"#,
        dots
    )
}

/// Renders `i * 0.15` without float noise (`0`, `0.15`, `0.3`).
struct DotDelay(u32);

impl fmt::Display for DotDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hundredths = self.0 * 15;
        match (hundredths / 100, hundredths % 100) {
            (whole, 0) => write!(f, "{}", whole),
            (whole, frac) if frac % 10 == 0 => write!(f, "{}.{}", whole, frac / 10),
            (whole, frac) => write!(f, "{}.{:02}", whole, frac),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_badge_tones() {
        let badge = status_badge("published");
        assert!(badge.contains("text-green-500"));
        assert!(badge.contains(">published</span>"));

        let unknown = status_badge("archived");
        assert!(unknown.contains(status_tone("queued")));
    }

    #[test]
    fn test_status_badge_escapes_label() {
        let badge = status_badge("<script>");
        assert!(badge.contains("&lt;script&gt;"));
        assert!(!badge.contains("<script>"));
    }

    #[test]
    fn test_button_variants() {
        assert!(button("Save", ButtonVariant::default()).contains("bg-zinc-100 text-zinc-900"));
        assert!(button("Cancel", ButtonVariant::Ghost).contains("hover:bg-zinc-800 hover:text-zinc-50"));
        assert!(button("More", ButtonVariant::Outline).contains("border border-zinc-800"));
        assert!(button_with_attrs("Go", ButtonVariant::Secondary, r#"data-id="1""#)
            .contains(r#"data-id="1">Go</button>"#));
    }

    #[test]
    fn test_loading_dots_delays() {
        let html = loading_dots();
        assert_eq!(html.matches("animate-premium-dot").count(), 3);
        assert!(html.contains("animation-delay: 0s"));
        assert!(html.contains("animation-delay: 0.15s"));
        assert!(html.contains("animation-delay: 0.3s"));
    }
}
