//! Browser error reports posted by the dashboard.

use serde::{Deserialize, Serialize};

use crate::common::utils::truncate_with_ellipsis;

/// Longest accepted value per text field, in characters.
pub const MAX_FIELD_LEN: usize = 4000;

const DEFAULT_MESSAGE: &str = "Unknown client error";

/// Payload sent by the dashboard's global error handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientErrorReport {
    /// `error` or `unhandledrejection`
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub line: Option<f64>,
    #[serde(default)]
    pub column: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn sanitize(value: Option<&str>) -> String {
    value
        .map(|v| truncate_with_ellipsis(v, MAX_FIELD_LEN))
        .unwrap_or_default()
}

impl ClientErrorReport {
    pub fn error_type(&self) -> &str {
        self.error_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("error")
    }

    /// Notifier context, e.g. `client:unhandledrejection`.
    pub fn context(&self) -> String {
        format!("client:{}", self.error_type())
    }

    /// Message followed by the non-empty detail lines.
    pub fn render(&self) -> String {
        let message = sanitize(self.message.as_deref());
        let message = if message.is_empty() {
            DEFAULT_MESSAGE.to_string()
        } else {
            message
        };

        let mut details = vec![format!("Type: {}", self.error_type())];
        let labelled = [
            ("URL", sanitize(self.url.as_deref())),
            ("Source", sanitize(self.source.as_deref())),
        ];
        for (label, value) in labelled {
            if !value.is_empty() {
                details.push(format!("{}: {}", label, value));
            }
        }
        if let Some(line) = self.line {
            details.push(format!("Line: {}", line));
        }
        if let Some(column) = self.column {
            details.push(format!("Column: {}", column));
        }
        let user_agent = sanitize(self.user_agent.as_deref());
        if !user_agent.is_empty() {
            details.push(format!("UA: {}", user_agent));
        }
        let stack = sanitize(self.stack.as_deref());
        if !stack.is_empty() {
            details.push(format!("Stack: {}", stack));
        }

        format!("{}\n\n{}", message, details.join("\n"))
    }
}

/// Whether a report may be accepted from `origin`.
///
/// Requests without an Origin header (same-origin fetches, server tools) are
/// accepted, as are origins under the public app URL or naming our own host.
pub fn is_allowed_origin(origin: Option<&str>, host: Option<&str>, app_url: Option<&str>) -> bool {
    let origin = match origin {
        Some(o) if !o.is_empty() => o,
        _ => return true,
    };

    if app_url.is_some_and(|allowed| !allowed.is_empty() && origin.starts_with(allowed)) {
        return true;
    }

    host.is_some_and(|h| !h.is_empty() && origin.contains(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_present_details_only() {
        let report = ClientErrorReport {
            error_type: Some("unhandledrejection".into()),
            message: Some("fetch failed".into()),
            url: Some("https://dash.example/content".into()),
            line: Some(12.0),
            ..Default::default()
        };

        assert_eq!(report.context(), "client:unhandledrejection");
        assert_eq!(
            report.render(),
            "fetch failed\n\nType: unhandledrejection\nURL: https://dash.example/content\nLine: 12"
        );
    }

    #[test]
    fn test_render_defaults() {
        let report = ClientErrorReport::default();
        assert_eq!(report.context(), "client:error");
        assert_eq!(report.render(), "Unknown client error\n\nType: error");
    }

    #[test]
    fn test_long_fields_are_truncated() {
        let report = ClientErrorReport {
            stack: Some("x".repeat(MAX_FIELD_LEN + 10)),
            ..Default::default()
        };
        let rendered = report.render();
        let stack = rendered.split("Stack: ").nth(1).unwrap();
        assert_eq!(stack.chars().count(), MAX_FIELD_LEN + 1);
        assert!(stack.ends_with('…'));
    }

    #[test]
    fn test_payload_uses_camel_case() {
        let report: ClientErrorReport = serde_json::from_str(
            r#"{"type":"error","message":"boom","userAgent":"Mozilla/5.0","column":4}"#,
        )
        .unwrap();
        assert_eq!(report.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(report.column, Some(4.0));
    }

    #[test]
    fn test_any_json_number_is_accepted_for_position() {
        let report: ClientErrorReport =
            serde_json::from_str(r#"{"message":"boom","line":-1,"column":3.5}"#).unwrap();
        assert_eq!(report.line, Some(-1.0));
        assert!(report.render().contains("Line: -1\nColumn: 3.5"));
    }

    #[test]
    fn test_origin_rules() {
        let app = Some("https://dash.example");
        assert!(is_allowed_origin(None, None, app));
        assert!(is_allowed_origin(Some("https://dash.example"), None, app));
        assert!(is_allowed_origin(
            Some("http://localhost:8080"),
            Some("localhost:8080"),
            None
        ));
        assert!(!is_allowed_origin(
            Some("https://evil.example"),
            Some("localhost:8080"),
            app
        ));
    }
}
