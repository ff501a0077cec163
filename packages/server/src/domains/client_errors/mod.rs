//! Client errors domain - browser error reports forwarded to operators

pub mod notifier;
pub mod report;

pub use notifier::{format_error_message, TelegramErrorNotifier};
pub use report::{is_allowed_origin, ClientErrorReport, MAX_FIELD_LEN};

use tracing::warn;

use crate::kernel::ServerDeps;

/// Log a browser error report and forward it to the operators.
pub async fn report_client_error(report: &ClientErrorReport, deps: &ServerDeps) {
    let context = report.context();
    let text = report.render();
    warn!(context = %context, "Client error reported");
    deps.error_notifier.notify_error(&context, &text).await;
}
