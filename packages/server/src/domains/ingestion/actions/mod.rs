//! Ingestion actions

use tracing::error;

use crate::common::{ActionError, ActionResult, IngestionSourceId};
use crate::domains::ingestion::service::{run_ingestion, IngestionReport};
use crate::kernel::ServerDeps;

/// Run the ingestion runner over all active sources, or only `source_ids`.
pub async fn trigger_ingestion(
    source_ids: Option<Vec<IngestionSourceId>>,
    deps: &ServerDeps,
) -> ActionResult<IngestionReport> {
    match run_ingestion(source_ids.as_deref(), deps).await {
        Ok(report) => ActionResult::ok(report),
        Err(e) => {
            error!(error = %e, "Ingestion failed");
            ActionResult::fail(ActionError::unknown(format!("{:#}", e)))
        }
    }
}
