use futures::StreamExt;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

use super::change::{ChangeFilter, TableChange, WatchedTable};
use super::debounce::run_trailing;

/// Postgres NOTIFY channel written by the `notify_table_change` trigger.
pub const NOTIFY_CHANNEL: &str = "table_changes";

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fans database change notifications out to debounced subscribers.
#[derive(Clone)]
pub struct RealtimeHub {
    sender: broadcast::Sender<TableChange>,
    debounce: Duration,
}

impl RealtimeHub {
    pub fn new(debounce: Duration) -> Self {
        let (sender, _) = broadcast::channel(1024);
        Self { sender, debounce }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Hand a change to current subscribers. Returns how many received it.
    pub fn publish(&self, change: TableChange) -> usize {
        self.sender.send(change).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Call `on_change` once per burst of matching changes on `table`.
    ///
    /// The subscription lives until the returned handle is dropped or
    /// [`RealtimeSubscription::unsubscribe`] is called; a pending call is
    /// discarded at that point.
    pub fn subscribe<F>(
        &self,
        table: WatchedTable,
        filter: Option<ChangeFilter>,
        on_change: F,
    ) -> RealtimeSubscription
    where
        F: FnMut() + Send + 'static,
    {
        let channel_name = format!(
            "realtime-{}-{}",
            table,
            filter
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "all".to_string())
        );

        // Receiver exists before the task starts so nothing published after
        // this call is missed.
        let receiver = self.sender.subscribe();
        let matching = BroadcastStream::new(receiver).filter_map(move |item| {
            let relevant = match item {
                Ok(change) => {
                    change.table == table.as_str()
                        && filter.as_ref().map_or(true, |f| f.matches(&change))
                }
                // Missed messages may have included ours
                Err(_) => true,
            };
            futures::future::ready(relevant.then_some(()))
        });

        debug!(channel = %channel_name, "Realtime subscription opened");
        let handle = tokio::spawn(run_trailing(Box::pin(matching), self.debounce, on_change));

        RealtimeSubscription {
            channel_name,
            handle,
        }
    }

    /// Forward Postgres notifications into the hub until the pool closes.
    pub fn listen(&self, pool: PgPool) -> JoinHandle<()> {
        let hub = self.clone();
        tokio::spawn(async move {
            loop {
                match hub.forward_notifications(&pool).await {
                    Ok(()) => break,
                    Err(e) => {
                        warn!(error = %e, "Realtime listener failed, retrying");
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
            info!("Realtime listener stopped");
        })
    }

    async fn forward_notifications(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        let mut listener = PgListener::connect_with(pool).await?;
        listener.listen(NOTIFY_CHANNEL).await?;
        info!(channel = NOTIFY_CHANNEL, "Realtime listener started");

        loop {
            let notification = match listener.recv().await {
                Ok(n) => n,
                Err(sqlx::Error::PoolClosed) => return Ok(()),
                Err(e) => return Err(e),
            };

            match serde_json::from_str::<TableChange>(notification.payload()) {
                Ok(change) => {
                    debug!(table = %change.table, op = ?change.op, "Table change");
                    self.publish(change);
                }
                Err(e) => warn!(error = %e, "Ignoring malformed change notification"),
            }
        }
    }
}

/// Active realtime subscription. Dropping it tears the subscription down.
pub struct RealtimeSubscription {
    channel_name: String,
    handle: JoinHandle<()>,
}

impl RealtimeSubscription {
    /// `realtime-{table}-{filter|all}`
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn unsubscribe(self) {}
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(channel = %self.channel_name, "Realtime subscription closed");
    }
}
