//! Trailing-edge debounce over an event stream.

use futures::{Stream, StreamExt};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Call `fire` once per burst of events, `window` after the last one.
///
/// Every event restarts the window. When the stream ends, a pending call is
/// discarded instead of fired.
pub async fn run_trailing<S, T, F>(stream: S, window: Duration, mut fire: F)
where
    S: Stream<Item = T>,
    F: FnMut(),
{
    tokio::pin!(stream);
    let mut deadline: Option<Instant> = None;

    loop {
        let pending = deadline;
        tokio::select! {
            next = stream.next() => match next {
                Some(_) => deadline = Some(Instant::now() + window),
                None => break,
            },
            _ = async move {
                match pending {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            } => {
                deadline = None;
                fire();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    const WINDOW: Duration = Duration::from_millis(500);

    fn spawn_debounced() -> (mpsc::UnboundedSender<()>, Arc<AtomicUsize>, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let handle = tokio::spawn(run_trailing(UnboundedReceiverStream::new(rx), WINDOW, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        (tx, fired, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_after_quiet_window() {
        let (tx, fired, _handle) = spawn_debounced();

        for _ in 0..5 {
            tx.send(()).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (tx, fired, _handle) = spawn_debounced();

        tx.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        tx.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_stream_discards_pending_call() {
        let (tx, fired, handle) = spawn_debounced();

        tx.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(tx);

        handle.await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
