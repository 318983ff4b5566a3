//! Delayed events for the UI loop

use std::time::Duration;

use tokio::task::JoinHandle;

/// Send `event` on `tx` once `delay` has passed.
///
/// The task is fire-and-forget: whoever receives the event decides whether
/// it is still relevant. A closed channel is not an error.
pub fn spawn_after<E>(delay: Duration, tx: async_channel::Sender<E>, event: E) -> JoinHandle<()>
where
    E: Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(event).await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_event_arrives_after_delay() {
        let (tx, rx) = async_channel::unbounded();
        spawn_after(Duration::from_millis(500), tx, 7u64);

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await.unwrap(), 7);
    }
}
