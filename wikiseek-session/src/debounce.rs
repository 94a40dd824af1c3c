//! Coalescing of rapid input into a single deferred call.

use std::future::Future;
use std::time::Duration;

use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

/// Defers a callback until calls have stopped arriving for `delay`.
///
/// Every [`call`](Debouncer::call) cancels the pending one and restarts the
/// timer, so only the last call in a burst fires. Intermediate calls are
/// dropped, never queued. Once the timer fires, the callback runs as its own
/// task and later calls can no longer cancel it.
///
/// Must be created inside a Tokio runtime. Dropping the debouncer discards a
/// call that has not fired yet.
#[derive(Debug)]
pub struct Debouncer {
    /// Feeds calls to the timer task.
    calls: UnboundedSender<String>,

    /// The task that owns the single pending slot and its timer.
    timer: JoinHandle<()>,
}

impl Debouncer {
    /// Start a debouncer that runs `callback` after `delay` of inactivity.
    pub fn new<F, Fut>(delay: Duration, callback: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (calls, pending) = mpsc::unbounded_channel();
        let timer = tokio::spawn(run_timer(delay, pending, callback));
        Self { calls, timer }
    }

    /// Replace the pending call with `query` and restart the timer.
    pub fn call(&self, query: impl Into<String>) {
        if self.calls.send(query.into()).is_err() {
            tracing::debug!("debounce timer has stopped, dropping call");
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

/// Hold the latest call until `delay` passes without a newer one.
async fn run_timer<F, Fut>(delay: Duration, mut calls: UnboundedReceiver<String>, callback: F)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    while let Some(mut latest) = calls.recv().await {
        loop {
            tokio::select! {
                next = calls.recv() => match next {
                    Some(query) => latest = query,
                    None => return,
                },
                () = tokio::time::sleep(delay) => {
                    tokio::spawn(callback(latest));
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn recording_debouncer(delay: Duration) -> (Debouncer, mpsc::UnboundedReceiver<String>) {
        let (fired, rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(delay, move |query| {
            let fired = fired.clone();
            async move {
                fired.send(query).expect("test receiver is alive");
            }
        });
        (debouncer, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_argument() {
        let (debouncer, mut fired) = recording_debouncer(Duration::from_millis(500));

        for query in ["ein", "eins", "einst", "einstein"] {
            debouncer.call(query);
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(fired.recv().await.as_deref(), Some("einstein"));
        assert!(fired.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_the_delay() {
        let (debouncer, mut fired) = recording_debouncer(Duration::from_millis(500));

        debouncer.call("einstein");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(fired.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.try_recv().ok().as_deref(), Some("einstein"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_each_fire() {
        let (debouncer, mut fired) = recording_debouncer(Duration::from_millis(500));

        debouncer.call("curie");
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.call("bohr");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(fired.recv().await.as_deref(), Some("curie"));
        assert_eq!(fired.recv().await.as_deref(), Some("bohr"));
        assert!(fired.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_call() {
        let (debouncer, mut fired) = recording_debouncer(Duration::from_millis(500));

        debouncer.call("einstein");
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(fired.try_recv().is_err());
    }
}
