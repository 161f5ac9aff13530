//! Background work tied to a view's lifetime.

use std::future::Future;

use tokio::task::JoinSet;

/// Tasks spawned by a mounted view.
///
/// Dropping the set aborts every task still in flight, so a view that is torn
/// down never has a late response written into its state.
#[derive(Debug, Default)]
pub struct ViewTasks {
    tasks: JoinSet<()>,
}

impl ViewTasks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Number of tasks not yet joined.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every spawned task to finish.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(err) = joined
                && err.is_panic()
            {
                tracing::error!(error = %err, "View task panicked");
            }
        }
    }

    /// Abort every task in flight.
    pub fn cancel(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(tasks = self.tasks.len(), "Cancelling view tasks");
        }
        self.tasks.abort_all();
    }
}

impl Drop for ViewTasks {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_settle_waits_for_tasks() {
        let done = Arc::new(AtomicBool::new(false));
        let mut tasks = ViewTasks::new();
        let flag = Arc::clone(&done);
        tasks.spawn(async move {
            tokio::task::yield_now().await;
            flag.store(true, Ordering::SeqCst);
        });

        assert_eq!(tasks.len(), 1);
        tasks.settle().await;
        assert!(tasks.is_empty());
        assert!(done.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_drop_aborts_in_flight_tasks() {
        let written = Arc::new(AtomicBool::new(false));
        let mut tasks = ViewTasks::new();
        let flag = Arc::clone(&written);
        tasks.spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
        });

        drop(tasks);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!written.load(Ordering::SeqCst));
    }
}
