use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::sleep;
use tracing::debug;
use ws_core::ports::{ScheduledTask, SchedulerPort, TaskHandle};

struct TokioTaskHandle {
    abort: AbortHandle,
    join: JoinHandle<()>,
}

impl TaskHandle for TokioTaskHandle {
    fn cancel(&self) {
        if !self.join.is_finished() {
            debug!("scheduled task cancelled");
        }
        self.abort.abort();
    }

    fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Schedules tasks on the current tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulerPort for TokioScheduler {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> ScheduledTask {
        let join = tokio::spawn(async move {
            sleep(delay).await;
            task.await;
        });
        debug!(delay_ms = delay.as_millis() as u64, "task scheduled");
        ScheduledTask::new(Box::new(TokioTaskHandle {
            abort: join.abort_handle(),
            join,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::advance;

    fn counting_task(counter: &Arc<AtomicUsize>) -> BoxFuture<'static, ()> {
        let counter = Arc::clone(counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test]
    async fn runs_task_after_delay() {
        tokio::time::pause();
        let counter = Arc::new(AtomicUsize::new(0));
        let task = TokioScheduler.schedule(Duration::from_secs(5), counting_task(&counter));

        advance(Duration::from_secs(4)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
    }

    #[tokio::test]
    async fn cancel_prevents_run() {
        tokio::time::pause();
        let counter = Arc::new(AtomicUsize::new(0));
        let task = TokioScheduler.schedule(Duration::from_secs(5), counting_task(&counter));
        task.cancel();

        advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dropping_handle_cancels() {
        tokio::time::pause();
        let counter = Arc::new(AtomicUsize::new(0));
        drop(TokioScheduler.schedule(Duration::from_secs(1), counting_task(&counter)));

        advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn detached_task_still_runs() {
        tokio::time::pause();
        let counter = Arc::new(AtomicUsize::new(0));
        TokioScheduler
            .schedule(Duration::from_secs(1), counting_task(&counter))
            .detach();

        advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
