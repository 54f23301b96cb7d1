use std::time::Duration;

use futures::future::BoxFuture;

/// Cancellation side of a scheduled task.
pub trait TaskHandle: Send + Sync {
    fn cancel(&self);

    fn is_finished(&self) -> bool;
}

/// A scheduled task owned by a component instance.
///
/// Dropping the handle cancels the task, so a torn-down component never
/// acts on a destroyed view.
pub struct ScheduledTask {
    handle: Option<Box<dyn TaskHandle>>,
}

impl ScheduledTask {
    pub fn new(handle: Box<dyn TaskHandle>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Lets the task run to completion even after the handle is dropped.
    pub fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Runs a future after a delay.
///
/// Used uniformly for search debounce, undo countdown and the post-mount
/// "ready" delay.
pub trait SchedulerPort: Send + Sync {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> ScheduledTask;
}
