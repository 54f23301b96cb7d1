use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};
use ws_core::ids::EntityId;
use ws_core::ports::{ApiError, ClockPort, EntityApiPort, ScheduledTask, SchedulerPort};
use ws_core::undo::{DeletedSnapshot, UndoState};

struct Inner {
    state: UndoState,
    expiry: Option<ScheduledTask>,
}

/// Holds the most recently deleted record for one endpoint and restores it
/// on request while its window is open.
///
/// 保存最近删除的记录，在撤销窗口内可恢复。
///
/// A new delete replaces the armed snapshot outright. Expiry is silent.
pub struct UndoDeleteManager {
    api: Arc<dyn EntityApiPort>,
    scheduler: Arc<dyn SchedulerPort>,
    clock: Arc<dyn ClockPort>,
    endpoint: String,
    window: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl UndoDeleteManager {
    pub fn from_ports(
        api: Arc<dyn EntityApiPort>,
        scheduler: Arc<dyn SchedulerPort>,
        clock: Arc<dyn ClockPort>,
        endpoint: impl Into<String>,
        window: Duration,
    ) -> Self {
        Self {
            api,
            scheduler,
            clock,
            endpoint: endpoint.into(),
            window,
            inner: Arc::new(Mutex::new(Inner {
                state: UndoState::Idle,
                expiry: None,
            })),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Arms with a freshly deleted record and starts its countdown.
    pub fn arm(&self, id: EntityId, item: Value) {
        let snapshot = DeletedSnapshot {
            id,
            item,
            deleted_at_ms: self.clock.now_ms(),
            ttl: self.window,
        };
        self.arm_snapshot(snapshot, self.window);
    }

    fn arm_snapshot(&self, snapshot: DeletedSnapshot, delay: Duration) {
        let id = snapshot.id.clone();
        let deleted_at_ms = snapshot.deleted_at_ms;
        let expiry = self.schedule_expiry(id.clone(), deleted_at_ms, delay);

        let mut inner = self.lock();
        if let Some(previous) = inner.state.arm(snapshot) {
            debug!(previous = %previous.id, "undo snapshot replaced");
        }
        // Dropping the old handle cancels its timer.
        inner.expiry = Some(expiry);
        drop(inner);

        info!(endpoint = %self.endpoint, id = %id, window_ms = delay.as_millis() as u64, "undo armed");
    }

    fn schedule_expiry(&self, id: EntityId, deleted_at_ms: i64, delay: Duration) -> ScheduledTask {
        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        self.scheduler.schedule(
            delay,
            Box::pin(async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let mut inner = inner.lock().unwrap_or_else(|e| e.into_inner());
                if inner.state.expire(&id, deleted_at_ms) {
                    inner.expiry = None;
                    debug!(id = %id, "undo window expired");
                }
            }),
        )
    }

    /// Restores the armed record.
    ///
    /// Returns `Ok(false)` when idle or when the window has passed, even if
    /// the expiry timer has not fired yet. A failed restore re-arms the
    /// snapshot for the rest of its window.
    pub async fn undo(&self) -> Result<bool, ApiError> {
        let now_ms = self.clock.now_ms();
        let snapshot = {
            let mut inner = self.lock();
            let taken = inner.state.take_for_undo(now_ms);
            inner.expiry = None;
            taken
        };

        let Some(snapshot) = snapshot else {
            debug!(endpoint = %self.endpoint, "nothing to undo");
            return Ok(false);
        };

        match self
            .api
            .undo_delete(&self.endpoint, &snapshot.id, &snapshot.item)
            .await
        {
            Ok(()) => {
                info!(endpoint = %self.endpoint, id = %snapshot.id, "delete undone");
                Ok(true)
            }
            Err(err) => {
                warn!(endpoint = %self.endpoint, id = %snapshot.id, error = %err, "undo failed");
                let left = snapshot.expires_at_ms() - self.clock.now_ms();
                if left > 0 {
                    let inner = self.lock();
                    if inner.state.snapshot().is_none() {
                        drop(inner);
                        self.arm_snapshot(snapshot, Duration::from_millis(left as u64));
                    }
                }
                Err(err)
            }
        }
    }

    /// Drops the armed snapshot without restoring it.
    pub fn dismiss(&self) {
        let mut inner = self.lock();
        inner.state = UndoState::Idle;
        inner.expiry = None;
    }

    pub fn is_armed(&self) -> bool {
        self.lock().state.snapshot().is_some()
    }

    pub fn snapshot(&self) -> Option<DeletedSnapshot> {
        self.lock().state.snapshot().cloned()
    }

    /// Countdown of the armed snapshot; `None` when idle or expired.
    pub fn remaining(&self) -> Option<Duration> {
        let now_ms = self.clock.now_ms();
        self.lock().state.remaining(now_ms)
    }

    /// Cancels the countdown timer. The armed snapshot is discarded.
    pub fn shutdown(&self) {
        self.dismiss();
    }
}
