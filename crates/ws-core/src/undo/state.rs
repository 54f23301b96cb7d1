//! Undo-delete state machine.
//!
//! ```text
//! Idle ──arm──▶ Armed(snapshot, expires_at) ──undo (before expiry)──▶ Idle + restore
//!                    │            ▲
//!                    │            └── arm again: previous snapshot discarded
//!                    └──expire──▶ Idle (silent)
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::EntityId;

/// The most recently deleted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedSnapshot {
    pub id: EntityId,
    pub item: Value,
    pub deleted_at_ms: i64,
    pub ttl: Duration,
}

impl DeletedSnapshot {
    pub fn expires_at_ms(&self) -> i64 {
        self.deleted_at_ms
            .saturating_add(i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum UndoState {
    #[default]
    Idle,
    Armed(DeletedSnapshot),
}

impl UndoState {
    /// Arms with `snapshot`, returning any snapshot it replaced. The replaced
    /// snapshot is dropped without a restore.
    pub fn arm(&mut self, snapshot: DeletedSnapshot) -> Option<DeletedSnapshot> {
        match std::mem::replace(self, UndoState::Armed(snapshot)) {
            UndoState::Armed(previous) => Some(previous),
            UndoState::Idle => None,
        }
    }

    /// Takes the snapshot for restoring if it has not expired at `now_ms`.
    ///
    /// An expired snapshot is discarded and `None` returned, even if the
    /// expiry timer has not fired yet.
    pub fn take_for_undo(&mut self, now_ms: i64) -> Option<DeletedSnapshot> {
        match std::mem::take(self) {
            UndoState::Armed(snapshot) if now_ms < snapshot.expires_at_ms() => Some(snapshot),
            _ => None,
        }
    }

    /// Silently drops the snapshot for `id` if it is the armed one.
    ///
    /// Returns whether anything was dropped. A stale expiry for a replaced
    /// snapshot leaves the newer one armed.
    pub fn expire(&mut self, id: &EntityId, deleted_at_ms: i64) -> bool {
        match self {
            UndoState::Armed(snapshot)
                if &snapshot.id == id && snapshot.deleted_at_ms == deleted_at_ms =>
            {
                *self = UndoState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> Option<&DeletedSnapshot> {
        match self {
            UndoState::Armed(snapshot) => Some(snapshot),
            UndoState::Idle => None,
        }
    }

    /// Time left before expiry, `None` when idle or already expired.
    pub fn remaining(&self, now_ms: i64) -> Option<Duration> {
        let snapshot = self.snapshot()?;
        let left = snapshot.expires_at_ms() - now_ms;
        (left > 0).then(|| Duration::from_millis(left as u64))
    }
}
