//! Membership diff between a desired selection and a list's current members.

use std::collections::BTreeSet;

use crate::ids::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    pub to_add: BTreeSet<EntityId>,
    pub to_remove: BTreeSet<EntityId>,
}

impl MembershipDiff {
    /// `to_add = desired − current`, `to_remove = current − desired`.
    ///
    /// `current` must come from a fresh read of the list, never a cache.
    pub fn compute(desired: &BTreeSet<EntityId>, current: &BTreeSet<EntityId>) -> Self {
        Self {
            to_add: desired.difference(current).cloned().collect(),
            to_remove: current.difference(desired).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}
