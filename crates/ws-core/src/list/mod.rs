pub mod diff;
pub mod model;
pub mod sync;

pub use diff::MembershipDiff;
pub use model::{EntityList, ListKind, ListMember, NewList};
pub use sync::{FailedRemoval, ListSyncError, SyncReport};
