mod manager;
mod synchronizer;

pub use manager::ListManager;
pub use synchronizer::ListMembershipSynchronizer;
