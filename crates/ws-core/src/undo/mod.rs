pub mod state;
pub mod window;

pub use state::{DeletedSnapshot, UndoState};
pub use window::{UndoPolicy, UndoWindow};
