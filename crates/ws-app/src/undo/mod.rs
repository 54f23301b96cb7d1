mod manager;

pub use manager::UndoDeleteManager;
