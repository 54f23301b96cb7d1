mod scheduler;
mod system_clock;

pub use scheduler::TokioScheduler;
pub use system_clock::{SystemClock, TokioClock};
