pub mod config;
pub mod http;
pub mod time;

pub use http::{HttpEntityApi, HttpListApi, HttpModuleSource, RestClient};
pub use time::{SystemClock, TokioClock, TokioScheduler};
