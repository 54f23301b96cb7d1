/// Wall-clock milliseconds since the Unix epoch.
pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;
}
