//! Widget shell host: configuration, tracing, dependency wiring and the
//! command-line entry point on top of the `ws-*` crates.

pub mod bootstrap;

pub use bootstrap::{run_app, AppRuntime, Cli};
