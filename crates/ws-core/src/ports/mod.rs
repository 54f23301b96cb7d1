//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the core business logic to remain independent of
//! the REST collaborator, the host page and the runtime's timers.
//!
//! ## Port Placement Guidelines
//!
//! Before adding a new port to `ws-core/ports`, ask yourself three questions:
//!
//! 1. **Does this port represent a capability the engine or resolver needs?**
//! 2. **Will it be depended upon by multiple use cases?**
//! 3. **Is it implemented by the infrastructure or platform layer?**
//!
//! If all three answers are **yes**, place it in `ws-core/ports`.
//! Otherwise, place it in the relevant domain submodule.

mod clock;
mod entity_api;
pub mod errors;
mod host;
mod list_api;
mod scheduler;
mod widget_transport;

pub use clock::ClockPort;
pub use entity_api::EntityApiPort;
pub use errors::{ApiError, WidgetLoadError};
pub use host::{HostSignalPort, ProfileNavigatorPort};
pub use list_api::ListApiPort;
pub use scheduler::{ScheduledTask, SchedulerPort, TaskHandle};
pub use widget_transport::{
    ModuleBlob, ModuleExports, ModuleImporterPort, ModuleSourcePort, ObjectUrlPort,
    ScriptEvent, ScriptHostPort,
};
