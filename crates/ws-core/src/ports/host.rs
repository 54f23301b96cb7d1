use crate::ids::EntityId;
use crate::widget::ProfileKind;

/// Lifecycle signals a mounted widget sends to its host container.
pub trait HostSignalPort: Send + Sync {
    fn ready(&self, widget_key: &str);

    fn error(&self, widget_key: &str, message: &str);
}

/// Host navigation to entity profiles.
pub trait ProfileNavigatorPort: Send + Sync {
    fn open_profile(&self, kind: ProfileKind, id: &EntityId);
}
