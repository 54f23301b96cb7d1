use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use ws_core::ids::EntityId;
use ws_core::ports::{HostSignalPort, ProfileNavigatorPort};
use ws_core::widget::ProfileKind;

/// Event delivered to the host container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Ready { widget_key: String },
    Error { widget_key: String, message: String },
    OpenProfile { kind: ProfileKind, id: EntityId },
}

/// In-process host bridge.
///
/// 进程内宿主桥接：将组件信号通过 channel 转发给宿主。
///
/// Forwards widget signals and profile navigation through an unbounded
/// channel. A closed receiver drops events.
#[derive(Debug, Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl ChannelHost {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: HostEvent) {
        if self.tx.send(event).is_err() {
            debug!("host receiver closed, event dropped");
        }
    }
}

impl HostSignalPort for ChannelHost {
    fn ready(&self, widget_key: &str) {
        self.send(HostEvent::Ready {
            widget_key: widget_key.to_string(),
        });
    }

    fn error(&self, widget_key: &str, message: &str) {
        self.send(HostEvent::Error {
            widget_key: widget_key.to_string(),
            message: message.to_string(),
        });
    }
}

impl ProfileNavigatorPort for ChannelHost {
    fn open_profile(&self, kind: ProfileKind, id: &EntityId) {
        self.send(HostEvent::OpenProfile {
            kind,
            id: id.clone(),
        });
    }
}

/// Host without a container; signals are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHost;

impl HostSignalPort for TracingHost {
    fn ready(&self, widget_key: &str) {
        info!(%widget_key, "widget ready");
    }

    fn error(&self, widget_key: &str, message: &str) {
        warn!(%widget_key, %message, "widget error");
    }
}

impl ProfileNavigatorPort for TracingHost {
    fn open_profile(&self, kind: ProfileKind, id: &EntityId) {
        info!(?kind, %id, "open profile");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_events_in_order() {
        let (host, mut rx) = ChannelHost::new();
        host.ready("contacts-widget");
        host.error("weather", "boom");
        host.open_profile(ProfileKind::Lead, &EntityId::from("35"));

        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::Ready {
                widget_key: "contacts-widget".to_string()
            }
        );
        assert!(matches!(rx.try_recv().unwrap(), HostEvent::Error { message, .. } if message == "boom"));
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::OpenProfile {
                kind: ProfileKind::Lead,
                id: EntityId::from("35")
            }
        );
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (host, rx) = ChannelHost::new();
        drop(rx);
        host.ready("x");
    }
}
