mod channel;

pub use channel::{ChannelHost, HostEvent, TracingHost};
