use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct Channels {
    pub from_poller: broadcast::Sender<poller::ChannelData>,
    pub to_poller: broadcast::Sender<poller::ChannelData>,
}

impl Default for Channels {
    fn default() -> Self {
        Self::new()
    }
}

impl Channels {
    pub fn new() -> Self {
        Self {
            from_poller: Self::channel(),
            to_poller: Self::channel(),
        }
    }

    fn channel<T: Clone>() -> broadcast::Sender<T> {
        broadcast::channel(2048).0
    }
}
