use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::Navigator;

// Hands navigation requests to whoever drives the UI.
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate_to(&self, path: &str) {
        if self.tx.send(path.to_string()).is_err() {
            warn!(%path, "navigation dropped: no receiver");
        }
    }
}

// Headless contexts just note where the user would have been sent.
#[derive(Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate_to(&self, path: &str) {
        info!(%path, "navigation requested");
    }
}
