//! Sinks for store outcome notifications

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::models::{Notification, NotificationLevel};

/// Receives one notification per store operation outcome
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!("{}", notification.message),
            NotificationLevel::Failure => warn!("{}", notification.message),
        }
    }
}

/// Forwards notifications to a channel, e.g. for a UI task to display.
/// A closed receiver only means nobody is listening any more.
impl NotificationSink for UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        let _ = self.send(notification);
    }
}
