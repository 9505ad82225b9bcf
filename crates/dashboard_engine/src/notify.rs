use std::sync::mpsc;

use dashboard_logging::dashboard_warn;

use crate::Notification;

/// The error channel of a view. Components report failures here even when
/// they also return them.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub struct ChannelNotificationSink {
    tx: mpsc::Sender<Notification>,
}

impl ChannelNotificationSink {
    pub fn new(tx: mpsc::Sender<Notification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelNotificationSink {
    fn notify(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, notification: Notification) {
        dashboard_warn!("{}", notification);
    }
}
