//! Terminal notification rendering

use colored::Colorize;
use cropsense_forms::{Notification, NotificationKind, NotificationSurface};
use tracing::debug;

/// Writes each new notification to stderr, coloured by kind.
pub struct TerminalSurface;

impl NotificationSurface for TerminalSurface {
    fn insert(&self, notification: &Notification) {
        let line = match notification.kind {
            NotificationKind::Info => notification.message.cyan(),
            NotificationKind::Success => notification.message.green().bold(),
            NotificationKind::Error => notification.message.red().bold(),
        };
        eprintln!("{}", line);
        debug!(id = notification.id, kind = ?notification.kind, "notification shown");
    }

    fn update(&self, notification: &Notification) {
        debug!(id = notification.id, phase = ?notification.phase, "notification phase");
    }

    fn remove(&self, id: u64) {
        debug!(id, "notification removed");
    }
}
