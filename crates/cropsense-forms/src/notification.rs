//! Single-slot notification channel
//!
//! At most one notification is visible at a time. `notify` retires the
//! current one immediately, inserts the new one and drives it through
//! `Created -> Shown -> Hidden -> removed` on timers. Only the lifecycle of
//! the latest notification may touch the surface.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPhase {
    /// Inserted, entry animation pending
    Created,
    Shown,
    /// Exit animation running, removal pending
    Hidden,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub phase: NotificationPhase,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle timings, measured from creation except `removal_delay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationTiming {
    pub show_delay: Duration,
    pub display: Duration,
    pub removal_delay: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            show_delay: Duration::from_millis(100),
            display: Duration::from_millis(3000),
            removal_delay: Duration::from_millis(300),
        }
    }
}

/// Where notifications are rendered.
pub trait NotificationSurface: Send + Sync {
    fn insert(&self, notification: &Notification);
    fn update(&self, notification: &Notification);
    fn remove(&self, id: u64);
}

/// In-memory surface holding the rendered notification elements.
#[derive(Debug, Default)]
pub struct MemorySurface {
    elements: Mutex<Vec<Notification>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> Vec<Notification> {
        self.elements.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.elements.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.lock().is_empty()
    }
}

impl NotificationSurface for MemorySurface {
    fn insert(&self, notification: &Notification) {
        self.elements.lock().push(notification.clone());
    }

    fn update(&self, notification: &Notification) {
        let mut elements = self.elements.lock();
        if let Some(existing) = elements.iter_mut().find(|n| n.id == notification.id) {
            *existing = notification.clone();
        }
    }

    fn remove(&self, id: u64) {
        self.elements.lock().retain(|n| n.id != id);
    }
}

/// Process-wide notification slot. Cheap to clone.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

struct CenterInner {
    surface: Arc<dyn NotificationSurface>,
    timing: NotificationTiming,
    slot: Mutex<Slot>,
    next_id: AtomicU64,
    current_tx: watch::Sender<Option<Notification>>,
}

#[derive(Default)]
struct Slot {
    current: Option<Notification>,
    lifecycle: Option<JoinHandle<()>>,
}

impl NotificationCenter {
    pub fn new(surface: Arc<dyn NotificationSurface>) -> Self {
        Self::with_timing(surface, NotificationTiming::default())
    }

    pub fn with_timing(surface: Arc<dyn NotificationSurface>, timing: NotificationTiming) -> Self {
        let (current_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(CenterInner {
                surface,
                timing,
                slot: Mutex::new(Slot::default()),
                next_id: AtomicU64::new(1),
                current_tx,
            }),
        }
    }

    /// Shows `message`, retiring whatever is currently displayed.
    ///
    /// Lifecycle timers run on the ambient Tokio runtime. Outside a runtime
    /// the notification stays in `Created` until the next `notify`.
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> Notification {
        let notification = Notification {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            kind,
            phase: NotificationPhase::Created,
            created_at: Utc::now(),
        };

        let mut slot = self.inner.slot.lock();
        if let Some(handle) = slot.lifecycle.take() {
            handle.abort();
        }
        if let Some(previous) = slot.current.take() {
            debug!(id = previous.id, "retiring notification");
            self.inner.surface.remove(previous.id);
        }

        self.inner.surface.insert(&notification);
        slot.current = Some(notification.clone());
        self.inner.current_tx.send_replace(Some(notification.clone()));

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let inner = Arc::clone(&self.inner);
                let id = notification.id;
                slot.lifecycle = Some(runtime.spawn(async move { inner.run_lifecycle(id).await }));
            }
            Err(_) => warn!(
                id = notification.id,
                "no async runtime, notification will not auto-dismiss"
            ),
        }

        notification
    }

    /// Currently displayed notification, if any.
    pub fn current(&self) -> Option<Notification> {
        self.inner.slot.lock().current.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.current_tx.subscribe()
    }

    pub fn timing(&self) -> NotificationTiming {
        self.inner.timing
    }
}

impl CenterInner {
    async fn run_lifecycle(&self, id: u64) {
        let timing = self.timing;
        tokio::time::sleep(timing.show_delay).await;
        self.advance(id, NotificationPhase::Shown);
        tokio::time::sleep(timing.display.saturating_sub(timing.show_delay)).await;
        self.advance(id, NotificationPhase::Hidden);
        tokio::time::sleep(timing.removal_delay).await;
        self.retire(id);
    }

    fn advance(&self, id: u64, phase: NotificationPhase) {
        let mut slot = self.slot.lock();
        if let Some(current) = slot.current.as_mut().filter(|n| n.id == id) {
            current.phase = phase;
            self.surface.update(current);
            self.current_tx.send_replace(Some(current.clone()));
        }
    }

    fn retire(&self, id: u64) {
        let mut slot = self.slot.lock();
        if slot.current.as_ref().is_some_and(|n| n.id == id) {
            slot.current = None;
            slot.lifecycle = None;
            self.surface.remove(id);
            self.current_tx.send_replace(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> (NotificationCenter, Arc<MemorySurface>) {
        let surface = Arc::new(MemorySurface::new());
        (NotificationCenter::new(surface.clone()), surface)
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_notify_replaces_first() {
        let (center, surface) = center();
        center.notify("Processing your request...", NotificationKind::Info);
        center.notify("Network error. Please try again.", NotificationKind::Error);

        let elements = surface.elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].message, "Network error. Please try again.");
        assert_eq!(elements[0].kind, NotificationKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_phases() {
        let (center, surface) = center();
        center.notify("Saved", NotificationKind::Success);
        assert_eq!(surface.elements()[0].phase, NotificationPhase::Created);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(surface.elements()[0].phase, NotificationPhase::Shown);

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(surface.elements()[0].phase, NotificationPhase::Hidden);
        assert!(center.current().is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(surface.is_empty());
        assert!(center.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replaced_timers_do_not_remove_latest() {
        let (center, surface) = center();
        center.notify("first", NotificationKind::Info);
        tokio::time::sleep(Duration::from_millis(2000)).await;
        center.notify("second", NotificationKind::Info);

        // Past the first notification's removal time.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let elements = surface.elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].message, "second");
        assert_eq!(elements[0].phase, NotificationPhase::Shown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_latest() {
        let (center, _surface) = center();
        let mut rx = center.subscribe();
        center.notify("one", NotificationKind::Info);
        center.notify("two", NotificationKind::Success);

        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone().unwrap();
        assert_eq!(seen.message, "two");
    }

    #[test]
    fn test_notify_without_runtime() {
        let (center, surface) = center();
        let notification = center.notify("offline", NotificationKind::Info);
        assert_eq!(notification.phase, NotificationPhase::Created);
        assert_eq!(surface.len(), 1);
    }
}
