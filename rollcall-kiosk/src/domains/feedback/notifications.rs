//! Transient notification channel
//!
//! Holds at most one status message. Every `show` replaces the current
//! message and re-arms a single expiry timer; when the timer fires without a
//! newer `show` in between, the message is cleared.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;

use crate::domains::session::state_types::SessionStore;

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    #[default]
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, text)
    }

    pub fn is_none(&self) -> bool {
        self.kind == NotificationKind::None
    }
}

#[derive(Debug, Default)]
struct ExpiryTimer {
    seq: u64,
    handle: Option<AbortHandle>,
}

impl ExpiryTimer {
    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[derive(Clone, Debug)]
pub struct NotificationChannel {
    store: SessionStore,
    ttl: Duration,
    timer: Arc<Mutex<ExpiryTimer>>,
}

impl NotificationChannel {
    pub fn new(store: SessionStore, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            timer: Arc::new(Mutex::new(ExpiryTimer::default())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn current(&self) -> Notification {
        self.store.with_state(|s| s.notification.clone())
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(NotificationKind::Success, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(NotificationKind::Error, text);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show(NotificationKind::Info, text);
    }

    /// Replace the current message and restart the expiry countdown.
    pub fn show(&self, kind: NotificationKind, text: impl Into<String>) {
        let notification = Notification::new(kind, text);
        match kind {
            NotificationKind::Error => {
                log::warn!("[Notify] {}", notification.text)
            }
            NotificationKind::None => log::debug!("[Notify] Cleared"),
            _ => log::info!("[Notify] {:?}: {}", kind, notification.text),
        }

        // Held across publish + re-arm so two racing shows cannot leave an
        // older timer armed for a newer message.
        let mut timer = self.timer.lock();
        timer.cancel();
        timer.seq += 1;
        let seq = timer.seq;

        self.store.update(|state| {
            state.notification = notification;
            state.notification_seq = seq;
        });

        if kind == NotificationKind::None {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let store = self.store.clone();
                let ttl = self.ttl;
                let task = runtime.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    expire(&store, seq);
                });
                timer.handle = Some(task.abort_handle());
            }
            Err(_) => log::warn!(
                "[Notify] No async runtime; notification will not expire"
            ),
        }
    }

    /// Clear the current message immediately.
    pub fn dismiss(&self) {
        self.show(NotificationKind::None, String::new());
    }

    /// Stop a pending expiry without touching the visible message.
    pub fn cancel_expiry(&self) {
        self.timer.lock().cancel();
    }
}

fn expire(store: &SessionStore, seq: u64) {
    let cleared = store.update_if(|state| {
        if state.notification_seq != seq || state.notification.is_none() {
            return false;
        }
        state.notification = Notification::default();
        true
    });
    if cleared {
        log::debug!("[Notify] Notification {} expired", seq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (SessionStore, NotificationChannel) {
        let store = SessionStore::new();
        let channel =
            NotificationChannel::new(store.clone(), DEFAULT_NOTIFICATION_TTL);
        (store, channel)
    }

    #[tokio::test(start_paused = true)]
    async fn message_clears_after_ttl() {
        let (store, channel) = channel();
        channel.success("Photo captured");

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(
            store.current().notification,
            Notification::success("Photo captured")
        );

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.current().notification, Notification::default());
    }

    #[tokio::test(start_paused = true)]
    async fn reshow_restarts_the_countdown() {
        let (store, channel) = channel();
        channel.info("Scanning...");

        tokio::time::sleep(Duration::from_secs(4)).await;
        channel.error("Network error: connection refused");

        // 6s after the first show, 2s after the second.
        tokio::time::sleep(Duration::from_secs(2)).await;
        let current = store.current().notification;
        assert_eq!(current.kind, NotificationKind::Error);
        assert_eq!(current.text, "Network error: connection refused");

        tokio::time::sleep(Duration::from_millis(3_100)).await;
        assert!(store.current().notification.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn show_replaces_instead_of_stacking() {
        let (store, channel) = channel();
        channel.info("one");
        channel.success("two");
        let snapshot = store.current();
        assert_eq!(snapshot.notification, Notification::success("two"));
        assert_eq!(snapshot.notification_seq, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_expiry_keeps_message() {
        let (store, channel) = channel();
        channel.info("Webcam ready");
        channel.cancel_expiry();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.current().notification.text, "Webcam ready");
    }

    #[test]
    fn show_without_runtime_still_publishes() {
        let (store, channel) = channel();
        channel.error("Camera not ready");
        assert_eq!(store.current().notification, Notification::error("Camera not ready"));
    }
}
