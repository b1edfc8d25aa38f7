//! User-facing status messages

pub mod notifications;

pub use notifications::{
    DEFAULT_NOTIFICATION_TTL, Notification, NotificationChannel, NotificationKind,
};
