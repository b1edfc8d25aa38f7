//! Media domain: camera lifecycle and still capture

pub mod capture;
pub mod devices;
pub mod errors;
pub mod manager;
pub mod preview;

use std::sync::Arc;

pub use capture::CapturePipeline;
pub use devices::{
    MediaConstraints, MediaDevices, MediaStream, TrackInfo, TrackKind, TrackState,
};
pub use errors::{CaptureError, DeviceError, MediaError};
pub use manager::{MediaDeviceManager, MediaSession, ReleasedSession};
pub use preview::PreviewSurface;

/// The manager behind an async lock. Holding the lock across an acquire is
/// what keeps two acquire/release calls from ever touching the camera at
/// the same time.
pub type SharedMediaManager = Arc<tokio::sync::Mutex<MediaDeviceManager>>;
