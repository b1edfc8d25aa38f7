//! Camera sources.

pub mod still_image;
#[cfg(feature = "webcam")]
pub mod webcam;

pub use still_image::{StillImageDevices, StillImageStream};
#[cfg(feature = "webcam")]
pub use webcam::{WebcamDevices, WebcamStream};
