// SPDX-License-Identifier: MPL-2.0

//! Media platform abstraction
//!
//! The capture session never talks to a camera directly. It goes through the
//! [`MediaPlatform`] trait, which mirrors the browser media API:
//!
//! ```text
//! ┌─────────────────────┐
//! │  UI collaborator    │
//! └──────────┬──────────┘
//!            │ VideoConstraints / apply
//!            ▼
//! ┌─────────────────────┐
//! │   CaptureSession    │  ← negotiation, supersession, zoom
//! └──────────┬──────────┘
//!            │ StreamRequest
//!            ▼
//! ┌─────────────────────┐
//! │ MediaPlatform trait │  ← getUserMedia / enumerateDevices
//! └──────────┬──────────┘
//!            │
//!            ▼
//!   ┌────────────────┐
//!   │ Virtual camera │  ← built-in implementation
//!   └────────────────┘
//! ```
//!
//! Platform handles are single-threaded (browser objects are not `Send`), so
//! the traits use `async_trait(?Send)`.

pub mod session;
pub mod types;

pub use session::{CaptureSession, SessionStatus};
pub use types::*;

use crate::errors::{CaptureError, CaptureResult};
use async_trait::async_trait;
use tracing::debug;

/// Entry points of the platform's media API
#[async_trait(?Send)]
pub trait MediaPlatform {
    /// Acquire a camera stream for the request (`getUserMedia`)
    ///
    /// Suspends for the permission prompt and the hardware round-trip.
    async fn get_user_media(&self, request: &StreamRequest) -> BackendResult<Box<dyn MediaStream>>;

    /// List media devices (`enumerateDevices`)
    ///
    /// Returns `BackendError::NotSupported` when the platform has no such API.
    async fn enumerate_devices(&self) -> BackendResult<Vec<MediaDeviceInfo>>;
}

/// One acquired camera stream and the element playing it
#[async_trait(?Send)]
pub trait MediaStream {
    /// Label of the video track (usually the device name)
    fn label(&self) -> &str;

    /// Capabilities of the device behind the track
    fn capabilities(&self) -> DeviceCapabilities;

    /// Values the device actually applied
    fn settings(&self) -> TrackSettings;

    /// Start playback; frames are only readable once this resolves
    async fn play(&mut self) -> BackendResult<()>;

    /// Latest decoded frame, `None` if nothing has been decoded yet
    fn current_frame(&self) -> Option<CameraFrame>;

    /// Stop all tracks and release the hardware; must be idempotent
    fn stop(&mut self);
}

/// List the available video inputs
///
/// A platform without enumeration yields `CaptureError::ApiUnsupported`, so
/// callers can tell "no cameras" apart from "cannot ask".
pub async fn enumerate_video_inputs(
    platform: &dyn MediaPlatform,
) -> CaptureResult<Vec<VideoInputDevice>> {
    let devices = platform
        .enumerate_devices()
        .await
        .map_err(CaptureError::from)?;

    let inputs: Vec<VideoInputDevice> = devices
        .into_iter()
        .filter(|device| device.kind == MediaDeviceKind::VideoInput)
        .map(VideoInputDevice::from)
        .collect();

    debug!(count = inputs.len(), "Enumerated video inputs");
    Ok(inputs)
}
