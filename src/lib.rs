// SPDX-License-Identifier: MPL-2.0

//! Camera snapshot - capture pipeline for a camera utility
//!
//! This library negotiates a live camera stream against a media platform and
//! turns frames of that stream into encoded still images.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`backends`]: Media platform traits, the capture session and the
//!   virtual camera platform
//! - [`pipelines`]: Frame rasterization and still image encoding
//! - [`config`]: User configuration handling
//! - [`constants`]: Resolution presets and defaults
//! - [`errors`]: The capture error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use camera_snapshot::{CaptureSession, OutputConfig, VideoConstraints, VirtualCameraPlatform};
//!
//! # async fn run() -> Result<(), camera_snapshot::CaptureError> {
//! let session = CaptureSession::new(VirtualCameraPlatform::new());
//! let zoom = session.negotiate(VideoConstraints::default()).await?;
//! println!("zoom: {}", zoom);
//!
//! let snapshot = session.snapshot(&OutputConfig::new("image/png", 1.0))?;
//! println!("{}", snapshot.to_data_uri());
//! session.close();
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;

// Re-export commonly used types
pub use backends::camera::types::{
    CameraFrame, DeviceCapabilities, FacingMode, TrackSettings, VideoConstraints,
    VideoInputDevice, ZoomCapability, ZoomState,
};
pub use backends::camera::{
    CaptureSession, MediaPlatform, MediaStream, SessionStatus, enumerate_video_inputs,
};
pub use backends::virtual_camera::{PermissionState, VirtualCameraPlatform, VirtualDevice};
pub use config::Config;
pub use errors::{CaptureError, CaptureResult};
pub use pipelines::photo::{
    Orientation, OutputConfig, OutputFormat, RasterSize, Snapshot, SnapshotEncoder,
};
