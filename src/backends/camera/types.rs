// SPDX-License-Identifier: GPL-3.0-only
// Shared types for the media platform abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Which physical direction a camera sensor points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera, pointing at the user
    User,
    /// Rear camera, pointing away from the user
    #[default]
    Environment,
    /// Camera pointing to the user's left
    Left,
    /// Camera pointing to the user's right
    Right,
}

impl FacingMode {
    /// All facing modes, in panel order
    pub const ALL: [FacingMode; 4] = [
        FacingMode::User,
        FacingMode::Environment,
        FacingMode::Left,
        FacingMode::Right,
    ];

    /// The W3C `facingMode` keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::User => "user",
            FacingMode::Environment => "environment",
            FacingMode::Left => "left",
            FacingMode::Right => "right",
        }
    }
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(FacingMode::User),
            "environment" => Ok(FacingMode::Environment),
            "left" => Ok(FacingMode::Left),
            "right" => Ok(FacingMode::Right),
            other => Err(format!("unknown facing mode: {}", other)),
        }
    }
}

/// Video constraints supplied by the caller for one negotiation attempt
///
/// Width, height and frame rate are ideal hints: the platform may deliver a
/// stream that differs from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoConstraints {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub facing_mode: FacingMode,
}

impl VideoConstraints {
    /// Check the negotiation preconditions
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if self.frame_rate == 0 {
            return Err("frame rate must be non-zero".to_string());
        }
        Ok(())
    }
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frame_rate: 30,
            facing_mode: FacingMode::Environment,
        }
    }
}

impl std::fmt::Display for VideoConstraints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} @ {}fps ({})",
            self.width, self.height, self.frame_rate, self.facing_mode
        )
    }
}

/// A constraint value the platform should try to honour but may not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ideal<T>(pub T);

impl<T: Copy> Ideal<T> {
    pub fn value(&self) -> T {
        self.0
    }
}

/// Acquisition request handed to the platform (video only, no audio)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    pub width: Ideal<u32>,
    pub height: Ideal<u32>,
    pub frame_rate: Ideal<u32>,
    pub facing_mode: Ideal<FacingMode>,
    /// Ask the platform to expose the zoom capability if it has one
    pub zoom: bool,
}

impl From<&VideoConstraints> for StreamRequest {
    fn from(constraints: &VideoConstraints) -> Self {
        Self {
            width: Ideal(constraints.width),
            height: Ideal(constraints.height),
            frame_rate: Ideal(constraints.frame_rate),
            facing_mode: Ideal(constraints.facing_mode),
            zoom: true,
        }
    }
}

/// Zoom range reported by a device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomCapability {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Capabilities reported by the active physical device
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceCapabilities {
    /// `None` when the device has no zoom control
    pub zoom: Option<ZoomCapability>,
}

/// Values the device actually applied to the granted track
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackSettings {
    pub device_id: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    /// Not every platform reports a facing mode (desktop webcams usually don't)
    pub facing_mode: Option<FacingMode>,
    /// Current zoom value, when the device has a zoom control
    pub zoom: Option<f64>,
}

/// Zoom range and current value of the active device
///
/// The all-zero value means "zoom unsupported", not a valid zero-width range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoomState {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl ZoomState {
    /// Sentinel for devices without zoom
    pub const UNSUPPORTED: ZoomState = ZoomState {
        min: 0.0,
        max: 0.0,
        step: 0.0,
        value: 0.0,
    };

    /// Intersect a reported zoom capability with the device's current value.
    ///
    /// The value is clamped into the reported range; a device that exposes the
    /// range but no current value is taken to sit at its minimum. A range with
    /// a non-finite bound is treated as no zoom at all.
    pub fn from_capability(capability: ZoomCapability, current: Option<f64>) -> Self {
        if !capability.min.is_finite() || !capability.max.is_finite() {
            warn!(
                min = capability.min,
                max = capability.max,
                "Ignoring zoom capability with non-finite range"
            );
            return Self::UNSUPPORTED;
        }

        let (min, max) = if capability.min <= capability.max {
            (capability.min, capability.max)
        } else {
            (capability.max, capability.min)
        };
        let value = current
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(min, max))
            .unwrap_or(min);

        Self {
            min,
            max,
            step: capability.step,
            value,
        }
    }

    /// False for the all-zero sentinel
    pub fn is_supported(&self) -> bool {
        *self != Self::UNSUPPORTED
    }
}

impl std::fmt::Display for ZoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_supported() {
            write!(
                f,
                "{} (step {}, min {}, max {})",
                self.value, self.step, self.min, self.max
            )
        } else {
            write!(f, "unsupported")
        }
    }
}

/// Kind of media device reported by enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaDeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// Raw entry from the platform's device enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDeviceInfo {
    /// Empty until the user granted camera permission on some platforms
    pub device_id: String,
    pub kind: MediaDeviceKind,
    pub label: String,
}

/// Placeholder id for a device the platform does not identify
pub const UNAVAILABLE_DEVICE_ID: &str = "unavailable";

/// Video input as exposed to the UI collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInputDevice {
    pub id: String,
    /// Human readable; may be empty before permission is granted
    pub label: String,
}

impl From<MediaDeviceInfo> for VideoInputDevice {
    fn from(info: MediaDeviceInfo) -> Self {
        let id = if info.device_id.is_empty() {
            UNAVAILABLE_DEVICE_ID.to_string()
        } else {
            info.device_id
        };
        Self {
            id,
            label: info.label,
        }
    }
}

impl std::fmt::Display for VideoInputDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}

/// Pixel layout of a decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    RGBA,
    /// BGRA - 32-bit with alpha (B G R A byte order)
    BGRA,
    /// RGB24 - 24-bit RGB (3 bytes per pixel, no alpha)
    RGB24,
    /// Gray8 - 8-bit grayscale (single channel)
    Gray8,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::RGBA | Self::BGRA => 4,
            Self::RGB24 => 3,
            Self::Gray8 => 1,
        }
    }
}

/// A single decoded frame from the live stream
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    /// Pixel format of the data
    pub format: PixelFormat,
    /// Row stride in bytes (may include padding)
    pub stride: u32,
    /// Monotonic per-stream frame counter
    pub sequence: u64,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a tightly packed frame
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Arc<[u8]>) -> Self {
        Self {
            width,
            height,
            data,
            format,
            stride: width * format.bytes_per_pixel() as u32,
            sequence: 0,
            captured_at: Instant::now(),
        }
    }

    /// Bytes the frame must hold for its size, stride and format
    pub fn expected_len(&self) -> usize {
        if self.height == 0 {
            return 0;
        }
        let row = self.width as usize * self.format.bytes_per_pixel();
        (self.height as usize - 1) * self.stride as usize + row
    }
}

/// Result type for platform operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised by a media platform, named after the DOM exceptions
/// `getUserMedia` and friends reject with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// `NotAllowedError`: permission denied by user or policy
    NotAllowed(String),
    /// `NotFoundError`: no device matches the request
    NotFound(String),
    /// `NotReadableError`: hardware or OS prevented access (device in use)
    NotReadable(String),
    /// `AbortError`: acquisition aborted for another reason
    Aborted(String),
    /// `OverconstrainedError`: a required constraint cannot be met
    Overconstrained { constraint: String, message: String },
    /// `NotSupportedError` / `TypeError`: the API is missing
    NotSupported(String),
    /// The stream was acquired but refused to start playing
    Playback(String),
    /// Other errors
    Other(String),
}

impl BackendError {
    /// Classify a DOM exception by its `name`
    pub fn from_dom_exception(name: &str, message: &str) -> Self {
        let message = message.to_string();
        match name {
            "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => {
                BackendError::NotAllowed(message)
            }
            "NotFoundError" | "DevicesNotFoundError" => BackendError::NotFound(message),
            "NotReadableError" | "TrackStartError" => BackendError::NotReadable(message),
            "AbortError" => BackendError::Aborted(message),
            "OverconstrainedError" | "ConstraintNotSatisfiedError" => {
                BackendError::Overconstrained {
                    constraint: String::new(),
                    message,
                }
            }
            "NotSupportedError" | "TypeError" => BackendError::NotSupported(message),
            other => BackendError::Other(format!("{}: {}", other, message)),
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAllowed(msg) => write!(f, "Not allowed: {}", msg),
            BackendError::NotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::NotReadable(msg) => write!(f, "Device not readable: {}", msg),
            BackendError::Aborted(msg) => write!(f, "Aborted: {}", msg),
            BackendError::Overconstrained {
                constraint,
                message,
            } => write!(f, "Overconstrained ({}): {}", constraint, message),
            BackendError::NotSupported(msg) => write!(f, "Not supported: {}", msg),
            BackendError::Playback(msg) => write!(f, "Playback failed: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_state_from_capability() {
        let cap = ZoomCapability {
            min: 0.0,
            max: 10.0,
            step: 0.5,
        };
        let zoom = ZoomState::from_capability(cap, Some(2.0));
        assert_eq!(
            zoom,
            ZoomState {
                min: 0.0,
                max: 10.0,
                step: 0.5,
                value: 2.0
            }
        );
        assert!(zoom.is_supported());
    }

    #[test]
    fn test_zoom_value_is_clamped_into_range() {
        let cap = ZoomCapability {
            min: 1.0,
            max: 4.0,
            step: 0.1,
        };
        assert_eq!(ZoomState::from_capability(cap, Some(9.0)).value, 4.0);
        assert_eq!(ZoomState::from_capability(cap, Some(f64::NAN)).value, 1.0);
        assert_eq!(ZoomState::from_capability(cap, None).value, 1.0);
    }

    #[test]
    fn test_zoom_capability_with_nan_bounds() {
        let nan_min = ZoomCapability {
            min: f64::NAN,
            max: 4.0,
            step: 0.1,
        };
        assert_eq!(
            ZoomState::from_capability(nan_min, Some(2.0)),
            ZoomState::UNSUPPORTED
        );

        let infinite_max = ZoomCapability {
            min: 1.0,
            max: f64::INFINITY,
            step: 0.1,
        };
        assert_eq!(
            ZoomState::from_capability(infinite_max, None),
            ZoomState::UNSUPPORTED
        );
    }

    #[test]
    fn test_zoom_sentinel_is_unsupported() {
        assert!(!ZoomState::UNSUPPORTED.is_supported());
        assert_eq!(ZoomState::default(), ZoomState::UNSUPPORTED);
        assert_eq!(ZoomState::UNSUPPORTED.to_string(), "unsupported");
    }

    #[test]
    fn test_constraints_validation() {
        assert!(VideoConstraints::default().validate().is_ok());

        let mut constraints = VideoConstraints::default();
        constraints.width = 0;
        assert!(constraints.validate().is_err());

        let mut constraints = VideoConstraints::default();
        constraints.frame_rate = 0;
        assert!(constraints.validate().is_err());
    }

    #[test]
    fn test_stream_request_marks_everything_ideal() {
        let constraints = VideoConstraints {
            width: 1920,
            height: 1080,
            frame_rate: 60,
            facing_mode: FacingMode::User,
        };
        let request = StreamRequest::from(&constraints);
        assert_eq!(request.width, Ideal(1920));
        assert_eq!(request.height.value(), 1080);
        assert_eq!(request.frame_rate.value(), 60);
        assert_eq!(request.facing_mode.value(), FacingMode::User);
        assert!(request.zoom);
    }

    #[test]
    fn test_constraints_json_uses_camel_case() {
        let json = r#"{"width":640,"height":480,"frameRate":24,"facingMode":"user"}"#;
        let constraints: VideoConstraints = serde_json::from_str(json).unwrap();
        assert_eq!(constraints.frame_rate, 24);
        assert_eq!(constraints.facing_mode, FacingMode::User);
    }

    #[test]
    fn test_facing_mode_parse() {
        assert_eq!("Environment".parse::<FacingMode>(), Ok(FacingMode::Environment));
        assert!("sideways".parse::<FacingMode>().is_err());
    }

    #[test]
    fn test_device_without_id_gets_sentinel() {
        let device = VideoInputDevice::from(MediaDeviceInfo {
            device_id: String::new(),
            kind: MediaDeviceKind::VideoInput,
            label: String::new(),
        });
        assert_eq!(device.id, UNAVAILABLE_DEVICE_ID);
        assert!(device.label.is_empty());
    }

    #[test]
    fn test_dom_exception_classification() {
        assert_eq!(
            BackendError::from_dom_exception("NotAllowedError", "denied"),
            BackendError::NotAllowed("denied".into())
        );
        assert!(matches!(
            BackendError::from_dom_exception("OverconstrainedError", "width"),
            BackendError::Overconstrained { .. }
        ));
        assert!(matches!(
            BackendError::from_dom_exception("WeirdError", "?"),
            BackendError::Other(_)
        ));
    }

    #[test]
    fn test_frame_expected_len_honours_stride() {
        let mut frame = CameraFrame::new(4, 2, PixelFormat::RGB24, Arc::from(vec![0u8; 24]));
        assert_eq!(frame.stride, 12);
        assert_eq!(frame.expected_len(), 24);
        frame.stride = 16;
        assert_eq!(frame.expected_len(), 28);
    }
}
