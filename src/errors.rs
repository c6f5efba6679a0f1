// SPDX-License-Identifier: MPL-2.0

//! Error types for the capture pipeline
//!
//! Every failure the capture session or the snapshot encoder can produce is a
//! [`CaptureError`] value. None of them are fatal: a session that reported an
//! error can always be asked to negotiate again.

use crate::backends::camera::types::BackendError;
use std::fmt;

/// Result type alias using CaptureError
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Capture pipeline error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or the platform refused camera access
    PermissionDenied(String),
    /// No matching device, or the device is in use / unreadable
    DeviceUnavailable(String),
    /// The requested constraints cannot be met (or are malformed)
    ConstraintsUnsatisfiable(String),
    /// The platform lacks the media or enumeration API
    ApiUnsupported(String),
    /// A frame was requested while the session is not active
    NoActiveFrame,
    /// A newer negotiation (or close) replaced this one before it resolved
    Superseded(String),
    /// The rasterized frame could not be encoded
    EncodingFailed(String),
}

impl CaptureError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CaptureError::PermissionDenied(_) => "PermissionDenied",
            CaptureError::DeviceUnavailable(_) => "DeviceUnavailable",
            CaptureError::ConstraintsUnsatisfiable(_) => "ConstraintsUnsatisfiable",
            CaptureError::ApiUnsupported(_) => "ApiUnsupported",
            CaptureError::NoActiveFrame => "NoActiveFrame",
            CaptureError::Superseded(_) => "Superseded",
            CaptureError::EncodingFailed(_) => "EncodingFailed",
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::PermissionDenied(msg) => write!(f, "Camera permission denied: {}", msg),
            CaptureError::DeviceUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CaptureError::ConstraintsUnsatisfiable(msg) => {
                write!(f, "Constraints cannot be satisfied: {}", msg)
            }
            CaptureError::ApiUnsupported(msg) => write!(f, "Media API not supported: {}", msg),
            CaptureError::NoActiveFrame => write!(f, "No frame available: session is not active"),
            CaptureError::Superseded(msg) => write!(f, "Negotiation superseded: {}", msg),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

// Platform failures are classified when they cross into the pipeline
impl From<BackendError> for CaptureError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotAllowed(msg) => CaptureError::PermissionDenied(msg),
            BackendError::NotFound(msg) => CaptureError::DeviceUnavailable(msg),
            BackendError::NotReadable(msg) => CaptureError::DeviceUnavailable(msg),
            BackendError::Aborted(msg) => CaptureError::DeviceUnavailable(msg),
            BackendError::Overconstrained { constraint, message } => {
                CaptureError::ConstraintsUnsatisfiable(format!("{}: {}", constraint, message))
            }
            BackendError::NotSupported(msg) => CaptureError::ApiUnsupported(msg),
            BackendError::Playback(msg) => CaptureError::DeviceUnavailable(msg),
            BackendError::Other(msg) => CaptureError::DeviceUnavailable(msg),
        }
    }
}

// Encoder failures surface as `EncodingFailed`
impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::EncodingFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_are_classified() {
        assert_eq!(
            CaptureError::from(BackendError::NotAllowed("denied".into())).kind(),
            "PermissionDenied"
        );
        assert_eq!(
            CaptureError::from(BackendError::NotReadable("busy".into())).kind(),
            "DeviceUnavailable"
        );
        assert_eq!(
            CaptureError::from(BackendError::NotSupported("no mediaDevices".into())).kind(),
            "ApiUnsupported"
        );

        let err = CaptureError::from(BackendError::Overconstrained {
            constraint: "width".into(),
            message: "too wide".into(),
        });
        assert_eq!(
            err,
            CaptureError::ConstraintsUnsatisfiable("width: too wide".into())
        );
    }

    #[test]
    fn test_image_errors_become_encoding_failures() {
        let err = CaptureError::from(image::ImageError::IoError(std::io::Error::other(
            "disk full",
        )));
        assert_eq!(err.kind(), "EncodingFailed");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_display_carries_cause() {
        let err = CaptureError::PermissionDenied("user dismissed prompt".into());
        assert!(err.to_string().contains("user dismissed prompt"));
        assert_eq!(
            CaptureError::NoActiveFrame.to_string(),
            "No frame available: session is not active"
        );
    }
}
