// SPDX-License-Identifier: MPL-2.0

//! Snapshot pipeline
//!
//! Turns exactly one live frame into an encoded still image:
//!
//! ```text
//! CameraFrame → Rasterize → Scale → Mirror → Encode → Snapshot
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Rasterize**: Copy the frame into an RGBA buffer (any supported layout)
//! 2. **Scale**: Optional, into the requested canvas size
//! 3. **Mirror**: Horizontal flip for user-facing cameras
//! 4. **Encode**: PNG, JPEG or WebP
//!
//! The whole pipeline is synchronous; it works on already decoded pixels.

pub mod capture;
pub mod encoding;

pub use capture::Orientation;
pub use encoding::{OutputConfig, OutputFormat, RasterSize};

use crate::backends::camera::types::CameraFrame;
use crate::errors::CaptureResult;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::{info, warn};

/// An encoded still image
///
/// Immutable once built; the caller owns the bytes.
#[derive(Clone, PartialEq)]
pub struct Snapshot {
    format: OutputFormat,
    quality_used: f32,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Snapshot {
    /// MIME type of the encoded data
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Quality the encoder used (1.0 for lossless formats)
    pub fn quality_used(&self) -> f32 {
        self.quality_used
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the encoded bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Self-contained `data:` URI, as `canvas.toDataURL` would return
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), BASE64.encode(&self.data))
    }

    /// Timestamped file name for downloads, e.g. `IMG_20240101_120000.jpg`
    pub fn suggested_file_name(&self) -> String {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!("IMG_{}.{}", timestamp, self.format.extension())
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("mime_type", &self.mime_type())
            .field("quality_used", &self.quality_used)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data", &format_args!("{} bytes", self.data.len()))
            .finish()
    }
}

/// One-shot frame to still image encoder
pub struct SnapshotEncoder;

impl SnapshotEncoder {
    /// Rasterize `frame`, apply the orientation policy and encode it
    ///
    /// Unknown MIME types fall back to PNG; the returned snapshot reports the
    /// format actually produced.
    pub fn capture(
        frame: &CameraFrame,
        output: &OutputConfig,
        orientation: Orientation,
    ) -> CaptureResult<Snapshot> {
        let mut image = capture::rasterize(frame)?;
        if let RasterSize::Fixed { width, height } = output.raster {
            image = capture::scale_to(image, width, height)?;
        }
        capture::apply_orientation(&mut image, orientation);

        let format = OutputFormat::from_mime(&output.mime_type).unwrap_or_else(|| {
            warn!(mime_type = %output.mime_type, "Unsupported output type, encoding PNG");
            OutputFormat::Png
        });
        let quality = output.effective_quality();
        let data = encoding::encode(&image, format, quality)?;

        info!(
            width = image.width(),
            height = image.height(),
            format = %format,
            mirror = orientation.mirror,
            size = data.len(),
            "Snapshot captured"
        );

        Ok(Snapshot {
            format,
            quality_used: if format.is_lossless() { 1.0 } else { quality },
            width: image.width(),
            height: image.height(),
            data,
        })
    }
}
