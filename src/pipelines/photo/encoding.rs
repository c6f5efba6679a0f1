// SPDX-License-Identifier: GPL-3.0-only

//! Still image encoding
//!
//! This module handles encoding rasterized frames to the formats a canvas can
//! export:
//! - PNG (lossless)
//! - JPEG (with quality control)
//! - WebP (lossless encoder, quality is advisory)

use crate::constants::DEFAULT_ENCODER_QUALITY;
use crate::errors::CaptureResult;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// PNG format (lossless compression)
    Png,
    /// JPEG format (lossy compression)
    Jpeg,
    /// WebP format (lossless)
    Webp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Webp];

    /// Parse a MIME type such as `image/jpeg`
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(OutputFormat::Png),
            "image/jpeg" | "image/jpg" => Some(OutputFormat::Jpeg),
            "image/webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }

    /// MIME type written into the snapshot
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }

    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }

    /// Whether quality has no effect on the output
    pub fn is_lossless(&self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Size the frame is rasterized at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum RasterSize {
    /// The frame's own decoded size
    #[default]
    Native,
    /// Scale the frame into a canvas of this size
    Fixed { width: u32, height: u32 },
}

/// Requested output of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    /// Target MIME type; unknown types fall back to PNG
    pub mime_type: String,
    /// Encoder quality in `[0, 1]`, only used by lossy formats
    pub quality: f32,
    pub raster: RasterSize,
}

impl OutputConfig {
    pub fn new(mime_type: impl Into<String>, quality: f32) -> Self {
        Self {
            mime_type: mime_type.into(),
            quality,
            raster: RasterSize::Native,
        }
    }

    /// Quality the encoder will use: out-of-range or NaN values fall back to
    /// the default, like `canvas.toDataURL` does
    pub fn effective_quality(&self) -> f32 {
        if (0.0..=1.0).contains(&self.quality) {
            self.quality
        } else {
            DEFAULT_ENCODER_QUALITY
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(OutputFormat::Jpeg.mime_type(), 1.0)
    }
}

/// Map a `[0, 1]` quality onto the JPEG encoder's 1-100 scale
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode an RGBA image in `format`
///
/// `quality` is ignored by the lossless formats.
pub fn encode(image: &RgbaImage, format: OutputFormat, quality: f32) -> CaptureResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer)
                .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)?;
        }
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality)).encode(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Webp => {
            WebPEncoder::new_lossless(&mut buffer)
                .encode(image.as_raw(), width, height, ExtendedColorType::Rgba8)?;
        }
    }

    debug!(format = %format, size = buffer.len(), "Encoding complete");
    Ok(buffer)
}
