// SPDX-License-Identifier: MPL-2.0

//! Frame rasterization
//!
//! This module turns one decoded camera frame into an RGBA pixel buffer,
//! scaled and mirrored the way the snapshot should look.

use crate::backends::camera::types::{CameraFrame, FacingMode, PixelFormat};
use crate::errors::{CaptureError, CaptureResult};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Orientation policy applied before encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    /// Flip horizontally so the still matches a mirrored preview
    pub mirror: bool,
}

impl Orientation {
    /// Mirror every camera except the rear (environment) one.
    ///
    /// An unknown facing mode is not mirrored.
    pub fn for_facing_mode(facing_mode: Option<FacingMode>) -> Self {
        let mirror = match facing_mode {
            Some(FacingMode::Environment) | None => false,
            Some(FacingMode::User | FacingMode::Left | FacingMode::Right) => true,
        };
        Self { mirror }
    }
}

/// Copy a frame into a tightly packed RGBA image at its native size
pub fn rasterize(frame: &CameraFrame) -> CaptureResult<RgbaImage> {
    let width = frame.width as usize;
    let height = frame.height as usize;
    if width == 0 || height == 0 {
        return Err(CaptureError::EncodingFailed(format!(
            "frame has no pixels ({}x{})",
            frame.width, frame.height
        )));
    }

    let bpp = frame.format.bytes_per_pixel();
    let row_len = width * bpp;
    let stride = frame.stride as usize;
    if stride < row_len {
        return Err(CaptureError::EncodingFailed(format!(
            "stride {} shorter than row of {} bytes",
            stride, row_len
        )));
    }
    if frame.data.len() < frame.expected_len() {
        return Err(CaptureError::EncodingFailed(format!(
            "frame data too small: expected {}, got {}",
            frame.expected_len(),
            frame.data.len()
        )));
    }

    let mut rgba = Vec::with_capacity(width * height * 4);
    for row in frame.data.chunks(stride).take(height) {
        for px in row[..row_len].chunks_exact(bpp) {
            let pixel = match frame.format {
                PixelFormat::RGBA => [px[0], px[1], px[2], px[3]],
                PixelFormat::BGRA => [px[2], px[1], px[0], px[3]],
                PixelFormat::RGB24 => [px[0], px[1], px[2], 255],
                PixelFormat::Gray8 => [px[0], px[0], px[0], 255],
            };
            rgba.extend_from_slice(&pixel);
        }
    }

    RgbaImage::from_raw(frame.width, frame.height, rgba).ok_or_else(|| {
        CaptureError::EncodingFailed("failed to create RGBA image from frame".to_string())
    })
}

/// Scale an image into a `width` x `height` canvas (no-op when sizes match)
pub fn scale_to(image: RgbaImage, width: u32, height: u32) -> CaptureResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(CaptureError::EncodingFailed(format!(
            "raster size must be non-zero, got {}x{}",
            width, height
        )));
    }
    if image.dimensions() == (width, height) {
        return Ok(image);
    }

    debug!(
        from_width = image.width(),
        from_height = image.height(),
        width,
        height,
        "Scaling frame"
    );
    Ok(imageops::resize(&image, width, height, FilterType::Triangle))
}

/// Apply the orientation policy in place
pub fn apply_orientation(image: &mut RgbaImage, orientation: Orientation) {
    if orientation.mirror {
        imageops::flip_horizontal_in_place(image);
    }
}
