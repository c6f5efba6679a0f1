// SPDX-License-Identifier: GPL-3.0-only

//! Still-image frame source for the virtual camera
//!
//! Lets a virtual device show a picture from disk instead of the generated
//! test pattern.

use crate::backends::camera::types::{BackendError, BackendResult, CameraFrame, PixelFormat};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// File extensions the image loader accepts
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "gif"];

/// Check whether a file extension names a supported image format
pub fn is_image_extension(extension: &str) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Load an image file as an RGBA camera frame
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !is_image_extension(extension) {
        return Err(BackendError::NotSupported(format!(
            "Unsupported file format: {}",
            path.display()
        )));
    }

    info!(path = %path.display(), "Loading image file");

    let img = image::open(path).map_err(|e| {
        BackendError::NotReadable(format!("Failed to load image '{}': {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();
    let data: Vec<u8> = rgba.into_raw();

    info!(width, height, "Image loaded successfully");

    Ok(CameraFrame::new(
        width,
        height,
        PixelFormat::RGBA,
        Arc::from(data.into_boxed_slice()),
    ))
}
