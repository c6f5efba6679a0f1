// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Probing what a camera delivers for a set of constraints
//! - Taking snapshots

use camera_snapshot::backends::camera::types::FacingMode;
use camera_snapshot::constants::{
    FRAME_RATE_OPTIONS, OUTPUT_FORMATS, RESOLUTION_PRESETS, ResolutionPreset,
};
use camera_snapshot::{
    CaptureError, CaptureSession, Config, RasterSize, VirtualCameraPlatform, VirtualDevice,
    enumerate_video_inputs,
};
use std::path::PathBuf;
use std::time::Duration;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Capture flags given on the command line
pub struct CaptureOverrides {
    pub resolution: Option<String>,
    pub frame_rate: Option<u32>,
    pub facing: Option<String>,
}

/// Where a snapshot goes
pub enum SnapshotTarget {
    /// Write to this file or directory (current directory when `None`)
    File(Option<PathBuf>),
    /// Print a data URI on stdout
    DataUri,
}

/// Apply command line capture flags over the configured constraints
pub fn apply_capture_args(config: &mut Config, overrides: &CaptureOverrides) -> CliResult {
    if let Some(resolution) = overrides.resolution.as_deref() {
        let (width, height) = parse_resolution(resolution)?;
        config.video.width = width;
        config.video.height = height;
    }
    if let Some(frame_rate) = overrides.frame_rate {
        config.video.frame_rate = frame_rate;
    }
    if let Some(facing) = overrides.facing.as_deref() {
        config.video.facing_mode = facing.parse::<FacingMode>()?;
    }
    Ok(())
}

/// Parse a preset name or `WIDTHxHEIGHT`
fn parse_resolution(value: &str) -> Result<(u32, u32), String> {
    if let Some(preset) = ResolutionPreset::find(value) {
        return Ok((preset.width, preset.height));
    }

    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Unknown resolution '{}'", value))?;
    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("Invalid width '{}': {}", width, e))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("Invalid height '{}': {}", height, e))?;
    Ok((width, height))
}

/// Build the virtual camera platform described by the config
fn build_platform(config: &Config) -> Result<VirtualCameraPlatform, Box<dyn std::error::Error>> {
    let platform = match &config.image_source {
        Some(path) => VirtualCameraPlatform::with_devices(vec![
            VirtualDevice::from_image("virtual-still", "Virtual Still Camera", path)?
                .facing(config.video.facing_mode),
        ]),
        None => VirtualCameraPlatform::new(),
    };
    Ok(platform.with_latency(Duration::from_millis(config.latency_ms)))
}

/// List all available video inputs
pub async fn list_cameras(config: &Config) -> CliResult {
    let platform = build_platform(config)?;

    match enumerate_video_inputs(&platform).await {
        Ok(devices) if devices.is_empty() => println!("No cameras found."),
        Ok(devices) => {
            println!("Available cameras:");
            println!();
            for (index, device) in devices.iter().enumerate() {
                let label = if device.label.is_empty() {
                    "(label hidden until permission is granted)"
                } else {
                    device.label.as_str()
                };
                println!("  [{}] {} ({})", index, label, device.id);
            }
        }
        Err(CaptureError::ApiUnsupported(msg)) => println!("Error: {}", msg),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Print the resolution presets and other panel options
pub fn list_presets() -> CliResult {
    println!("Resolutions:");
    for preset in RESOLUTION_PRESETS.iter() {
        println!("  {}", preset);
    }
    let rates: Vec<String> = FRAME_RATE_OPTIONS
        .iter()
        .map(|fps| format!("{}fps", fps))
        .collect();
    println!("Frame rates: {}", rates.join(", "));
    let formats: Vec<&str> = OUTPUT_FORMATS.iter().map(|f| f.mime_type()).collect();
    println!("Formats: {}", formats.join(", "));
    Ok(())
}

/// Negotiate a stream and report what the device delivered
pub async fn probe(config: &Config) -> CliResult {
    let session = CaptureSession::new(build_platform(config)?);
    let zoom = session.negotiate(config.video).await?;

    println!("Requested: {}", config.video);
    if let Some(settings) = session.settings() {
        let facing = settings
            .facing_mode
            .map(|f| f.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "Delivered: {}x{} @ {}fps ({}) from {}",
            settings.width, settings.height, settings.frame_rate, facing, settings.device_id
        );
    }
    println!("Zoom: {}", zoom);
    println!("Mirrored snapshots: {}", session.orientation().mirror);

    session.close();
    Ok(())
}

/// Negotiate a stream, capture one frame and deliver it
pub async fn take_snapshot(
    config: &Config,
    requested_raster: bool,
    target: SnapshotTarget,
) -> CliResult {
    let session = CaptureSession::new(build_platform(config)?);
    session.negotiate(config.video).await?;

    let mut output = config.output.clone();
    if requested_raster {
        output.raster = RasterSize::Fixed {
            width: config.video.width,
            height: config.video.height,
        };
    }

    let snapshot = session.snapshot(&output)?;
    session.close();

    match target {
        SnapshotTarget::DataUri => println!("{}", snapshot.to_data_uri()),
        SnapshotTarget::File(path) => {
            let path = match path {
                Some(path) if path.is_dir() => path.join(snapshot.suggested_file_name()),
                Some(path) => path,
                None => PathBuf::from(snapshot.suggested_file_name()),
            };
            std::fs::write(&path, snapshot.data())?;
            println!(
                "Saved {}x{} {} to {}",
                snapshot.width(),
                snapshot.height(),
                snapshot.mime_type(),
                path.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("HD 720p"), Ok((1280, 720)));
        assert_eq!(parse_resolution("800x600"), Ok((800, 600)));
        assert!(parse_resolution("huge").is_err());
        assert!(parse_resolution("12xabc").is_err());
    }

    #[test]
    fn test_apply_capture_args() {
        let mut config = Config::default();
        let overrides = CaptureOverrides {
            resolution: Some("640x480".to_string()),
            frame_rate: Some(24),
            facing: Some("user".to_string()),
        };
        apply_capture_args(&mut config, &overrides).unwrap();
        assert_eq!((config.video.width, config.video.height), (640, 480));
        assert_eq!(config.video.frame_rate, 24);
        assert_eq!(config.video.facing_mode, FacingMode::User);
    }
}
