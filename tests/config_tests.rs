// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use camera_snapshot::backends::camera::types::FacingMode;
use camera_snapshot::{Config, RasterSize};
use std::path::PathBuf;

fn temp_config_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("camera-snapshot-{}", uuid::Uuid::new_v4()))
        .join("config.json")
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.video.width, 1280);
    assert_eq!(config.video.height, 720);
    assert_eq!(config.video.frame_rate, 30);
    assert_eq!(config.video.facing_mode, FacingMode::Environment);
    assert_eq!(config.output.mime_type, "image/jpeg");
    assert_eq!(config.output.raster, RasterSize::Native);
    assert!(config.image_source.is_none());
    assert_eq!(config.latency_ms, 0);
}

#[test]
fn test_partial_config_uses_defaults() {
    let path = temp_config_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{ "video": { "width": 640, "height": 480, "facingMode": "user" }, "latencyMs": 25 }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.video.width, 640);
    assert_eq!(config.video.height, 480);
    assert_eq!(config.video.frame_rate, 30);
    assert_eq!(config.video.facing_mode, FacingMode::User);
    assert_eq!(config.output, Config::default().output);
    assert_eq!(config.latency_ms, 25);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_config_save_and_load() {
    let path = temp_config_path();
    let mut config = Config::default();
    config.output.mime_type = "image/webp".to_string();
    config.output.raster = RasterSize::Fixed {
        width: 800,
        height: 600,
    };
    config.image_source = Some(PathBuf::from("/tmp/still.png"));

    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let path = temp_config_path();
    let config = Config::load_or_default(Some(&path)).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_config_is_an_error() {
    let path = temp_config_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_or_default(Some(&path)).is_err());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
