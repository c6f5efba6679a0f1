// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use camera_snapshot::VideoConstraints;
use camera_snapshot::constants::{
    DEFAULT_ENCODER_QUALITY, FRAME_RATE_OPTIONS, RESOLUTION_PRESETS, ResolutionPreset,
};

#[test]
fn test_presets_are_valid_constraints() {
    for preset in RESOLUTION_PRESETS {
        let constraints = preset.apply(VideoConstraints::default());
        assert!(
            constraints.validate().is_ok(),
            "Preset {} is not a valid constraint",
            preset
        );
    }
}

#[test]
fn test_preset_lookup() {
    let preset = ResolutionPreset::find("full hd 1080p").unwrap();
    assert_eq!((preset.width, preset.height), (1920, 1080));

    let preset = ResolutionPreset::find("3440x1440").unwrap();
    assert_eq!(preset.name, "UltraWide 1440p");

    assert!(ResolutionPreset::find("1x1").is_none());
}

#[test]
fn test_height_follows_width() {
    assert_eq!(ResolutionPreset::height_for_width(640), Some(480));
    assert_eq!(ResolutionPreset::height_for_width(4096), Some(2160));
    // Two presets share this width; the first one wins
    assert_eq!(ResolutionPreset::height_for_width(2560), Some(1440));
    assert_eq!(ResolutionPreset::height_for_width(1000), None);
}

#[test]
fn test_apply_keeps_frame_rate_and_facing() {
    let base = VideoConstraints::default();
    let applied = RESOLUTION_PRESETS[0].apply(base);
    assert_eq!((applied.width, applied.height), (640, 480));
    assert_eq!(applied.frame_rate, base.frame_rate);
    assert_eq!(applied.facing_mode, base.facing_mode);
}

#[test]
fn test_panel_options() {
    assert_eq!(FRAME_RATE_OPTIONS, [24, 30, 60]);
    assert!((0.0..=1.0).contains(&DEFAULT_ENCODER_QUALITY));
}
