// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use crate::backends::camera::types::VideoConstraints;
use crate::pipelines::photo::OutputFormat;

/// Quality used when a requested encoder quality is out of range
pub const DEFAULT_ENCODER_QUALITY: f32 = 0.92;

/// Frame rates offered by the input panel
pub const FRAME_RATE_OPTIONS: [u32; 3] = [24, 30, 60];

/// Output formats offered by the output panel
pub const OUTPUT_FORMATS: [OutputFormat; 3] = OutputFormat::ALL;

/// A named capture resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionPreset {
    pub name: &'static str,
    pub ratio: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Ideal resolutions offered by the input panel
pub const RESOLUTION_PRESETS: [ResolutionPreset; 10] = [
    ResolutionPreset {
        name: "SD 480p",
        ratio: "4:3",
        width: 640,
        height: 480,
    },
    ResolutionPreset {
        name: "HD 720p",
        ratio: "16:9",
        width: 1280,
        height: 720,
    },
    ResolutionPreset {
        name: "Full HD 1080p",
        ratio: "16:9",
        width: 1920,
        height: 1080,
    },
    ResolutionPreset {
        name: "Quad HD 1440p",
        ratio: "16:9",
        width: 2560,
        height: 1440,
    },
    ResolutionPreset {
        name: "4K Ultra HD",
        ratio: "16:9",
        width: 3840,
        height: 2160,
    },
    ResolutionPreset {
        name: "8K Ultra HD",
        ratio: "16:9",
        width: 7680,
        height: 4320,
    },
    ResolutionPreset {
        name: "Cinema 2K",
        ratio: "17:9",
        width: 2048,
        height: 1080,
    },
    ResolutionPreset {
        name: "Cinema 4K",
        ratio: "17:9",
        width: 4096,
        height: 2160,
    },
    ResolutionPreset {
        name: "UltraWide 1440p",
        ratio: "21:9",
        width: 3440,
        height: 1440,
    },
    ResolutionPreset {
        name: "UltraWide 1080p",
        ratio: "21:9",
        width: 2560,
        height: 1080,
    },
];

impl ResolutionPreset {
    /// Look a preset up by name (case-insensitive) or by `WIDTHxHEIGHT`
    pub fn find(query: &str) -> Option<ResolutionPreset> {
        let query = query.trim();
        RESOLUTION_PRESETS
            .iter()
            .find(|preset| {
                preset.name.eq_ignore_ascii_case(query)
                    || format!("{}x{}", preset.width, preset.height) == query
            })
            .copied()
    }

    /// The height paired with `width` when the panel changes resolution
    ///
    /// The panel keys presets by width; the first preset with that width wins.
    pub fn height_for_width(width: u32) -> Option<u32> {
        RESOLUTION_PRESETS
            .iter()
            .find(|preset| preset.width == width)
            .map(|preset| preset.height)
    }

    /// Apply this preset's size to a set of constraints
    pub fn apply(&self, constraints: VideoConstraints) -> VideoConstraints {
        VideoConstraints {
            width: self.width,
            height: self.height,
            ..constraints
        }
    }
}

impl std::fmt::Display for ResolutionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}x{}, {})",
            self.name, self.width, self.height, self.ratio
        )
    }
}

/// Virtual camera defaults
pub mod virtual_camera {
    use std::time::Duration;

    /// Largest frame the synthetic sensor produces
    pub const MAX_WIDTH: u32 = 1920;
    pub const MAX_HEIGHT: u32 = 1080;
    pub const MAX_FRAME_RATE: u32 = 60;

    /// Simulated hardware round-trip for acquisition and playback
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(0);
}
