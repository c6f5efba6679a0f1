// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera platform
//!
//! A [`MediaPlatform`] backed by synthetic devices. Each device produces a
//! generated test pattern (or a still image loaded from disk) and reports a
//! configurable facing mode, zoom capability and sensor limits. It behaves like
//! a browser would:
//!
//! - ideal constraints are clamped to what the device supports
//! - device ids and labels stay hidden until permission was granted once
//! - frames are only readable after `play()`
//!
//! The platform counts open streams, so a leaked camera lock is observable.

mod file_source;

pub use file_source::{is_image_extension, load_image_as_frame};

use crate::backends::camera::types::*;
use crate::backends::camera::{MediaPlatform, MediaStream};
use crate::constants::virtual_camera as defaults;
use async_trait::async_trait;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Camera permission as the platform sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// The user will be asked, and accepts
    #[default]
    Prompt,
    Granted,
    Denied,
}

/// What a virtual device shows
#[derive(Debug, Clone)]
pub enum FrameSource {
    /// Generated gradient with colour bars
    TestPattern,
    /// A fixed picture; the device only supports the picture's size
    Still(CameraFrame),
}

/// A synthetic camera device
#[derive(Debug, Clone)]
pub struct VirtualDevice {
    pub id: String,
    pub label: String,
    pub facing_mode: Option<FacingMode>,
    pub zoom: Option<ZoomCapability>,
    /// Zoom value the device starts at
    pub initial_zoom: Option<f64>,
    pub max_width: u32,
    pub max_height: u32,
    pub max_frame_rate: u32,
    pub source: FrameSource,
}

impl VirtualDevice {
    /// Test-pattern device with the default sensor limits
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            facing_mode: None,
            zoom: None,
            initial_zoom: None,
            max_width: defaults::MAX_WIDTH,
            max_height: defaults::MAX_HEIGHT,
            max_frame_rate: defaults::MAX_FRAME_RATE,
            source: FrameSource::TestPattern,
        }
    }

    /// Device showing the picture at `path`
    pub fn from_image(
        id: impl Into<String>,
        label: impl Into<String>,
        path: &Path,
    ) -> BackendResult<Self> {
        let frame = load_image_as_frame(path)?;
        Ok(Self {
            max_width: frame.width,
            max_height: frame.height,
            source: FrameSource::Still(frame),
            ..Self::new(id, label)
        })
    }

    pub fn facing(mut self, facing_mode: FacingMode) -> Self {
        self.facing_mode = Some(facing_mode);
        self
    }

    pub fn with_zoom(mut self, capability: ZoomCapability, initial: f64) -> Self {
        self.zoom = Some(capability);
        self.initial_zoom = Some(initial);
        self
    }

    pub fn with_limits(mut self, max_width: u32, max_height: u32, max_frame_rate: u32) -> Self {
        self.max_width = max_width;
        self.max_height = max_height;
        self.max_frame_rate = max_frame_rate;
        self
    }
}

struct PlatformInner {
    devices: Vec<VirtualDevice>,
    permission: Cell<PermissionState>,
    enumeration_supported: Cell<bool>,
    latency: Cell<Duration>,
    open_streams: Cell<usize>,
}

/// Media platform with synthetic cameras
///
/// Cloning is cheap and clones share state, so a caller can keep a handle for
/// inspection after handing the platform to a session.
#[derive(Clone)]
pub struct VirtualCameraPlatform {
    inner: Rc<PlatformInner>,
}

impl VirtualCameraPlatform {
    /// Platform with a user-facing camera and a zoomable rear camera
    pub fn new() -> Self {
        Self::with_devices(vec![
            VirtualDevice::new("virtual-front", "Virtual Front Camera").facing(FacingMode::User),
            VirtualDevice::new("virtual-rear", "Virtual Rear Camera")
                .facing(FacingMode::Environment)
                .with_zoom(
                    ZoomCapability {
                        min: 1.0,
                        max: 8.0,
                        step: 0.1,
                    },
                    1.0,
                ),
        ])
    }

    pub fn with_devices(devices: Vec<VirtualDevice>) -> Self {
        Self::build(devices, PermissionState::default(), true, defaults::DEFAULT_LATENCY)
    }

    fn build(
        devices: Vec<VirtualDevice>,
        permission: PermissionState,
        enumeration_supported: bool,
        latency: Duration,
    ) -> Self {
        Self {
            inner: Rc::new(PlatformInner {
                devices,
                permission: Cell::new(permission),
                enumeration_supported: Cell::new(enumeration_supported),
                latency: Cell::new(latency),
                open_streams: Cell::new(0),
            }),
        }
    }

    /// Same devices, different permission state
    pub fn with_permission(self, permission: PermissionState) -> Self {
        self.inner.permission.set(permission);
        self
    }

    /// Platform that lacks `enumerateDevices`
    pub fn without_enumeration(self) -> Self {
        self.inner.enumeration_supported.set(false);
        self
    }

    /// Simulated delay for acquisition and for starting playback
    pub fn with_latency(self, latency: Duration) -> Self {
        self.inner.latency.set(latency);
        self
    }

    pub fn permission(&self) -> PermissionState {
        self.inner.permission.get()
    }

    pub fn set_permission(&self, permission: PermissionState) {
        self.inner.permission.set(permission);
    }

    /// Streams acquired and not yet stopped
    pub fn open_streams(&self) -> usize {
        self.inner.open_streams.get()
    }

    fn select_device(&self, facing_mode: FacingMode) -> Option<&VirtualDevice> {
        let devices = &self.inner.devices;
        devices
            .iter()
            .find(|device| device.facing_mode == Some(facing_mode))
            .or_else(|| devices.first())
    }
}

impl Default for VirtualCameraPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VirtualCameraPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualCameraPlatform")
            .field("devices", &self.inner.devices.len())
            .field("permission", &self.inner.permission.get())
            .field("open_streams", &self.inner.open_streams.get())
            .finish()
    }
}

#[async_trait(?Send)]
impl MediaPlatform for VirtualCameraPlatform {
    async fn get_user_media(&self, request: &StreamRequest) -> BackendResult<Box<dyn MediaStream>> {
        let latency = self.inner.latency.get();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.permission() == PermissionState::Denied {
            return Err(BackendError::NotAllowed("Permission denied".to_string()));
        }

        let device = self
            .select_device(request.facing_mode.value())
            .ok_or_else(|| BackendError::NotFound("Requested device not found".to_string()))?
            .clone();

        let (width, height) = match &device.source {
            FrameSource::TestPattern => (
                request.width.value().min(device.max_width),
                request.height.value().min(device.max_height),
            ),
            FrameSource::Still(frame) => (frame.width, frame.height),
        };
        let frame_rate = request.frame_rate.value().min(device.max_frame_rate);

        self.set_permission(PermissionState::Granted);
        self.inner
            .open_streams
            .set(self.inner.open_streams.get() + 1);

        let stream = VirtualStream {
            id: uuid::Uuid::new_v4(),
            zoom: device.zoom.and(device.initial_zoom),
            zoom_exposed: request.zoom,
            device,
            width,
            height,
            frame_rate,
            playing: false,
            stopped: false,
            sequence: Cell::new(0),
            platform: Rc::clone(&self.inner),
        };
        info!(
            stream = %stream.id,
            device = %stream.device.label,
            width,
            height,
            frame_rate,
            "Virtual camera stream acquired"
        );
        Ok(Box::new(stream))
    }

    async fn enumerate_devices(&self) -> BackendResult<Vec<MediaDeviceInfo>> {
        if !self.inner.enumeration_supported.get() {
            return Err(BackendError::NotSupported(
                "MediaDevices API not supported by this platform.".to_string(),
            ));
        }

        let revealed = self.permission() == PermissionState::Granted;
        Ok(self
            .inner
            .devices
            .iter()
            .map(|device| MediaDeviceInfo {
                device_id: if revealed {
                    device.id.clone()
                } else {
                    String::new()
                },
                kind: MediaDeviceKind::VideoInput,
                label: if revealed {
                    device.label.clone()
                } else {
                    String::new()
                },
            })
            .collect())
    }
}

/// A stream from a virtual device
struct VirtualStream {
    id: uuid::Uuid,
    device: VirtualDevice,
    width: u32,
    height: u32,
    frame_rate: u32,
    zoom: Option<f64>,
    zoom_exposed: bool,
    playing: bool,
    stopped: bool,
    sequence: Cell<u64>,
    platform: Rc<PlatformInner>,
}

#[async_trait(?Send)]
impl MediaStream for VirtualStream {
    fn label(&self) -> &str {
        &self.device.label
    }

    fn capabilities(&self) -> DeviceCapabilities {
        DeviceCapabilities {
            zoom: self.device.zoom.filter(|_| self.zoom_exposed),
        }
    }

    fn settings(&self) -> TrackSettings {
        TrackSettings {
            device_id: self.device.id.clone(),
            width: self.width,
            height: self.height,
            frame_rate: self.frame_rate as f64,
            facing_mode: self.device.facing_mode,
            zoom: self.zoom.filter(|_| self.zoom_exposed),
        }
    }

    async fn play(&mut self) -> BackendResult<()> {
        if self.stopped {
            return Err(BackendError::Playback(
                "stream has already been stopped".to_string(),
            ));
        }
        let latency = self.platform.latency.get();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.playing = true;
        debug!(stream = %self.id, "Virtual camera playing");
        Ok(())
    }

    fn current_frame(&self) -> Option<CameraFrame> {
        if !self.playing || self.stopped {
            return None;
        }

        let sequence = self.sequence.get();
        self.sequence.set(sequence + 1);

        let mut frame = match &self.device.source {
            FrameSource::TestPattern => test_pattern(self.width, self.height, sequence),
            FrameSource::Still(frame) => frame.clone(),
        };
        frame.sequence = sequence;
        frame.captured_at = std::time::Instant::now();
        Some(frame)
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.playing = false;
        self.platform
            .open_streams
            .set(self.platform.open_streams.get().saturating_sub(1));
        info!(stream = %self.id, device = %self.device.label, "Virtual camera stream stopped");
    }
}

/// Colour bars over a horizontal luminance ramp
///
/// Left and right halves differ, so a mirrored capture is easy to spot.
pub fn test_pattern(width: u32, height: u32, sequence: u64) -> CameraFrame {
    const BARS: [[u8; 3]; 7] = [
        [192, 192, 192],
        [192, 192, 0],
        [0, 192, 192],
        [0, 192, 0],
        [192, 0, 192],
        [192, 0, 0],
        [0, 0, 192],
    ];

    let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
    let bar_rows = height * 2 / 3;
    for y in 0..height {
        for x in 0..width {
            let pixel = if y < bar_rows {
                let bar = BARS[(x as usize * BARS.len()) / width.max(1) as usize];
                [bar[0], bar[1], bar[2], 255]
            } else {
                let ramp = (x * 255 / width.saturating_sub(1).max(1)) as u8;
                [ramp, ramp, (sequence % 256) as u8, 255]
            };
            data.extend_from_slice(&pixel);
        }
    }

    CameraFrame::new(width, height, PixelFormat::RGBA, Arc::from(data))
}
