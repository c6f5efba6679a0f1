// SPDX-License-Identifier: MPL-2.0

//! Scripted media platform for session tests
//!
//! Acquisitions either take the next scripted response or wait until the test
//! resolves them, so overlapping negotiations can be ordered at will.

#![allow(dead_code)]

use async_trait::async_trait;
use camera_snapshot::backends::camera::types::*;
use camera_snapshot::{MediaPlatform, MediaStream};
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

/// What the device behind a scripted stream reports
#[derive(Debug, Clone)]
pub struct FakeDevice {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub facing_mode: Option<FacingMode>,
    pub zoom: Option<ZoomCapability>,
    pub zoom_value: Option<f64>,
    pub play_error: Option<BackendError>,
}

impl FakeDevice {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            width: 8,
            height: 4,
            facing_mode: None,
            zoom: None,
            zoom_value: None,
            play_error: None,
        }
    }

    pub fn facing(mut self, facing_mode: FacingMode) -> Self {
        self.facing_mode = Some(facing_mode);
        self
    }

    pub fn zoom(mut self, capability: ZoomCapability, value: f64) -> Self {
        self.zoom = Some(capability);
        self.zoom_value = Some(value);
        self
    }

    pub fn failing_playback(mut self, err: BackendError) -> Self {
        self.play_error = Some(err);
        self
    }
}

pub enum Response {
    Stream(FakeDevice),
    Fail(BackendError),
}

#[derive(Default)]
struct Inner {
    scripted: RefCell<VecDeque<Response>>,
    waiting: RefCell<Vec<Option<oneshot::Sender<Response>>>>,
    requests: RefCell<Vec<StreamRequest>>,
    calls: Cell<usize>,
    live: Cell<usize>,
    stop_calls: RefCell<Vec<usize>>,
    devices: RefCell<Option<Vec<MediaDeviceInfo>>>,
}

#[derive(Clone, Default)]
pub struct ScriptedPlatform {
    inner: Rc<Inner>,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response returned immediately by the next acquisition
    pub fn script(&self, response: Response) -> &Self {
        self.inner.scripted.borrow_mut().push_back(response);
        self
    }

    /// Make enumeration available with these devices
    pub fn set_devices(&self, devices: Vec<MediaDeviceInfo>) {
        *self.inner.devices.borrow_mut() = Some(devices);
    }

    /// Number of acquisitions waiting for the test to resolve them
    pub fn waiting(&self) -> usize {
        self.inner
            .waiting
            .borrow()
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Resolve the `call`-th acquisition (0-based, in call order)
    pub fn resolve(&self, call: usize, response: Response) {
        let sender = self.inner.waiting.borrow_mut()[call]
            .take()
            .expect("acquisition already resolved");
        let _ = sender.send(response);
    }

    /// Wait until `count` acquisitions are parked
    pub async fn until_waiting(&self, count: usize) {
        while self.waiting() < count {
            tokio::task::yield_now().await;
        }
    }

    pub fn requests(&self) -> Vec<StreamRequest> {
        self.inner.requests.borrow().clone()
    }

    /// Streams acquired and not stopped
    pub fn live_streams(&self) -> usize {
        self.inner.live.get()
    }

    /// Stream ids (call indices) in the order `stop` was called, repeats included
    pub fn stop_calls(&self) -> Vec<usize> {
        self.inner.stop_calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl MediaPlatform for ScriptedPlatform {
    async fn get_user_media(&self, request: &StreamRequest) -> BackendResult<Box<dyn MediaStream>> {
        let call = self.inner.calls.get();
        self.inner.calls.set(call + 1);
        self.inner.requests.borrow_mut().push(*request);

        let scripted = self.inner.scripted.borrow_mut().pop_front();
        let response = match scripted {
            Some(response) => {
                self.inner.waiting.borrow_mut().push(None);
                response
            }
            None => {
                let (tx, rx) = oneshot::channel();
                self.inner.waiting.borrow_mut().push(Some(tx));
                rx.await
                    .map_err(|_| BackendError::Aborted("test dropped the request".into()))?
            }
        };

        match response {
            Response::Fail(err) => Err(err),
            Response::Stream(device) => {
                self.inner.live.set(self.inner.live.get() + 1);
                Ok(Box::new(ScriptedStream {
                    id: call,
                    device,
                    playing: false,
                    stopped: false,
                    inner: Rc::clone(&self.inner),
                }))
            }
        }
    }

    async fn enumerate_devices(&self) -> BackendResult<Vec<MediaDeviceInfo>> {
        self.inner
            .devices
            .borrow()
            .clone()
            .ok_or_else(|| BackendError::NotSupported("enumerateDevices is missing".into()))
    }
}

struct ScriptedStream {
    id: usize,
    device: FakeDevice,
    playing: bool,
    stopped: bool,
    inner: Rc<Inner>,
}

#[async_trait(?Send)]
impl MediaStream for ScriptedStream {
    fn label(&self) -> &str {
        &self.device.label
    }

    fn capabilities(&self) -> DeviceCapabilities {
        DeviceCapabilities {
            zoom: self.device.zoom,
        }
    }

    fn settings(&self) -> TrackSettings {
        TrackSettings {
            device_id: self.device.label.clone(),
            width: self.device.width,
            height: self.device.height,
            frame_rate: 30.0,
            facing_mode: self.device.facing_mode,
            zoom: self.device.zoom_value,
        }
    }

    async fn play(&mut self) -> BackendResult<()> {
        if let Some(err) = self.device.play_error.clone() {
            return Err(err);
        }
        self.playing = true;
        Ok(())
    }

    fn current_frame(&self) -> Option<CameraFrame> {
        if !self.playing || self.stopped {
            return None;
        }
        Some(gradient_frame(self.device.width, self.device.height))
    }

    fn stop(&mut self) {
        self.inner.stop_calls.borrow_mut().push(self.id);
        if !self.stopped {
            self.stopped = true;
            self.inner.live.set(self.inner.live.get() - 1);
        }
    }
}

/// Deterministic left-to-right gradient
pub fn gradient_frame(width: u32, height: u32) -> CameraFrame {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 30) as u8, (y * 40) as u8, 200, 255]);
        }
    }
    CameraFrame::new(width, height, PixelFormat::RGBA, Arc::from(data))
}

pub fn constraints(width: u32, height: u32, facing_mode: FacingMode) -> VideoConstraints {
    VideoConstraints {
        width,
        height,
        frame_rate: 30,
        facing_mode,
    }
}
