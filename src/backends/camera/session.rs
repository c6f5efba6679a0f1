// SPDX-License-Identifier: GPL-3.0-only

//! Capture session lifecycle
//!
//! The session provides:
//! - Stream negotiation against a [`MediaPlatform`]
//! - Release of the previous stream before a new one is requested
//! - Zoom capability reconciliation
//! - Last-request-wins ordering of overlapping negotiations
//!
//! Overlapping `negotiate` calls are tracked with a generation counter. Each
//! call takes a ticket when it starts; when its suspension points resume, a
//! ticket that is no longer the newest means the result is stale. A stale
//! stream is stopped instead of being promoted. `close` bumps the counter too,
//! so a negotiation still in flight when the session is closed cleans up after
//! itself.

use super::types::*;
use super::{MediaPlatform, MediaStream};
use crate::errors::{CaptureError, CaptureResult};
use crate::pipelines::photo::{Orientation, OutputConfig, Snapshot, SnapshotEncoder};
use std::cell::RefCell;
use tracing::{debug, info, warn};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Negotiating,
    Active,
    Failed,
}

impl SessionStatus {
    /// Whether the state machine allows moving from `self` to `next`
    ///
    /// `Negotiating -> Idle` only happens when the session is closed while a
    /// negotiation is still in flight.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Idle, Negotiating)
                | (Active, Negotiating)
                | (Failed, Negotiating)
                | (Negotiating, Active)
                | (Negotiating, Failed)
                | (Negotiating, Idle)
                | (Active, Idle)
                | (Failed, Idle)
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Negotiating => write!(f, "negotiating"),
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Owns an acquired stream and stops it when dropped
struct StreamGuard(Box<dyn MediaStream>);

impl Drop for StreamGuard {
    fn drop(&mut self) {
        debug!(track = self.0.label(), "Stopping camera stream");
        self.0.stop();
    }
}

/// Internal session state
#[derive(Default)]
struct SessionState {
    status: SessionStatus,
    constraints: Option<VideoConstraints>,
    zoom: ZoomState,
    settings: Option<TrackSettings>,
    stream: Option<StreamGuard>,
    last_error: Option<CaptureError>,
    /// Ticket of the newest negotiation (or close)
    generation: u64,
}

impl SessionState {
    fn transition(&mut self, next: SessionStatus) {
        if self.status == next {
            return;
        }
        if !self.status.can_transition_to(next) {
            warn!(from = %self.status, to = %next, "Ignoring invalid session transition");
            return;
        }
        debug!(from = %self.status, to = %next, "Session transition");
        self.status = next;
    }

    /// Detach the active stream and forget everything derived from it
    fn detach_stream(&mut self) -> Option<StreamGuard> {
        self.zoom = ZoomState::UNSUPPORTED;
        self.settings = None;
        self.stream.take()
    }
}

/// One camera stream and its negotiation state
///
/// The session is an explicitly owned value: create one per camera view and
/// hand it (by reference) to whatever drives it. Methods take `&self` so that
/// a newer `negotiate` can start while an older one is suspended; the session
/// is not `Sync` and is meant for a single logical owner.
///
/// Dropping the session stops the active stream.
pub struct CaptureSession {
    platform: Box<dyn MediaPlatform>,
    state: RefCell<SessionState>,
}

impl CaptureSession {
    /// Create an idle session on top of a media platform
    pub fn new<P: MediaPlatform + 'static>(platform: P) -> Self {
        Self::with_platform(Box::new(platform))
    }

    /// Create an idle session from an already boxed platform
    pub fn with_platform(platform: Box<dyn MediaPlatform>) -> Self {
        Self {
            platform,
            state: RefCell::new(SessionState::default()),
        }
    }

    /// The platform this session acquires streams from
    pub fn platform(&self) -> &dyn MediaPlatform {
        self.platform.as_ref()
    }

    /// Open (or replace) the camera stream for `constraints`
    ///
    /// Any active stream is released first. All numeric constraints are sent
    /// as ideal values, so a stream that differs from them is still accepted.
    /// On success the stream is playing and the reconciled zoom state is
    /// returned.
    ///
    /// # Returns
    /// * `Ok(ZoomState)` - Session is active; the all-zero zoom means no zoom
    /// * `Err(CaptureError::Superseded)` - A newer negotiation or `close` won
    /// * `Err(CaptureError)` - Acquisition failed; the session is `failed`
    pub async fn negotiate(&self, constraints: VideoConstraints) -> CaptureResult<ZoomState> {
        if let Err(msg) = constraints.validate() {
            warn!(%constraints, error = %msg, "Rejecting invalid constraints");
            return Err(CaptureError::ConstraintsUnsatisfiable(msg));
        }

        let ticket = self.begin_negotiation(constraints);
        let request = StreamRequest::from(&constraints);
        info!(%constraints, ticket, "Negotiating camera stream");

        let mut stream = match self.platform.get_user_media(&request).await {
            Ok(stream) => StreamGuard(stream),
            Err(err) => return Err(self.fail(ticket, err.into())),
        };

        self.ensure_current(ticket)?;

        let zoom = reconcile_zoom(stream.0.as_ref());
        let settings = stream.0.settings();

        if let Err(err) = stream.0.play().await {
            drop(stream);
            return Err(self.fail(ticket, err.into()));
        }

        let mut state = self.state.borrow_mut();
        if state.generation != ticket {
            let err = superseded(&state);
            debug!(ticket, newest = state.generation, "Discarding stale stream");
            drop(state);
            drop(stream);
            return Err(err);
        }

        info!(
            width = settings.width,
            height = settings.height,
            frame_rate = settings.frame_rate,
            zoom = %zoom,
            "Camera stream active"
        );
        state.stream = Some(stream);
        state.zoom = zoom;
        state.settings = Some(settings);
        state.last_error = None;
        state.transition(SessionStatus::Active);

        Ok(zoom)
    }

    /// Handle to the latest decoded frame of the active stream
    ///
    /// Fails fast with `NoActiveFrame` unless the session is active and the
    /// stream has produced a frame.
    pub fn current_frame(&self) -> CaptureResult<CameraFrame> {
        let state = self.state.borrow();
        if state.status != SessionStatus::Active {
            return Err(CaptureError::NoActiveFrame);
        }
        state
            .stream
            .as_ref()
            .and_then(|stream| stream.0.current_frame())
            .ok_or(CaptureError::NoActiveFrame)
    }

    /// Capture the current frame as an encoded still image
    ///
    /// The mirror policy follows [`Self::orientation`].
    pub fn snapshot(&self, output: &OutputConfig) -> CaptureResult<Snapshot> {
        let frame = self.current_frame()?;
        SnapshotEncoder::capture(&frame, output, self.orientation())
    }

    /// Release the stream and return to idle; safe to call in any state
    pub fn close(&self) {
        let released = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.transition(SessionStatus::Idle);
            state.detach_stream()
        };

        if released.is_some() {
            info!("Closing camera session");
        }
        drop(released);
    }

    /// Current lifecycle state
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status
    }

    /// Check if a stream is active
    pub fn is_active(&self) -> bool {
        self.status() == SessionStatus::Active
    }

    /// Zoom state of the active device (all-zero when unsupported or inactive)
    pub fn zoom(&self) -> ZoomState {
        self.state.borrow().zoom
    }

    /// Constraints of the most recent negotiation
    pub fn constraints(&self) -> Option<VideoConstraints> {
        self.state.borrow().constraints
    }

    /// Settings the active device actually applied
    pub fn settings(&self) -> Option<TrackSettings> {
        self.state.borrow().settings.clone()
    }

    /// Error of the most recent failed negotiation, for display
    pub fn last_error(&self) -> Option<CaptureError> {
        self.state.borrow().last_error.clone()
    }

    /// Mirror policy for snapshots of the active stream
    ///
    /// Prefers the facing mode the device reports and falls back to the
    /// requested one.
    pub fn orientation(&self) -> Orientation {
        let state = self.state.borrow();
        let facing_mode = state
            .settings
            .as_ref()
            .and_then(|settings| settings.facing_mode)
            .or_else(|| state.constraints.map(|c| c.facing_mode));
        Orientation::for_facing_mode(facing_mode)
    }

    /// Start a negotiation: take a ticket and release the previous stream
    fn begin_negotiation(&self, constraints: VideoConstraints) -> u64 {
        let (ticket, previous) = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.constraints = Some(constraints);
            state.transition(SessionStatus::Negotiating);
            (state.generation, state.detach_stream())
        };

        if previous.is_some() {
            info!(ticket, "Releasing previous camera stream");
        }
        drop(previous);
        ticket
    }

    fn ensure_current(&self, ticket: u64) -> CaptureResult<()> {
        let state = self.state.borrow();
        if state.generation == ticket {
            Ok(())
        } else {
            debug!(ticket, newest = state.generation, "Negotiation superseded");
            Err(superseded(&state))
        }
    }

    /// Record a failure of negotiation `ticket`
    ///
    /// Only the newest negotiation may move the session to `failed`; a stale
    /// one reports that it was superseded.
    fn fail(&self, ticket: u64, err: CaptureError) -> CaptureError {
        let mut state = self.state.borrow_mut();
        if state.generation != ticket {
            debug!(ticket, error = %err, "Ignoring failure of superseded negotiation");
            return superseded(&state);
        }

        warn!(error = %err, "Camera negotiation failed");
        state.detach_stream();
        state.last_error = Some(err.clone());
        state.transition(SessionStatus::Failed);
        err
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("CaptureSession")
            .field("status", &state.status)
            .field("constraints", &state.constraints)
            .field("zoom", &state.zoom)
            .field("generation", &state.generation)
            .finish()
    }
}

fn superseded(state: &SessionState) -> CaptureError {
    if state.status == SessionStatus::Idle {
        CaptureError::Superseded("session closed".to_string())
    } else {
        CaptureError::Superseded("a newer negotiation replaced this request".to_string())
    }
}

/// Derive the zoom state from what the device reports
fn reconcile_zoom(stream: &dyn MediaStream) -> ZoomState {
    match stream.capabilities().zoom {
        Some(capability) => ZoomState::from_capability(capability, stream.settings().zoom),
        None => {
            info!(track = stream.label(), "Zoom is not supported by this device");
            ZoomState::UNSUPPORTED
        }
    }
}
