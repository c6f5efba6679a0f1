// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! The backend layer abstracts the platform media API, providing a consistent
//! interface regardless of where the frames come from:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               UI collaborator               │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌──────────────────────────────────────┐   │
//! │  │ Camera: CaptureSession + platform    │   │
//! │  │         traits                       │   │
//! │  └──────────────────────────────────────┘   │
//! │  ┌──────────────────────────────────────┐   │
//! │  │ Virtual Camera: synthetic devices    │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Platform traits, shared types and the capture session
//! - [`virtual_camera`]: Built-in platform with synthetic devices

pub mod camera;
pub mod virtual_camera;
