// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines for captured frames
//!
//! # Pipeline Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │ Snapshot Pipeline │ ──▶ │   Snapshot   │
//! │ (RGBA/BGRA/  │     │  - Rasterize      │     │ (PNG/JPEG/   │
//! │  RGB/Gray)   │     │  - Mirror         │     │  WebP bytes) │
//! │              │     │  - Encoding       │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: Single-frame still capture

pub mod photo;
