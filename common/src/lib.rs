//! Scrolling text and sliced image engine for HUB75 RGB LED matrix panels.
//!
//! This crate is platform-agnostic. It draws through a [`MatrixDriver`], so the
//! same engine runs against real panel hardware, the desktop simulator, or the
//! in-memory [`FrameBuffers`] used by the tests.
//!
//! - [`colors`]: RGB565 packing and the panel palette
//! - [`config`]: Geometry, slice constants and wiring configuration
//! - [`driver`]: Driver trait and the in-memory double buffer
//! - [`surface`]: Rotated text and rectangle drawing
//! - [`text`]: Text line table and scroll arithmetic
//! - [`ingest`]: Slice-by-slice image ingestion
//! - [`panel`]: The engine tying the above together
//! - [`slicer`]: Sender-side fitting, tone adjustment and frame slicing
//! - [`transition`]: Wipe, square, circle and noise reveals between images
//! - [`diag`]: Debug log buffer
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` and allocation-free. Text lives in fixed-capacity
//! strings and the line table is sized at compile time.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod diag;
pub mod driver;
pub mod error;
pub mod ingest;
pub mod panel;
pub mod slicer;
pub mod surface;
pub mod text;
pub mod transition;

// Re-export commonly used items
pub use colors::*;
pub use config::*;
pub use driver::{FrameBuffers, MatrixDriver};
pub use error::PanelError;
pub use panel::LedPanel;
pub use surface::{FrameSurface, Rotation};
pub use text::{TextLine, TextLineSpec};
pub use transition::{Transition, TransitionKind, WipeDirection};
