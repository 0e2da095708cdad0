//! Simulator configuration constants.

use std::time::Duration;

use ledpanel_common::{BLUE_HIGH, GREEN_MEDIUM, PANEL_HEIGHT, PANEL_WIDTH, RED_MEDIUM};
use embedded_graphics::pixelcolor::Rgb565;

// =============================================================================
// Window Configuration
// =============================================================================

/// Window width in panel pixels.
pub const SCREEN_WIDTH: u32 = PANEL_WIDTH as u32;

/// Window height in panel pixels.
pub const SCREEN_HEIGHT: u32 = PANEL_HEIGHT as u32;

/// Each LED is drawn as a `WINDOW_SCALE x WINDOW_SCALE` square.
pub const WINDOW_SCALE: u32 = 8;

/// Gap between LEDs in window pixels.
pub const PIXEL_SPACING: u32 = 1;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Target tick time (25 ticks per second).
pub const FRAME_TIME: Duration = Duration::from_millis(40);

/// Ticks a completed image stays on screen before the next one is requested.
pub const IMAGE_HOLD_TICKS: u32 = 50;

/// Viewer hold when an image does not set its own (10 s).
pub const DEFAULT_VIEWER_HOLD_TICKS: u32 = 250;

/// Seed for the viewer's transition picks.
pub const VIEWER_SEED: u64 = 0x1ED0_BA5E;

// =============================================================================
// Demo Lines
// =============================================================================

pub const STATIC_TEXT: &str = "HI";
pub const STATIC_COLOR: Rgb565 = RED_MEDIUM;

pub const BANNER_TEXT: &str = "LED PANEL DEMO";
pub const BANNER_COLOR: Rgb565 = GREEN_MEDIUM;
pub const BANNER_Y: i16 = 12;

pub const VERTICAL_TEXT: &str = "UP";
pub const VERTICAL_COLOR: Rgb565 = BLUE_HIGH;
