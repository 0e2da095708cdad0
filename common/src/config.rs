//! Panel geometry and engine configuration.
//!
//! # Compile-Time Constants
//!
//! The slice and font constants describe the wire format for image ingestion and
//! the base glyph cell. Derived sizes like `SLICE_BYTES` are computed at compile
//! time for the standard 64x32 panel so callers can size their receive buffers
//! without doing the arithmetic themselves.
//!
//! # Runtime Configuration
//!
//! [`PanelConfig`] mirrors the two ways a panel can be wired: three row-select
//! lines (A, B, C) for 16-row panels or four (A, B, C, D) for 32-row panels.
//! [`PanelGeometry`] is the validated `rows x cols` pair the engine works with.

use crate::error::PanelError;

// =============================================================================
// Panel Configuration
// =============================================================================

/// Width of the standard panel in pixels.
pub const PANEL_WIDTH: usize = 64;

/// Height of the standard panel in pixels.
pub const PANEL_HEIGHT: usize = 32;

/// Default number of text line slots.
pub const NUMBER_OF_LINES: usize = 32;

/// Maximum text length per line, in bytes.
pub const MAX_TEXT_LEN: usize = 64;

// =============================================================================
// Font Configuration
// =============================================================================

/// Width of the smallest glyph cell (5px glyph + 1px spacing).
pub const MIN_FONT_WIDTH: i32 = 6;

/// Height of the smallest glyph cell.
pub const MIN_FONT_HEIGHT: i32 = 8;

// =============================================================================
// Image Slice Configuration
// =============================================================================

/// Number of horizontal slices a full frame is split into.
pub const NUMBER_OF_SLICES: usize = 8;

/// Width in columns of the working strip cleared in strip mode.
pub const SLICE_SIZE: usize = 16;

/// Slice clear direction: 1 clears a right-edge strip, anything else the full panel.
pub const SLICE_DIRECTION: u8 = 2;

/// Bytes per pixel on the ingest wire (R, G, B).
pub const BYTES_PER_PIXEL: usize = 3;

/// Rows per slice on the standard panel.
pub const SLICE_HEIGHT: usize = PANEL_HEIGHT / NUMBER_OF_SLICES;

/// Bytes per slice on the standard panel (64 x 4 x 3 = 768).
pub const SLICE_BYTES: usize = SLICE_HEIGHT * PANEL_WIDTH * BYTES_PER_PIXEL;

/// Bytes per full frame on the standard panel.
pub const FRAME_BYTES: usize = SLICE_BYTES * NUMBER_OF_SLICES;

/// Largest panel, in pixels, a noise transition can shuffle.
pub const MAX_REVEAL_PIXELS: usize = 4096;

const _: () = assert!(PANEL_HEIGHT % NUMBER_OF_SLICES == 0);
const _: () = assert!(PANEL_WIDTH * PANEL_HEIGHT <= MAX_REVEAL_PIXELS);
const _: () = assert!(MAX_REVEAL_PIXELS <= u16::MAX as usize + 1);
const _: () = assert!(PANEL_WIDTH % NUMBER_OF_SLICES == 0);
const _: () = assert!(SLICE_SIZE <= PANEL_WIDTH);

// =============================================================================
// Geometry
// =============================================================================

/// Validated panel dimensions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelGeometry {
    rows: u16,
    cols: u16,
}

impl PanelGeometry {
    /// Validate and build a geometry.
    ///
    /// Rows must be 16 or 32, columns at least 16, and both must split evenly
    /// into [`NUMBER_OF_SLICES`].
    pub const fn new(
        rows: u16,
        cols: u16,
    ) -> Result<Self, PanelError> {
        let slices = NUMBER_OF_SLICES as u16;
        if (rows != 16 && rows != 32) || cols < 16 || rows % slices != 0 || cols % slices != 0 {
            return Err(PanelError::InvalidGeometry { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Standard 64x32 panel.
    pub const fn standard() -> Self {
        Self {
            rows: PANEL_HEIGHT as u16,
            cols: PANEL_WIDTH as u16,
        }
    }

    #[inline]
    pub const fn rows(&self) -> usize { self.rows as usize }

    #[inline]
    pub const fn cols(&self) -> usize { self.cols as usize }

    /// Rows covered by one image slice.
    #[inline]
    pub const fn slice_height(&self) -> usize { self.rows as usize / NUMBER_OF_SLICES }

    /// Bytes in one RGB slice.
    #[inline]
    pub const fn slice_bytes(&self) -> usize { self.slice_height() * self.cols() * BYTES_PER_PIXEL }

    /// Bytes in one full RGB frame.
    #[inline]
    pub const fn frame_bytes(&self) -> usize { self.slice_bytes() * NUMBER_OF_SLICES }
}

impl Default for PanelGeometry {
    fn default() -> Self { Self::standard() }
}

// =============================================================================
// Wiring
// =============================================================================

/// Row-select address lines. The presence of D decides the panel height.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RowSelect {
    /// 16-row panel (1:8 scan).
    Abc { a: u8, b: u8, c: u8 },
    /// 32-row panel (1:16 scan).
    Abcd { a: u8, b: u8, c: u8, d: u8 },
}

impl RowSelect {
    /// Number of panel rows addressed by these lines.
    pub const fn rows(self) -> u16 {
        match self {
            Self::Abc { .. } => 16,
            Self::Abcd { .. } => 32,
        }
    }
}

/// Shift clock, latch and output-enable lines.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlPins {
    pub clk: u8,
    pub lat: u8,
    pub oe: u8,
}

/// What `clear_screen_slice` paints black.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClearMode {
    /// The whole panel.
    #[default]
    FullPanel,
    /// A strip `width` columns wide anchored at the right edge.
    RightStrip { width: u16 },
}

impl ClearMode {
    /// Map the numeric slice direction setting to a clear mode.
    pub const fn from_direction(direction: u8) -> Self {
        if direction == 1 {
            Self::RightStrip { width: SLICE_SIZE as u16 }
        } else {
            Self::FullPanel
        }
    }
}

/// Everything needed to bring up a panel engine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    pub row_select: RowSelect,
    pub control: ControlPins,
    /// Must match the driver's own buffering; `LedPanel::new` rejects a mismatch.
    pub double_buffered: bool,
    pub cols: u16,
    pub clear_mode: ClearMode,
    /// Frames to ingest before `done_requesting` reports true. `None` never finishes.
    pub frames_target: Option<u32>,
}

impl PanelConfig {
    /// Build a config from wiring and column count, with default clear mode and no frame target.
    pub const fn new(
        row_select: RowSelect,
        control: ControlPins,
        double_buffered: bool,
        cols: u16,
    ) -> Self {
        Self {
            row_select,
            control,
            double_buffered,
            cols,
            clear_mode: ClearMode::from_direction(SLICE_DIRECTION),
            frames_target: None,
        }
    }

    /// 32-row panel (A, B, C, D address lines).
    #[allow(clippy::too_many_arguments)]
    pub const fn rows32(
        a: u8,
        b: u8,
        c: u8,
        d: u8,
        control: ControlPins,
        double_buffered: bool,
        cols: u16,
    ) -> Self {
        Self::new(RowSelect::Abcd { a, b, c, d }, control, double_buffered, cols)
    }

    /// 16-row panel (A, B, C address lines).
    pub const fn rows16(
        a: u8,
        b: u8,
        c: u8,
        control: ControlPins,
        double_buffered: bool,
        cols: u16,
    ) -> Self {
        Self::new(RowSelect::Abc { a, b, c }, control, double_buffered, cols)
    }

    #[must_use]
    pub const fn with_clear_mode(
        mut self,
        clear_mode: ClearMode,
    ) -> Self {
        self.clear_mode = clear_mode;
        self
    }

    #[must_use]
    pub const fn with_frames_target(
        mut self,
        frames: u32,
    ) -> Self {
        self.frames_target = Some(frames);
        self
    }

    /// Panel rows implied by the row-select wiring.
    #[inline]
    pub const fn rows(&self) -> u16 { self.row_select.rows() }

    /// Validated geometry for this config.
    pub const fn geometry(&self) -> Result<PanelGeometry, PanelError> { PanelGeometry::new(self.rows(), self.cols) }
}

impl Default for PanelConfig {
    /// Double-buffered 64x32 panel on the usual Arduino Mega wiring
    /// (A..D on A0..A3, CLK 11, LAT 10, OE 9).
    fn default() -> Self {
        Self::rows32(
            54,
            55,
            56,
            57,
            ControlPins { clk: 11, lat: 10, oe: 9 },
            true,
            PANEL_WIDTH as u16,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
