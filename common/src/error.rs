//! Engine error type.
//!
//! Every failing operation leaves engine state untouched. Nothing is retried and
//! nothing is fatal; callers decide whether a failure matters.

use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Line index at or beyond the table capacity.
    #[error("line index {index} out of range (capacity {capacity})")]
    OutOfRange { index: usize, capacity: usize },

    /// Text does not fit in a line slot.
    #[error("text of {len} bytes exceeds the {max} byte line limit")]
    TextTooLong { len: usize, max: usize },

    /// Font size must be at least 1.
    #[error("font size must be at least 1")]
    InvalidFontSize,

    /// Rotation index outside 0..=3.
    #[error("rotation {0} is not one of 0, 1, 2, 3")]
    InvalidRotation(u8),

    /// Rows not 16/32, too few columns, or not divisible into slices.
    #[error("unsupported panel geometry {rows}x{cols}")]
    InvalidGeometry { rows: u16, cols: u16 },

    /// The driver's physical size disagrees with the configured geometry.
    #[error("driver size does not match the configured panel")]
    DriverSizeMismatch,

    /// Config asks for double buffering the driver does not have, or the reverse.
    #[error("driver buffering does not match the configured panel")]
    BufferingMismatch,

    /// Slice buffer shorter than one slice.
    #[error("slice buffer holds {actual} bytes, expected {expected}")]
    SliceLength { expected: usize, actual: usize },

    /// Frame buffer not exactly one full frame.
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    FrameLength { expected: usize, actual: usize },
}
