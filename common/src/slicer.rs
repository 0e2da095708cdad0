//! Host-side frame preparation: fitting, tone adjustment and slicing.
//!
//! The sender enhances a full RGB frame, cuts it into [`NUMBER_OF_SLICES`]
//! strips, and hands out one strip per request. [`FrameSequence`] cycles through
//! several frames so the panel shows them in turn. Images of any size are first
//! scaled onto the panel with [`fit_frame`].

use core::slice::ChunksExact;

use crate::config::{BYTES_PER_PIXEL, NUMBER_OF_SLICES, PanelGeometry};
use crate::error::PanelError;

/// Contrast factor applied before sending.
pub const CONTRAST_ADJUSTMENT: f32 = 2.0;

/// Brightness factor applied after contrast.
pub const BRIGHTNESS_ADJUSTMENT: f32 = 0.5;

// =============================================================================
// Slicing
// =============================================================================

/// Split a full frame into its slices, top to bottom.
pub fn slice_frame(
    frame: &[u8],
    geometry: PanelGeometry,
) -> Result<ChunksExact<'_, u8>, PanelError> {
    let expected = geometry.frame_bytes();
    if frame.len() != expected {
        return Err(PanelError::FrameLength { expected, actual: frame.len() });
    }
    Ok(frame.chunks_exact(geometry.slice_bytes()))
}

/// Round-robin slice source over a set of frames.
pub struct FrameSequence<'a> {
    frames: &'a [&'a [u8]],
    geometry: PanelGeometry,
    frame_index: usize,
    slice_index: usize,
}

impl<'a> FrameSequence<'a> {
    /// Every frame must be exactly `geometry.frame_bytes()` long.
    pub fn new(
        frames: &'a [&'a [u8]],
        geometry: PanelGeometry,
    ) -> Result<Self, PanelError> {
        let expected = geometry.frame_bytes();
        if let Some(bad) = frames.iter().find(|frame| frame.len() != expected) {
            return Err(PanelError::FrameLength { expected, actual: bad.len() });
        }
        Ok(Self {
            frames,
            geometry,
            frame_index: 0,
            slice_index: 0,
        })
    }

    /// Frame the next slice comes from.
    #[inline]
    pub const fn frame_index(&self) -> usize { self.frame_index }

    /// Position of the next slice within its frame.
    #[inline]
    pub const fn slice_index(&self) -> usize { self.slice_index }

    /// Hand out the next slice. After a frame's last slice, move on to the
    /// next frame, wrapping to the first. `None` only when there are no frames.
    pub fn next_slice(&mut self) -> Option<&'a [u8]> {
        let frame = self.frames.get(self.frame_index)?;
        let len = self.geometry.slice_bytes();
        let start = self.slice_index * len;
        let slice = frame.get(start..start + len)?;

        self.slice_index += 1;
        if self.slice_index == NUMBER_OF_SLICES {
            self.slice_index = 0;
            self.frame_index = (self.frame_index + 1) % self.frames.len();
        }
        Some(slice)
    }
}

// =============================================================================
// Fitting
// =============================================================================

/// Scale an RGB image to fit the panel, keeping its aspect ratio.
///
/// The scale factor is `min(cols / src_width, rows / src_height)` and the output
/// size is rounded. Pixels are sampled nearest-neighbour from the pixel-center
/// position. The image sits at the top-left of `out`; the rest is black.
/// Returns the fitted `(width, height)`.
pub fn fit_frame(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    geometry: PanelGeometry,
    out: &mut [u8],
) -> Result<(usize, usize), PanelError> {
    let expected = src_width * src_height * BYTES_PER_PIXEL;
    if src.len() != expected {
        return Err(PanelError::FrameLength { expected, actual: src.len() });
    }
    if out.len() != geometry.frame_bytes() {
        return Err(PanelError::FrameLength {
            expected: geometry.frame_bytes(),
            actual: out.len(),
        });
    }

    out.fill(0);
    if src_width == 0 || src_height == 0 {
        return Ok((0, 0));
    }

    let (cols, rows) = (geometry.cols(), geometry.rows());
    let (fit_w, fit_h) = if cols * src_height <= rows * src_width {
        (cols, ((2 * src_height * cols + src_width) / (2 * src_width)).min(rows))
    } else {
        (((2 * src_width * rows + src_height) / (2 * src_height)).min(cols), rows)
    };

    for y in 0..fit_h {
        let sy = ((2 * y + 1) * src_height) / (2 * fit_h);
        for x in 0..fit_w {
            let sx = ((2 * x + 1) * src_width) / (2 * fit_w);
            let from = (sy * src_width + sx) * BYTES_PER_PIXEL;
            let to = (y * cols + x) * BYTES_PER_PIXEL;
            out[to..to + BYTES_PER_PIXEL].copy_from_slice(&src[from..from + BYTES_PER_PIXEL]);
        }
    }
    Ok((fit_w, fit_h))
}

// =============================================================================
// Tone Adjustment
// =============================================================================

/// ITU-R 601 luma in 16-bit fixed point.
#[inline]
const fn luma(rgb: &[u8]) -> u32 {
    (rgb[0] as u32 * 19_595 + rgb[1] as u32 * 38_470 + rgb[2] as u32 * 7_471 + 0x8000) >> 16
}

/// Interpolate from `degenerate` toward `value` by `factor`, truncated and clamped.
#[inline]
fn blend(
    degenerate: f32,
    value: u8,
    factor: f32,
) -> u8 {
    let out = degenerate + factor * (f32::from(value) - degenerate);
    if out <= 0.0 {
        0
    } else if out >= 255.0 {
        255
    } else {
        out as u8
    }
}

/// Scale each channel's distance from the frame's mean luma by `factor`.
pub fn adjust_contrast(
    frame: &mut [u8],
    factor: f32,
) {
    let pixels = (frame.len() / BYTES_PER_PIXEL) as u64;
    if pixels == 0 {
        return;
    }
    let sum: u64 = frame.chunks_exact(BYTES_PER_PIXEL).map(|rgb| u64::from(luma(rgb))).sum();
    let mean = ((2 * sum + pixels) / (2 * pixels)) as f32;

    for channel in frame.iter_mut() {
        *channel = blend(mean, *channel, factor);
    }
}

/// Scale every channel toward black by `factor`.
pub fn adjust_brightness(
    frame: &mut [u8],
    factor: f32,
) {
    for channel in frame.iter_mut() {
        *channel = blend(0.0, *channel, factor);
    }
}

/// Contrast then brightness, the order the sender applies them.
pub fn enhance(
    frame: &mut [u8],
    contrast: f32,
    brightness: f32,
) {
    adjust_contrast(frame, contrast);
    adjust_brightness(frame, brightness);
}

/// Brightness then contrast, the order the image viewer applies them.
pub fn enhance_viewer(
    frame: &mut [u8],
    contrast: f32,
    brightness: f32,
) {
    adjust_brightness(frame, brightness);
    adjust_contrast(frame, contrast);
}

// =============================================================================
// Tests
// =============================================================================
