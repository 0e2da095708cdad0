//! Sliced image ingestion.
//!
//! A frame arrives as [`NUMBER_OF_SLICES`] horizontal strips, top to bottom. Each
//! strip is `slice_height * cols` RGB triplets in row-major order and is drawn
//! straight into the back buffer, so the receiver never holds more than one slice.
//!
//! ```text
//! slice 0  rows  0..4    ┐
//! slice 1  rows  4..8    │  set_image_slice() x 8
//! ...                    │
//! slice 7  rows 28..32   ┘  ready_to_continue() -> true, frame_counter += 1
//! ```
//!
//! Slices must come in order. Nothing here detects a skipped or repeated slice;
//! [`ImageIngestor::reset`] recovers after a broken transfer.

use crate::colors::{BLACK, color};
use crate::config::{BYTES_PER_PIXEL, ClearMode, NUMBER_OF_SLICES, PanelGeometry};
use crate::driver::MatrixDriver;
use crate::error::PanelError;
use crate::surface::{FrameSurface, Rotation};

/// Outcome of handing one slice to the ingestor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SliceOutcome {
    /// Slice drawn at `index`; `pixels` were written.
    Drawn { index: usize, pixels: usize },
    /// The frame was already complete and not yet acknowledged.
    Overflow,
}

impl SliceOutcome {
    /// Pixels drawn, 0 on overflow.
    #[inline]
    pub const fn pixels(self) -> usize {
        match self {
            Self::Drawn { pixels, .. } => pixels,
            Self::Overflow => 0,
        }
    }
}

/// Slice position and frame count.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ImageIngestor {
    slice_index: usize,
    frame_counter: u32,
    frames_target: Option<u32>,
}

impl ImageIngestor {
    pub const fn new(frames_target: Option<u32>) -> Self {
        Self {
            slice_index: 0,
            frame_counter: 0,
            frames_target,
        }
    }

    /// Next slice to be drawn, `NUMBER_OF_SLICES` once the frame is complete.
    #[inline]
    pub const fn slice_index(&self) -> usize { self.slice_index }

    /// Frames completed and acknowledged through [`Self::ready_to_continue`].
    #[inline]
    pub const fn frame_counter(&self) -> u32 { self.frame_counter }

    #[inline]
    pub const fn frame_complete(&self) -> bool { self.slice_index >= NUMBER_OF_SLICES }

    /// Draw one slice into the back buffer at the current slice row.
    ///
    /// `buf` must hold at least `geometry.slice_bytes()` bytes; anything past that is
    /// ignored. A short buffer draws nothing and leaves the slice index alone.
    pub fn set_image_slice<D: MatrixDriver>(
        &mut self,
        buf: &[u8],
        geometry: PanelGeometry,
        surface: &mut FrameSurface<D>,
    ) -> Result<SliceOutcome, PanelError> {
        if self.frame_complete() {
            return Ok(SliceOutcome::Overflow);
        }

        let expected = geometry.slice_bytes();
        if buf.len() < expected {
            return Err(PanelError::SliceLength { expected, actual: buf.len() });
        }

        let cols = geometry.cols();
        let top = self.slice_index * geometry.slice_height();
        surface.set_rotation(Rotation::Deg0);
        for (k, rgb) in buf[..expected].chunks_exact(BYTES_PER_PIXEL).enumerate() {
            let (row, col) = (top + k / cols, k % cols);
            surface.draw_pixel(col as i32, row as i32, color(rgb[0], rgb[1], rgb[2]));
        }

        let index = self.slice_index;
        self.slice_index += 1;
        Ok(SliceOutcome::Drawn {
            index,
            pixels: geometry.slice_height() * cols,
        })
    }

    /// One-shot frame-complete edge: true once per full frame, then false
    /// until the next frame has been delivered.
    pub fn ready_to_continue(&mut self) -> bool {
        if !self.frame_complete() {
            return false;
        }
        self.slice_index = 0;
        self.frame_counter = self.frame_counter.saturating_add(1);
        true
    }

    /// True once the configured number of frames has been ingested.
    /// Without a target this never reports done.
    pub const fn done_requesting(&self) -> bool {
        match self.frames_target {
            Some(target) => self.frame_counter >= target,
            None => false,
        }
    }

    /// Drop a partially delivered frame and start again at slice 0.
    #[inline]
    pub fn reset(&mut self) { self.slice_index = 0; }
}

/// Paint the clear region black in the physical frame: a right-edge strip or the whole panel.
pub fn clear_screen_slice<D: MatrixDriver>(
    surface: &mut FrameSurface<D>,
    geometry: PanelGeometry,
    mode: ClearMode,
) {
    surface.set_rotation(Rotation::Deg0);
    match mode {
        ClearMode::RightStrip { width } => {
            let cols = geometry.cols() as i32;
            let width = i32::from(width).min(cols);
            surface.fill_rect(cols - width, 0, width, geometry.rows() as i32, BLACK);
        }
        ClearMode::FullPanel => surface.fill_screen(BLACK),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{GREEN_HIGH, raw565};
    use crate::config::{SLICE_BYTES, SLICE_SIZE};
    use crate::driver::FrameBuffers;

    type Panel = FrameBuffers<64, 32>;

    /// Slice whose pixel at (col, row-in-slice) encodes its position.
    fn patterned_slice(slice: usize) -> Vec<u8> {
        (0..4)
            .flat_map(|row| (0..64).map(move |col| (row, col)))
            .flat_map(|(row, col)| [(col * 4) as u8, ((slice * 4 + row) * 8) as u8, 0x80])
            .collect()
    }

    fn ingest_frame(
        ingest: &mut ImageIngestor,
        surface: &mut FrameSurface<Panel>,
    ) {
        for slice in 0..NUMBER_OF_SLICES {
            let outcome = ingest
                .set_image_slice(&patterned_slice(slice), PanelGeometry::standard(), surface)
                .unwrap();
            assert_eq!(outcome, SliceOutcome::Drawn { index: slice, pixels: 256 });
        }
    }

    #[test]
    fn test_full_frame_lands_in_place() {
        let mut ingest = ImageIngestor::new(None);
        let mut surface = FrameSurface::new(Panel::new());
        ingest_frame(&mut ingest, &mut surface);

        for (col, row) in [(0, 0), (63, 0), (5, 13), (0, 31), (63, 31)] {
            let expected = color((col * 4) as u8, (row * 8) as u8, 0x80);
            assert_eq!(surface.driver().back_pixel(col, row), Some(expected), "pixel ({col}, {row})");
        }
    }

    #[test]
    fn test_slice_three_starts_at_row_twelve() {
        let mut ingest = ImageIngestor::new(None);
        let mut surface = FrameSurface::new(Panel::new());
        let blank = [0u8; SLICE_BYTES];
        for _ in 0..3 {
            ingest.set_image_slice(&blank, PanelGeometry::standard(), &mut surface).unwrap();
        }

        let mut slice = [0u8; SLICE_BYTES];
        slice[..3].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
        ingest.set_image_slice(&slice, PanelGeometry::standard(), &mut surface).unwrap();

        assert_eq!(surface.driver().back_pixel(0, 12).map(raw565), Some(0xFFFF));
        assert_eq!(surface.driver().back_pixel(0, 11).map(raw565), Some(0));
        assert_eq!(surface.driver().back_pixel(1, 12).map(raw565), Some(0));
    }

    #[test]
    fn test_ready_to_continue_is_one_shot() {
        let mut ingest = ImageIngestor::new(None);
        let mut surface = FrameSurface::new(Panel::new());
        assert!(!ingest.ready_to_continue(), "nothing delivered yet");

        ingest_frame(&mut ingest, &mut surface);
        assert!(ingest.ready_to_continue());
        assert!(!ingest.ready_to_continue());
        assert_eq!(ingest.frame_counter(), 1);
        assert_eq!(ingest.slice_index(), 0);

        ingest_frame(&mut ingest, &mut surface);
        assert!(ingest.ready_to_continue());
        assert_eq!(ingest.frame_counter(), 2);
    }

    #[test]
    fn test_overflow_draws_nothing() {
        let mut ingest = ImageIngestor::new(None);
        let mut surface = FrameSurface::new(Panel::new());
        ingest_frame(&mut ingest, &mut surface);

        let white = [0xFFu8; SLICE_BYTES];
        let outcome = ingest.set_image_slice(&white, PanelGeometry::standard(), &mut surface).unwrap();
        assert_eq!(outcome, SliceOutcome::Overflow);
        assert_eq!(outcome.pixels(), 0);
        assert_ne!(surface.driver().back_pixel(0, 0).map(raw565), Some(0xFFFF));
    }

    #[test]
    fn test_short_slice_rejected() {
        let mut ingest = ImageIngestor::new(None);
        let mut surface = FrameSurface::new(Panel::new());
        let short = [0xFFu8; SLICE_BYTES - 1];

        assert_eq!(
            ingest.set_image_slice(&short, PanelGeometry::standard(), &mut surface),
            Err(PanelError::SliceLength { expected: SLICE_BYTES, actual: SLICE_BYTES - 1 })
        );
        assert_eq!(ingest.slice_index(), 0);
        assert_eq!(surface.driver().back_pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn test_extra_bytes_ignored() {
        let mut ingest = ImageIngestor::new(None);
        let mut surface = FrameSurface::new(Panel::new());
        let long = [0xFFu8; SLICE_BYTES + 5];
        let outcome = ingest.set_image_slice(&long, PanelGeometry::standard(), &mut surface).unwrap();
        assert_eq!(outcome.pixels(), 256);
        assert_eq!(surface.driver().back_pixel(0, 4), Some(BLACK));
    }

    #[test]
    fn test_ingest_ignores_text_rotation() {
        let mut ingest = ImageIngestor::new(None);
        let mut surface = FrameSurface::new(Panel::new());
        surface.set_rotation(Rotation::Deg180);

        let mut slice = [0u8; SLICE_BYTES];
        slice[..3].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
        ingest.set_image_slice(&slice, PanelGeometry::standard(), &mut surface).unwrap();
        assert_eq!(surface.driver().back_pixel(0, 0).map(raw565), Some(0xFFFF));
    }

    #[test]
    fn test_sixteen_row_geometry() {
        let geometry = PanelGeometry::new(16, 32).unwrap();
        let mut ingest = ImageIngestor::new(None);
        let mut surface = FrameSurface::new(FrameBuffers::<32, 16>::new());

        let slice = vec![0xFFu8; geometry.slice_bytes()];
        assert_eq!(geometry.slice_bytes(), 32 * 2 * 3);
        for _ in 0..NUMBER_OF_SLICES {
            ingest.set_image_slice(&slice, geometry, &mut surface).unwrap();
        }
        assert!(ingest.ready_to_continue());
        assert_eq!(surface.driver().back_pixel(31, 15).map(raw565), Some(0xFFFF));
    }

    #[test]
    fn test_reset_keeps_frame_counter() {
        let mut ingest = ImageIngestor::new(None);
        let mut surface = FrameSurface::new(Panel::new());
        ingest_frame(&mut ingest, &mut surface);
        ingest.ready_to_continue();

        ingest.set_image_slice(&[0u8; SLICE_BYTES], PanelGeometry::standard(), &mut surface).unwrap();
        ingest.reset();
        assert_eq!(ingest.slice_index(), 0);
        assert_eq!(ingest.frame_counter(), 1);
    }

    #[test]
    fn test_done_requesting() {
        let mut surface = FrameSurface::new(Panel::new());

        let mut open_ended = ImageIngestor::new(None);
        ingest_frame(&mut open_ended, &mut surface);
        open_ended.ready_to_continue();
        assert!(!open_ended.done_requesting());

        let mut bounded = ImageIngestor::new(Some(2));
        for expected in [false, true] {
            ingest_frame(&mut bounded, &mut surface);
            bounded.ready_to_continue();
            assert_eq!(bounded.done_requesting(), expected);
        }
    }

    #[test]
    fn test_clear_right_strip() {
        let mut surface = FrameSurface::new(Panel::new());
        surface.fill_screen(GREEN_HIGH);
        surface.set_rotation(Rotation::Deg90);

        clear_screen_slice(&mut surface, PanelGeometry::standard(), ClearMode::from_direction(1));
        let strip_start = 64 - SLICE_SIZE;
        assert_eq!(surface.driver().back_pixel(strip_start - 1, 0), Some(GREEN_HIGH));
        assert_eq!(surface.driver().back_pixel(strip_start, 0), Some(BLACK));
        assert_eq!(surface.driver().back_pixel(63, 31), Some(BLACK));
        assert_eq!(surface.rotation(), Rotation::Deg0);
    }

    #[test]
    fn test_clear_full_panel() {
        let mut surface = FrameSurface::new(Panel::new());
        surface.fill_screen(GREEN_HIGH);
        clear_screen_slice(&mut surface, PanelGeometry::standard(), ClearMode::FullPanel);
        assert_eq!(surface.driver().back_pixel(0, 0), Some(BLACK));
        assert_eq!(surface.driver().back_pixel(63, 31), Some(BLACK));
    }
}
