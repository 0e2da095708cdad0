//! Matrix driver seam and the in-memory double buffer.
//!
//! The engine never talks to GPIO. It draws through [`MatrixDriver`], which a HUB75
//! driver implements over its refresh buffers (shift clock, latch and OE handling,
//! plus the timer-driven refresh, stay on the driver's side of this trait).
//!
//! # Double Buffering
//!
//! [`FrameBuffers`] keeps a back buffer that all drawing targets and a front buffer
//! the refresh reads. `swap_buffers` publishes the back buffer in one step, so a
//! half-composed frame is never visible.
//!
//! ```text
//! draw_pixel / fill_rect ──► back ──swap──► front ──► refresh (ISR / simulator)
//! ```

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors::BLACK;

/// Pixel-level access to a physical panel.
///
/// Coordinates are physical: `(0, 0)` is the upper-left LED regardless of the
/// rotation the caller draws with.
pub trait MatrixDriver {
    /// Start the refresh. Called once by the engine during construction.
    fn begin(&mut self);

    /// Physical size (columns x rows).
    fn size(&self) -> Size;

    /// Whether the driver keeps separate front and back buffers.
    fn is_double_buffered(&self) -> bool;

    /// Write one back-buffer pixel. Callers guarantee the point is in bounds.
    fn set_pixel(
        &mut self,
        x: u32,
        y: u32,
        color: Rgb565,
    );

    /// Fill a back-buffer rectangle, clipped to the panel.
    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Rgb565,
    ) {
        let drawable_area = area.intersection(&Rectangle::new(Point::zero(), self.size()));
        if drawable_area.size == Size::zero() {
            return;
        }
        for y in drawable_area.rows() {
            for x in drawable_area.columns() {
                self.set_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// Present the back buffer. With `copy_to_back`, the new front is copied into
    /// the back buffer so drawing continues from the presented image.
    fn swap_buffers(
        &mut self,
        copy_to_back: bool,
    );
}

/// In-memory front/back buffer pair.
///
/// Used by the simulator and as the fake surface in tests. A hardware refresh
/// reads [`FrameBuffers::front_pixel`] row by row.
pub struct FrameBuffers<const COLS: usize, const ROWS: usize> {
    back: [[Rgb565; COLS]; ROWS],
    front: [[Rgb565; COLS]; ROWS],
    double_buffered: bool,
    started: bool,
    swaps: u32,
}

impl<const COLS: usize, const ROWS: usize> FrameBuffers<COLS, ROWS> {
    /// Double-buffered pair, both black.
    pub const fn new() -> Self {
        Self {
            back: [[BLACK; COLS]; ROWS],
            front: [[BLACK; COLS]; ROWS],
            double_buffered: true,
            started: false,
            swaps: 0,
        }
    }

    /// Single buffer: drawing is visible immediately and swaps do nothing.
    pub const fn single() -> Self {
        let mut buffers = Self::new();
        buffers.double_buffered = false;
        buffers
    }

    /// Whether `begin` has been called.
    #[inline]
    pub const fn is_started(&self) -> bool { self.started }

    /// Number of swaps performed.
    #[inline]
    pub const fn swap_count(&self) -> u32 { self.swaps }

    /// Pixel in the buffer currently being drawn.
    pub fn back_pixel(
        &self,
        x: usize,
        y: usize,
    ) -> Option<Rgb565> {
        self.back.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Pixel currently shown.
    pub fn front_pixel(
        &self,
        x: usize,
        y: usize,
    ) -> Option<Rgb565> {
        let shown = if self.double_buffered { &self.front } else { &self.back };
        shown.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Every shown pixel, row-major, as embedded-graphics pixels.
    pub fn front_pixels(&self) -> impl Iterator<Item = Pixel<Rgb565>> + '_ {
        let shown = if self.double_buffered { &self.front } else { &self.back };
        shown.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &color)| Pixel(Point::new(x as i32, y as i32), color))
        })
    }
}

impl<const COLS: usize, const ROWS: usize> Default for FrameBuffers<COLS, ROWS> {
    fn default() -> Self { Self::new() }
}

impl<const COLS: usize, const ROWS: usize> MatrixDriver for FrameBuffers<COLS, ROWS> {
    fn begin(&mut self) { self.started = true; }

    fn size(&self) -> Size { Size::new(COLS as u32, ROWS as u32) }

    fn is_double_buffered(&self) -> bool { self.double_buffered }

    #[inline]
    fn set_pixel(
        &mut self,
        x: u32,
        y: u32,
        color: Rgb565,
    ) {
        if let Some(px) = self.back.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
            *px = color;
        }
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Rgb565,
    ) {
        let drawable_area = area.intersection(&Rectangle::new(Point::zero(), self.size()));
        if drawable_area.size == Size::zero() {
            return;
        }

        let x_start = drawable_area.top_left.x as usize;
        let x_end = x_start + drawable_area.size.width as usize;
        for y in drawable_area.rows() {
            self.back[y as usize][x_start..x_end].fill(color);
        }
    }

    fn swap_buffers(
        &mut self,
        copy_to_back: bool,
    ) {
        if !self.double_buffered {
            return;
        }
        core::mem::swap(&mut self.back, &mut self.front);
        if copy_to_back {
            self.back = self.front;
        }
        self.swaps = self.swaps.wrapping_add(1);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{GREEN_LOW, RED_HIGH};

    #[test]
    fn test_new_buffers_black() {
        let fb = FrameBuffers::<64, 32>::new();
        assert_eq!(fb.size(), Size::new(64, 32));
        assert_eq!(fb.back_pixel(63, 31), Some(BLACK));
        assert_eq!(fb.front_pixel(0, 0), Some(BLACK));
        assert_eq!(fb.back_pixel(64, 0), None);
    }

    #[test]
    fn test_drawing_hidden_until_swap() {
        let mut fb = FrameBuffers::<64, 32>::new();
        fb.set_pixel(3, 4, RED_HIGH);
        assert_eq!(fb.back_pixel(3, 4), Some(RED_HIGH));
        assert_eq!(fb.front_pixel(3, 4), Some(BLACK), "back buffer must not be visible");

        fb.swap_buffers(false);
        assert_eq!(fb.front_pixel(3, 4), Some(RED_HIGH));
        assert_eq!(fb.back_pixel(3, 4), Some(BLACK), "old front becomes the back buffer");
        assert_eq!(fb.swap_count(), 1);
    }

    #[test]
    fn test_swap_copy_to_back() {
        let mut fb = FrameBuffers::<64, 32>::new();
        fb.set_pixel(0, 0, GREEN_LOW);
        fb.swap_buffers(true);
        assert_eq!(fb.front_pixel(0, 0), Some(GREEN_LOW));
        assert_eq!(fb.back_pixel(0, 0), Some(GREEN_LOW));
    }

    #[test]
    fn test_single_buffer_draws_through() {
        let mut fb = FrameBuffers::<32, 16>::single();
        fb.set_pixel(1, 1, RED_HIGH);
        assert_eq!(fb.front_pixel(1, 1), Some(RED_HIGH));
        fb.swap_buffers(false);
        assert_eq!(fb.swap_count(), 0);
        assert!(!fb.is_double_buffered());
        assert!(FrameBuffers::<32, 16>::new().is_double_buffered());
    }

    #[test]
    fn test_fill_solid_clips() {
        let mut fb = FrameBuffers::<64, 32>::new();
        fb.fill_solid(&Rectangle::new(Point::new(60, 30), Size::new(10, 10)), RED_HIGH);
        assert_eq!(fb.back_pixel(63, 31), Some(RED_HIGH));
        assert_eq!(fb.back_pixel(59, 31), Some(BLACK));
        assert_eq!(fb.back_pixel(63, 29), Some(BLACK));

        fb.fill_solid(&Rectangle::new(Point::new(-5, -5), Size::new(3, 3)), RED_HIGH);
        assert_eq!(fb.back_pixel(0, 0), Some(BLACK), "fully off-panel fill is a no-op");
    }

    #[test]
    fn test_front_pixels_row_major() {
        let mut fb = FrameBuffers::<16, 16>::new();
        fb.set_pixel(2, 1, RED_HIGH);
        fb.swap_buffers(false);
        let lit: Vec<_> = fb.front_pixels().filter(|Pixel(_, c)| *c != BLACK).collect();
        assert_eq!(lit.len(), 1);
        assert_eq!(lit[0].0, Point::new(2, 1));
        assert_eq!(fb.front_pixels().count(), 256);
    }
}
