//! Text line table and per-line composition.
//!
//! A [`TextTable`] is a fixed set of slots, each either empty or holding a
//! [`TextLine`]. Every tick the compositor asks each occupied slot to draw itself:
//! optionally erase its band, advance the scroll cursor, then print.
//!
//! # Scrolling
//!
//! `cursor_x` runs along the rotation's major axis (columns for 0/180 degrees,
//! rows for 90/270). [`advance_scroll`] wraps it so the text re-enters from the
//! opposite edge once it has fully left the panel:
//!
//! ```text
//! scroll_inc < 0:  cursor_x + text_width <= 0   =>  cursor_x = major_axis
//! scroll_inc > 0:  cursor_x >= major_axis       =>  cursor_x = -text_width
//! ```
//!
//! With a step of one pixel, a line cycles with period `major_axis + text_width`.
//!
//! # Erasing
//!
//! [`TextTable::erase_line`] blanks the full-width band at the line's `y`, not the
//! rectangle last drawn at `cursor_x`. That is enough for static text. Scrolling
//! text leaves a trail unless the whole region is cleared first, which is what
//! `display_text_task(true)` does.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::String;

use crate::colors::BLACK;
use crate::config::{MAX_TEXT_LEN, MIN_FONT_HEIGHT, MIN_FONT_WIDTH};
use crate::driver::MatrixDriver;
use crate::error::PanelError;
use crate::surface::{FrameSurface, Rotation};

/// Advance a scroll cursor by one tick and wrap it around the major axis.
///
/// All arithmetic is 32-bit so wide text near the 16-bit limits cannot overflow.
pub const fn advance_scroll(
    cursor_x: i32,
    scroll_inc: i32,
    text_width: i32,
    major_axis: i32,
) -> i32 {
    let next = cursor_x + scroll_inc;
    if scroll_inc < 0 && next + text_width <= 0 {
        major_axis
    } else if scroll_inc > 0 && next >= major_axis {
        -text_width
    } else {
        next
    }
}

/// Pixel width of `text` at `font_size`: one glyph cell per character.
pub fn text_width(
    text: &str,
    font_size: u8,
) -> u32 {
    text.chars().count() as u32 * u32::from(font_size) * MIN_FONT_WIDTH as u32
}

// =============================================================================
// Line Description
// =============================================================================

/// Placement and motion of a line, minus the text itself.
///
/// Defaults match the common case: horizontal, smallest font, static.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TextLineSpec {
    pub x: i16,
    pub y: i16,
    pub font_color: Rgb565,
    pub rotation: Rotation,
    pub font_size: u8,
    pub scroll_inc: i16,
}

impl TextLineSpec {
    /// Static, horizontal, size-1 text with its upper-left corner at `(x, y)`.
    pub const fn new(
        x: i16,
        y: i16,
        font_color: Rgb565,
    ) -> Self {
        Self {
            x,
            y,
            font_color,
            rotation: Rotation::Deg0,
            font_size: 1,
            scroll_inc: 0,
        }
    }

    #[must_use]
    pub const fn with_rotation(
        mut self,
        rotation: Rotation,
    ) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn with_font_size(
        mut self,
        font_size: u8,
    ) -> Self {
        self.font_size = font_size;
        self
    }

    /// Pixels added to the cursor each tick. Negative scrolls left (or up).
    #[must_use]
    pub const fn with_scroll(
        mut self,
        scroll_inc: i16,
    ) -> Self {
        self.scroll_inc = scroll_inc;
        self
    }
}

/// An occupied slot.
#[derive(Clone, Debug)]
pub struct TextLine {
    text: String<MAX_TEXT_LEN>,
    spec: TextLineSpec,
    cursor_x: i32,
    text_width: u32,
}

impl TextLine {
    fn new(
        text: &str,
        spec: TextLineSpec,
    ) -> Result<Self, PanelError> {
        if spec.font_size == 0 {
            return Err(PanelError::InvalidFontSize);
        }
        let owned = String::try_from(text).map_err(|_| PanelError::TextTooLong {
            len: text.len(),
            max: MAX_TEXT_LEN,
        })?;
        Ok(Self {
            text_width: text_width(text, spec.font_size),
            text: owned,
            cursor_x: i32::from(spec.x),
            spec,
        })
    }

    #[inline]
    pub fn text(&self) -> &str { self.text.as_str() }

    #[inline]
    pub const fn spec(&self) -> &TextLineSpec { &self.spec }

    /// Current position along the major axis.
    #[inline]
    pub const fn cursor_x(&self) -> i32 { self.cursor_x }

    #[inline]
    pub const fn text_width(&self) -> u32 { self.text_width }

    /// Height of the text band in pixels.
    #[inline]
    pub const fn band_height(&self) -> i32 { self.spec.font_size as i32 * MIN_FONT_HEIGHT }

    /// Move the cursor one tick along the major axis.
    pub fn advance(
        &mut self,
        major_axis: i32,
    ) {
        if self.spec.scroll_inc != 0 {
            self.cursor_x = advance_scroll(
                self.cursor_x,
                i32::from(self.spec.scroll_inc),
                self.text_width as i32,
                major_axis,
            );
        }
    }
}

// =============================================================================
// Text Table
// =============================================================================

/// Fixed-capacity table of `N` line slots, all empty at construction.
pub struct TextTable<const N: usize> {
    slots: [Option<TextLine>; N],
}

impl<const N: usize> TextTable<N> {
    pub const fn new() -> Self { Self { slots: [const { None }; N] } }

    #[inline]
    pub const fn capacity(&self) -> usize { N }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize { self.slots.iter().filter(|slot| slot.is_some()).count() }

    const fn check(index: usize) -> Result<(), PanelError> {
        if index < N {
            Ok(())
        } else {
            Err(PanelError::OutOfRange { index, capacity: N })
        }
    }

    /// Store a copy of `text` in slot `index`, replacing what was there.
    ///
    /// The cursor starts at `spec.x`. On error the slot keeps its previous line.
    pub fn set(
        &mut self,
        index: usize,
        text: &str,
        spec: TextLineSpec,
    ) -> Result<(), PanelError> {
        Self::check(index)?;
        let line = TextLine::new(text, spec)?;
        self.slots[index] = Some(line);
        Ok(())
    }

    /// Empty slot `index`. Clearing an empty slot is fine.
    pub fn clear(
        &mut self,
        index: usize,
    ) -> Result<(), PanelError> {
        Self::check(index)?;
        self.slots[index] = None;
        Ok(())
    }

    /// Empty every slot.
    pub fn clear_all(&mut self) { self.slots.iter_mut().for_each(|slot| *slot = None); }

    /// Line in slot `index`, if the index is valid and the slot occupied.
    pub fn get(
        &self,
        index: usize,
    ) -> Option<&TextLine> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Pixel width of the text in slot `index`, 0 when empty or out of range.
    pub fn width(
        &self,
        index: usize,
    ) -> u32 {
        self.get(index).map_or(0, TextLine::text_width)
    }

    /// Blank the band slot `index` occupies. Empty slots paint nothing.
    pub fn erase_line<D: MatrixDriver>(
        &self,
        index: usize,
        surface: &mut FrameSurface<D>,
    ) -> Result<(), PanelError> {
        Self::check(index)?;
        if let Some(line) = &self.slots[index] {
            erase_band(line, surface);
        }
        Ok(())
    }

    /// Draw slot `index`: optional band erase, scroll advance, then print.
    pub fn display_line<D: MatrixDriver>(
        &mut self,
        index: usize,
        erase_first: bool,
        surface: &mut FrameSurface<D>,
    ) -> Result<(), PanelError> {
        Self::check(index)?;
        let Some(line) = self.slots[index].as_mut() else {
            return Ok(());
        };

        if erase_first {
            erase_band(line, surface);
        }
        line.advance(surface.major_axis(line.spec.rotation));

        surface.set_rotation(line.spec.rotation);
        surface.set_text_size(line.spec.font_size);
        surface.set_text_color(line.spec.font_color);
        surface.set_cursor(line.cursor_x, i32::from(line.spec.y));
        surface.print(line.text.as_str());
        Ok(())
    }
}

impl<const N: usize> Default for TextTable<N> {
    fn default() -> Self { Self::new() }
}

fn erase_band<D: MatrixDriver>(
    line: &TextLine,
    surface: &mut FrameSurface<D>,
) {
    surface.set_rotation(line.spec.rotation);
    let width = surface.major_axis(line.spec.rotation);
    surface.fill_rect(0, i32::from(line.spec.y), width, line.band_height(), BLACK);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{GREEN_HIGH, RED_MEDIUM};
    use crate::driver::FrameBuffers;

    type Panel = FrameBuffers<64, 32>;

    fn surface() -> FrameSurface<Panel> {
        let mut s = FrameSurface::new(Panel::new());
        s.set_text_wrap(false);
        s
    }

    fn lit(fb: &Panel) -> usize {
        (0..32)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.back_pixel(x, y) != Some(BLACK))
            .count()
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("HI", 1), 12);
        assert_eq!(text_width("ABCDEFGH", 1), 48);
        assert_eq!(text_width("HI", 3), 36);
        assert_eq!(text_width("", 2), 0);
    }

    #[test]
    fn test_set_computes_width_and_cursor() {
        let mut table = TextTable::<4>::new();
        let spec = TextLineSpec::new(-5, 8, RED_MEDIUM).with_font_size(2);
        table.set(1, "abc", spec).unwrap();

        let line = table.get(1).unwrap();
        assert_eq!(line.text(), "abc");
        assert_eq!(line.text_width(), 36);
        assert_eq!(line.cursor_x(), -5, "cursor starts at x");
        assert_eq!(table.width(1), 36);
        assert_eq!(table.occupied(), 1);
    }

    #[test]
    fn test_out_of_range_changes_nothing() {
        let mut table = TextTable::<2>::new();
        table.set(0, "keep", TextLineSpec::new(0, 0, RED_MEDIUM)).unwrap();
        let err = PanelError::OutOfRange { index: 2, capacity: 2 };

        assert_eq!(table.set(2, "x", TextLineSpec::new(0, 0, RED_MEDIUM)), Err(err));
        assert_eq!(table.clear(2), Err(err));
        assert_eq!(table.erase_line(2, &mut surface()), Err(err));
        assert_eq!(table.display_line(2, true, &mut surface()), Err(err));
        assert_eq!(table.width(2), 0);
        assert_eq!(table.get(0).unwrap().text(), "keep");
        assert_eq!(table.occupied(), 1);
    }

    #[test]
    fn test_invalid_line_keeps_previous() {
        let mut table = TextTable::<1>::new();
        table.set(0, "old", TextLineSpec::new(0, 0, RED_MEDIUM)).unwrap();

        let too_long = "x".repeat(MAX_TEXT_LEN + 1);
        assert!(matches!(
            table.set(0, &too_long, TextLineSpec::new(0, 0, RED_MEDIUM)),
            Err(PanelError::TextTooLong { .. })
        ));
        assert_eq!(
            table.set(0, "new", TextLineSpec::new(0, 0, RED_MEDIUM).with_font_size(0)),
            Err(PanelError::InvalidFontSize)
        );
        assert_eq!(table.get(0).unwrap().text(), "old");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut table = TextTable::<3>::new();
        table.set(2, "old", TextLineSpec::new(0, 0, RED_MEDIUM)).unwrap();
        table.set(2, "new", TextLineSpec::new(0, 0, RED_MEDIUM)).unwrap();
        assert_eq!(table.get(2).unwrap().text(), "new");

        table.clear(2).unwrap();
        table.clear(2).unwrap();
        assert!(table.get(2).is_none());
        assert_eq!(table.width(2), 0);
    }

    #[test]
    fn test_clear_all() {
        let mut table = TextTable::<3>::new();
        for i in 0..3 {
            table.set(i, "x", TextLineSpec::new(0, 0, RED_MEDIUM)).unwrap();
        }
        table.clear_all();
        assert_eq!(table.occupied(), 0);
    }

    #[test]
    fn test_scroll_left_period() {
        // 64 columns, 48px text entering from the right edge
        let (major, width) = (64, 48);
        let mut cursor = 64;
        for _ in 0..112 {
            cursor = advance_scroll(cursor, -1, width, major);
            assert!((-width..=major).contains(&cursor));
        }
        assert_eq!(cursor, 64, "period is major_axis + text_width");
        assert_eq!(advance_scroll(cursor, -1, width, major), 63);
    }

    #[test]
    fn test_scroll_right_wrap() {
        let (major, width) = (32, 12);
        let mut cursor = -12;
        for _ in 0..43 {
            cursor = advance_scroll(cursor, 1, width, major);
        }
        assert_eq!(cursor, 31);
        assert_eq!(advance_scroll(cursor, 1, width, major), -12, "reaching 32 wraps to -text_width");
    }

    #[test]
    fn test_scroll_closure_any_start() {
        for inc in [-1, 1] {
            for start in [-20, 0, 17, 64] {
                let mut cursor = start;
                for _ in 0..(64 + 20) {
                    cursor = advance_scroll(cursor, inc, 20, 64);
                }
                let first_lap = cursor;
                for _ in 0..(64 + 20) {
                    cursor = advance_scroll(cursor, inc, 20, 64);
                }
                assert_eq!(cursor, first_lap, "inc {inc} start {start}");
            }
        }
    }

    #[test]
    fn test_large_step_stays_in_range() {
        let mut cursor = 0;
        for _ in 0..50 {
            cursor = advance_scroll(cursor, -7, 30, 64);
            assert!((-30..=64).contains(&cursor), "cursor {cursor}");
        }
    }

    #[test]
    fn test_wide_text_no_overflow() {
        assert_eq!(advance_scroll(-32_000, -1_000, 32_767, 64), 64);
        assert_eq!(advance_scroll(32_700, 100, 30_000, 32_767), -30_000);
    }

    #[test]
    fn test_static_line_does_not_move() {
        let mut table = TextTable::<1>::new();
        table.set(0, "HI", TextLineSpec::new(2, 0, RED_MEDIUM)).unwrap();
        let mut s = surface();
        table.display_line(0, true, &mut s).unwrap();
        table.display_line(0, true, &mut s).unwrap();
        assert_eq!(table.get(0).unwrap().cursor_x(), 2);
    }

    #[test]
    fn test_display_advances_before_drawing() {
        let mut table = TextTable::<1>::new();
        table
            .set(0, "XY", TextLineSpec::new(-12, 0, GREEN_HIGH).with_rotation(Rotation::Deg90).with_scroll(1))
            .unwrap();
        let mut s = surface();
        table.display_line(0, false, &mut s).unwrap();
        assert_eq!(table.get(0).unwrap().cursor_x(), -11);
        assert_eq!(s.rotation(), Rotation::Deg90);
    }

    #[test]
    fn test_erase_line_blanks_band_only() {
        let mut table = TextTable::<1>::new();
        table.set(0, "HI", TextLineSpec::new(2, 8, RED_MEDIUM)).unwrap();
        let mut s = surface();
        s.fill_screen(GREEN_HIGH);

        table.erase_line(0, &mut s).unwrap();
        assert_eq!(s.driver().back_pixel(0, 8), Some(BLACK));
        assert_eq!(s.driver().back_pixel(63, 15), Some(BLACK));
        assert_eq!(s.driver().back_pixel(0, 7), Some(GREEN_HIGH));
        assert_eq!(s.driver().back_pixel(0, 16), Some(GREEN_HIGH));
        assert_eq!(lit(s.driver()), 64 * 32 - 64 * 8);
    }

    #[test]
    fn test_erase_empty_slot_paints_nothing() {
        let table = TextTable::<1>::new();
        let mut s = surface();
        s.fill_screen(GREEN_HIGH);
        table.erase_line(0, &mut s).unwrap();
        assert_eq!(lit(s.driver()), 64 * 32);
    }

    #[test]
    fn test_display_empty_slot_noop() {
        let mut table = TextTable::<2>::new();
        let mut s = surface();
        table.display_line(1, true, &mut s).unwrap();
        assert_eq!(lit(s.driver()), 0);
    }
}
