//! Text-capable drawing surface over a [`MatrixDriver`].
//!
//! [`FrameSurface`] holds the GFX-style drawing state the text engine programs per
//! line: rotation, text size, text color, cursor and wrap. All coordinates it
//! accepts are local to the current rotation and are mapped to physical LEDs
//! before they reach the driver.
//!
//! # Rotation
//!
//! | Rotation | Local size    | Local `(x, y)` lands on   |
//! |----------|---------------|---------------------------|
//! | `Deg0`   | cols x rows   | `(x, y)`                  |
//! | `Deg90`  | rows x cols   | `(W - 1 - y, x)`          |
//! | `Deg180` | cols x rows   | `(W - 1 - x, H - 1 - y)`  |
//! | `Deg270` | rows x cols   | `(y, H - 1 - x)`          |
//!
//! `W` and `H` are the physical width and height.
//!
//! # Text
//!
//! Glyphs come from the 5x7 ASCII mono font, placed at the upper-left of a 6x8
//! cell. A text size of `n` draws every glyph pixel as an `n x n` block, so a cell
//! is `6n x 8n`. Text background is
//! transparent: only lit glyph pixels are written.

use core::convert::Infallible;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_5X7;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use crate::colors::{BLACK, WHITE_HIGH};
use crate::config::{MIN_FONT_HEIGHT, MIN_FONT_WIDTH};
use crate::driver::MatrixDriver;
use crate::error::PanelError;

// =============================================================================
// Rotation
// =============================================================================

/// Text orientation. The discriminants match the numeric rotation setting.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Rotation {
    /// Normal horizontal.
    #[default]
    Deg0 = 0,
    /// Vertical, rotated clockwise.
    Deg90 = 1,
    /// Inverted horizontal. `(0, 0)` is the lower-right physical corner.
    Deg180 = 2,
    /// Vertical, rotated anti-clockwise.
    Deg270 = 3,
}

impl Rotation {
    /// Rotation from its numeric setting (0..=3).
    pub const fn from_index(index: u8) -> Result<Self, PanelError> {
        match index {
            0 => Ok(Self::Deg0),
            1 => Ok(Self::Deg90),
            2 => Ok(Self::Deg180),
            3 => Ok(Self::Deg270),
            other => Err(PanelError::InvalidRotation(other)),
        }
    }

    #[inline]
    pub const fn index(self) -> u8 { self as u8 }

    /// Whether text runs along the physical rows axis (90 and 270 degrees).
    #[inline]
    pub const fn is_vertical(self) -> bool { matches!(self, Self::Deg90 | Self::Deg270) }
}

impl TryFrom<u8> for Rotation {
    type Error = PanelError;

    fn try_from(index: u8) -> Result<Self, Self::Error> { Self::from_index(index) }
}

// =============================================================================
// Frame Surface
// =============================================================================

/// Drawing state plus an owned matrix driver.
pub struct FrameSurface<D> {
    driver: D,
    physical: Size,
    rotation: Rotation,
    cursor: Point,
    text_size: u8,
    text_color: Rgb565,
    wrap: bool,
}

impl<D: MatrixDriver> FrameSurface<D> {
    /// Wrap a driver. Rotation 0, text size 1, white text, wrap on.
    pub fn new(driver: D) -> Self {
        let physical = driver.size();
        Self {
            driver,
            physical,
            rotation: Rotation::Deg0,
            cursor: Point::zero(),
            text_size: 1,
            text_color: WHITE_HIGH,
            wrap: true,
        }
    }

    /// Start the underlying driver.
    pub fn begin(&mut self) { self.driver.begin(); }

    #[inline]
    pub fn driver(&self) -> &D { &self.driver }

    #[inline]
    pub fn driver_mut(&mut self) -> &mut D { &mut self.driver }

    /// Give the driver back.
    pub fn into_driver(self) -> D { self.driver }

    /// Physical panel size.
    #[inline]
    pub const fn physical_size(&self) -> Size { self.physical }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    #[inline]
    pub fn set_rotation(
        &mut self,
        rotation: Rotation,
    ) {
        self.rotation = rotation;
    }

    #[inline]
    pub const fn rotation(&self) -> Rotation { self.rotation }

    /// Text size multiplier. Zero is treated as 1.
    #[inline]
    pub fn set_text_size(
        &mut self,
        size: u8,
    ) {
        self.text_size = size.max(1);
    }

    #[inline]
    pub const fn text_size(&self) -> u8 { self.text_size }

    #[inline]
    pub fn set_text_color(
        &mut self,
        color: Rgb565,
    ) {
        self.text_color = color;
    }

    #[inline]
    pub fn set_cursor(
        &mut self,
        x: i32,
        y: i32,
    ) {
        self.cursor = Point::new(x, y);
    }

    #[inline]
    pub const fn cursor(&self) -> Point { self.cursor }

    #[inline]
    pub fn set_text_wrap(
        &mut self,
        wrap: bool,
    ) {
        self.wrap = wrap;
    }

    #[inline]
    pub const fn text_wrap(&self) -> bool { self.wrap }

    /// Width in the current rotation's local frame.
    #[inline]
    pub const fn width(&self) -> i32 {
        if self.rotation.is_vertical() {
            self.physical.height as i32
        } else {
            self.physical.width as i32
        }
    }

    /// Height in the current rotation's local frame.
    #[inline]
    pub const fn height(&self) -> i32 {
        if self.rotation.is_vertical() {
            self.physical.width as i32
        } else {
            self.physical.height as i32
        }
    }

    /// Length of the axis text scrolls along under `rotation`.
    #[inline]
    pub const fn major_axis(
        &self,
        rotation: Rotation,
    ) -> i32 {
        if rotation.is_vertical() {
            self.physical.height as i32
        } else {
            self.physical.width as i32
        }
    }

    // -------------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------------

    /// Map a local point to physical coordinates.
    const fn to_physical(
        &self,
        x: i32,
        y: i32,
    ) -> Point {
        let w = self.physical.width as i32;
        let h = self.physical.height as i32;
        match self.rotation {
            Rotation::Deg0 => Point::new(x, y),
            Rotation::Deg90 => Point::new(w - 1 - y, x),
            Rotation::Deg180 => Point::new(w - 1 - x, h - 1 - y),
            Rotation::Deg270 => Point::new(y, h - 1 - x),
        }
    }

    /// Draw one pixel. Off-panel points are dropped.
    pub fn draw_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Rgb565,
    ) {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return;
        }
        let p = self.to_physical(x, y);
        self.driver.set_pixel(p.x as u32, p.y as u32, color);
    }

    /// Fill a rectangle, clipped to the panel.
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Rgb565,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }
        let local = Rectangle::new(Point::new(x, y), Size::new(w as u32, h as u32));
        let bounds = Rectangle::new(Point::zero(), Size::new(self.width() as u32, self.height() as u32));
        let clipped = local.intersection(&bounds);
        let Some(bottom_right) = clipped.bottom_right() else {
            return;
        };

        let a = self.to_physical(clipped.top_left.x, clipped.top_left.y);
        let b = self.to_physical(bottom_right.x, bottom_right.y);
        self.driver.fill_solid(&Rectangle::with_corners(a, b), color);
    }

    /// Fill the whole back buffer.
    pub fn fill_screen(
        &mut self,
        color: Rgb565,
    ) {
        self.driver.fill_solid(&Rectangle::new(Point::zero(), self.physical), color);
    }

    /// Paint the whole back buffer black.
    #[inline]
    pub fn clear_screen(&mut self) { self.fill_screen(BLACK); }

    /// Print text at the cursor with the current size and color, advancing the cursor.
    pub fn print(
        &mut self,
        text: &str,
    ) {
        for ch in text.chars() {
            self.write_char(ch);
        }
    }

    /// Print one character.
    ///
    /// `\n` moves to the start of the next text row, `\r` is ignored. With wrap
    /// enabled, a glyph that would cross the right edge starts a new row first.
    pub fn write_char(
        &mut self,
        ch: char,
    ) {
        let size = i32::from(self.text_size);
        let cell_w = MIN_FONT_WIDTH * size;
        let cell_h = MIN_FONT_HEIGHT * size;

        match ch {
            '\n' => {
                self.cursor = Point::new(0, self.cursor.y + cell_h);
            }
            '\r' => {}
            _ => {
                if self.wrap && self.cursor.x + cell_w > self.width() {
                    self.cursor = Point::new(0, self.cursor.y + cell_h);
                }
                self.draw_glyph(ch, cell_w, cell_h);
                self.cursor.x += cell_w;
            }
        }
    }

    /// Render one glyph cell at the cursor. Cells entirely off-panel are skipped.
    fn draw_glyph(
        &mut self,
        ch: char,
        cell_w: i32,
        cell_h: i32,
    ) {
        let origin = self.cursor;
        if origin.x >= self.width() || origin.y >= self.height() || origin.x + cell_w <= 0 || origin.y + cell_h <= 0 {
            return;
        }

        let mut char_buf = [0u8; 4];
        let char_str = ch.encode_utf8(&mut char_buf);
        let style = MonoTextStyle::new(&FONT_5X7, self.text_color);
        let scale = i32::from(self.text_size);

        let mut target = ScaledGlyph {
            surface: self,
            origin,
            scale,
        };
        Text::with_baseline(char_str, origin, style, Baseline::Top)
            .draw(&mut target)
            .ok();
    }

    /// Present the back buffer.
    #[inline]
    pub fn swap_buffers(
        &mut self,
        copy_to_back: bool,
    ) {
        self.driver.swap_buffers(copy_to_back);
    }
}

impl<D: MatrixDriver> OriginDimensions for FrameSurface<D> {
    fn size(&self) -> Size { Size::new(self.width() as u32, self.height() as u32) }
}

/// Lets embedded-graphics drawables render in the current rotation's local frame.
impl<D: MatrixDriver> DrawTarget for FrameSurface<D> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.draw_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.fill_rect(
            area.top_left.x,
            area.top_left.y,
            area.size.width as i32,
            area.size.height as i32,
            color,
        );
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.fill_screen(color);
        Ok(())
    }
}

/// Draw target that magnifies glyph pixels around the glyph origin.
struct ScaledGlyph<'a, D> {
    surface: &'a mut FrameSurface<D>,
    origin: Point,
    scale: i32,
}

impl<D: MatrixDriver> OriginDimensions for ScaledGlyph<'_, D> {
    fn size(&self) -> Size { Size::new(self.surface.width() as u32, self.surface.height() as u32) }
}

impl<D: MatrixDriver> DrawTarget for ScaledGlyph<'_, D> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if self.scale == 1 {
                self.surface.draw_pixel(point.x, point.y, color);
            } else {
                let p = self.origin + (point - self.origin) * self.scale;
                self.surface.fill_rect(p.x, p.y, self.scale, self.scale, color);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
