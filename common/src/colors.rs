//! Color palette for the LED matrix.
//!
//! ## Rgb565 Color Format
//!
//! The panel works in 16-bit 5-6-5 color: bits 15..11 red, 10..5 green, 4..0 blue.
//! [`color`] packs three 8-bit channels by dropping the low bits of each.
//!
//! ## Brightness Levels
//!
//! The palette is graded in four levels per channel. Mixtures are channel-wise
//! sums of the primaries. The channels occupy disjoint bit fields, so the sum
//! never carries.
//!
//! | Level     | Red | Green | Blue |
//! |-----------|-----|-------|------|
//! | `VeryLow` | 3   | 7     | 3    |
//! | `Low`     | 7   | 15    | 7    |
//! | `Medium`  | 15  | 31    | 15   |
//! | `High`    | 31  | 63    | 31   |

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Pack 8-bit channels into a 5-6-5 color.
#[inline]
pub const fn color(
    r: u8,
    g: u8,
    b: u8,
) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Raw 16-bit value of a color.
#[inline]
pub fn raw565(color: Rgb565) -> u16 { RawU16::from(color).into_inner() }

/// Brightness level of a palette entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Level {
    VeryLow,
    Low,
    Medium,
    High,
}

impl Level {
    /// Channel value for the 5-bit red and blue channels.
    const fn five_bit(self) -> u8 {
        match self {
            Self::VeryLow => 3,
            Self::Low => 7,
            Self::Medium => 15,
            Self::High => 31,
        }
    }

    /// Channel value for the 6-bit green channel.
    const fn six_bit(self) -> u8 {
        match self {
            Self::VeryLow => 7,
            Self::Low => 15,
            Self::Medium => 31,
            Self::High => 63,
        }
    }
}

/// Build a palette entry from the primaries it contains at a given level.
pub const fn shade(
    red: bool,
    green: bool,
    blue: bool,
    level: Level,
) -> Rgb565 {
    let r = if red { level.five_bit() } else { 0 };
    let g = if green { level.six_bit() } else { 0 };
    let b = if blue { level.five_bit() } else { 0 };
    Rgb565::new(r, g, b)
}

/// Off. Raw value 0.
pub const BLACK: Rgb565 = Rgb565::BLACK;

pub const RED_VERYLOW: Rgb565 = shade(true, false, false, Level::VeryLow);
pub const RED_LOW: Rgb565 = shade(true, false, false, Level::Low);
pub const RED_MEDIUM: Rgb565 = shade(true, false, false, Level::Medium);
pub const RED_HIGH: Rgb565 = shade(true, false, false, Level::High);

pub const GREEN_VERYLOW: Rgb565 = shade(false, true, false, Level::VeryLow);
pub const GREEN_LOW: Rgb565 = shade(false, true, false, Level::Low);
pub const GREEN_MEDIUM: Rgb565 = shade(false, true, false, Level::Medium);
pub const GREEN_HIGH: Rgb565 = shade(false, true, false, Level::High);

pub const BLUE_VERYLOW: Rgb565 = shade(false, false, true, Level::VeryLow);
pub const BLUE_LOW: Rgb565 = shade(false, false, true, Level::Low);
pub const BLUE_MEDIUM: Rgb565 = shade(false, false, true, Level::Medium);
pub const BLUE_HIGH: Rgb565 = shade(false, false, true, Level::High);

pub const YELLOW_VERYLOW: Rgb565 = shade(true, true, false, Level::VeryLow);
pub const YELLOW_LOW: Rgb565 = shade(true, true, false, Level::Low);
pub const YELLOW_MEDIUM: Rgb565 = shade(true, true, false, Level::Medium);
pub const YELLOW_HIGH: Rgb565 = shade(true, true, false, Level::High);

pub const MAGENTA_VERYLOW: Rgb565 = shade(true, false, true, Level::VeryLow);
pub const MAGENTA_LOW: Rgb565 = shade(true, false, true, Level::Low);
pub const MAGENTA_MEDIUM: Rgb565 = shade(true, false, true, Level::Medium);
pub const MAGENTA_HIGH: Rgb565 = shade(true, false, true, Level::High);

pub const CYAN_VERYLOW: Rgb565 = shade(false, true, true, Level::VeryLow);
pub const CYAN_LOW: Rgb565 = shade(false, true, true, Level::Low);
pub const CYAN_MEDIUM: Rgb565 = shade(false, true, true, Level::Medium);
pub const CYAN_HIGH: Rgb565 = shade(false, true, true, Level::High);

pub const WHITE_VERYLOW: Rgb565 = shade(true, true, true, Level::VeryLow);
pub const WHITE_LOW: Rgb565 = shade(true, true, true, Level::Low);
pub const WHITE_MEDIUM: Rgb565 = shade(true, true, true, Level::Medium);
pub const WHITE_HIGH: Rgb565 = shade(true, true, true, Level::High);

// =============================================================================
// Tests
// =============================================================================
