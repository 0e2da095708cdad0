//! Pixel-reveal transitions between full frames.
//!
//! A transition paints the next image over whatever is on the panel, a few
//! pixels per step, one step per tick. Every kind reveals each pixel exactly once.
//!
//! ```text
//! Wipe Up        Wipe Left + blinds    Square         Circle
//! ........       >>....<<              ........       ..oooo..
//! ........       >>....<<              ..####..       .oo##oo.
//! ########       >>....<<              ..####..       .oo##oo.
//! ########       >>....<<              ........       ..oooo..
//! ```
//!
//! Noise reveals a seeded random permutation of the panel, `pixels_per_step`
//! at a time.

use heapless::Vec;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::colors::color;
use crate::config::{BYTES_PER_PIXEL, MAX_REVEAL_PIXELS, PanelGeometry};
use crate::driver::MatrixDriver;
use crate::error::PanelError;
use crate::surface::{FrameSurface, Rotation};

/// Pixels revealed per noise step when picked at random.
pub const NOISE_PIXELS_PER_STEP: u16 = 500;

// =============================================================================
// Transition Kinds
// =============================================================================

/// Edge a wipe starts from, named by the direction it travels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WipeDirection {
    /// Bottom row first.
    Up,
    /// Top row first.
    Down,
    /// Right column first.
    Left,
    /// Left column first.
    Right,
}

impl WipeDirection {
    #[inline]
    pub const fn is_vertical(self) -> bool { matches!(self, Self::Up | Self::Down) }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionKind {
    /// Row or column at a time. `blinds` wipes from both edges at once.
    Wipe { direction: WipeDirection, blinds: bool },
    /// Growing square outline from the center.
    Square,
    /// Growing ring from the center.
    Circle,
    /// Random pixels.
    Noise { seed: u64, pixels_per_step: u16 },
}

impl TransitionKind {
    /// Noise one time in eight, otherwise a wipe, square or circle with blinds on a coin flip.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_range(0..8) == 0 {
            return Self::Noise {
                seed: rng.r#gen(),
                pixels_per_step: NOISE_PIXELS_PER_STEP,
            };
        }
        let pick = rng.gen_range(0..6);
        let blinds = rng.gen_bool(0.5);
        let direction = match pick {
            0 => WipeDirection::Up,
            1 => WipeDirection::Right,
            2 => WipeDirection::Left,
            3 => WipeDirection::Down,
            4 => return Self::Square,
            _ => return Self::Circle,
        };
        Self::Wipe { direction, blinds }
    }
}

// =============================================================================
// Transition
// =============================================================================

/// A transition in progress.
pub struct Transition {
    kind: TransitionKind,
    geometry: PanelGeometry,
    step: usize,
    steps: usize,
    order: Vec<u16, MAX_REVEAL_PIXELS>,
}

impl Transition {
    /// Plan a transition for `geometry`. Noise needs the panel to fit in
    /// `MAX_REVEAL_PIXELS`.
    pub fn new(
        kind: TransitionKind,
        geometry: PanelGeometry,
    ) -> Result<Self, PanelError> {
        let (rows, cols) = (geometry.rows(), geometry.cols());
        let mut order = Vec::new();

        let steps = match kind {
            TransitionKind::Wipe { direction, blinds } => {
                let span = if direction.is_vertical() { rows } else { cols };
                if blinds { span.div_ceil(2) } else { span }
            }
            TransitionKind::Square => rows.max(cols).div_ceil(2),
            TransitionKind::Circle => ring(geometry, cols - 1, rows - 1) + 1,
            TransitionKind::Noise { seed, pixels_per_step } => {
                let total = rows * cols;
                if total > MAX_REVEAL_PIXELS {
                    return Err(PanelError::InvalidGeometry {
                        rows: rows as u16,
                        cols: cols as u16,
                    });
                }
                order.extend((0..total).map(|i| i as u16));
                order.shuffle(&mut Pcg32::seed_from_u64(seed));
                total.div_ceil(usize::from(pixels_per_step.max(1)))
            }
        };

        Ok(Self {
            kind,
            geometry,
            step: 0,
            steps,
            order,
        })
    }

    #[inline]
    pub const fn kind(&self) -> TransitionKind { self.kind }

    #[inline]
    pub const fn geometry(&self) -> PanelGeometry { self.geometry }

    #[inline]
    pub const fn step_count(&self) -> usize { self.steps }

    #[inline]
    pub const fn steps_done(&self) -> usize { self.step }

    #[inline]
    pub const fn is_finished(&self) -> bool { self.step >= self.steps }

    /// Call `f(x, y)` for every physical pixel revealed in `step`.
    pub fn for_each_in_step(
        &self,
        step: usize,
        mut f: impl FnMut(usize, usize),
    ) {
        if step >= self.steps {
            return;
        }
        let (rows, cols) = (self.geometry.rows(), self.geometry.cols());

        match self.kind {
            TransitionKind::Wipe { direction, blinds } => {
                let span = if direction.is_vertical() { rows } else { cols };
                let (near, far) = (step, span - 1 - step);
                let (first, second) = match direction {
                    WipeDirection::Up | WipeDirection::Left => (far, near),
                    WipeDirection::Down | WipeDirection::Right => (near, far),
                };
                let mut line = |at: usize| {
                    if direction.is_vertical() {
                        (0..cols).for_each(|x| f(x, at));
                    } else {
                        (0..rows).for_each(|y| f(at, y));
                    }
                };
                line(first);
                if blinds && second != first {
                    line(second);
                }
            }
            TransitionKind::Square => {
                let half = step as i32 + 1;
                let size = 2 * half;
                let left = cols as i32 / 2 - half;
                let top = rows as i32 / 2 - half;
                for r in 0..size {
                    for c in 0..size {
                        let border = r == 0 || r == size - 1 || c == 0 || c == size - 1;
                        let (x, y) = (left + c, top + r);
                        if border && x >= 0 && y >= 0 && (x as usize) < cols && (y as usize) < rows {
                            f(x as usize, y as usize);
                        }
                    }
                }
            }
            TransitionKind::Circle => {
                for y in 0..rows {
                    for x in 0..cols {
                        if ring(self.geometry, x, y) == step {
                            f(x, y);
                        }
                    }
                }
            }
            TransitionKind::Noise { pixels_per_step, .. } => {
                let per_step = usize::from(pixels_per_step.max(1));
                let start = step * per_step;
                let end = (start + per_step).min(self.order.len());
                for &index in &self.order[start..end] {
                    let index = usize::from(index);
                    f(index % cols, index / cols);
                }
            }
        }
    }

    /// Draw the next step's pixels from `frame` into the back buffer.
    ///
    /// Returns the pixels drawn, or `None` once the transition has finished.
    pub fn reveal_next<D: MatrixDriver>(
        &mut self,
        frame: &[u8],
        surface: &mut FrameSurface<D>,
    ) -> Result<Option<usize>, PanelError> {
        let expected = self.geometry.frame_bytes();
        if frame.len() != expected {
            return Err(PanelError::FrameLength { expected, actual: frame.len() });
        }
        if self.is_finished() {
            return Ok(None);
        }

        let cols = self.geometry.cols();
        let mut drawn = 0;
        surface.set_rotation(Rotation::Deg0);
        self.for_each_in_step(self.step, |x, y| {
            let at = (y * cols + x) * BYTES_PER_PIXEL;
            surface.draw_pixel(x as i32, y as i32, color(frame[at], frame[at + 1], frame[at + 2]));
            drawn += 1;
        });
        self.step += 1;
        Ok(Some(drawn))
    }
}

/// Ring index of `(x, y)`: the smallest `r` with distance from center `<= r`.
///
/// Works in doubled coordinates so the half-pixel center stays integral.
fn ring(
    geometry: PanelGeometry,
    x: usize,
    y: usize,
) -> usize {
    let dx = 2 * x as i64 - (geometry.cols() as i64 - 1);
    let dy = 2 * y as i64 - (geometry.rows() as i64 - 1);
    let dist_sq4 = dx * dx + dy * dy;
    let mut r = 0i64;
    while 4 * r * r < dist_sq4 {
        r += 1;
    }
    r as usize
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, raw565};
    use crate::config::FRAME_BYTES;
    use crate::driver::FrameBuffers;

    fn all_kinds() -> [TransitionKind; 11] {
        use WipeDirection::*;
        [
            TransitionKind::Wipe { direction: Up, blinds: false },
            TransitionKind::Wipe { direction: Down, blinds: false },
            TransitionKind::Wipe { direction: Left, blinds: false },
            TransitionKind::Wipe { direction: Right, blinds: false },
            TransitionKind::Wipe { direction: Up, blinds: true },
            TransitionKind::Wipe { direction: Left, blinds: true },
            TransitionKind::Wipe { direction: Right, blinds: true },
            TransitionKind::Square,
            TransitionKind::Circle,
            TransitionKind::Noise { seed: 7, pixels_per_step: 500 },
            TransitionKind::Noise { seed: 7, pixels_per_step: 1 },
        ]
    }

    fn step_pixels(
        t: &Transition,
        step: usize,
    ) -> std::vec::Vec<(usize, usize)> {
        let mut pixels = std::vec::Vec::new();
        t.for_each_in_step(step, |x, y| pixels.push((x, y)));
        pixels
    }

    #[test]
    fn test_every_pixel_revealed_once() {
        for geometry in [PanelGeometry::standard(), PanelGeometry::new(16, 32).unwrap()] {
            for kind in all_kinds() {
                let t = Transition::new(kind, geometry).unwrap();
                let mut hits = vec![0u32; geometry.rows() * geometry.cols()];
                for step in 0..t.step_count() {
                    t.for_each_in_step(step, |x, y| hits[y * geometry.cols() + x] += 1);
                }
                assert!(hits.iter().all(|&h| h == 1), "{kind:?} on {geometry:?}");
            }
        }
    }

    #[test]
    fn test_wipe_starting_edges() {
        let g = PanelGeometry::standard();
        let up = Transition::new(TransitionKind::Wipe { direction: WipeDirection::Up, blinds: false }, g).unwrap();
        assert_eq!(up.step_count(), 32);
        assert!(step_pixels(&up, 0).iter().all(|&(_, y)| y == 31));

        let left = Transition::new(TransitionKind::Wipe { direction: WipeDirection::Left, blinds: false }, g).unwrap();
        assert_eq!(left.step_count(), 64);
        assert!(step_pixels(&left, 0).iter().all(|&(x, _)| x == 63));

        let right = Transition::new(TransitionKind::Wipe { direction: WipeDirection::Right, blinds: false }, g).unwrap();
        assert!(step_pixels(&right, 0).iter().all(|&(x, _)| x == 0));
    }

    #[test]
    fn test_blinds_reveal_both_edges() {
        let g = PanelGeometry::standard();
        let kind = TransitionKind::Wipe { direction: WipeDirection::Down, blinds: true };
        let t = Transition::new(kind, g).unwrap();
        assert_eq!(t.step_count(), 16);

        let first = step_pixels(&t, 0);
        assert_eq!(first.len(), 128);
        assert!(first.iter().all(|&(_, y)| y == 0 || y == 31));
        assert!(step_pixels(&t, 15).iter().all(|&(_, y)| y == 15 || y == 16));
    }

    #[test]
    fn test_square_grows_from_center() {
        let t = Transition::new(TransitionKind::Square, PanelGeometry::standard()).unwrap();
        assert_eq!(t.step_count(), 32);
        let mut center = step_pixels(&t, 0);
        center.sort_unstable();
        assert_eq!(center, [(31, 15), (31, 16), (32, 15), (32, 16)]);
    }

    #[test]
    fn test_circle_reaches_corners() {
        let t = Transition::new(TransitionKind::Circle, PanelGeometry::standard()).unwrap();
        // Corner distance is sqrt(31.5^2 + 15.5^2) ~ 35.1, so ring 36 is the last
        assert_eq!(t.step_count(), 37);
        assert!(step_pixels(&t, 36).contains(&(0, 0)));
        assert!(step_pixels(&t, 36).contains(&(63, 31)));
        assert!(step_pixels(&t, 0).is_empty(), "even panels have no pixel at the exact center");
        assert_eq!(step_pixels(&t, 1).len(), 4);
    }

    #[test]
    fn test_noise_is_seeded() {
        let g = PanelGeometry::standard();
        let a = Transition::new(TransitionKind::Noise { seed: 42, pixels_per_step: 500 }, g).unwrap();
        let b = Transition::new(TransitionKind::Noise { seed: 42, pixels_per_step: 500 }, g).unwrap();
        let c = Transition::new(TransitionKind::Noise { seed: 43, pixels_per_step: 500 }, g).unwrap();

        assert_eq!(a.step_count(), 5, "2048 pixels at 500 per step");
        assert_eq!(step_pixels(&a, 0), step_pixels(&b, 0));
        assert_ne!(step_pixels(&a, 0), step_pixels(&c, 0));
        assert_eq!(step_pixels(&a, 4).len(), 48);
    }

    #[test]
    fn test_noise_rejects_oversized_panel() {
        let wide = PanelGeometry::new(32, 256).unwrap();
        assert!(matches!(
            Transition::new(TransitionKind::Noise { seed: 1, pixels_per_step: 10 }, wide),
            Err(PanelError::InvalidGeometry { .. })
        ));
        assert!(Transition::new(TransitionKind::Circle, wide).is_ok());
    }

    #[test]
    fn test_reveal_draws_frame_pixels() {
        let g = PanelGeometry::standard();
        let mut frame = vec![0u8; FRAME_BYTES];
        frame.iter_mut().for_each(|b| *b = 0xFF);
        let mut surface = FrameSurface::new(FrameBuffers::<64, 32>::new());
        surface.set_rotation(Rotation::Deg270);

        let kind = TransitionKind::Wipe { direction: WipeDirection::Up, blinds: false };
        let mut t = Transition::new(kind, g).unwrap();
        assert_eq!(t.reveal_next(&frame, &mut surface), Ok(Some(64)));
        assert_eq!(surface.driver().back_pixel(5, 31).map(raw565), Some(0xFFFF));
        assert_eq!(surface.driver().back_pixel(5, 30), Some(BLACK));
        assert_eq!(t.steps_done(), 1);

        while t.reveal_next(&frame, &mut surface).unwrap().is_some() {}
        assert!(t.is_finished());
        assert_eq!(surface.driver().back_pixel(0, 0).map(raw565), Some(0xFFFF));
        assert_eq!(t.reveal_next(&frame, &mut surface), Ok(None));
    }

    #[test]
    fn test_reveal_rejects_wrong_frame() {
        let mut t = Transition::new(TransitionKind::Square, PanelGeometry::standard()).unwrap();
        let mut surface = FrameSurface::new(FrameBuffers::<64, 32>::new());
        assert_eq!(
            t.reveal_next(&[0u8; 12], &mut surface),
            Err(PanelError::FrameLength { expected: FRAME_BYTES, actual: 12 })
        );
        assert_eq!(t.steps_done(), 0);
    }

    #[test]
    fn test_random_kinds() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let kinds: std::vec::Vec<_> = (0..400).map(|_| TransitionKind::random(&mut rng)).collect();
        assert!(kinds.iter().any(|k| matches!(k, TransitionKind::Noise { .. })));
        assert!(kinds.iter().any(|k| matches!(k, TransitionKind::Wipe { blinds: true, .. })));
        assert!(kinds.iter().any(|k| matches!(k, TransitionKind::Wipe { blinds: false, .. })));
        assert!(kinds.contains(&TransitionKind::Square));
        assert!(kinds.contains(&TransitionKind::Circle));
        for kind in kinds {
            assert!(Transition::new(kind, PanelGeometry::standard()).is_ok());
        }
    }
}
