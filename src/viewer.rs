//! Image viewer: full frames shown in turn, each revealed by a random transition
//! and then held on screen.

use ledpanel_common::{LedPanel, MatrixDriver, PanelError, Transition, TransitionKind};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::VIEWER_SEED;

/// A fitted, enhanced panel frame and how long it stays up.
pub struct ViewerImage {
    pub frame: Vec<u8>,
    pub hold_ticks: u32,
}

pub struct Viewer {
    images: Vec<ViewerImage>,
    current: usize,
    // Ticks left before the next transition starts
    hold: u32,
    // Running transition and the image it reveals
    pending: Option<(Transition, usize)>,
    rng: Pcg32,
}

impl Viewer {
    pub fn new(images: Vec<ViewerImage>) -> Self {
        let mut viewer = Self {
            images,
            current: 0,
            hold: 0,
            pending: None,
            rng: Pcg32::seed_from_u64(VIEWER_SEED),
        };
        viewer.reset();
        viewer
    }

    /// Start over: the next tick reveals the first image.
    pub fn reset(&mut self) {
        self.current = self.images.len().saturating_sub(1);
        self.hold = 0;
        self.pending = None;
        self.rng = Pcg32::seed_from_u64(VIEWER_SEED);
    }

    /// Index of the image fully on screen (or being replaced).
    pub const fn current(&self) -> usize { self.current }

    pub const fn is_transitioning(&self) -> bool { self.pending.is_some() }

    pub fn transition_kind(&self) -> Option<TransitionKind> {
        self.pending.as_ref().map(|(transition, _)| transition.kind())
    }

    /// Advance one tick: count the hold down, or draw and present one transition step.
    pub fn tick<D: MatrixDriver, const N: usize>(
        &mut self,
        panel: &mut LedPanel<D, N>,
    ) -> Result<(), PanelError> {
        if self.images.is_empty() {
            return Ok(());
        }
        if self.pending.is_none() {
            if self.hold > 0 {
                self.hold -= 1;
                return Ok(());
            }
            let next = (self.current + 1) % self.images.len();
            let kind = TransitionKind::random(&mut self.rng);
            self.pending = Some((Transition::new(kind, panel.geometry())?, next));
        }

        let Some((transition, next)) = self.pending.as_mut() else {
            return Ok(());
        };
        let next = *next;
        let drawn = panel.reveal_step(transition, &self.images[next].frame);
        let finished = transition.is_finished();
        match drawn {
            Ok(Some(_)) => panel.swap_buffers(true),
            Ok(None) => {}
            Err(err) => {
                self.pending = None;
                return Err(err);
            }
        }
        if finished {
            self.current = next;
            self.hold = self.images[next].hold_ticks;
            self.pending = None;
        }
        Ok(())
    }
}
