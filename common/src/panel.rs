//! The panel engine: text table, image ingest and presentation over one surface.
//!
//! # Tick Shapes
//!
//! Text mode, once per tick:
//!
//! ```text
//! display_text_task(erase)
//!   ├─ erase?  clear_screen_slice()          (strip or full panel)
//!   ├─ for i in 0..N: display_text_line(i, !erase)
//!   └─ swap_buffers(false)                   (double-buffered panels only)
//! ```
//!
//! Image mode, once per delivered slice:
//!
//! ```text
//! set_image_slice(buf)
//! if ready_to_continue() { display_buffer() }
//! ```
//!
//! Both modes draw into the same back buffer. Nothing reaches the front buffer
//! until a swap.

use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::color;
use crate::config::{ClearMode, NUMBER_OF_LINES, PanelConfig, PanelGeometry};
use crate::diag::{DebugLog, panel_debug, panel_info, panel_warn};
use crate::driver::MatrixDriver;
use crate::error::PanelError;
use crate::ingest::{ImageIngestor, SliceOutcome, clear_screen_slice};
use crate::surface::FrameSurface;
use crate::text::{TextLine, TextLineSpec, TextTable};
use crate::transition::Transition;

/// Text-and-image engine for one chained LED panel.
///
/// `N` is the number of text line slots.
pub struct LedPanel<D: MatrixDriver, const N: usize = NUMBER_OF_LINES> {
    surface: FrameSurface<D>,
    geometry: PanelGeometry,
    config: PanelConfig,
    lines: TextTable<N>,
    ingest: ImageIngestor,
    log: DebugLog,
}

impl<D: MatrixDriver, const N: usize> LedPanel<D, N> {
    /// Bring up the panel: check the driver's size and buffering against `config`,
    /// start refresh, turn off text wrap and paint the back buffer black.
    pub fn new(
        driver: D,
        config: PanelConfig,
    ) -> Result<Self, PanelError> {
        let geometry = config.geometry()?;
        let size = driver.size();
        if size.width as usize != geometry.cols() || size.height as usize != geometry.rows() {
            return Err(PanelError::DriverSizeMismatch);
        }
        if driver.is_double_buffered() != config.double_buffered {
            return Err(PanelError::BufferingMismatch);
        }

        let mut surface = FrameSurface::new(driver);
        surface.begin();
        surface.set_text_wrap(false);
        surface.clear_screen();

        let mut log = DebugLog::new();
        panel_info!(log, "panel {}x{} lines {}", geometry.cols(), geometry.rows(), N);

        Ok(Self {
            surface,
            geometry,
            config,
            lines: TextTable::new(),
            ingest: ImageIngestor::new(config.frames_target),
            log,
        })
    }

    /// Tear down and hand the driver back.
    pub fn release(self) -> D { self.surface.into_driver() }

    // -------------------------------------------------------------------------
    // Text lines
    // -------------------------------------------------------------------------

    /// Store `text` in slot `index` with the given placement and motion.
    pub fn set_text_line(
        &mut self,
        index: usize,
        text: &str,
        spec: TextLineSpec,
    ) -> Result<(), PanelError> {
        let result = self.lines.set(index, text, spec);
        self.report(index, result)
    }

    /// Empty slot `index`. Pixels already drawn stay until the next erase.
    pub fn clear_text_line(
        &mut self,
        index: usize,
    ) -> Result<(), PanelError> {
        let result = self.lines.clear(index);
        self.report(index, result)
    }

    /// Blank the band slot `index` occupies.
    pub fn erase_text_line(
        &mut self,
        index: usize,
    ) -> Result<(), PanelError> {
        let result = self.lines.erase_line(index, &mut self.surface);
        self.report(index, result)
    }

    /// Advance and draw slot `index`, erasing its band first when asked.
    pub fn display_text_line(
        &mut self,
        index: usize,
        erase_first: bool,
    ) -> Result<(), PanelError> {
        let result = self.lines.display_line(index, erase_first, &mut self.surface);
        self.report(index, result)
    }

    /// Pixel width of slot `index`, 0 when empty or out of range.
    pub fn get_text_width(
        &self,
        index: usize,
    ) -> u32 {
        self.lines.width(index)
    }

    pub fn text_line(
        &self,
        index: usize,
    ) -> Option<&TextLine> {
        self.lines.get(index)
    }

    /// Empty every slot.
    pub fn clear_all_lines(&mut self) { self.lines.clear_all(); }

    fn report(
        &mut self,
        index: usize,
        result: Result<(), PanelError>,
    ) -> Result<(), PanelError> {
        if let Err(err) = result {
            panel_warn!(self.log, "line {}: {}", index, err);
        }
        result
    }

    // -------------------------------------------------------------------------
    // Compositor
    // -------------------------------------------------------------------------

    /// Compose one text tick and present it.
    ///
    /// With `erase_screen` the clear region is wiped once and lines skip their own
    /// band erase. Lines draw in index order, so later slots win where they overlap.
    pub fn display_text_task(
        &mut self,
        erase_screen: bool,
    ) {
        if erase_screen {
            self.clear_screen_slice();
        }
        for index in 0..N {
            self.lines.display_line(index, !erase_screen, &mut self.surface).ok();
        }
        self.display_buffer();
    }

    /// Present the back buffer as is. Single-buffered panels draw in place.
    #[inline]
    pub fn display_buffer(&mut self) { self.swap_buffers(false); }

    /// Present the back buffer. With `copy_to_back` the presented image is copied
    /// back so the next frame builds on it.
    pub fn swap_buffers(
        &mut self,
        copy_to_back: bool,
    ) {
        if self.config.double_buffered {
            self.surface.swap_buffers(copy_to_back);
        }
    }

    /// Draw the next step of `transition` from `frame` into the back buffer.
    ///
    /// Returns the pixels drawn, `None` once the transition has finished.
    pub fn reveal_step(
        &mut self,
        transition: &mut Transition,
        frame: &[u8],
    ) -> Result<Option<usize>, PanelError> {
        if transition.geometry() != self.geometry {
            let geometry = transition.geometry();
            panel_warn!(self.log, "transition for {}x{}", geometry.cols(), geometry.rows());
            return Err(PanelError::InvalidGeometry {
                rows: geometry.rows() as u16,
                cols: geometry.cols() as u16,
            });
        }
        let drawn = transition.reveal_next(frame, &mut self.surface)?;
        if drawn.is_some() && transition.is_finished() {
            panel_debug!(self.log, "transition done in {} steps", transition.step_count());
        }
        Ok(drawn)
    }

    // -------------------------------------------------------------------------
    // Image ingest
    // -------------------------------------------------------------------------

    /// Draw the next slice of the current frame. Returns the pixels drawn,
    /// 0 when a complete frame is still waiting for [`Self::ready_to_continue`].
    pub fn set_image_slice(
        &mut self,
        buf: &[u8],
    ) -> Result<usize, PanelError> {
        match self.ingest.set_image_slice(buf, self.geometry, &mut self.surface) {
            Ok(SliceOutcome::Drawn { index, pixels }) => {
                panel_debug!(self.log, "slice {} ok", index);
                Ok(pixels)
            }
            Ok(SliceOutcome::Overflow) => {
                panel_warn!(self.log, "slice dropped, frame complete");
                Ok(0)
            }
            Err(err) => {
                panel_warn!(self.log, "slice {}: {}", self.ingest.slice_index(), err);
                Err(err)
            }
        }
    }

    /// True exactly once after the last slice of a frame.
    pub fn ready_to_continue(&mut self) -> bool {
        let ready = self.ingest.ready_to_continue();
        if ready {
            panel_debug!(self.log, "frame {} complete", self.ingest.frame_counter());
        }
        ready
    }

    /// True once the configured frame target has been reached.
    #[inline]
    pub const fn done_requesting(&self) -> bool { self.ingest.done_requesting() }

    /// Wipe the configured clear region.
    pub fn clear_screen_slice(&mut self) {
        clear_screen_slice(&mut self.surface, self.geometry, self.config.clear_mode);
    }

    /// Switch between strip and full-panel clearing.
    pub fn set_clear_mode(
        &mut self,
        mode: ClearMode,
    ) {
        self.config.clear_mode = mode;
        match mode {
            ClearMode::RightStrip { width } => panel_info!(self.log, "clear: right strip {}", width),
            ClearMode::FullPanel => panel_info!(self.log, "clear: full panel"),
        }
    }

    /// Abandon a partially delivered frame.
    pub fn reset_ingest(&mut self) {
        if self.ingest.slice_index() != 0 {
            panel_warn!(self.log, "ingest reset at slice {}", self.ingest.slice_index());
        }
        self.ingest.reset();
    }

    // -------------------------------------------------------------------------
    // Utilities and accessors
    // -------------------------------------------------------------------------

    /// Paint the whole back buffer black.
    pub fn clear_screen(&mut self) { self.surface.clear_screen(); }

    /// 8-bit RGB to the panel's 16-bit color.
    #[inline]
    pub const fn color(
        r: u8,
        g: u8,
        b: u8,
    ) -> Rgb565 {
        color(r, g, b)
    }

    #[inline]
    pub const fn geometry(&self) -> PanelGeometry { self.geometry }

    #[inline]
    pub const fn config(&self) -> &PanelConfig { &self.config }

    #[inline]
    pub const fn capacity(&self) -> usize { N }

    #[inline]
    pub const fn frame_counter(&self) -> u32 { self.ingest.frame_counter() }

    #[inline]
    pub const fn slice_index(&self) -> usize { self.ingest.slice_index() }

    #[inline]
    pub const fn surface(&self) -> &FrameSurface<D> { &self.surface }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut FrameSurface<D> { &mut self.surface }

    #[inline]
    pub fn driver(&self) -> &D { self.surface.driver() }

    #[inline]
    pub const fn debug_log(&self) -> &DebugLog { &self.log }

    #[inline]
    pub fn debug_log_mut(&mut self) -> &mut DebugLog { &mut self.log }
}

// =============================================================================
// Tests
// =============================================================================
