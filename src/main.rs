// Crate-level lints: Allow common embedded/graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // u32/usize->i16 casts for panel coordinates
#![allow(clippy::cast_possible_wrap)] // usize->i32 wrapping is acceptable for panel sizes
#![allow(clippy::cast_sign_loss)] // i32->u32 where we know sign is positive

//! HUB75 LED panel simulator.
//!
//! Runs the panel engine against an in-memory double buffer and mirrors the front
//! buffer into an SDL window, one LED per scaled square.
//!
//! # Modes
//!
//! - **Text**: three demo lines (static, left-scrolling banner, vertical scroller)
//!   composed every tick with `display_text_task(true)`.
//! - **Image**: procedural test frames, enhanced and sliced the way the sender
//!   prepares real images, delivered one slice per tick.
//! - **Viewer**: pictures at assorted sizes fitted to the panel, each revealed by a
//!   random wipe, square, circle or noise transition and held for its own time.
//!
//! # Keys
//!
//! | Key | Action                                  |
//! |-----|-----------------------------------------|
//! | `T` | Text mode                               |
//! | `I` | Image mode                              |
//! | `V` | Viewer mode                             |
//! | `S` | Toggle right-strip / full-panel clearing |
//!
//! Engine diagnostics are drained from the debug log and printed every tick.

mod config;
mod demo;
mod viewer;

use std::thread;
use std::time::Instant;

use config::{FRAME_TIME, IMAGE_HOLD_TICKS, PIXEL_SPACING, SCREEN_HEIGHT, SCREEN_WIDTH, WINDOW_SCALE};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use ledpanel_common::config::ClearMode;
use ledpanel_common::slicer::FrameSequence;
use ledpanel_common::{BLACK, FrameBuffers, LedPanel, PANEL_HEIGHT, PANEL_WIDTH, PanelConfig, SLICE_SIZE};

type SimPanel = LedPanel<FrameBuffers<PANEL_WIDTH, PANEL_HEIGHT>>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Mode {
    Text,
    Image,
    Viewer,
}

fn main() {
    let mut panel: SimPanel = match LedPanel::new(FrameBuffers::new(), PanelConfig::default()) {
        Ok(panel) => panel,
        Err(err) => {
            eprintln!("panel init failed: {err}");
            return;
        }
    };
    if let Err(err) = demo::load_text_lines(&mut panel) {
        eprintln!("demo lines rejected: {err}");
        return;
    }

    let frames = demo::test_frames();
    let frame_refs: Vec<&[u8]> = frames.iter().map(Vec::as_slice).collect();
    let mut sequence = match FrameSequence::new(&frame_refs, panel.geometry()) {
        Ok(sequence) => sequence,
        Err(err) => {
            eprintln!("test frames rejected: {err}");
            return;
        }
    };

    let mut viewer = match demo::viewer_images(panel.geometry()) {
        Ok(images) => viewer::Viewer::new(images),
        Err(err) => {
            eprintln!("viewer images rejected: {err}");
            return;
        }
    };

    // Initialize display and window
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new()
        .scale(WINDOW_SCALE)
        .pixel_spacing(PIXEL_SPACING)
        .build();
    let mut window = Window::new("HUB75 Panel Sim", &output_settings);
    display.clear(BLACK).ok();
    window.update(&display);

    // ==========================================================================
    // Main Loop State
    // ==========================================================================

    let mut mode = Mode::Text;
    // Ticks left before the next image is requested
    let mut hold = 0u32;

    // ==========================================================================
    // Main Tick Loop
    // ==========================================================================

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::T if mode != Mode::Text => {
                            mode = Mode::Text;
                            panel.clear_screen();
                            println!("mode: text");
                        }
                        Keycode::I if mode != Mode::Image => {
                            mode = Mode::Image;
                            hold = 0;
                            panel.reset_ingest();
                            panel.clear_screen();
                            println!("mode: image");
                        }
                        Keycode::V if mode != Mode::Viewer => {
                            mode = Mode::Viewer;
                            viewer.reset();
                            panel.clear_screen();
                            println!("mode: viewer");
                        }
                        Keycode::S => {
                            let next = match panel.config().clear_mode {
                                ClearMode::FullPanel => ClearMode::RightStrip { width: SLICE_SIZE as u16 },
                                ClearMode::RightStrip { .. } => ClearMode::FullPanel,
                            };
                            panel.set_clear_mode(next);
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        match mode {
            Mode::Text => panel.display_text_task(true),
            Mode::Image => {
                if hold > 0 {
                    hold -= 1;
                } else if let Some(slice) = sequence.next_slice() {
                    if let Err(err) = panel.set_image_slice(slice) {
                        eprintln!("slice rejected: {err}");
                        panel.reset_ingest();
                    }
                    if panel.ready_to_continue() {
                        panel.display_buffer();
                        hold = IMAGE_HOLD_TICKS;
                    }
                }
            }
            Mode::Viewer => {
                if let Err(err) = viewer.tick(&mut panel) {
                    eprintln!("viewer step failed: {err}");
                }
            }
        }

        for entry in panel.debug_log_mut().drain() {
            println!("[{}] {}", entry.level.prefix(), entry.message);
        }

        display.draw_iter(panel.driver().front_pixels()).ok();
        window.update(&display);

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}
