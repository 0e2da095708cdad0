//! Demo content: text lines and procedural test images.

use ledpanel_common::slicer::{BRIGHTNESS_ADJUSTMENT, CONTRAST_ADJUSTMENT, enhance, enhance_viewer, fit_frame};
use ledpanel_common::text::text_width;
use ledpanel_common::{
    FRAME_BYTES,
    LedPanel,
    MatrixDriver,
    PANEL_HEIGHT,
    PANEL_WIDTH,
    PanelError,
    PanelGeometry,
    Rotation,
    TextLineSpec,
};

use crate::config::{
    BANNER_COLOR,
    BANNER_TEXT,
    BANNER_Y,
    DEFAULT_VIEWER_HOLD_TICKS,
    STATIC_COLOR,
    STATIC_TEXT,
    VERTICAL_COLOR,
    VERTICAL_TEXT,
};
use crate::viewer::ViewerImage;

/// Fill the first three slots: a static label, a left-scrolling banner and a
/// vertical line scrolling along the right edge.
pub fn load_text_lines<D: MatrixDriver, const N: usize>(panel: &mut LedPanel<D, N>) -> Result<(), PanelError> {
    let cols = PANEL_WIDTH as i16;
    panel.set_text_line(0, STATIC_TEXT, TextLineSpec::new(2, 0, STATIC_COLOR))?;
    panel.set_text_line(
        1,
        BANNER_TEXT,
        TextLineSpec::new(cols, BANNER_Y, BANNER_COLOR).with_scroll(-1),
    )?;

    let vertical_width = text_width(VERTICAL_TEXT, 1) as i16;
    panel.set_text_line(
        2,
        VERTICAL_TEXT,
        TextLineSpec::new(-vertical_width, 0, VERTICAL_COLOR)
            .with_rotation(Rotation::Deg90)
            .with_scroll(1),
    )
}

// =============================================================================
// Test Images
// =============================================================================

/// Build a full RGB frame from a per-pixel generator.
fn render_frame(pixel: impl Fn(usize, usize) -> [u8; 3]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_BYTES);
    for y in 0..PANEL_HEIGHT {
        for x in 0..PANEL_WIDTH {
            frame.extend_from_slice(&pixel(x, y));
        }
    }
    debug_assert_eq!(frame.len(), FRAME_BYTES);
    frame
}

/// Horizontal hue sweep with a vertical fade.
fn gradient(
    x: usize,
    y: usize,
) -> [u8; 3] {
    let fade = 255 - (y * 255 / (PANEL_HEIGHT - 1)) as u8 / 2;
    let t = (x * 255 / (PANEL_WIDTH - 1)) as u8;
    [
        scale(255 - t, fade),
        scale(if t < 128 { t * 2 } else { (255 - t) * 2 }, fade),
        scale(t, fade),
    ]
}

/// 8x8 checkerboard in two colors.
fn checkerboard(
    x: usize,
    y: usize,
) -> [u8; 3] {
    if ((x / 8) + (y / 8)) % 2 == 0 { [255, 200, 0] } else { [0, 40, 160] }
}

/// Concentric rings around the panel center.
fn rings(
    x: usize,
    y: usize,
) -> [u8; 3] {
    let dx = x as i32 * 2 - (PANEL_WIDTH as i32 - 1);
    let dy = y as i32 * 2 - (PANEL_HEIGHT as i32 - 1);
    let ring = (dx.unsigned_abs().max(dy.unsigned_abs()) / 6) % 3;
    match ring {
        0 => [255, 0, 64],
        1 => [255, 255, 255],
        _ => [0, 160, 80],
    }
}

#[inline]
fn scale(
    value: u8,
    factor: u8,
) -> u8 {
    ((u16::from(value) * u16::from(factor)) / 255) as u8
}

/// Procedural frames, enhanced the way the sender prepares real images.
pub fn test_frames() -> Vec<Vec<u8>> {
    let generators: [fn(usize, usize) -> [u8; 3]; 3] = [gradient, checkerboard, rings];
    generators
        .into_iter()
        .map(|generator| {
            let mut frame = render_frame(generator);
            enhance(&mut frame, CONTRAST_ADJUSTMENT, BRIGHTNESS_ADJUSTMENT);
            frame
        })
        .collect()
}

// =============================================================================
// Viewer Images
// =============================================================================

/// Render an RGB image of any size from a per-pixel generator.
fn render_image(
    width: usize,
    height: usize,
    pixel: impl Fn(usize, usize) -> [u8; 3],
) -> Vec<u8> {
    let mut image = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            image.extend_from_slice(&pixel(x, y));
        }
    }
    image
}

/// Source images at sizes other than the panel's, fitted and enhanced the way
/// the viewer prepares pictures, with per-image hold times.
pub fn viewer_images(geometry: PanelGeometry) -> Result<Vec<ViewerImage>, PanelError> {
    let sources: [(usize, usize, Option<u32>, fn(usize, usize) -> [u8; 3]); 3] = [
        // Square tile, fitted to the panel height
        (48, 48, None, |x, y| if ((x / 6) + (y / 6)) % 2 == 0 { [255, 120, 0] } else { [20, 20, 90] }),
        // Wide strip, shrunk by half
        (96, 32, Some(125), |x, _| [(x * 255 / 95) as u8, 64, (255 - x * 255 / 95) as u8]),
        // Small thumbnail, scaled up
        (20, 10, Some(75), |x, y| if x == y || x == 19 - y { [255, 255, 255] } else { [0, 90, 40] }),
    ];

    let mut images = Vec::with_capacity(sources.len());
    for (width, height, hold, generator) in sources {
        let source = render_image(width, height, generator);
        let mut frame = vec![0u8; geometry.frame_bytes()];
        fit_frame(&source, width, height, geometry, &mut frame)?;
        enhance_viewer(&mut frame, CONTRAST_ADJUSTMENT, BRIGHTNESS_ADJUSTMENT);
        images.push(ViewerImage { frame, hold_ticks: hold.unwrap_or(DEFAULT_VIEWER_HOLD_TICKS) });
    }
    Ok(images)
}
