//! Geometry and colour for the flat 2D spectrum overlay.

use crate::spectrum::SpectrumFrame;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayBar {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Hue in degrees.
    pub hue: f32,
}

/// Hue for bar `i` of `count`: bass red→orange, mids yellow→green, treble cyan→blue.
pub fn overlay_hue(i: usize, count: usize) -> f32 {
    let third = count as f32 / 3.0;
    let i = i as f32;
    if i < third {
        (i / third) * 30.0
    } else if i < third * 2.0 {
        30.0 + ((i - third) / third) * 90.0
    } else {
        180.0 + ((i - third * 2.0) / third) * 60.0
    }
}

/// Lay out one bar per bin (or `cap` bars) across a `width` x `height` canvas.
///
/// Bars grow up from the bottom edge; `height` is the bar's height, not its top.
pub fn overlay_bars(
    spectrum: &SpectrumFrame,
    width: f32,
    height: f32,
    cap: Option<usize>,
) -> Vec<OverlayBar> {
    let len = spectrum.len();
    let count = cap.map_or(len, |c| c.min(len));
    if count == 0 || width <= 0.0 {
        return Vec::new();
    }
    let bar_width = width / count as f32;
    (0..count)
        .map(|i| OverlayBar {
            x: i as f32 * bar_width,
            width: bar_width,
            height: spectrum.bucket(i, count) * height,
            hue: overlay_hue(i, count),
        })
        .collect()
}
