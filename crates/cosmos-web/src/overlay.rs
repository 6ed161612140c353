use crate::constants::OVERLAY_BACKGROUND;
use cosmos_core::constants::{OVERLAY_LIGHTNESS, OVERLAY_SATURATION};
use cosmos_core::{overlay_bars, SpectrumFrame};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Flat 2D spectrum bars drawn over the scene.
pub struct SpectrumOverlay {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    cap: Option<usize>,
}

impl SpectrumOverlay {
    pub fn new(canvas: web::HtmlCanvasElement, cap: Option<usize>) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx, cap })
    }

    /// Match the backing store to the element's layout size.
    pub fn sync_size(&self) {
        let w = self.canvas.client_width().max(1) as u32;
        let h = self.canvas.client_height().max(1) as u32;
        if self.canvas.width() != w {
            self.canvas.set_width(w);
        }
        if self.canvas.height() != h {
            self.canvas.set_height(h);
        }
    }

    pub fn draw(&self, spectrum: &SpectrumFrame) {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, width, height);
        self.ctx.set_fill_style_str(OVERLAY_BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, width, height);

        for bar in overlay_bars(spectrum, width as f32, height as f32, self.cap) {
            let style = format!(
                "hsl({}, {}%, {}%)",
                bar.hue,
                OVERLAY_SATURATION * 100.0,
                OVERLAY_LIGHTNESS * 100.0
            );
            self.ctx.set_fill_style_str(&style);
            self.ctx.fill_rect(
                bar.x as f64,
                height - bar.height as f64,
                bar.width as f64,
                bar.height as f64,
            );
        }
    }
}
