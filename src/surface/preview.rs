use super::CropSurface;
use crate::editor::OutputSize;
use egui::ColorImage;

/// Small live rendering of what a download would produce.
///
/// The preview never renders on its own; it pulls a fresh canvas from the
/// crop surface each time [`PreviewSurface::refresh`] is called.
pub struct PreviewSurface {
    size: OutputSize,
    pixels: Option<ColorImage>,
    refreshes: u64,
}

impl PreviewSurface {
    /// Preview `width` pixels wide at the output aspect ratio.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(width: u32, output: OutputSize) -> Self {
        let width = width.max(1);
        let height = (width as f32 / output.aspect()).round().max(1.0) as u32;
        Self {
            size: OutputSize::new(width, height),
            pixels: None,
            refreshes: 0,
        }
    }

    pub const fn size(&self) -> OutputSize {
        self.size
    }

    /// Redraw from the crop surface; clears when nothing is mounted.
    pub fn refresh(&mut self, crop: &CropSurface) {
        self.pixels = crop.preview_canvas(self.size);
        self.refreshes = self.refreshes.wrapping_add(1);
        log::debug!(
            "preview refresh #{} ({})",
            self.refreshes,
            if self.pixels.is_some() { "rendered" } else { "cleared" }
        );
    }

    pub const fn pixels(&self) -> Option<&ColorImage> {
        self.pixels.as_ref()
    }

    /// Number of refreshes so far; doubles as the texture generation.
    pub const fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}
