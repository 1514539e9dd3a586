use super::{CropRegion, Handle, rgba_to_color_image};
use crate::editor::{Adjustments, CanvasSource, OutputSize};
use crate::image::{RenderQuality, apply_adjustments, rasterize};
use egui::{ColorImage, Pos2, Rect, Vec2, vec2};
use image::RgbaImage;
use image::imageops;

/// Longest side of the on-screen copy of the source image.
const DISPLAY_MAX_SIDE: u32 = 2048;

struct Mounted {
    source: RgbaImage,
    /// Downscaled copy used for on-screen rendering.
    display_base: RgbaImage,
    region: CropRegion,
}

/// Interactive crop view over the current source image.
///
/// The surface owns the source pixels and the crop region. Anything that
/// changes what the crop produces raises the update flag, which the preview
/// pulls via [`CropSurface::take_update`].
pub struct CropSurface {
    mounted: Option<Mounted>,
    aspect: f32,
    adjustments: Adjustments,
    interactive: bool,
    display: Option<ColorImage>,
    display_dirty: bool,
    generation: u64,
    updated: bool,
}

impl CropSurface {
    pub fn new(output: OutputSize) -> Self {
        Self {
            mounted: None,
            aspect: output.aspect(),
            adjustments: Adjustments::default(),
            interactive: true,
            display: None,
            display_dirty: false,
            generation: 0,
            updated: false,
        }
    }

    /// Show `source` with a fresh, centered crop region.
    pub fn mount(&mut self, source: RgbaImage) {
        let bounds = vec2(source.width() as f32, source.height() as f32);
        let (width, height) = display_dimensions(source.width(), source.height());
        let display_base = if (width, height) == source.dimensions() {
            source.clone()
        } else {
            imageops::thumbnail(&source, width, height)
        };
        log::debug!(
            "crop surface mounted {}x{} image",
            source.width(),
            source.height()
        );
        self.mounted = Some(Mounted {
            region: CropRegion::fit(bounds, self.aspect),
            source,
            display_base,
        });
        self.invalidate_display();
    }

    pub fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            self.invalidate_display();
        }
    }

    pub const fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn image_size(&self) -> Option<Vec2> {
        self.mounted
            .as_ref()
            .map(|m| vec2(m.source.width() as f32, m.source.height() as f32))
    }

    pub fn region(&self) -> Option<CropRegion> {
        self.mounted.as_ref().map(|m| m.region)
    }

    #[cfg(test)]
    pub const fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    pub fn set_adjustments(&mut self, adjustments: Adjustments) {
        if adjustments == self.adjustments {
            return;
        }
        self.adjustments = adjustments;
        if self.is_mounted() {
            self.invalidate_display();
        }
    }

    pub const fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Enable or disable every region and background gesture.
    pub const fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Drag the crop region by `delta` source pixels.
    pub fn move_region(&mut self, delta: Vec2) -> bool {
        self.edit_region(|region, bounds| region.translate(delta, bounds))
    }

    pub fn resize_region(&mut self, handle: Handle, delta: Vec2) -> bool {
        self.edit_region(|region, bounds| region.resize(handle, delta, bounds))
    }

    /// Drag the image under a fixed frame; the region moves the other way.
    pub fn pan_background(&mut self, delta: Vec2) -> bool {
        self.edit_region(|region, bounds| region.translate(-delta, bounds))
    }

    /// Zoom the image around `anchor` (source pixels). Zooming in by
    /// `factor` shrinks the region by the same factor.
    pub fn zoom_background(&mut self, factor: f32, anchor: Pos2) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.edit_region(|region, bounds| region.scale_about(factor.recip(), anchor, bounds))
    }

    fn edit_region(&mut self, edit: impl FnOnce(&mut CropRegion, Vec2) -> bool) -> bool {
        if !self.interactive {
            return false;
        }
        let Some(mounted) = self.mounted.as_mut() else {
            return false;
        };
        let bounds = vec2(mounted.source.width() as f32, mounted.source.height() as f32);
        let changed = edit(&mut mounted.region, bounds);
        if changed {
            self.updated = true;
        }
        changed
    }

    /// Consume the pending update notification.
    pub const fn take_update(&mut self) -> bool {
        let updated = self.updated;
        self.updated = false;
        updated
    }

    /// Counter bumped whenever the displayed pixels change.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Adjusted source image for on-screen display, rendered lazily.
    pub fn display_pixels(&mut self) -> Option<&ColorImage> {
        if self.display_dirty {
            self.display = self
                .mounted
                .as_ref()
                .map(|m| apply_adjustments(&m.display_base, self.adjustments));
            self.display_dirty = false;
        }
        self.display.as_ref()
    }

    /// Screen rectangle of the crop region when the image fills `image_rect`.
    pub fn region_on_screen(&self, image_rect: Rect) -> Option<Rect> {
        let scale = image_rect.width() / self.image_size()?.x;
        let rect = self.region()?.rect();
        Some(Rect::from_min_size(
            image_rect.min + rect.min.to_vec2() * scale,
            rect.size() * scale,
        ))
    }

    /// Fast render of the crop for the preview pane, taken from the
    /// display copy. Downloads still read the full-resolution source.
    pub fn preview_canvas(&self, size: OutputSize) -> Option<ColorImage> {
        let mounted = self.mounted.as_ref()?;
        let scale = mounted.display_base.width() as f32 / mounted.source.width() as f32;
        let rendered = rasterize(
            &mounted.display_base,
            mounted.region.scaled_pixel_rect(scale),
            size,
            self.adjustments,
            RenderQuality::Preview,
        );
        Some(rgba_to_color_image(&rendered))
    }

    fn invalidate_display(&mut self) {
        self.display_dirty = true;
        self.display = None;
        self.generation = self.generation.wrapping_add(1);
        self.updated = true;
    }
}

/// Size of the display copy: the long side capped at [`DISPLAY_MAX_SIDE`],
/// the other side scaled to match.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn display_dimensions(width: u32, height: u32) -> (u32, u32) {
    let long = width.max(height);
    if long <= DISPLAY_MAX_SIDE {
        return (width, height);
    }
    let scale = f64::from(DISPLAY_MAX_SIDE) / f64::from(long);
    let fit = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, DISPLAY_MAX_SIDE);
    (fit(width), fit(height))
}

impl CanvasSource for CropSurface {
    fn canvas(&self, size: OutputSize) -> Option<RgbaImage> {
        let mounted = self.mounted.as_ref()?;
        Some(rasterize(
            &mounted.source,
            mounted.region.pixel_rect(),
            size,
            self.adjustments,
            RenderQuality::Export,
        ))
    }
}
