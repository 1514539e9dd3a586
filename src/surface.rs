//! Rendering surfaces driven by the editor session: the interactive crop
//! view and the live preview.

mod crop;
mod preview;
mod region;

pub use crop::CropSurface;
pub use preview::PreviewSurface;
pub use region::{CropRegion, Handle};

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbaImage;

/// GPU copy of a surface's pixels, re-uploaded when the surface generation
/// moves on.
pub struct SurfaceTexture {
    name: &'static str,
    handle: Option<TextureHandle>,
    generation: Option<u64>,
}

impl SurfaceTexture {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            handle: None,
            generation: None,
        }
    }

    /// Texture for `generation`, uploading `pixels` when out of date.
    ///
    /// Returns `None` and drops the texture once the surface has no pixels.
    pub fn sync(
        &mut self,
        ctx: &Context,
        generation: u64,
        pixels: Option<&ColorImage>,
    ) -> Option<&TextureHandle> {
        let Some(pixels) = pixels else {
            self.handle = None;
            self.generation = None;
            return None;
        };
        if self.generation != Some(generation) || self.handle.is_none() {
            match &mut self.handle {
                Some(handle) => handle.set(pixels.clone(), TextureOptions::LINEAR),
                None => {
                    self.handle =
                        Some(ctx.load_texture(self.name, pixels.clone(), TextureOptions::LINEAR));
                }
            }
            self.generation = Some(generation);
        }
        self.handle.as_ref()
    }
}

pub(crate) fn rgba_to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}
