use super::adjust_rgba_in_place;
use crate::editor::{Adjustments, OutputSize};
use anyhow::Context as _;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

/// Integer crop rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Clip to an image of `width` x `height`, keeping at least one pixel.
    pub fn clipped_to(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width.saturating_sub(1));
        let y = self.y.min(height.saturating_sub(1));
        Self {
            x,
            y,
            width: self.width.clamp(1, width.saturating_sub(x).max(1)),
            height: self.height.clamp(1, height.saturating_sub(y).max(1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderQuality {
    /// Fast scaling for interactive previews.
    Preview,
    /// Lanczos resampling for downloads.
    Export,
}

/// Crop `source` to `region`, scale to `size`, then apply adjustments.
pub fn rasterize(
    source: &RgbaImage,
    region: PixelRect,
    size: OutputSize,
    adjustments: Adjustments,
    quality: RenderQuality,
) -> RgbaImage {
    let region = region.clipped_to(source.width(), source.height());
    let cropped =
        imageops::crop_imm(source, region.x, region.y, region.width, region.height).to_image();
    let width = size.width.max(1);
    let height = size.height.max(1);
    let downscaling = region.width >= width && region.height >= height;
    let mut out = match quality {
        RenderQuality::Preview if downscaling => imageops::thumbnail(&cropped, width, height),
        RenderQuality::Preview => imageops::resize(&cropped, width, height, FilterType::Triangle),
        RenderQuality::Export => imageops::resize(&cropped, width, height, FilterType::Lanczos3),
    };
    adjust_rgba_in_place(&mut out, adjustments);
    out
}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .context("Failed to encode PNG")?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// Left half red, right half blue.
    fn split_image() -> RgbaImage {
        RgbaImage::from_fn(40, 20, |x, _| {
            if x < 20 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn rasterize_produces_requested_size() {
        let out = rasterize(
            &split_image(),
            PixelRect {
                x: 0,
                y: 0,
                width: 40,
                height: 16,
            },
            OutputSize::new(1400, 560),
            Adjustments::default(),
            RenderQuality::Export,
        );
        assert_eq!(out.dimensions(), (1400, 560));
    }

    #[test]
    fn rasterize_uses_only_the_region() {
        let region = PixelRect {
            x: 22,
            y: 2,
            width: 15,
            height: 6,
        };
        for quality in [RenderQuality::Preview, RenderQuality::Export] {
            let out = rasterize(
                &split_image(),
                region,
                OutputSize::new(50, 20),
                Adjustments::default(),
                quality,
            );
            assert!(out.pixels().all(|p| p.0[0] < 8 && p.0[2] > 247));
        }
    }

    #[test]
    fn rasterize_applies_adjustments() {
        let out = rasterize(
            &split_image(),
            PixelRect {
                x: 0,
                y: 0,
                width: 10,
                height: 4,
            },
            OutputSize::new(10, 4),
            Adjustments {
                brightness: -1.0,
                ..Adjustments::default()
            },
            RenderQuality::Export,
        );
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn region_is_clipped_to_the_image() {
        let rect = PixelRect {
            x: 35,
            y: 50,
            width: 100,
            height: 100,
        }
        .clipped_to(40, 20);
        assert_eq!(
            rect,
            PixelRect {
                x: 35,
                y: 19,
                width: 5,
                height: 1,
            }
        );
    }

    #[test]
    fn encode_png_writes_signature() {
        let bytes = encode_png(&split_image()).expect("encode");
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }
}
