use crate::editor::Adjustments;
use egui::ColorImage;
use image::RgbaImage;
use rayon::prelude::*;

/// Minimum pixel count before parallelizing per-pixel transforms.
const PARALLEL_PIXEL_THRESHOLD: usize = 262_144; // 512x512

/// Largest hue rotation, reached at a hue adjustment of ±1.
const MAX_HUE_DEGREES: f32 = 180.0;

// Rec. 709 luma weights used by the filter-effects color matrices.
const LUMA_R: f32 = 0.213;
const LUMA_G: f32 = 0.715;
const LUMA_B: f32 = 0.072;

type Matrix3 = [[f32; 3]; 3];

/// Per-pixel transform precomputed from an adjustment record.
#[derive(Debug, Clone, Copy)]
struct ToneTransform {
    brightness: f32,
    contrast: f32,
    color: Matrix3,
}

impl ToneTransform {
    fn new(adjustments: Adjustments) -> Self {
        let adjustments = adjustments.sanitized();
        let saturate = saturate_matrix(1.0 + adjustments.saturation);
        let rotate = hue_rotate_matrix(adjustments.hue * MAX_HUE_DEGREES);
        Self {
            brightness: 1.0 + adjustments.brightness,
            contrast: 1.0 + adjustments.contrast,
            color: multiply(&rotate, &saturate),
        }
    }

    fn apply(&self, pixel: &mut [u8]) {
        let mut rgb = [0.0_f32; 3];
        for (value, &byte) in rgb.iter_mut().zip(pixel.iter()) {
            let mut v = f32::from(byte) / 255.0;
            v = (v * self.brightness).clamp(0.0, 1.0);
            v = (v - 0.5).mul_add(self.contrast, 0.5).clamp(0.0, 1.0);
            *value = v;
        }
        for (row, byte) in self.color.iter().zip(pixel.iter_mut()) {
            let v = row[2].mul_add(rgb[2], row[0].mul_add(rgb[0], row[1] * rgb[1]));
            *byte = float_to_u8(v);
        }
    }
}

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [
            (1.0 - LUMA_R).mul_add(s, LUMA_R),
            LUMA_G.mul_add(-s, LUMA_G),
            LUMA_B.mul_add(-s, LUMA_B),
        ],
        [
            LUMA_R.mul_add(-s, LUMA_R),
            (1.0 - LUMA_G).mul_add(s, LUMA_G),
            LUMA_B.mul_add(-s, LUMA_B),
        ],
        [
            LUMA_R.mul_add(-s, LUMA_R),
            LUMA_G.mul_add(-s, LUMA_G),
            (1.0 - LUMA_B).mul_add(s, LUMA_B),
        ],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> Matrix3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            LUMA_R + cos * (1.0 - LUMA_R) - sin * LUMA_R,
            LUMA_G - cos * LUMA_G - sin * LUMA_G,
            LUMA_B - cos * LUMA_B + sin * (1.0 - LUMA_B),
        ],
        [
            LUMA_R - cos * LUMA_R + sin * 0.143,
            LUMA_G + cos * (1.0 - LUMA_G) + sin * 0.140,
            LUMA_B - cos * LUMA_B - sin * 0.283,
        ],
        [
            LUMA_R - cos * LUMA_R - sin * (1.0 - LUMA_R),
            LUMA_G - cos * LUMA_G + sin * LUMA_G,
            LUMA_B + cos * (1.0 - LUMA_B) + sin * LUMA_B,
        ],
    ]
}

fn multiply(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Apply adjustments to raw RGBA8 bytes; alpha is left untouched.
pub fn adjust_rgba_in_place(raw: &mut [u8], adjustments: Adjustments) {
    if adjustments.is_identity() {
        return;
    }
    let transform = ToneTransform::new(adjustments);
    if raw.len() / 4 >= PARALLEL_PIXEL_THRESHOLD {
        raw.par_chunks_exact_mut(4)
            .for_each(|pixel| transform.apply(pixel));
    } else {
        raw.chunks_exact_mut(4)
            .for_each(|pixel| transform.apply(pixel));
    }
}

/// Render `base` with adjustments into an egui image for display.
pub fn apply_adjustments(base: &RgbaImage, adjustments: Adjustments) -> ColorImage {
    let size = [base.width() as usize, base.height() as usize];
    if adjustments.is_identity() {
        return ColorImage::from_rgba_unmultiplied(size, base.as_raw());
    }
    let mut raw = base.as_raw().clone();
    adjust_rgba_in_place(&mut raw, adjustments);
    ColorImage::from_rgba_unmultiplied(size, &raw)
}
