use crate::image::PixelRect;
use egui::{Pos2, Rect, Vec2, pos2, vec2};

/// Smallest crop width, in source pixels, reachable by resizing or zooming.
const MIN_CROP_WIDTH: f32 = 16.0;

/// Grab point on the crop frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    pub const ALL: [Self; 8] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
    ];

    pub fn position(self, rect: Rect) -> Pos2 {
        let c = rect.center();
        match self {
            Self::TopLeft => rect.left_top(),
            Self::Top => pos2(c.x, rect.top()),
            Self::TopRight => rect.right_top(),
            Self::Right => pos2(rect.right(), c.y),
            Self::BottomRight => rect.right_bottom(),
            Self::Bottom => pos2(c.x, rect.bottom()),
            Self::BottomLeft => rect.left_bottom(),
            Self::Left => pos2(rect.left(), c.y),
        }
    }

    /// Closest handle within `radius` of `pos`.
    pub fn hit_test(pos: Pos2, rect: Rect, radius: f32) -> Option<Self> {
        Self::ALL
            .iter()
            .map(|&handle| (handle, pos.distance(handle.position(rect))))
            .filter(|(_, dist)| *dist <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }

    pub const fn cursor(self) -> egui::CursorIcon {
        match self {
            Self::TopLeft | Self::BottomRight => egui::CursorIcon::ResizeNwSe,
            Self::TopRight | Self::BottomLeft => egui::CursorIcon::ResizeNeSw,
            Self::Left | Self::Right => egui::CursorIcon::ResizeHorizontal,
            Self::Top | Self::Bottom => egui::CursorIcon::ResizeVertical,
        }
    }
}

/// Fixed-aspect crop rectangle in source pixel coordinates.
///
/// Every operation keeps the aspect ratio and keeps the rectangle inside
/// `bounds` (the source image size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    rect: Rect,
    aspect: f32,
}

impl CropRegion {
    /// Largest centered rectangle of `aspect` that fits in `bounds`.
    pub fn fit(bounds: Vec2, aspect: f32) -> Self {
        let aspect = sanitize_aspect(aspect);
        let bounds = bounds.max(vec2(1.0, 1.0));
        let size = if bounds.x / bounds.y > aspect {
            vec2(bounds.y * aspect, bounds.y)
        } else {
            vec2(bounds.x, bounds.x / aspect)
        };
        let min = ((bounds - size) * 0.5).to_pos2();
        Self {
            rect: Rect::from_min_size(min, size),
            aspect,
        }
    }

    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Integer rectangle for rasterizing.
    pub fn pixel_rect(&self) -> PixelRect {
        self.scaled_pixel_rect(1.0)
    }

    /// Integer rectangle on a copy of the source resized by `scale`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scaled_pixel_rect(&self, scale: f32) -> PixelRect {
        let rect = Rect::from_min_max(
            (self.rect.min.to_vec2() * scale).to_pos2(),
            (self.rect.max.to_vec2() * scale).to_pos2(),
        );
        PixelRect {
            x: rect.min.x.round().max(0.0) as u32,
            y: rect.min.y.round().max(0.0) as u32,
            width: rect.width().round().max(1.0) as u32,
            height: rect.height().round().max(1.0) as u32,
        }
    }

    pub fn translate(&mut self, delta: Vec2, bounds: Vec2) -> bool {
        let moved = self.rect.translate(delta);
        self.replace(clamp_inside(moved, bounds))
    }

    /// Grow (`factor > 1`) or shrink the region, keeping `anchor` fixed.
    pub fn scale_about(&mut self, factor: f32, anchor: Pos2, bounds: Vec2) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let max_w = self.max_width(bounds);
        let width = clamp_width(
            self.rect.width() * factor,
            self.min_width(bounds),
            max_w,
        );
        let k = width / self.rect.width();
        let min = anchor + (self.rect.min - anchor) * k;
        let rect = Rect::from_min_size(min, vec2(width, width / self.aspect));
        self.replace(clamp_inside(rect, bounds))
    }

    /// Drag `handle` by `delta`; the opposite corner or edge stays put.
    pub fn resize(&mut self, handle: Handle, delta: Vec2, bounds: Vec2) -> bool {
        let r = self.rect;
        let aspect = self.aspect;
        let min_w = self.min_width(bounds);
        let rect = match handle {
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft | Handle::BottomRight => {
                let (anchor, corner) = match handle {
                    Handle::TopLeft => (r.right_bottom(), r.left_top()),
                    Handle::TopRight => (r.left_bottom(), r.right_top()),
                    Handle::BottomLeft => (r.right_top(), r.left_bottom()),
                    _ => (r.left_top(), r.right_bottom()),
                };
                let sx = (corner.x - anchor.x).signum();
                let sy = (corner.y - anchor.y).signum();
                let moved = corner + delta;
                // Follow whichever axis the pointer moved further along.
                let from_x = (moved.x - anchor.x) * sx;
                let from_y = (moved.y - anchor.y) * sy * aspect;
                let want = if (from_x - r.width()).abs() >= (from_y - r.width()).abs() {
                    from_x
                } else {
                    from_y
                };
                let room_x = if sx > 0.0 { bounds.x - anchor.x } else { anchor.x };
                let room_y = if sy > 0.0 { bounds.y - anchor.y } else { anchor.y };
                let width = clamp_width(want, min_w, room_x.min(room_y * aspect));
                Rect::from_two_pos(anchor, anchor + vec2(sx * width, sy * width / aspect))
            }
            Handle::Left | Handle::Right => {
                let (anchor_x, edge_x, sx) = if handle == Handle::Right {
                    (r.left(), r.right(), 1.0)
                } else {
                    (r.right(), r.left(), -1.0)
                };
                let want = (edge_x + delta.x - anchor_x) * sx;
                let cy = r.center().y;
                let room_x = if sx > 0.0 { bounds.x - anchor_x } else { anchor_x };
                let room_y = 2.0 * cy.min(bounds.y - cy);
                let width = clamp_width(want, min_w, room_x.min(room_y * aspect));
                let half_h = width / aspect * 0.5;
                Rect::from_two_pos(
                    pos2(anchor_x, cy - half_h),
                    pos2(sx.mul_add(width, anchor_x), cy + half_h),
                )
            }
            Handle::Top | Handle::Bottom => {
                let (anchor_y, edge_y, sy) = if handle == Handle::Bottom {
                    (r.top(), r.bottom(), 1.0)
                } else {
                    (r.bottom(), r.top(), -1.0)
                };
                let want = (edge_y + delta.y - anchor_y) * sy * aspect;
                let cx = r.center().x;
                let room_x = 2.0 * cx.min(bounds.x - cx);
                let room_y = if sy > 0.0 { bounds.y - anchor_y } else { anchor_y };
                let width = clamp_width(want, min_w, room_x.min(room_y * aspect));
                let height = width / aspect;
                Rect::from_two_pos(
                    pos2(cx - width * 0.5, anchor_y),
                    pos2(cx + width * 0.5, sy.mul_add(height, anchor_y)),
                )
            }
        };
        self.replace(rect)
    }

    fn max_width(&self, bounds: Vec2) -> f32 {
        bounds.x.min(bounds.y * self.aspect)
    }

    fn min_width(&self, bounds: Vec2) -> f32 {
        MIN_CROP_WIDTH.min(self.max_width(bounds))
    }

    fn replace(&mut self, rect: Rect) -> bool {
        if rect == self.rect {
            return false;
        }
        self.rect = rect;
        true
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

fn clamp_width(want: f32, min: f32, max: f32) -> f32 {
    let max = max.max(1.0);
    if want.is_nan() {
        return max;
    }
    want.clamp(min.min(max), max)
}

/// Shift `rect` so it lies inside `[0, bounds]` without resizing it.
fn clamp_inside(rect: Rect, bounds: Vec2) -> Rect {
    let size = rect.size();
    let x = rect.min.x.clamp(0.0, (bounds.x - size.x).max(0.0));
    let y = rect.min.y.clamp(0.0, (bounds.y - size.y).max(0.0));
    Rect::from_min_size(pos2(x, y), size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPECT: f32 = 2.5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn assert_valid(region: &CropRegion, bounds: Vec2) {
        let r = region.rect();
        assert!(approx(r.width() / r.height(), ASPECT), "aspect drifted: {r:?}");
        assert!(r.min.x >= -1e-3 && r.min.y >= -1e-3, "left bounds: {r:?}");
        assert!(
            r.max.x <= bounds.x + 1e-3 && r.max.y <= bounds.y + 1e-3,
            "right bounds: {r:?}"
        );
    }

    #[test]
    fn fit_fills_width_of_tall_images() {
        let bounds = vec2(1000.0, 1000.0);
        let region = CropRegion::fit(bounds, ASPECT);
        let r = region.rect();
        assert!(approx(r.width(), 1000.0));
        assert!(approx(r.height(), 400.0));
        assert!(approx(r.min.y, 300.0));
        assert_valid(&region, bounds);
    }

    #[test]
    fn fit_fills_height_of_wide_images() {
        let bounds = vec2(4000.0, 1000.0);
        let region = CropRegion::fit(bounds, ASPECT);
        let r = region.rect();
        assert!(approx(r.height(), 1000.0));
        assert!(approx(r.width(), 2500.0));
        assert!(approx(r.min.x, 750.0));
    }

    #[test]
    fn invalid_aspect_falls_back_to_square() {
        let region = CropRegion::fit(vec2(300.0, 200.0), f32::NAN);
        let r = region.rect();
        assert!(approx(r.width(), 200.0));
        assert!(approx(r.height(), 200.0));
    }

    #[test]
    fn translate_is_clamped_to_bounds() {
        let bounds = vec2(1000.0, 1000.0);
        let mut region = CropRegion::fit(bounds, ASPECT);
        assert!(region.translate(vec2(0.0, 5000.0), bounds));
        assert!(approx(region.rect().max.y, 1000.0));
        assert!(!region.translate(vec2(0.0, 10.0), bounds));
        assert!(region.translate(vec2(-50.0, -10_000.0), bounds));
        assert!(approx(region.rect().min.y, 0.0));
        assert_valid(&region, bounds);
    }

    #[test]
    fn corner_resize_keeps_aspect_and_anchor() {
        let bounds = vec2(1000.0, 1000.0);
        let mut region = CropRegion::fit(bounds, ASPECT);
        let before = region.rect();
        assert!(region.resize(Handle::BottomRight, vec2(-500.0, 0.0), bounds));
        let after = region.rect();
        assert!(approx(after.min.x, before.min.x));
        assert!(approx(after.min.y, before.min.y));
        assert!(approx(after.width(), 500.0));
        assert_valid(&region, bounds);
    }

    #[test]
    fn corner_resize_stops_at_bounds() {
        let bounds = vec2(1000.0, 1000.0);
        let mut region = CropRegion::fit(bounds, ASPECT);
        region.resize(Handle::TopLeft, vec2(300.0, 300.0), bounds);
        region.resize(Handle::TopLeft, vec2(-5000.0, -5000.0), bounds);
        assert_valid(&region, bounds);
        assert!(approx(region.rect().min.x, 0.0));
    }

    #[test]
    fn edge_resize_keeps_opposite_edge_and_center_line() {
        let bounds = vec2(1000.0, 1000.0);
        let mut region = CropRegion::fit(bounds, ASPECT);
        assert!(region.resize(Handle::Bottom, vec2(0.0, -100.0), bounds));
        let shrunk = region.rect();
        assert!(approx(shrunk.top(), 300.0));
        assert!(approx(shrunk.height(), 300.0));
        assert!(approx(shrunk.center().x, 500.0));

        assert!(region.resize(Handle::Left, vec2(-25.0, 0.0), bounds));
        let grown = region.rect();
        assert!(approx(grown.right(), shrunk.right()));
        assert!(approx(grown.width(), 775.0));
        assert!(approx(grown.center().y, shrunk.center().y));
        assert_valid(&region, bounds);
    }

    #[test]
    fn resize_respects_minimum_width() {
        let bounds = vec2(1000.0, 1000.0);
        let mut region = CropRegion::fit(bounds, ASPECT);
        region.resize(Handle::Right, vec2(-5000.0, 0.0), bounds);
        assert!(approx(region.rect().width(), MIN_CROP_WIDTH));
        assert_valid(&region, bounds);
    }

    #[test]
    fn scale_about_anchor_keeps_anchor_fixed() {
        let bounds = vec2(1000.0, 1000.0);
        let mut region = CropRegion::fit(bounds, ASPECT);
        let anchor = region.rect().center();
        assert!(region.scale_about(0.5, anchor, bounds));
        let r = region.rect();
        assert!(approx(r.width(), 500.0));
        assert!(approx(r.center().x, anchor.x));
        assert!(approx(r.center().y, anchor.y));

        assert!(region.scale_about(10.0, anchor, bounds));
        assert!(approx(region.rect().width(), 1000.0));
        assert_valid(&region, bounds);
        assert!(!region.scale_about(0.0, anchor, bounds));
    }

    #[test]
    fn pixel_rect_rounds_to_integers() {
        let region = CropRegion::fit(vec2(1001.0, 1000.0), ASPECT);
        let rect = region.pixel_rect();
        assert_eq!(rect.width, 1001);
        assert!(rect.height == 400 || rect.height == 401);
    }

    #[test]
    fn scaled_pixel_rect_follows_the_resized_copy() {
        let region = CropRegion::fit(vec2(4000.0, 1000.0), ASPECT);
        let rect = region.scaled_pixel_rect(0.5);
        assert_eq!((rect.x, rect.y), (375, 0));
        assert_eq!((rect.width, rect.height), (1250, 500));
        assert_eq!(region.scaled_pixel_rect(1.0), region.pixel_rect());
    }

    #[test]
    fn hit_test_prefers_the_nearest_handle() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 40.0));
        assert_eq!(
            Handle::hit_test(pos2(2.0, 1.0), rect, 8.0),
            Some(Handle::TopLeft)
        );
        assert_eq!(
            Handle::hit_test(pos2(50.0, 41.0), rect, 8.0),
            Some(Handle::Bottom)
        );
        assert_eq!(Handle::hit_test(pos2(50.0, 20.0), rect, 8.0), None);
    }
}
