use super::super::{CropDrag, TonecropApp};
use crate::editor::SourceRef;
use crate::surface::Handle;
use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Sense, StrokeKind, Vec2, pos2};

/// Wheel distance treated as one zoom step.
const SCROLL_STEP: f32 = 40.0;
const ZOOM_STEP: f32 = 1.1;

impl TonecropApp {
    pub(crate) fn ui_crop_view(&mut self, ui: &mut egui::Ui) {
        self.handle_dropped_files(ui);

        let Some(image_size) = self.crop.image_size() else {
            self.ui_crop_placeholder(ui);
            return;
        };
        let available = ui.available_size();
        let scale = (available.x / image_size.x)
            .min(available.y / image_size.y)
            .max(f32::EPSILON);
        let (rect, response) = ui.allocate_exact_size(available, Sense::click_and_drag());
        let image_rect = Rect::from_center_size(rect.center(), image_size * scale);
        let painter = ui.painter_at(rect);

        let generation = self.crop.generation();
        if let Some(texture) = self
            .crop_texture
            .sync(ui.ctx(), generation, self.crop.display_pixels())
        {
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.image(texture.id(), image_rect, uv, Color32::WHITE);
        }

        self.handle_crop_gestures(ui, &response, image_rect, scale);
        self.paint_crop_overlay(&painter, image_rect);
        paint_drop_hint(ui, &painter, rect);
    }

    fn ui_crop_placeholder(&self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let text = if self.pending_image_task.is_some() {
            "Loading…"
        } else {
            "No image. Upload one (Ctrl+O) or drop a file here."
        };
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(16.0),
            Color32::from_gray(170),
        );
        paint_drop_hint(ui, ui.painter(), rect);
    }

    fn handle_dropped_files(&mut self, ui: &egui::Ui) {
        let dropped_files = ui.input(|i| i.raw.dropped_files.clone());
        if dropped_files.is_empty() {
            return;
        }
        for f in &dropped_files {
            if let Some(path) = &f.path {
                log::debug!("dropped path {}", path.display());
                self.upload(SourceRef::Path(path.clone()));
                return;
            }
            if let Some(bytes) = &f.bytes {
                log::debug!("dropped {} bytes named '{}'", bytes.len(), f.name);
                self.upload(SourceRef::from_bytes(
                    (!f.name.is_empty()).then(|| f.name.clone()),
                    bytes.to_vec(),
                ));
                return;
            }
        }
        self.set_status("Drop failed: no readable bytes/path");
    }

    /// Translate pointer input into crop surface gestures. The surface
    /// itself ignores them outside crop mode.
    fn handle_crop_gestures(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        image_rect: Rect,
        scale: f32,
    ) {
        if !self.crop.is_interactive() {
            self.crop_drag = None;
            return;
        }
        let Some(region) = self.crop.region_on_screen(image_rect) else {
            return;
        };
        let grab_radius = self.config.overlay.handle_radius() + 4.0;
        let to_image = |pos: Pos2| ((pos - image_rect.min) / scale).to_pos2();

        if response.drag_started()
            && let Some(pos) = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos())
        {
            self.crop_drag = Some(match Handle::hit_test(pos, region, grab_radius) {
                Some(handle) => CropDrag::Resize(handle),
                None if region.contains(pos) => CropDrag::Region,
                None => CropDrag::Background,
            });
        }
        if response.dragged() {
            let delta = response.drag_delta() / scale;
            if delta != Vec2::ZERO {
                match self.crop_drag {
                    Some(CropDrag::Region) => self.crop.move_region(delta),
                    Some(CropDrag::Resize(handle)) => self.crop.resize_region(handle, delta),
                    Some(CropDrag::Background) => self.crop.pan_background(delta),
                    None => false,
                };
            }
        }
        if response.drag_stopped() {
            self.crop_drag = None;
        }

        if let Some(pos) = response.hover_pos() {
            let cursor = match self.crop_drag {
                Some(CropDrag::Resize(handle)) => handle.cursor(),
                Some(_) => egui::CursorIcon::Grabbing,
                None => Handle::hit_test(pos, region, grab_radius).map_or_else(
                    || {
                        if region.contains(pos) {
                            egui::CursorIcon::Move
                        } else {
                            egui::CursorIcon::Grab
                        }
                    },
                    Handle::cursor,
                ),
            };
            ui.ctx().set_cursor_icon(cursor);

            let (scroll, pinch) = ui.input(|i| (i.raw_scroll_delta.y, i.zoom_delta()));
            let factor = if (pinch - 1.0).abs() > f32::EPSILON {
                pinch
            } else if scroll.abs() > f32::EPSILON {
                ZOOM_STEP.powf(scroll / SCROLL_STEP)
            } else {
                1.0
            };
            if (factor - 1.0).abs() > f32::EPSILON {
                self.crop.zoom_background(factor, to_image(pos));
            }
        }
    }

    fn paint_crop_overlay(&self, painter: &Painter, image_rect: Rect) {
        let Some(region) = self.crop.region_on_screen(image_rect) else {
            return;
        };
        let style = &self.config.overlay;
        let interactive = self.crop.is_interactive();

        let dim = style.dim_color(!interactive);
        let outside = [
            Rect::from_min_max(image_rect.min, pos2(image_rect.max.x, region.min.y)),
            Rect::from_min_max(pos2(image_rect.min.x, region.max.y), image_rect.max),
            Rect::from_min_max(
                pos2(image_rect.min.x, region.min.y),
                pos2(region.min.x, region.max.y),
            ),
            Rect::from_min_max(
                pos2(region.max.x, region.min.y),
                pos2(image_rect.max.x, region.max.y),
            ),
        ];
        for rect in outside.into_iter().filter(|r| r.is_positive()) {
            painter.rect_filled(rect, CornerRadius::ZERO, dim);
        }

        let mut frame = style.frame.stroke();
        if !interactive {
            frame.color = frame.color.gamma_multiply(0.4);
        }
        painter.rect_stroke(region, CornerRadius::ZERO, frame, StrokeKind::Inside);
        if !interactive {
            return;
        }

        let grid = style.grid.stroke();
        for third in [1.0 / 3.0, 2.0 / 3.0] {
            let x = egui::lerp(region.left()..=region.right(), third);
            let y = egui::lerp(region.top()..=region.bottom(), third);
            painter.line_segment([pos2(x, region.top()), pos2(x, region.bottom())], grid);
            painter.line_segment([pos2(region.left(), y), pos2(region.right(), y)], grid);
        }

        let radius = style.handle_radius();
        let handle_color = style.frame.color32();
        for handle in Handle::ALL {
            let pos = handle.position(region);
            painter.circle_filled(pos, radius + 1.0, Color32::from_black_alpha(120));
            painter.circle_filled(pos, radius, handle_color);
        }
    }
}

/// Outline the view while files are dragged over the window.
fn paint_drop_hint(ui: &egui::Ui, painter: &Painter, rect: Rect) {
    let hovering = ui.input(|i| !i.raw.hovered_files.is_empty());
    if !hovering {
        return;
    }
    let stroke = egui::Stroke::new(2.0, ui.visuals().selection.stroke.color);
    painter.rect_stroke(rect.shrink(2.0), CornerRadius::same(4), stroke, StrokeKind::Inside);
}
