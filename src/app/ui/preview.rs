use super::super::TonecropApp;
use super::icons;
use egui::{Color32, RichText, Sense, vec2};

impl TonecropApp {
    pub(crate) fn ui_preview(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.heading("Preview");
        ui.add_space(4.0);

        let size = self.preview.size();
        #[allow(clippy::cast_precision_loss)]
        let display = vec2(size.width as f32, size.height as f32);
        let generation = self.preview.refresh_count();
        match self
            .preview_texture
            .sync(ui.ctx(), generation, self.preview.pixels())
        {
            Some(texture) => {
                ui.add(egui::Image::new((texture.id(), display)));
            }
            None => {
                let (rect, _) = ui.allocate_exact_size(display, Sense::hover());
                ui.painter().rect_filled(rect, 3.0, Color32::from_gray(40));
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No image",
                    egui::FontId::proportional(13.0),
                    Color32::from_gray(150),
                );
            }
        }
        ui.label(
            RichText::new(format!("Output {}", self.session.output_size()))
                .small()
                .color(Color32::from_gray(160)),
        );

        ui.separator();
        self.ui_adjustment_slider(ui);

        if self.session.is_changed() {
            ui.add_space(8.0);
            if ui
                .add(egui::Button::new(format!("{} Reset", icons::ICON_RESET)).shortcut_text("Ctrl+R"))
                .on_hover_text("Back to crop mode with all adjustments cleared")
                .clicked()
            {
                self.reset();
            }
        }
    }

    /// Slider for the active channel; absent in crop mode.
    fn ui_adjustment_slider(&mut self, ui: &mut egui::Ui) {
        let Some(channel) = self.session.active_channel() else {
            ui.label(
                RichText::new("Drag the frame to crop. Scroll to zoom, drag outside to pan.")
                    .small()
                    .color(Color32::from_gray(170)),
            );
            return;
        };
        let mut value = self.session.adjustments().get(channel);
        let response = ui.add(
            egui::Slider::new(&mut value, -1.0..=1.0)
                .text(channel.label())
                .step_by(0.01)
                .fixed_decimals(2),
        );
        if response.changed() {
            self.session.set_adjustment(value);
        }
        if response.double_clicked() {
            self.session.set_adjustment(0.0);
        }
    }
}
