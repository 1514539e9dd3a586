use super::super::TonecropApp;
use egui::{Color32, RichText};

impl TonecropApp {
    pub(crate) fn ui_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("Mode: {}", self.session.mode()))
                    .small()
                    .color(Color32::from_gray(180)),
            );
            ui.separator();
            ui.label(
                RichText::new(self.session.source().display_name())
                    .small()
                    .color(Color32::from_gray(180)),
            );
            if self.session.is_changed() {
                ui.separator();
                ui.label(RichText::new("edited").small().italics());
            }
            if let Some(msg) = &self.last_status {
                ui.separator();
                ui.label(
                    RichText::new(msg.as_str())
                        .small()
                        .color(Color32::from_gray(200)),
                );
            }
        });
    }
}
