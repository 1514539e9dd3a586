use super::super::TonecropApp;
use super::icons;
use crate::editor::Mode;

const fn mode_icon(mode: Mode) -> &'static str {
    match mode {
        Mode::Crop => icons::ICON_CROP,
        Mode::Brightness => icons::ICON_BRIGHTNESS,
        Mode::Hue => icons::ICON_HUE,
        Mode::Saturation => icons::ICON_SATURATION,
        Mode::Contrast => icons::ICON_CONTRAST,
    }
}

impl TonecropApp {
    /// Mode buttons flanked by the upload and download triggers.
    pub(crate) fn ui_navigation(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new(format!("{} Upload", icons::ICON_UPLOAD)).shortcut_text("Ctrl+O"))
                .on_hover_text("Upload an image (Ctrl+O). You can also drag & drop onto the image.")
                .clicked()
            {
                self.open_upload_dialog();
            }
            ui.separator();

            let mut selected = self.session.mode();
            for (idx, mode) in Mode::ALL.into_iter().enumerate() {
                let label = format!("{} {}", mode_icon(mode), mode.label());
                if ui
                    .selectable_value(&mut selected, mode, label)
                    .on_hover_text(format!("Key {}", idx + 1))
                    .clicked()
                {
                    self.select_mode(mode);
                }
            }
            ui.separator();

            if ui
                .add(egui::Button::new(format!("{} Download", icons::ICON_DOWNLOAD)).shortcut_text("Ctrl+S"))
                .on_hover_text("Save the cropped image as image.png in the download folder")
                .clicked()
            {
                self.download();
            }
        });
    }
}
