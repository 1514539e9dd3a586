//! eframe application: wires the editor session to the crop and preview
//! surfaces and draws the widget.

use crate::config::AppConfig;
use crate::download::DownloadDir;
use crate::editor::{DownloadOutcome, EditorSession, Mode, SessionEvent, SourceRef};
use crate::surface::{CropSurface, Handle, PreviewSurface, SurfaceTexture};
use egui::{Context, Key};
use egui_file_dialog::{DialogState, FileDialog};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

mod image_loader;
#[cfg(test)]
mod tests;
mod ui;

struct PendingImageTask {
    rx: Receiver<ImageLoadResult>,
    source: SourceRef,
}

enum ImageLoadResult {
    Success(RgbaImage),
    Error(String),
}

/// Gesture in progress on the crop view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CropDrag {
    Region,
    Resize(Handle),
    Background,
}

pub struct TonecropApp {
    config: AppConfig,
    session: EditorSession,
    crop: CropSurface,
    preview: PreviewSurface,
    crop_texture: SurfaceTexture,
    preview_texture: SurfaceTexture,
    pending_image_task: Option<PendingImageTask>,
    upload_dialog: Option<FileDialog>,
    last_image_dir: Option<PathBuf>,
    crop_drag: Option<CropDrag>,
    last_status: Option<String>,
}

impl TonecropApp {
    pub fn new(config: AppConfig, initial_source: SourceRef) -> Self {
        let output = config.effective_output_size();
        let mut app = Self {
            session: EditorSession::new(initial_source.clone(), output),
            crop: CropSurface::new(output),
            preview: PreviewSurface::new(config.effective_preview_width(), output),
            crop_texture: SurfaceTexture::new("crop_surface"),
            preview_texture: SurfaceTexture::new("preview_surface"),
            pending_image_task: None,
            upload_dialog: None,
            last_image_dir: None,
            crop_drag: None,
            last_status: None,
            config,
        };
        app.start_image_load(initial_source);
        app
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.last_status = Some(msg.into());
    }

    /// Forward session notifications to the surfaces, then let the preview
    /// pull from the crop surface if it reported a change. Returns whether the
    /// preview was refreshed.
    fn sync_surfaces(&mut self) -> bool {
        for event in self.session.take_events() {
            match event {
                SessionEvent::ModeChanged(mode) => {
                    log::debug!("mode changed to {mode}");
                    let enabled = self.session.crop_enabled();
                    self.crop.set_interactive(enabled);
                    if !enabled {
                        self.crop_drag = None;
                    }
                }
                SessionEvent::AdjustmentsChanged(adjustments) => {
                    self.crop.set_adjustments(adjustments);
                }
                SessionEvent::SourceReplaced(source) => {
                    self.crop.unmount();
                    self.start_image_load(source);
                }
            }
        }
        if !self.crop.take_update() {
            return false;
        }
        self.preview.refresh(&self.crop);
        true
    }

    fn select_mode(&mut self, mode: Mode) {
        self.session.set_mode(mode);
    }

    fn upload(&mut self, source: SourceRef) {
        if let Some(dir) = source.path().and_then(|p| p.parent()) {
            self.last_image_dir = Some(dir.to_path_buf());
        }
        self.session.upload(source);
    }

    fn reset(&mut self) {
        self.session.reset();
        self.set_status("Edits reset.");
    }

    fn download(&mut self) {
        let mut sink = DownloadDir::new(self.config.effective_download_dir());
        match self.session.download(&self.crop, &mut sink) {
            Ok(DownloadOutcome::Saved(path)) => {
                self.set_status(format!("Saved {}", path.display()));
            }
            Ok(DownloadOutcome::NotReady) if self.pending_image_task.is_some() => {
                self.set_status("Nothing to download yet: the image is still loading.");
            }
            Ok(DownloadOutcome::NotReady) => {
                self.set_status("Nothing to download: no image is loaded.");
            }
            Err(err) => {
                log::error!("download failed: {err:#}");
                self.set_status(format!("Download failed: {err:#}"));
            }
        }
    }

    fn open_upload_dialog(&mut self) {
        let mut dialog = ui::make_open_dialog(self.last_image_dir.as_deref());
        dialog.pick_file();
        self.upload_dialog = Some(dialog);
    }

    fn handle_hotkeys(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let dialog_open = self.upload_dialog.is_some();
        // Ctrl/Cmd + O: upload
        if !dialog_open && ctx.input(|i| i.key_pressed(Key::O) && i.modifiers.command) {
            self.open_upload_dialog();
        }
        // Ctrl/Cmd + S: download
        if !dialog_open && ctx.input(|i| i.key_pressed(Key::S) && i.modifiers.command) {
            self.download();
        }
        // Ctrl/Cmd + R: reset
        if ctx.input(|i| i.key_pressed(Key::R) && i.modifiers.command) {
            self.reset();
        }
        if !dialog_open && ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.select_mode(Mode::Crop);
        }
        const MODE_KEYS: [Key; 5] = [Key::Num1, Key::Num2, Key::Num3, Key::Num4, Key::Num5];
        for (key, mode) in MODE_KEYS.into_iter().zip(Mode::ALL) {
            if ctx.input(|i| i.key_pressed(key) && i.modifiers.is_none()) {
                self.select_mode(mode);
            }
        }
    }

    fn update_upload_dialog(&mut self, ctx: &Context) {
        let Some(dialog) = self.upload_dialog.as_mut() else {
            return;
        };
        dialog.update(ctx);
        if let Some(path) = dialog.take_picked() {
            self.upload_dialog = None;
            self.upload(SourceRef::Path(path));
            return;
        }
        match dialog.state() {
            DialogState::Cancelled => {
                self.upload_dialog = None;
                self.set_status("Upload canceled.");
            }
            DialogState::Closed => self.upload_dialog = None,
            _ => {}
        }
    }
}

impl eframe::App for TonecropApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader();
        self.handle_hotkeys(ctx);
        self.sync_surfaces();

        #[allow(clippy::cast_precision_loss)]
        let preview_width = self.preview.size().width as f32;
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.ui_status_bar(ui));
        egui::TopBottomPanel::bottom("navigation").show(ctx, |ui| self.ui_navigation(ui));
        egui::SidePanel::right("preview")
            .resizable(false)
            .exact_width(preview_width + 24.0)
            .show(ctx, |ui| self.ui_preview(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.ui_crop_view(ui));
        self.update_upload_dialog(ctx);

        // Gestures and slider moves from this frame reach the preview on
        // the next pass.
        if self.sync_surfaces() {
            ctx.request_repaint();
        }

        if self.pending_image_task.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(30));
        }
    }
}
