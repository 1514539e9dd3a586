use super::{ImageLoadResult, PendingImageTask, TonecropApp};
use crate::editor::SourceRef;
use crate::image::decode_source;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

impl TonecropApp {
    /// Decode `source` on a worker thread. A newer request supersedes any
    /// load still in flight.
    pub(super) fn start_image_load(&mut self, source: SourceRef) {
        let description = source.display_name();
        let cfg = self.config.clone();
        let request = source.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let msg = match decode_source(&cfg, &request) {
                Ok(image) => ImageLoadResult::Success(image),
                Err(err) => ImageLoadResult::Error(format!("{err:#}")),
            };
            let _ = tx.send(msg);
        });
        self.pending_image_task = Some(PendingImageTask { rx, source });
        self.set_status(format!("Loading {description}…"));
    }

    pub(super) fn poll_image_loader(&mut self) {
        let Some(task) = self.pending_image_task.take() else {
            return;
        };
        match task.rx.try_recv() {
            Ok(ImageLoadResult::Success(image)) => {
                let label = task.source.display_name();
                log::info!("loaded {label} ({}x{})", image.width(), image.height());
                self.crop.mount(image);
                self.set_status(format!("Loaded {label}"));
            }
            Ok(ImageLoadResult::Error(err)) => {
                let label = task.source.display_name();
                log::warn!("failed to load {label}: {err}");
                self.set_status(format!("Failed to load {label}: {err}"));
            }
            Err(TryRecvError::Empty) => {
                self.pending_image_task = Some(task);
            }
            Err(TryRecvError::Disconnected) => {
                let label = task.source.display_name();
                self.set_status(format!("Loading {label} failed: worker disconnected."));
            }
        }
    }
}
