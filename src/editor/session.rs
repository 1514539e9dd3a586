use super::{Adjustments, Channel, Mode};
use crate::image::encode_png;
use image::RgbaImage;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stock photo shown until the user uploads something else.
pub const DEFAULT_SOURCE_URL: &str = "https://images.unsplash.com/photo-1516974409143-b067ec3e0ec8";
pub const DOWNLOAD_FILE_NAME: &str = "image.png";

/// Pixel size of the rendered export; also fixes the crop aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl Default for OutputSize {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 560,
        }
    }
}

impl OutputSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn sanitized(self) -> Self {
        Self {
            width: self.width.clamp(16, 16_384),
            height: self.height.clamp(16, 16_384),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(self) -> f32 {
        let height = self.height.max(1);
        self.width as f32 / height as f32
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Reference to the image currently being edited.
#[derive(Clone, PartialEq, Eq)]
pub enum SourceRef {
    Url(String),
    Path(PathBuf),
    Bytes {
        name: Option<String>,
        bytes: Arc<[u8]>,
    },
}

impl SourceRef {
    /// Interpret a command-line or config value as a URL or a filesystem path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if ["http://", "https://", "file://"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
        {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    pub fn from_bytes(name: Option<String>, bytes: Vec<u8>) -> Self {
        Self::Bytes {
            name,
            bytes: bytes.into(),
        }
    }

    /// Short human-readable name for status messages.
    pub fn display_name(&self) -> String {
        match self {
            Self::Url(url) => url
                .rsplit('/')
                .find(|segment| !segment.is_empty())
                .unwrap_or(url.as_str())
                .to_string(),
            Self::Path(path) => path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or_else(|| path.display().to_string(), str::to_string),
            Self::Bytes { name, .. } => name
                .as_deref()
                .map_or_else(|| "dropped bytes".to_string(), str::to_string),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Url(_) | Self::Bytes { .. } => None,
        }
    }
}

impl Default for SourceRef {
    fn default() -> Self {
        Self::Url(DEFAULT_SOURCE_URL.to_string())
    }
}

impl fmt::Debug for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Bytes { name, bytes } => f
                .debug_struct("Bytes")
                .field("name", name)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

/// Notification queued by every session mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ModeChanged(Mode),
    AdjustmentsChanged(Adjustments),
    SourceReplaced(SourceRef),
}

/// Something that can rasterize the current crop with adjustments applied.
pub trait CanvasSource {
    /// `None` until an image is mounted and renderable.
    fn canvas(&self, size: OutputSize) -> Option<RgbaImage>;
}

/// Destination for downloaded files.
pub trait DownloadSink {
    /// Store `bytes` under `file_name` and return where they ended up.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    /// The crop surface had nothing to render; nothing was written.
    NotReady,
}

/// Mode, adjustments and source of one editing session.
#[derive(Debug)]
pub struct EditorSession {
    mode: Mode,
    adjustments: Adjustments,
    source: SourceRef,
    output_size: OutputSize,
    events: Vec<SessionEvent>,
}

impl EditorSession {
    pub fn new(source: SourceRef, output_size: OutputSize) -> Self {
        Self {
            mode: Mode::Crop,
            adjustments: Adjustments::default(),
            source,
            output_size,
            events: Vec::new(),
        }
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    pub const fn source(&self) -> &SourceRef {
        &self.source
    }

    pub const fn output_size(&self) -> OutputSize {
        self.output_size
    }

    pub const fn active_channel(&self) -> Option<Channel> {
        self.mode.channel()
    }

    /// Crop interactions are only live in crop mode.
    pub const fn crop_enabled(&self) -> bool {
        self.mode.is_crop()
    }

    pub fn is_changed(&self) -> bool {
        self.adjustments.is_changed()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        log::debug!("mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.events.push(SessionEvent::ModeChanged(mode));
    }

    /// Write `value` into the active channel. Returns `false` in crop mode.
    pub fn set_adjustment(&mut self, value: f32) -> bool {
        let Some(channel) = self.mode.channel() else {
            return false;
        };
        self.adjustments.set(channel, value);
        self.events
            .push(SessionEvent::AdjustmentsChanged(self.adjustments));
        true
    }

    pub fn reset(&mut self) {
        log::info!("resetting mode and adjustments");
        self.mode = Mode::Crop;
        self.adjustments = Adjustments::default();
        self.events.push(SessionEvent::ModeChanged(self.mode));
        self.events
            .push(SessionEvent::AdjustmentsChanged(self.adjustments));
    }

    pub fn upload(&mut self, source: SourceRef) {
        self.reset();
        log::info!("uploading {}", source.display_name());
        self.source = source.clone();
        self.events.push(SessionEvent::SourceReplaced(source));
    }

    /// Render the crop at the output size and hand a PNG to `sink`.
    ///
    /// Returns [`DownloadOutcome::NotReady`] without touching `sink` when the
    /// surface cannot render yet.
    pub fn download<C, S>(&self, surface: &C, sink: &mut S) -> anyhow::Result<DownloadOutcome>
    where
        C: CanvasSource + ?Sized,
        S: DownloadSink + ?Sized,
    {
        let Some(canvas) = surface.canvas(self.output_size) else {
            log::debug!("download skipped: crop surface not ready");
            return Ok(DownloadOutcome::NotReady);
        };
        let png = encode_png(&canvas)?;
        let path = sink.save(DOWNLOAD_FILE_NAME, &png)?;
        log::info!("downloaded {} to {}", self.output_size, path.display());
        Ok(DownloadOutcome::Saved(path))
    }

    /// Drain queued notifications in the order they were raised.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SourceRef::default(), OutputSize::default())
    }
}
