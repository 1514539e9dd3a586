use std::fs;
use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs, UserDirs};
use egui::{Color32, Stroke};
use serde::Deserialize;

use crate::editor::{DEFAULT_SOURCE_URL, OutputSize};

const CONFIG_FILE_NAME: &str = "tonecrop.toml";

fn alpha_to_u8(alpha: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub color: [u8; 3],
    pub alpha: f32,
    pub thickness: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: [255, 255, 255],
            alpha: 1.0,
            thickness: 1.5,
        }
    }
}

impl StrokeStyle {
    pub fn color32(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(
            self.color[0],
            self.color[1],
            self.color[2],
            alpha_to_u8(self.alpha),
        )
    }

    pub fn stroke(&self) -> Stroke {
        Stroke {
            width: self.thickness.max(0.1),
            color: self.color32(),
        }
    }
}

/// Look of the crop overlay drawn over the source image.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Darkening outside the crop region while cropping.
    pub dim_alpha: f32,
    /// Darkening outside the crop region in adjustment modes.
    pub faded_alpha: f32,
    pub frame: StrokeStyle,
    pub grid: StrokeStyle,
    pub handle_radius: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            dim_alpha: 0.55,
            faded_alpha: 0.85,
            frame: StrokeStyle::default(),
            grid: StrokeStyle {
                color: [255, 255, 255],
                alpha: 0.45,
                thickness: 1.0,
            },
            handle_radius: 5.0,
        }
    }
}

impl OverlayStyle {
    pub fn dim_color(&self, faded: bool) -> Color32 {
        let alpha = if faded {
            self.faded_alpha
        } else {
            self.dim_alpha
        };
        Color32::from_black_alpha(alpha_to_u8(alpha))
    }

    pub const fn handle_radius(&self) -> f32 {
        self.handle_radius.clamp(2.0, 16.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub initial_source: String,
    pub output: OutputSize,
    pub preview_width: u32,
    pub download_dir: Option<PathBuf>,
    pub image_limits: ImageLimits,
    pub overlay: OverlayStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_source: DEFAULT_SOURCE_URL.to_string(),
            output: OutputSize::default(),
            preview_width: 360,
            download_dir: None,
            image_limits: ImageLimits::default(),
            overlay: OverlayStyle::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = fs::read_to_string(&path) {
                match Self::parse(&contents) {
                    Ok(cfg) => {
                        log::info!("loaded config from {}", path.display());
                        return cfg;
                    }
                    Err(err) => {
                        log::warn!("Failed to parse config {}: {err}", path.display());
                    }
                }
            }
        }
        Self::default()
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(contents)
    }

    pub fn effective_output_size(&self) -> OutputSize {
        self.output.sanitized()
    }

    pub fn effective_preview_width(&self) -> u32 {
        self.preview_width.clamp(64, 1024)
    }

    pub fn effective_image_limits(&self) -> ImageLimits {
        self.image_limits.sanitized()
    }

    /// Configured download directory, else the user's, else the working dir.
    pub fn effective_download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe()
            && let Some(dir) = exe_path.parent()
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "Tonecrop", "Tonecrop") {
            paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(base_dirs.config_dir().join("tonecrop").join(CONFIG_FILE_NAME));
        }

        paths
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageLimits {
    pub image_dim: u32,
    pub total_pixels: u64,
    pub alloc_bytes: u64,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            image_dim: 12_000,
            total_pixels: 80_000_000,       // ~80 MP
            alloc_bytes: 512 * 1024 * 1024, // 512 MiB
        }
    }
}

impl ImageLimits {
    pub fn sanitized(&self) -> Self {
        let dim = self.image_dim.clamp(64, 100_000);
        let pixels = self.total_pixels.clamp(1_000_000, 5_000_000_000); // 1 MP .. 5 GP
        let alloc = self
            .alloc_bytes
            .clamp(8 * 1024 * 1024, 8 * 1024 * 1024 * 1024); // 8 MiB .. 8 GiB
        Self {
            image_dim: dim,
            total_pixels: pixels,
            alloc_bytes: alloc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::parse("").expect("parse");
        assert_eq!(cfg.initial_source, DEFAULT_SOURCE_URL);
        assert_eq!(cfg.effective_output_size(), OutputSize::new(1400, 560));
        assert_eq!(cfg.effective_preview_width(), 360);
        assert!(cfg.download_dir.is_none());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = AppConfig::parse(
            r#"
            initial_source = "/photos/beach.jpg"
            download_dir = "/tmp/out"

            [output]
            width = 800

            [overlay.grid]
            alpha = 0.2
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.initial_source, "/photos/beach.jpg");
        assert_eq!(cfg.output, OutputSize::new(800, 560));
        assert_eq!(cfg.effective_download_dir(), PathBuf::from("/tmp/out"));
        assert!((cfg.overlay.grid.alpha - 0.2).abs() <= f32::EPSILON);
        assert!((cfg.overlay.dim_alpha - 0.55).abs() <= f32::EPSILON);
    }

    #[test]
    fn out_of_range_values_are_sanitized() {
        let cfg = AppConfig::parse(
            r"
            preview_width = 5

            [output]
            width = 0
            height = 99999

            [image_limits]
            image_dim = 1
            ",
        )
        .expect("parse");
        assert_eq!(cfg.effective_output_size(), OutputSize::new(16, 16_384));
        assert_eq!(cfg.effective_preview_width(), 64);
        assert_eq!(cfg.effective_image_limits().image_dim, 64);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(AppConfig::parse("preview_width = \"wide\"").is_err());
    }
}
