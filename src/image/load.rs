use crate::config::AppConfig;
use crate::editor::SourceRef;
use anyhow::Context as _;
use image::{ImageReader, Limits, RgbaImage};
use std::io::{BufRead, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

fn decode_reader_to_rgba<R>(cfg: &AppConfig, mut reader: ImageReader<R>) -> anyhow::Result<RgbaImage>
where
    R: Read + Seek + BufRead,
{
    let il = cfg.effective_image_limits();
    let mut limits = Limits::default();
    limits.max_image_width = Some(il.image_dim);
    limits.max_image_height = Some(il.image_dim);
    limits.max_alloc = Some(il.alloc_bytes);
    reader.limits(limits);
    let img = reader.decode().context("Failed to decode image data")?;

    let (w, h) = (img.width(), img.height());
    let total_pixels = u64::from(w) * u64::from(h);
    if total_pixels > il.total_pixels {
        anyhow::bail!(
            "Image too large: {}x{} (~{} MP) exceeds limit (~{} MP)",
            w,
            h,
            total_pixels / 1_000_000,
            il.total_pixels / 1_000_000
        );
    }
    if w == 0 || h == 0 {
        anyhow::bail!("Image is empty");
    }

    Ok(img.to_rgba8())
}

/// Load and decode an image from a filesystem path using configured limits.
fn decode_image_from_path(cfg: &AppConfig, path: &Path) -> anyhow::Result<RgbaImage> {
    let reader = ImageReader::open(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .with_guessed_format()
        .context("Failed to detect image format")?;
    decode_reader_to_rgba(cfg, reader)
}

/// Load and decode an image from raw bytes using configured limits.
fn decode_image_from_bytes(cfg: &AppConfig, bytes: &[u8]) -> anyhow::Result<RgbaImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Failed to detect image format")?;
    decode_reader_to_rgba(cfg, reader)
}

/// Decode whatever a [`SourceRef`] points at.
///
/// Only local sources are read: `file://` URLs map to paths, other URL
/// schemes are rejected.
pub fn decode_source(cfg: &AppConfig, source: &SourceRef) -> anyhow::Result<RgbaImage> {
    match source {
        SourceRef::Path(path) => decode_image_from_path(cfg, path),
        SourceRef::Bytes { bytes, .. } => decode_image_from_bytes(cfg, bytes),
        SourceRef::Url(url) => {
            let path = file_url_to_path(url)
                .with_context(|| format!("Remote images are not fetched: {url}"))?;
            decode_image_from_path(cfg, &path)
        }
    }
}

fn file_url_to_path(url: &str) -> Option<PathBuf> {
    let scheme_len = "file://".len();
    let scheme = url.get(..scheme_len)?;
    if !scheme.eq_ignore_ascii_case("file://") {
        return None;
    }
    let rest = &url[scheme_len..];
    // Drop an explicit `localhost` authority.
    let rest = rest.strip_prefix("localhost").unwrap_or(rest);
    (!rest.is_empty()).then(|| PathBuf::from(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::encode_png;
    use image::Rgba;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([9, 8, 7, 255]));
        encode_png(&image).expect("encode")
    }

    #[test]
    fn decodes_bytes_source() {
        let cfg = AppConfig::default();
        let source = SourceRef::from_bytes(Some("a.png".to_string()), png_bytes(6, 4));
        let image = decode_source(&cfg, &source).expect("decode");
        assert_eq!(image.dimensions(), (6, 4));
        assert_eq!(image.get_pixel(0, 0).0, [9, 8, 7, 255]);
    }

    #[test]
    fn rejects_garbage_bytes() {
        let cfg = AppConfig::default();
        assert!(decode_image_from_bytes(&cfg, b"definitely not an image").is_err());
    }

    #[test]
    fn rejects_remote_urls() {
        let cfg = AppConfig::default();
        let err = decode_source(&cfg, &SourceRef::default()).expect_err("remote url");
        assert!(err.to_string().contains("Remote images are not fetched"));
    }

    #[test]
    fn file_urls_map_to_paths() {
        assert_eq!(
            file_url_to_path("file:///tmp/a.png"),
            Some(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            file_url_to_path("FILE://localhost/tmp/b.png"),
            Some(PathBuf::from("/tmp/b.png"))
        );
        assert_eq!(file_url_to_path("https://example.com/a.png"), None);
        assert_eq!(file_url_to_path("file://"), None);
    }

    #[test]
    fn missing_file_reports_path() {
        let cfg = AppConfig::default();
        let path = std::env::temp_dir().join("tonecrop_missing_image_for_test.png");
        let err = decode_image_from_path(&cfg, &path).expect_err("missing");
        assert!(err.to_string().contains("Failed to read"));
    }
}
