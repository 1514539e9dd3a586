//! Saving rendered files into the download directory.

use crate::editor::DownloadSink;
use anyhow::Context as _;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Give up after this many `name (n).ext` candidates.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Download sink writing into a fixed directory.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DownloadDir {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        save_download(&self.dir, file_name, bytes)
    }
}

/// Write `bytes` to `dir/name`, or to `dir/stem (n).ext` when taken.
///
/// Existing files are never overwritten.
pub fn save_download(dir: &Path, name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create download folder {}", dir.display()))?;
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(candidate_name(name, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                return Ok(path);
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to create {}", path.display()));
            }
        }
    }
    anyhow::bail!("No free file name for {name} in {}", dir.display())
}

fn candidate_name(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({attempt}).{ext}"),
        _ => format!("{name} ({attempt})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("tonecrop_{label}_{nanos}"))
    }

    #[test]
    fn candidate_names_follow_browser_style() {
        assert_eq!(candidate_name("image.png", 0), "image.png");
        assert_eq!(candidate_name("image.png", 2), "image (2).png");
        assert_eq!(candidate_name("archive.tar.gz", 1), "archive.tar (1).gz");
        assert_eq!(candidate_name("README", 1), "README (1)");
        assert_eq!(candidate_name(".hidden", 1), ".hidden (1)");
    }

    #[test]
    fn creates_missing_folder_and_writes_bytes() {
        let dir = unique_temp_dir("download_create").join("nested");
        let path = save_download(&dir, "image.png", b"first").expect("save");
        assert_eq!(path, dir.join("image.png"));
        assert_eq!(fs::read(&path).expect("read"), b"first");
        let _ = fs::remove_dir_all(dir.parent().unwrap_or(&dir));
    }

    #[test]
    fn never_overwrites_existing_downloads() {
        let dir = unique_temp_dir("download_unique");
        let mut sink = DownloadDir::new(&dir);
        let first = sink.save("image.png", b"one").expect("first");
        let second = sink.save("image.png", b"two").expect("second");
        let third = sink.save("image.png", b"three").expect("third");
        assert_eq!(first, dir.join("image.png"));
        assert_eq!(second, dir.join("image (1).png"));
        assert_eq!(third, dir.join("image (2).png"));
        assert_eq!(fs::read(&first).expect("read"), b"one");
        assert_eq!(fs::read(&third).expect("read"), b"three");
        let _ = fs::remove_dir_all(&dir);
    }
}
