use super::*;
use crate::image::encode_png;
use egui::vec2;
use image::Rgba;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

fn unique_temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("tonecrop_app_{label}_{nanos}"))
}

fn png_source(width: u32, height: u32) -> SourceRef {
    let image = RgbaImage::from_pixel(width, height, Rgba([90, 120, 200, 255]));
    let bytes = encode_png(&image).expect("encode");
    SourceRef::from_bytes(Some("swatch.png".to_string()), bytes)
}

fn wait_for_load(app: &mut TonecropApp) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while app.pending_image_task.is_some() {
        assert!(Instant::now() < deadline, "image load timed out");
        std::thread::sleep(Duration::from_millis(5));
        app.poll_image_loader();
    }
}

/// App with a decoded image and all startup notifications consumed.
fn loaded_app() -> TonecropApp {
    let mut app = TonecropApp::new(AppConfig::default(), png_source(500, 200));
    wait_for_load(&mut app);
    assert!(app.crop.is_mounted());
    app.sync_surfaces();
    assert!(app.preview.pixels().is_some());
    app
}

#[test]
fn leaving_crop_mode_disables_gestures_and_drops_the_drag() {
    let mut app = loaded_app();
    let refreshes = app.preview.refresh_count();
    app.crop_drag = Some(CropDrag::Resize(Handle::TopLeft));

    app.select_mode(Mode::Saturation);
    assert!(!app.sync_surfaces());
    assert!(!app.crop.is_interactive());
    assert_eq!(app.crop_drag, None);
    assert_eq!(app.preview.refresh_count(), refreshes);
    assert!(!app.crop.move_region(vec2(5.0, 5.0)));

    app.select_mode(Mode::Crop);
    app.sync_surfaces();
    assert!(app.crop.is_interactive());
}

#[test]
fn adjustment_change_refreshes_preview_once() {
    let mut app = loaded_app();
    app.select_mode(Mode::Brightness);
    app.sync_surfaces();
    let refreshes = app.preview.refresh_count();

    assert!(app.session.set_adjustment(0.3));
    assert!(app.session.set_adjustment(0.4));
    assert!(app.sync_surfaces());
    assert_eq!(app.preview.refresh_count(), refreshes + 1);
    assert!((app.crop.adjustments().brightness - 0.4).abs() < f32::EPSILON);

    assert!(!app.sync_surfaces());
    assert_eq!(app.preview.refresh_count(), refreshes + 1);
}

#[test]
fn replacing_the_source_unmounts_and_starts_a_load() {
    let mut app = loaded_app();
    app.select_mode(Mode::Hue);
    app.sync_surfaces();
    let refreshes = app.preview.refresh_count();

    app.upload(png_source(300, 300));
    assert!(app.sync_surfaces());
    assert!(!app.crop.is_mounted());
    assert!(app.crop.is_interactive());
    assert!(app.pending_image_task.is_some());
    assert_eq!(app.preview.refresh_count(), refreshes + 1);
    assert!(app.preview.pixels().is_none());

    wait_for_load(&mut app);
    assert_eq!(app.crop.image_size(), Some(vec2(300.0, 300.0)));
    assert!(app.sync_surfaces());
    assert!(app.preview.pixels().is_some());
}

#[test]
fn download_status_tells_loading_from_missing() {
    let config = AppConfig {
        download_dir: Some(unique_temp_dir("not_ready")),
        ..AppConfig::default()
    };
    let mut app = TonecropApp::new(config, png_source(40, 16));
    assert!(app.pending_image_task.is_some());
    app.download();
    let status = app.last_status.clone().expect("status");
    assert!(status.contains("still loading"), "{status}");

    wait_for_load(&mut app);
    app.upload(SourceRef::Path(unique_temp_dir("missing").join("gone.png")));
    app.sync_surfaces();
    wait_for_load(&mut app);
    assert!(!app.crop.is_mounted());
    app.download();
    let status = app.last_status.clone().expect("status");
    assert!(status.contains("no image is loaded"), "{status}");
}

#[test]
fn download_writes_image_png() {
    let dir = unique_temp_dir("saved");
    let config = AppConfig {
        download_dir: Some(dir.clone()),
        ..AppConfig::default()
    };
    let mut app = TonecropApp::new(config, png_source(500, 200));
    wait_for_load(&mut app);
    app.download();
    let saved = dir.join("image.png");
    assert!(saved.exists());
    let decoded = image::open(&saved).expect("decode");
    assert_eq!((decoded.width(), decoded.height()), (1400, 560));
    let _ = std::fs::remove_dir_all(&dir);
}
