mod app;
mod config;
mod download;
mod editor;
mod image;
mod surface;

use app::TonecropApp;
use config::AppConfig;
use editor::SourceRef;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    let initial_source = std::env::args().nth(1).map_or_else(
        || SourceRef::parse(&config.initial_source),
        |arg| SourceRef::parse(&arg),
    );
    log::info!("starting with {}", initial_source.display_name());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Tonecrop",
        native_options,
        Box::new(move |_cc| Ok(Box::new(TonecropApp::new(config, initial_source)))),
    )
}
