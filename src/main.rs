//! comicview — a minimal desktop viewer for xkcd comics

mod app;
mod fetch;
mod loader;
mod store;

use app::ComicViewApp;
use eframe::NativeOptions;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([780.0, 640.0])
            .with_title("comicview"),
        ..Default::default()
    };
    eframe::run_native(
        "comicview",
        options,
        Box::new(|cc| Box::new(ComicViewApp::new(cc))),
    )
}
