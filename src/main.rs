mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::YtDatApp;
use clap::Parser;
use eframe::egui;

/// Filter and explore YouTube video statistics exported as CSV.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// CSV file to open at startup.
    path: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "YouTube Video Data Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(YtDatApp::new(args.path.as_deref())))),
    )
}
