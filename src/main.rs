//! TableMorph - CSV/Excel Data Cleaning, Conversion & Comparison Tool
//!
//! A Rust application for cleaning tabular files, converting between
//! formats and comparing uploads for equality.

mod charts;
mod convert;
mod data;
mod gui;

use eframe::egui;
use gui::TableMorphApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1000.0, 640.0])
            .with_title("TableMorph"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "TableMorph",
        options,
        Box::new(|cc| Ok(Box::new(TableMorphApp::new(cc)))),
    )
}
