//! PathWalker — directory file count and size scanner.
//!
//! Thin binary entry point. All logic lives in the `pathwalker-core`
//! and `pathwalker-gui` crates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("PathWalker starting");

    // An optional first argument pre-fills the path field.
    let initial_path = pathwalker_gui::state::initial_path_from_args(std::env::args());

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("PathWalker")
            .with_inner_size([750.0, 430.0])
            .with_min_inner_size([600.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PathWalker",
        options,
        Box::new(|cc| Ok(Box::new(pathwalker_gui::PathWalkerApp::new(cc, initial_path)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
