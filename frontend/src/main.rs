#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use pathgrid::{GridConfig, Visualizer};

mod app;

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // an optional JSON configuration as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };
    let visualizer = Visualizer::new(config)?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 560.0])
            .with_min_inner_size([400.0, 240.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Pathfinding Visualizer",
        native_options,
        Box::new(|cc| Box::new(app::App::new(cc, visualizer))),
    )?;

    Ok(())
}

// When compiling to web using trunk:
#[cfg(target_arch = "wasm32")]
fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    console_error_panic_hook::set_once();

    let visualizer = match Visualizer::new(GridConfig::default()) {
        Ok(visualizer) => visualizer,
        Err(e) => {
            log::error!("invalid grid configuration: {e}");
            return;
        }
    };

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = eframe::WebRunner::new()
            .start(
                "the_canvas_id", // hardcode it
                web_options,
                Box::new(|cc| Box::new(app::App::new(cc, visualizer))),
            )
            .await
        {
            log::error!("failed to start eframe: {e:?}");
        }
    });
}
