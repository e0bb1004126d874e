//! Aquarium Editor - Browser aquarium scene editor
//!
//! Set tank dimensions, scatter gravel and plants, and swap in your own
//! gravel texture or plant model. Runs as a WASM module on `#aquarium-canvas`.

mod app;
mod file_picker;
mod ui;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    app::run();
}
