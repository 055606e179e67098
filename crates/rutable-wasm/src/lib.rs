mod api;
mod render;

pub use api::DataGrid;

use wasm_bindgen::prelude::*;

/// Install the panic hook and route `tracing` output to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}
