//! Boundary-safe TeX to MathML WASM Module
//!
//! Wraps a TeX math conversion engine behind a facade whose every operation
//! returns a value-copied [`Outcome`]: success, or one of two failure kinds
//! ([`DomainError`], [`GenericError`]). No engine error or panic crosses the
//! facade, and no returned value borrows from the engine.

pub mod api;
pub mod engine;
pub mod facade;
pub mod messages;
pub mod models;
pub mod options;
pub mod parse;
pub mod renderers;

// Re-export commonly used types
pub use engine::{ConversionEngine, EngineError, TexEngine, TexException};
pub use facade::{ConversionFacade, InputState};
pub use models::*;
pub use options::{ConversionOptions, MathmlEncoding, MathmlOptions, PurifiedTexOptions};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed, which is fine
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("TeX conversion WASM module initialized");
}
