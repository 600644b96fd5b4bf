//! Renderers module for parsed TeX math
//!
//! Output writers that turn the parse tree into MathML markup or into
//! normalized TeX source.

pub mod mathml;
pub mod tex;

// Re-export commonly used functions
pub use mathml::{to_mathml, MathmlError};
pub use tex::{purified_tex, purified_tex_only};
