//! Conversion engine contract and the built-in TeX engine
//!
//! The facade only ever talks to a [`ConversionEngine`]. Engines report
//! expected, rule-based failures as [`EngineError::Domain`] and everything
//! else through the remaining variants (or, in the worst case, by
//! panicking).

use thiserror::Error;

use crate::options::{ConversionOptions, MAX_NESTING_CEILING};
use crate::parse::grammar::{self, MathNode};
use crate::parse::tokens;
use crate::renderers::mathml::{self, MathmlError};
use crate::renderers::tex;

/// Error code reported when output is requested before any successful input
pub const NO_INPUT_PROCESSED: &str = "NoInputProcessed";

/// Structured failure raised by the engine: a stable code plus message arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}")]
pub struct TexException {
    pub code: String,
    pub args: Vec<String>,
}

impl TexException {
    pub fn new(code: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            code: code.into(),
            args,
        }
    }
}

/// Everything an engine call can fail with
#[derive(Debug, Error)]
pub enum EngineError {
    /// Expected failure from the engine's own validation
    #[error("{0}")]
    Domain(#[from] TexException),

    /// Output writer failure
    #[error(transparent)]
    Output(#[from] MathmlError),

    /// Any other internal failure
    #[error("{0}")]
    Runtime(String),
}

/// Operations the facade needs from a conversion engine
///
/// Output operations refer to the most recent successful
/// [`process_input`](ConversionEngine::process_input). Engines must be
/// `Send` so independent facades can live on different threads.
pub trait ConversionEngine: Send {
    fn process_input(&mut self, input: &str, display_style: bool) -> Result<(), EngineError>;

    /// MathML for the processed input
    fn mathml(&self) -> Result<String, EngineError>;

    /// Normalized input as a complete LaTeX document
    fn purified_tex(&self) -> Result<String, EngineError>;

    /// Normalized input, math only
    fn purified_tex_only(&self) -> Result<String, EngineError>;
}

/// Parse result retained between `process_input` and the output calls
#[derive(Debug, Clone)]
struct ProcessedInput {
    row: Vec<MathNode>,
    display_style: bool,
}

/// Built-in TeX math to MathML engine
#[derive(Debug, Clone, Default)]
pub struct TexEngine {
    options: ConversionOptions,
    processed: Option<ProcessedInput>,
}

impl TexEngine {
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            processed: None,
        }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    fn processed(&self) -> Result<&ProcessedInput, EngineError> {
        self.processed
            .as_ref()
            .ok_or_else(|| TexException::new(NO_INPUT_PROCESSED, vec![]).into())
    }
}

impl ConversionEngine for TexEngine {
    fn process_input(&mut self, input: &str, display_style: bool) -> Result<(), EngineError> {
        // A failed call must not leave the previous input looking current
        self.processed = None;

        let tokens = tokens::tokenize(input, self.options.max_tokens)?;
        // Unvalidated options still must not outgrow the stack
        let max_nesting = self.options.max_nesting.min(MAX_NESTING_CEILING);
        let row = grammar::parse_with_limit(&tokens, max_nesting)?;
        self.processed = Some(ProcessedInput { row, display_style });
        Ok(())
    }

    fn mathml(&self) -> Result<String, EngineError> {
        let processed = self.processed()?;
        Ok(mathml::to_mathml(
            &processed.row,
            processed.display_style,
            &self.options.mathml,
        )?)
    }

    fn purified_tex(&self) -> Result<String, EngineError> {
        let processed = self.processed()?;
        Ok(tex::purified_tex(
            &processed.row,
            processed.display_style,
            &self.options.purified,
        ))
    }

    fn purified_tex_only(&self) -> Result<String, EngineError> {
        let processed = self.processed()?;
        Ok(tex::purified_tex_only(&processed.row, processed.display_style))
    }
}
