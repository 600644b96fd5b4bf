//! Conversion settings
//!
//! Options arrive either as a JS object (via `serde-wasm-bindgen`) or as a
//! JSON string. Every field has a default, so `{}` is a valid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default cap on the number of input tokens
pub const DEFAULT_MAX_TOKENS: usize = 2500;

/// Default cap on how deeply groups and command arguments may nest
pub const DEFAULT_MAX_NESTING: usize = 100;

/// Largest accepted `maxNesting`; parsing and both writers recurse once per level
pub const MAX_NESTING_CEILING: usize = 500;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid options JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("maxTokens must be greater than zero")]
    ZeroTokenLimit,
    #[error("maxNesting must be between 1 and 500, got {0}")]
    NestingLimitOutOfRange(usize),
    #[error("Invalid document class '{0}'")]
    InvalidDocumentClass(String),
    #[error("Invalid font size '{0}'")]
    InvalidFontSize(String),
}

/// How non-ASCII characters are written in MathML text content
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MathmlEncoding {
    /// Characters written as-is
    #[default]
    Raw,
    /// Non-ASCII written as `&#xNNNN;`
    Numeric,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MathmlOptions {
    pub encoding: MathmlEncoding,
    /// Use plane-1 letters for `\mathbb`, `\mathfrak`, `\mathcal`
    /// instead of a `mathvariant` attribute
    pub allow_plane1: bool,
}

/// Settings for the normalized LaTeX document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PurifiedTexOptions {
    pub document_class: String,
    pub font_size: String,
    /// Extra lines inserted into the preamble, after the package list
    pub extra_preamble: Vec<String>,
}

impl Default for PurifiedTexOptions {
    fn default() -> Self {
        Self {
            document_class: "article".to_string(),
            font_size: "12pt".to_string(),
            extra_preamble: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionOptions {
    pub mathml: MathmlOptions,
    pub purified: PurifiedTexOptions,
    pub max_tokens: usize,
    pub max_nesting: usize,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            mathml: MathmlOptions::default(),
            purified: PurifiedTexOptions::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

impl ConversionOptions {
    /// Parse and validate options from a JSON string
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: ConversionOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_tokens == 0 {
            return Err(OptionsError::ZeroTokenLimit);
        }
        if self.max_nesting == 0 || self.max_nesting > MAX_NESTING_CEILING {
            return Err(OptionsError::NestingLimitOutOfRange(self.max_nesting));
        }
        let class = &self.purified.document_class;
        if class.is_empty() || !class.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(OptionsError::InvalidDocumentClass(class.clone()));
        }
        // Lands inside `\documentclass[...]`
        let size = &self.purified.font_size;
        if size.is_empty() || !size.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
            return Err(OptionsError::InvalidFontSize(size.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let options = ConversionOptions::from_json("{}").unwrap();
        assert_eq!(options, ConversionOptions::default());
        assert_eq!(options.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(options.max_nesting, DEFAULT_MAX_NESTING);
        assert_eq!(options.purified.document_class, "article");
    }

    #[test]
    fn test_camel_case_fields() {
        let options = ConversionOptions::from_json(
            r#"{"maxTokens": 10, "mathml": {"encoding": "numeric", "allowPlane1": true},
                "purified": {"extraPreamble": ["\\usepackage{color}"]}}"#,
        )
        .unwrap();
        assert_eq!(options.max_tokens, 10);
        assert_eq!(options.mathml.encoding, MathmlEncoding::Numeric);
        assert!(options.mathml.allow_plane1);
        assert_eq!(options.purified.extra_preamble, vec!["\\usepackage{color}"]);
        assert_eq!(options.purified.font_size, "12pt");
    }

    #[test]
    fn test_validation_failures() {
        assert!(matches!(
            ConversionOptions::from_json(r#"{"maxTokens": 0}"#),
            Err(OptionsError::ZeroTokenLimit)
        ));
        assert!(matches!(
            ConversionOptions::from_json(r#"{"purified": {"documentClass": "art}icle"}}"#),
            Err(OptionsError::InvalidDocumentClass(_))
        ));
        assert!(matches!(
            ConversionOptions::from_json(r#"{"purified": {"fontSize": "12pt]{x}\\input{y}"}}"#),
            Err(OptionsError::InvalidFontSize(_))
        ));
        assert!(matches!(
            ConversionOptions::from_json(r#"{"maxNesting": 0}"#),
            Err(OptionsError::NestingLimitOutOfRange(0))
        ));
        assert!(matches!(
            ConversionOptions::from_json(r#"{"maxNesting": 501}"#),
            Err(OptionsError::NestingLimitOutOfRange(501))
        ));
        assert!(ConversionOptions::from_json(r#"{"purified": {"fontSize": "10.5pt"}}"#).is_ok());
        assert!(matches!(
            ConversionOptions::from_json("not json"),
            Err(OptionsError::InvalidJson(_))
        ));
    }
}
