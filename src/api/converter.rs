//! `TexConverter`: the conversion facade as a JavaScript class
//!
//! Each JS instance owns its own facade and engine. JS strings arrive as
//! UTF-16 and are converted by wasm-bindgen, so any input text can be
//! passed in; the engine decides what it accepts.

use wasm_bindgen::prelude::*;

use super::helpers;
use super::types::{StringOutcome, UnitOutcome};
use crate::facade::ConversionFacade;
use crate::options::ConversionOptions;
use crate::{wasm_info, wasm_log, wasm_warn};

#[wasm_bindgen]
pub struct TexConverter {
    facade: ConversionFacade,
}

#[wasm_bindgen]
impl TexConverter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TexConverter {
        wasm_info!("TexConverter created with default options");
        TexConverter {
            facade: ConversionFacade::new(),
        }
    }

    /// Create a converter from a plain JS options object
    ///
    /// # Errors
    /// Throws if the object does not deserialize or fails validation.
    #[wasm_bindgen(js_name = withOptions)]
    pub fn with_options(options: JsValue) -> Result<TexConverter, JsValue> {
        let options: ConversionOptions = helpers::deserialize(options, "Invalid converter options")?;
        Self::from_options(options).map_err(|e| helpers::validation_error(e))
    }

    /// Create a converter from a JSON options string
    #[wasm_bindgen(js_name = withOptionsJson)]
    pub fn with_options_json(json: &str) -> Result<TexConverter, JsValue> {
        let options =
            ConversionOptions::from_json(json).map_err(|e| helpers::validation_error(e.to_string()))?;
        Self::from_options(options).map_err(|e| helpers::validation_error(e))
    }

    /// Feed TeX input to the engine; `displayStyle` defaults to false
    #[wasm_bindgen(js_name = processInput)]
    pub fn process_input(&mut self, input: &str, display_style: Option<bool>) -> UnitOutcome {
        let display_style = display_style.unwrap_or(false);
        wasm_log!(
            "processInput called: {} chars, displayStyle={}",
            input.chars().count(),
            display_style
        );
        let outcome = self.facade.process_input(input, display_style);
        if let crate::models::Outcome::Err(error) = &outcome {
            wasm_warn!("processInput failed: {}", error);
        }
        outcome.into()
    }

    #[wasm_bindgen(js_name = getMarkup)]
    pub fn get_markup(&self) -> StringOutcome {
        self.facade.get_markup().into()
    }

    #[wasm_bindgen(js_name = getNormalizedInput)]
    pub fn get_normalized_input(&self) -> StringOutcome {
        self.facade.get_normalized_input().into()
    }

    #[wasm_bindgen(js_name = getNormalizedInputOnly)]
    pub fn get_normalized_input_only(&self) -> StringOutcome {
        self.facade.get_normalized_input_only().into()
    }
}

impl TexConverter {
    /// Validate options and build a converter
    pub fn from_options(options: ConversionOptions) -> Result<TexConverter, String> {
        let (max_tokens, max_nesting) = (options.max_tokens, options.max_nesting);
        let facade = ConversionFacade::with_options(options).map_err(|e| e.to_string())?;
        wasm_info!(
            "TexConverter created: maxTokens={}, maxNesting={}",
            max_tokens,
            max_nesting
        );
        Ok(TexConverter { facade })
    }
}

impl Default for TexConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MathmlEncoding;

    #[test]
    fn test_converter_round_trip_in_rust() {
        let mut converter = TexConverter::new();
        assert!(converter.process_input("x^2", None).is_ok());
        let markup = converter.get_markup();
        assert!(markup.is_ok());
        assert!(markup.value().contains("<msup>"));
        assert_eq!(converter.get_normalized_input_only().value(), "x^{2}");
    }

    #[test]
    fn test_display_style_flag() {
        let mut converter = TexConverter::new();
        converter.process_input("x", Some(true));
        assert!(converter.get_markup().value().contains("display=\"block\""));
    }

    #[test]
    fn test_from_options_validates() {
        let options = ConversionOptions {
            max_tokens: 0,
            ..ConversionOptions::default()
        };
        assert!(TexConverter::from_options(options).is_err());

        let mut options = ConversionOptions::default();
        options.mathml.encoding = MathmlEncoding::Numeric;
        let mut converter = TexConverter::from_options(options).unwrap();
        converter.process_input("\\pi", None);
        assert!(converter.get_markup().value().contains("&#x3C0;"));
    }

    #[test]
    fn test_error_before_input() {
        let converter = TexConverter::new();
        let outcome = converter.get_normalized_input();
        assert!(outcome.is_err());
        assert_eq!(outcome.error().as_domain().code(), "NoInputProcessed");
    }
}
