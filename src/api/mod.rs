//! TeX conversion WASM API
//!
//! This module provides the JavaScript-facing API for the conversion
//! facade: the boundary envelope classes and the `TexConverter` class.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling, and logging
//! - `types`: `DomainError`, `GenericError`, `AnyError`, `UnitOutcome`, `StringOutcome`
//! - `converter`: `TexConverter`, the four facade operations

pub mod helpers;
pub mod types;
pub mod converter;

pub use converter::TexConverter;
pub use types::{JsAnyError, JsDomainError, JsGenericError, StringOutcome, UnitOutcome};
