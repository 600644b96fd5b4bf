//! Parsing module for TeX math input
//!
//! Tokenizer, command tables, and the recursive descent grammar that
//! builds the parse tree shared by both output writers.

pub mod tokens;
pub mod symbols;
pub mod grammar;

// Re-export commonly used types
pub use grammar::{parse, MathNode};
pub use tokens::{tokenize, Token, TokenType};
