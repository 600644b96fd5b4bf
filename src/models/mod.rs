//! Boundary data model
//!
//! Value-copied error envelopes and the generic outcome container
//! returned by every facade operation.

pub mod errors;
pub mod outcome;

// Re-export commonly used types
pub use errors::{AnyError, DomainError, GenericError};
pub use outcome::Outcome;
