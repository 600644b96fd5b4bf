//! Error envelopes that cross the boundary by value
//!
//! Every envelope owns its data outright. Nothing here borrows from the
//! failure that produced it, so an envelope can be moved into a JS wrapper,
//! cloned, or serialized without any lifetime ties to the engine.

use serde::Serialize;
use thiserror::Error;

use crate::engine::TexException;

/// Structured failure raised by the engine's own validation logic
///
/// `code` is stable and machine readable (e.g. `UnrecognisedCommand`);
/// `args` are the message-formatting arguments in the order the engine
/// produced them.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DomainError {
    code: String,
    args: Vec<String>,
}

impl DomainError {
    pub(crate) fn new(code: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            code: code.into(),
            args,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// English message for this error, with `$0`, `$1`, ... filled in from `args`
    pub fn render(&self) -> String {
        crate::messages::format_message(&self.code, &self.args)
    }
}

impl From<&TexException> for DomainError {
    fn from(exception: &TexException) -> Self {
        Self::new(exception.code.clone(), exception.args.clone())
    }
}

impl From<TexException> for DomainError {
    fn from(exception: TexException) -> Self {
        Self::new(exception.code, exception.args)
    }
}

/// Unstructured failure: a free-text description and nothing else
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GenericError {
    message: String,
}

impl GenericError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Closed union over the two failure kinds
///
/// Callers branch on [`is_domain`](Self::is_domain) /
/// [`is_generic`](Self::is_generic) before extracting. The typed accessors
/// panic on a mismatch instead of handing back a default value.
#[derive(Serialize, Error, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnyError {
    #[error("{}", .0.render())]
    Domain(DomainError),
    #[error("{}", .0.message)]
    Generic(GenericError),
}

impl AnyError {
    pub fn is_domain(&self) -> bool {
        matches!(self, AnyError::Domain(_))
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, AnyError::Generic(_))
    }

    /// Borrow the domain payload
    ///
    /// # Panics
    /// If the active variant is `Generic`.
    pub fn as_domain(&self) -> &DomainError {
        match self {
            AnyError::Domain(e) => e,
            AnyError::Generic(_) => {
                panic!("AnyError::as_domain called on a Generic error")
            }
        }
    }

    /// Borrow the generic payload
    ///
    /// # Panics
    /// If the active variant is `Domain`.
    pub fn as_generic(&self) -> &GenericError {
        match self {
            AnyError::Generic(e) => e,
            AnyError::Domain(_) => {
                panic!("AnyError::as_generic called on a Domain error")
            }
        }
    }

    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            AnyError::Domain(e) => Some(e),
            AnyError::Generic(_) => None,
        }
    }

    pub fn generic(&self) -> Option<&GenericError> {
        match self {
            AnyError::Generic(e) => Some(e),
            AnyError::Domain(_) => None,
        }
    }

    /// Shorthand for a domain error with the given code and args
    pub(crate) fn domain_error(code: &str, args: Vec<String>) -> Self {
        AnyError::Domain(DomainError::new(code, args))
    }

    pub(crate) fn generic_error(message: impl Into<String>) -> Self {
        AnyError::Generic(GenericError::new(message))
    }
}

impl From<DomainError> for AnyError {
    fn from(e: DomainError) -> Self {
        AnyError::Domain(e)
    }
}

impl From<GenericError> for AnyError {
    fn from(e: GenericError) -> Self {
        AnyError::Generic(e)
    }
}
