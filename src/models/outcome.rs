//! Terminal success-or-failure container returned by every facade operation

use serde::Serialize;

use super::errors::AnyError;

/// Exactly one of a success value or an [`AnyError`]
///
/// `T` is `()` for operations that succeed without a payload and `String`
/// for the extraction operations. Like [`AnyError`], the typed accessors
/// panic when asked for the variant that is not active.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "status", content = "payload", rename_all = "lowercase")]
pub enum Outcome<T> {
    Ok(T),
    Err(AnyError),
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    /// # Panics
    /// If the outcome is `Err`.
    pub fn value(&self) -> &T {
        match self {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => panic!("Outcome::value called on an Err outcome: {}", e),
        }
    }

    /// # Panics
    /// If the outcome is `Ok`.
    pub fn error(&self) -> &AnyError {
        match self {
            Outcome::Err(e) => e,
            Outcome::Ok(_) => panic!("Outcome::error called on an Ok outcome"),
        }
    }

    /// # Panics
    /// If the outcome is `Err`.
    pub fn unwrap_ok(self) -> T {
        match self {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => panic!("Outcome::unwrap_ok called on an Err outcome: {}", e),
        }
    }

    /// # Panics
    /// If the outcome is `Ok`.
    pub fn unwrap_err(self) -> AnyError {
        match self {
            Outcome::Err(e) => e,
            Outcome::Ok(_) => panic!("Outcome::unwrap_err called on an Ok outcome"),
        }
    }

    pub fn into_result(self) -> Result<T, AnyError> {
        self.into()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(v) => Outcome::Ok(f(v)),
            Outcome::Err(e) => Outcome::Err(e),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, AnyError> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Ok(v) => Ok(v),
            Outcome::Err(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, AnyError>> for Outcome<T> {
    fn from(result: Result<T, AnyError>) -> Self {
        match result {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Err(e),
        }
    }
}
