//! Conversion facade
//!
//! Owns one engine and exposes four operations. Each operation runs its
//! single engine call inside its own guarded scope and turns whatever
//! happens there into exactly one [`Outcome`]: engine domain errors become
//! [`AnyError::Domain`], every other error and any panic becomes
//! [`AnyError::Generic`]. Nothing propagates past an operation.
//!
//! The facade tracks whether input has been processed and answers
//! extraction calls made before that with a `NoInputProcessed` domain
//! error, without consulting the engine.
//!
//! Calls on one facade are serialized by `&mut self`/`&self`; separate
//! facades share nothing.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::engine::{ConversionEngine, EngineError, TexEngine, NO_INPUT_PROCESSED};
use crate::models::{AnyError, DomainError, Outcome};
use crate::options::{ConversionOptions, OptionsError};

/// Whether the facade currently holds successfully processed input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputState {
    NotProcessed,
    Processed,
}

pub struct ConversionFacade<E: ConversionEngine = TexEngine> {
    engine: E,
    state: InputState,
}

impl ConversionFacade<TexEngine> {
    /// Facade over the built-in engine with default options
    pub fn new() -> Self {
        Self::with_engine(TexEngine::default())
    }

    /// Facade over the built-in engine; options are validated first
    pub fn with_options(options: ConversionOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self::with_engine(TexEngine::new(options)))
    }
}

impl Default for ConversionFacade<TexEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ConversionEngine> ConversionFacade<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            state: InputState::NotProcessed,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    /// Feed `input` to the engine
    ///
    /// Any failure leaves the facade in [`InputState::NotProcessed`].
    pub fn process_input(&mut self, input: &str, display_style: bool) -> Outcome<()> {
        log::debug!(
            "processInput: {} chars, display_style={}",
            input.chars().count(),
            display_style
        );
        self.state = InputState::NotProcessed;

        let engine = &mut self.engine;
        let outcome = guarded("processInput", || engine.process_input(input, display_style));
        if outcome.is_ok() {
            self.state = InputState::Processed;
        }
        outcome
    }

    /// [`process_input`](Self::process_input) in inline (non-display) style
    pub fn process(&mut self, input: &str) -> Outcome<()> {
        self.process_input(input, false)
    }

    /// MathML for the most recently processed input
    pub fn get_markup(&self) -> Outcome<String> {
        self.extract("getMarkup", |engine| engine.mathml())
    }

    /// Normalized input as a complete LaTeX document
    pub fn get_normalized_input(&self) -> Outcome<String> {
        self.extract("getNormalizedInput", |engine| engine.purified_tex())
    }

    /// Normalized input, math only
    pub fn get_normalized_input_only(&self) -> Outcome<String> {
        self.extract("getNormalizedInputOnly", |engine| engine.purified_tex_only())
    }

    fn extract(
        &self,
        operation: &'static str,
        call: impl FnOnce(&E) -> Result<String, EngineError>,
    ) -> Outcome<String> {
        if self.state == InputState::NotProcessed {
            log::debug!("{}: no input processed", operation);
            return Outcome::Err(AnyError::domain_error(NO_INPUT_PROCESSED, Vec::new()));
        }
        let engine = &self.engine;
        guarded(operation, || call(engine))
    }
}

/// Run one engine call and fold every way it can end into an [`Outcome`]
fn guarded<T>(operation: &str, call: impl FnOnce() -> Result<T, EngineError>) -> Outcome<T> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Outcome::Ok(value),
        Ok(Err(EngineError::Domain(exception))) => {
            log::debug!("{}: domain error {}", operation, exception.code);
            Outcome::Err(AnyError::Domain(DomainError::from(exception)))
        }
        Ok(Err(other)) => {
            log::warn!("{}: engine error: {}", operation, other);
            Outcome::Err(AnyError::generic_error(other.to_string()))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("{}: engine panicked: {}", operation, message);
            Outcome::Err(AnyError::generic_error(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "engine panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine whose calls fail in a configurable way
    struct ScriptedEngine {
        process: fn() -> Result<(), EngineError>,
        output: fn() -> Result<String, EngineError>,
        calls: usize,
    }

    impl ConversionEngine for ScriptedEngine {
        fn process_input(&mut self, _: &str, _: bool) -> Result<(), EngineError> {
            self.calls += 1;
            (self.process)()
        }

        fn mathml(&self) -> Result<String, EngineError> {
            (self.output)()
        }

        fn purified_tex(&self) -> Result<String, EngineError> {
            (self.output)()
        }

        fn purified_tex_only(&self) -> Result<String, EngineError> {
            (self.output)()
        }
    }

    fn scripted(
        process: fn() -> Result<(), EngineError>,
        output: fn() -> Result<String, EngineError>,
    ) -> ConversionFacade<ScriptedEngine> {
        ConversionFacade::with_engine(ScriptedEngine {
            process,
            output,
            calls: 0,
        })
    }

    #[test]
    fn test_panic_in_process_becomes_generic() {
        let mut facade = scripted(|| panic!("parser blew up"), || Ok(String::new()));
        let err = facade.process_input("x", false).unwrap_err();
        assert_eq!(err.as_generic().message(), "parser blew up");
        assert_eq!(facade.state(), InputState::NotProcessed);
        assert_eq!(facade.engine().calls, 1);
    }

    #[test]
    fn test_formatted_panic_payload_is_kept() {
        let mut facade = scripted(|| panic!("bad token {}", 42), || Ok(String::new()));
        let err = facade.process_input("x", false).unwrap_err();
        assert_eq!(err.as_generic().message(), "bad token 42");
    }

    #[test]
    fn test_runtime_error_becomes_generic() {
        let mut facade = scripted(
            || Ok(()),
            || Err(EngineError::Runtime("allocation failed".to_string())),
        );
        assert!(facade.process_input("x", false).is_ok());
        let err = facade.get_markup().unwrap_err();
        assert!(err.is_generic());
        assert_eq!(err.as_generic().message(), "allocation failed");
    }

    #[test]
    fn test_panic_in_one_extraction_does_not_affect_state() {
        let mut facade = scripted(|| Ok(()), || panic!("writer exploded"));
        facade.process("x").unwrap_ok();

        assert!(facade.get_markup().unwrap_err().is_generic());
        assert_eq!(facade.state(), InputState::Processed);
        assert!(facade.get_normalized_input_only().unwrap_err().is_generic());
    }

    #[test]
    fn test_extraction_before_processing_skips_engine() {
        let facade = scripted(|| Ok(()), || panic!("must not be called"));
        let err = facade.get_normalized_input().unwrap_err();
        assert_eq!(err.as_domain().code(), NO_INPUT_PROCESSED);
        assert!(err.as_domain().args().is_empty());
    }

    #[test]
    fn test_domain_error_fields_copied() {
        let mut facade = scripted(
            || {
                Err(crate::engine::TexException::new(
                    "MissingArgument",
                    vec!["\\frac".into(), "b".into(), "a".into()],
                )
                .into())
            },
            || Ok(String::new()),
        );
        let err = facade.process_input("\\frac", false).unwrap_err();
        assert_eq!(err.as_domain().code(), "MissingArgument");
        assert_eq!(err.as_domain().args(), ["\\frac", "b", "a"]);
    }

    #[test]
    fn test_with_options_rejects_invalid_settings() {
        let options = ConversionOptions {
            max_tokens: 0,
            ..ConversionOptions::default()
        };
        assert!(matches!(
            ConversionFacade::with_options(options),
            Err(OptionsError::ZeroTokenLimit)
        ));
        assert!(ConversionFacade::with_options(ConversionOptions::default()).is_ok());
    }

    #[test]
    fn test_facade_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ConversionFacade>();
    }
}
