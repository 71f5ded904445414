//! Failure taxonomy for test units.
//!
//! A test unit fails by returning one of these. Panics inside a unit are
//! caught by the engine and turned into [`TestFailure::Fatal`], so from the
//! report's point of view every failure, expected or not, is a value of
//! this type.

use std::any::Any;
use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Result type returned by test bodies and fixture hooks.
pub type TestResult<T = ()> = Result<T, TestFailure>;

#[derive(Debug, Error, Diagnostic)]
pub enum TestFailure {
    /// Raised by `assert_same` when the two values differ.
    #[error("{message}\nExpected: {expected}\nActual  : {actual}")]
    #[diagnostic(code(sfut::assertion))]
    Assertion {
        message: String,
        expected: String,
        actual: String,
    },

    /// An exception message was expected but the unit finished cleanly.
    #[error("Failed asserting that exception message [{expected}] was thrown.")]
    #[diagnostic(code(sfut::expectation))]
    ExpectationFailed { expected: String },

    /// Raised by test code itself.
    #[error("{message}")]
    #[diagnostic(code(sfut::exception))]
    Exception { message: String },

    #[error(transparent)]
    #[diagnostic(code(sfut::io))]
    Io(#[from] std::io::Error),

    /// A panic escaped the unit.
    #[error("{message}")]
    #[diagnostic(code(sfut::fatal))]
    Fatal { message: String },
}

impl TestFailure {
    /// Builds a user-raised failure, the equivalent of throwing an exception.
    pub fn exception(message: impl Into<String>) -> Self {
        TestFailure::Exception {
            message: message.into(),
        }
    }

    pub fn assertion<T: fmt::Debug + ?Sized>(message: impl Into<String>, expected: &T, actual: &T) -> Self {
        TestFailure::Assertion {
            message: message.into(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }

    pub fn expectation_failed(expected: impl Into<String>) -> Self {
        TestFailure::ExpectationFailed {
            expected: expected.into(),
        }
    }

    /// Converts a panic payload caught by `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        TestFailure::Fatal { message }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, TestFailure::Fatal { .. })
    }

    pub fn is_expectation_failed(&self) -> bool {
        matches!(self, TestFailure::ExpectationFailed { .. })
    }

    /// Whether `expected` occurs in this failure's message. Case-sensitive.
    pub fn message_contains(&self, expected: &str) -> bool {
        self.to_string().contains(expected)
    }
}
