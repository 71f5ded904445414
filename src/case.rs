//! The test-case capability: how a suite declares its units and hooks, and
//! the per-instance context a unit runs against.

use std::fmt;

use crate::errors::{TestFailure, TestResult};
use crate::output::CaptureBuffer;
use crate::results::SharedResults;

/// Prefix that marks a method as a test unit for batch runs.
pub const TEST_PREFIX: &str = "test";

/// Signature shared by test bodies.
pub type TestFn<T> = fn(&mut T, &mut TestContext) -> TestResult;

/// One named, zero-argument operation of a suite.
pub struct TestMethod<T: ?Sized> {
    pub name: &'static str,
    pub body: TestFn<T>,
}

impl<T: ?Sized> TestMethod<T> {
    pub fn new(name: &'static str, body: TestFn<T>) -> Self {
        Self { name, body }
    }

    /// Batch runs only pick up methods named `test...`.
    pub fn is_test(&self) -> bool {
        self.name.starts_with(TEST_PREFIX)
    }
}

impl<T: ?Sized> Clone for TestMethod<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for TestMethod<T> {}

impl<T: ?Sized> fmt::Debug for TestMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMethod").field("name", &self.name).finish()
    }
}

/// A test class. Units are listed explicitly, in run order.
///
/// Hooks default to no-ops; override the ones a suite needs.
pub trait TestCase {
    /// Class name used in `Class::method` identifiers.
    fn name(&self) -> &str;

    fn tests(&self) -> Vec<TestMethod<Self>>;

    fn set_up(&mut self, _ctx: &mut TestContext) -> TestResult {
        Ok(())
    }

    fn tear_down(&mut self, _ctx: &mut TestContext) -> TestResult {
        Ok(())
    }

    /// Runs once after the last unit of a batch run.
    fn tear_down_after_class(&mut self, _ctx: &mut TestContext) -> TestResult {
        Ok(())
    }
}

/// State a suite instance carries between units: the expectation slot, the
/// shared result counters, and the buffer that swallows test output.
pub struct TestContext {
    expected_message: Option<String>,
    results: SharedResults,
    capture: CaptureBuffer,
}

impl TestContext {
    pub fn new(results: SharedResults) -> Self {
        Self {
            expected_message: None,
            results,
            capture: CaptureBuffer::new(),
        }
    }

    /// Requires the running unit to fail with a message containing `message`.
    /// A later call replaces an earlier one.
    pub fn expect_exception_message(&mut self, message: impl Into<String>) {
        self.expected_message = Some(message.into());
    }

    pub fn expected_message(&self) -> Option<&str> {
        self.expected_message.as_deref()
    }

    pub(crate) fn take_expectation(&mut self) -> Option<String> {
        self.expected_message.take()
    }

    pub(crate) fn clear_expectation(&mut self) {
        self.expected_message = None;
    }

    /// Strict equality check. Counts one assertion whatever the outcome.
    pub fn assert_same<T>(&mut self, expected: T, actual: T, message: impl AsRef<str>) -> TestResult
    where
        T: PartialEq + fmt::Debug,
    {
        self.results.borrow_mut().increment_assertion_count();
        if expected == actual {
            Ok(())
        } else {
            Err(TestFailure::assertion(message.as_ref(), &expected, &actual))
        }
    }

    /// Writer for test output. Whatever lands here is discarded when the
    /// unit ends and never reaches the report.
    pub fn output(&mut self) -> &mut CaptureBuffer {
        &mut self.capture
    }

    pub(crate) fn capture(&self) -> &CaptureBuffer {
        &self.capture
    }

    pub fn results(&self) -> &SharedResults {
        &self.results
    }
}
