//! Test execution engine.
//!
//! Every unit goes through the same pipeline: `set_up`, the body, `tear_down`,
//! then classification against the expectation slot. Test output is captured
//! for the duration and thrown away. Panics are caught at each step and
//! classified like any other failure.
//!
//! Two entry points share the pipeline:
//! - [`TestSuite::run_tests`] runs every `test...` unit, records and prints
//!   each outcome, and never fails itself.
//! - [`TestSuite::run_test`] runs one named unit and hands the failure back
//!   to the caller, which is how the harness's own decisions get tested.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::case::{TestCase, TestContext, TestMethod};
use crate::color::EnvColorSupport;
use crate::errors::{TestFailure, TestResult};
use crate::output::SharedSink;
use crate::results::SharedResults;
use crate::terminal::TerminalString;

/// What a unit amounted to once hooks and expectation are taken into account.
#[derive(Debug)]
pub enum Outcome {
    Passed,
    /// The unit failed with a message the expectation slot asked for.
    ExpectedCaught { fatal: bool },
    Failed(TestFailure),
}

impl Outcome {
    /// Combines the expectation slot with the failure (if any) the unit produced.
    pub fn classify(expected: Option<&str>, failure: Option<TestFailure>) -> Outcome {
        match (expected, failure) {
            (None, None) => Outcome::Passed,
            (None, Some(failure)) => Outcome::Failed(failure),
            (Some(expected), None) => Outcome::Failed(TestFailure::expectation_failed(expected)),
            (Some(expected), Some(failure)) if failure.message_contains(expected) => {
                Outcome::ExpectedCaught {
                    fatal: failure.is_fatal(),
                }
            }
            (Some(_), Some(failure)) => Outcome::Failed(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed(_))
    }
}

/// Object-safe view of a suite, used by the runner to drive suites of
/// different types from one list.
pub trait RunnableSuite {
    fn class_name(&self) -> String;
    fn test_names(&self) -> Vec<&'static str>;
    fn run_tests(&mut self);
}

/// A test-case instance bound to its context and report stream.
pub struct TestSuite<T: TestCase> {
    case: T,
    ctx: TestContext,
    terminal: TerminalString,
    sink: SharedSink,
}

impl<T: TestCase> TestSuite<T> {
    /// Reports to stdout, coloring according to the environment.
    pub fn new(case: T, results: SharedResults) -> Self {
        Self::with_output(
            case,
            results,
            TerminalString::from_boxed(Box::new(EnvColorSupport)),
            SharedSink::stdout(),
        )
    }

    pub fn with_output(case: T, results: SharedResults, terminal: TerminalString, sink: SharedSink) -> Self {
        Self {
            case,
            ctx: TestContext::new(results),
            terminal,
            sink,
        }
    }

    pub fn context(&mut self) -> &mut TestContext {
        &mut self.ctx
    }

    /// Registers an expectation ahead of a [`run_test`](Self::run_test) call.
    pub fn expect_exception_message(&mut self, message: impl Into<String>) {
        self.ctx.expect_exception_message(message);
    }

    /// Runs every `test...` unit in declaration order. Failures are counted,
    /// logged and printed; nothing propagates out.
    pub fn run_tests(&mut self) {
        let class = self.case.name().to_string();
        let methods: Vec<TestMethod<T>> = self.case.tests().into_iter().filter(|m| m.is_test()).collect();
        debug!(suite = %class, units = methods.len(), "running suite");

        for method in methods {
            let id = format!("{class}::{}", method.name);
            self.ctx.results().borrow_mut().increment_test_count();
            self.ctx.clear_expectation();

            match self.execute(method) {
                Outcome::Failed(failure) => self.report_failure(&id, &failure),
                outcome => {
                    debug!(test = %id, "passed");
                    let line = success_line(&id, &outcome);
                    self.sink.emit(&self.terminal.fg(&line, "green"));
                }
            }
        }

        let after_class = {
            let _scope = self.ctx.capture().scope();
            let (case, ctx) = (&mut self.case, &mut self.ctx);
            guarded(|| case.tear_down_after_class(ctx))
        };
        if let Err(failure) = after_class {
            self.report_failure(&format!("{class}::tearDownAfterClass"), &failure);
        }
    }

    /// Runs a single unit by name, whether or not it is a `test...` method.
    ///
    /// Any expectation registered beforehand applies and is consumed. On
    /// success the uncolored report line is returned; otherwise the failure
    /// propagates unchanged: an unmet expectation as
    /// [`TestFailure::ExpectationFailed`], anything else as the original error.
    pub fn run_test(&mut self, method: &str) -> TestResult<String> {
        let class = self.case.name().to_string();
        let Some(found) = self.case.tests().into_iter().find(|m| m.name == method) else {
            self.ctx.clear_expectation();
            return Err(TestFailure::exception(format!(
                "Call to undefined method {class}::{method}()"
            )));
        };

        let id = format!("{class}::{method}");
        match self.execute(found) {
            Outcome::Failed(failure) => {
                debug!(test = %id, error = %failure, "single unit failed");
                Err(failure)
            }
            outcome => Ok(success_line(&id, &outcome)),
        }
    }

    fn execute(&mut self, method: TestMethod<T>) -> Outcome {
        let scope = self.ctx.capture().scope();
        let (case, ctx) = (&mut self.case, &mut self.ctx);

        let mut failure = guarded(|| case.set_up(ctx)).err();
        if failure.is_none() {
            failure = guarded(|| (method.body)(case, ctx)).err();
        }
        let tear_down = guarded(|| case.tear_down(ctx));
        drop(scope);

        let expected = ctx.take_expectation();
        match (Outcome::classify(expected.as_deref(), failure), tear_down) {
            (outcome @ Outcome::Failed(_), _) => outcome,
            (_, Err(failure)) => Outcome::Failed(failure),
            (outcome, Ok(())) => outcome,
        }
    }

    fn report_failure(&self, id: &str, failure: &TestFailure) {
        warn!(test = %id, error = %failure, "test failed");
        self.ctx.results().borrow_mut().record_failure(id);
        self.sink.emit(&self.terminal.fg(&format!("✘ {id}"), "red"));
        let detail = if failure.is_fatal() {
            format!("   Fatal Error: {failure}")
        } else {
            format!("   {failure}")
        };
        self.sink.emit(&self.terminal.fg(&detail, "yellow"));
    }
}

impl<T: TestCase> RunnableSuite for TestSuite<T> {
    fn class_name(&self) -> String {
        self.case.name().to_string()
    }

    fn test_names(&self) -> Vec<&'static str> {
        self.case
            .tests()
            .into_iter()
            .filter(|m| m.is_test())
            .map(|m| m.name)
            .collect()
    }

    fn run_tests(&mut self) {
        TestSuite::run_tests(self);
    }
}

fn success_line(id: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::ExpectedCaught { fatal: false } => format!("✔ {id} (expected exception caught)"),
        Outcome::ExpectedCaught { fatal: true } => format!("✔ {id} (expected fatal error caught)"),
        _ => format!("✔ {id}"),
    }
}

/// Runs one pipeline step, turning a panic into a fatal failure.
fn guarded(step: impl FnOnce() -> TestResult) -> TestResult {
    match panic::catch_unwind(AssertUnwindSafe(step)) {
        Ok(result) => result,
        Err(payload) => Err(TestFailure::from_panic(payload)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_table() {
        assert!(matches!(Outcome::classify(None, None), Outcome::Passed));
        assert!(matches!(
            Outcome::classify(None, Some(TestFailure::exception("x"))),
            Outcome::Failed(TestFailure::Exception { .. })
        ));
        match Outcome::classify(Some("boom"), None) {
            Outcome::Failed(failure) => assert_eq!(
                failure.to_string(),
                "Failed asserting that exception message [boom] was thrown."
            ),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(matches!(
            Outcome::classify(Some("boom"), Some(TestFailure::exception("kaboom happened"))),
            Outcome::ExpectedCaught { fatal: false }
        ));
        match Outcome::classify(Some("boom"), Some(TestFailure::exception("totally unrelated"))) {
            Outcome::Failed(failure) => {
                assert!(!failure.is_expectation_failed());
                assert_eq!(failure.to_string(), "totally unrelated");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn fatal_failures_are_flagged_when_expected() {
        let outcome = Outcome::classify(
            Some("index out of bounds"),
            Some(TestFailure::Fatal {
                message: "index out of bounds: the len is 0".into(),
            }),
        );
        assert!(matches!(outcome, Outcome::ExpectedCaught { fatal: true }));
        assert!(outcome.is_success());
    }
}
