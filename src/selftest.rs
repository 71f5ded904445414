//! Suites the harness runs against itself. The `sfut` binary runs these.

use std::cell::RefCell;
use std::rc::Rc;

use crate::case::{TestCase, TestContext, TestMethod};
use crate::color::FixedColorSupport;
use crate::errors::{TestFailure, TestResult};
use crate::engine::TestSuite;
use crate::results::ResultAccumulator;
use crate::runner::TestRegistry;
use crate::terminal::TerminalString;

/// Registry holding every self-test suite in run order.
pub fn registry() -> TestRegistry {
    let mut registry = TestRegistry::new();
    registry
        .register::<CalculatorTest>()
        .register::<SetUpTearDownTest>()
        .register::<ExpectExceptionMessageTest>()
        .register::<ResultAccumulatorTest>()
        .register::<TerminalStringTest>()
        .register::<OutputIsolationTest>();
    registry
}

struct Calculator;

impl Calculator {
    fn add(&self, a: i64, b: i64) -> i64 {
        a + b
    }

    fn invalid_operation(&self) -> TestResult<i64> {
        Err(TestFailure::exception("Invalid argument"))
    }
}

#[derive(Default)]
pub struct CalculatorTest;

impl CalculatorTest {
    fn test_addition(&mut self, ctx: &mut TestContext) -> TestResult {
        ctx.assert_same(3, Calculator.add(1, 2), "1 + 2 should be 3")
    }

    fn test_invalid_operation_throws(&mut self, ctx: &mut TestContext) -> TestResult {
        ctx.expect_exception_message("Invalid argument");
        Calculator.invalid_operation()?;
        Ok(())
    }
}

impl TestCase for CalculatorTest {
    fn name(&self) -> &str {
        "CalculatorTest"
    }

    fn tests(&self) -> Vec<TestMethod<Self>> {
        vec![
            TestMethod::new("testAddition", Self::test_addition),
            TestMethod::new("testInvalidOperationThrows", Self::test_invalid_operation_throws),
        ]
    }
}

/// Records hook order; the units check the log as they go.
#[derive(Default)]
pub struct SetUpTearDownTest {
    log: Vec<&'static str>,
}

impl SetUpTearDownTest {
    fn test_one(&mut self, ctx: &mut TestContext) -> TestResult {
        ctx.assert_same(vec!["setUp"], self.log.clone(), "setUp should be called before testOne")?;
        self.log.push("testOne");
        Ok(())
    }

    fn test_two(&mut self, ctx: &mut TestContext) -> TestResult {
        ctx.assert_same(
            vec!["setUp", "testOne", "tearDown", "setUp"],
            self.log.clone(),
            "setUp should be called again for testTwo",
        )?;
        self.log.push("testTwo");
        Ok(())
    }
}

impl TestCase for SetUpTearDownTest {
    fn name(&self) -> &str {
        "SetUpTearDownTest"
    }

    fn tests(&self) -> Vec<TestMethod<Self>> {
        vec![
            TestMethod::new("testOne", Self::test_one),
            TestMethod::new("testTwo", Self::test_two),
        ]
    }

    fn set_up(&mut self, _ctx: &mut TestContext) -> TestResult {
        self.log.push("setUp");
        Ok(())
    }

    fn tear_down(&mut self, _ctx: &mut TestContext) -> TestResult {
        self.log.push("tearDown");
        Ok(())
    }

    fn tear_down_after_class(&mut self, ctx: &mut TestContext) -> TestResult {
        ctx.assert_same(
            vec!["setUp", "testOne", "tearDown", "setUp", "testTwo", "tearDown"],
            self.log.clone(),
            "hooks should wrap every unit",
        )
    }
}

/// Helpers driven through `run_test`; none of them is a batch unit.
#[derive(Default)]
pub struct TargetForRunTest;

impl TargetForRunTest {
    fn throws_exact_message(&mut self, _ctx: &mut TestContext) -> TestResult {
        Err(TestFailure::exception("This is the exact message."))
    }

    fn throws_partial_message(&mut self, _ctx: &mut TestContext) -> TestResult {
        Err(TestFailure::exception("This message contains the partial text."))
    }

    fn throws_different_message(&mut self, _ctx: &mut TestContext) -> TestResult {
        Err(TestFailure::exception("This is a completely different message."))
    }

    fn does_not_throw(&mut self, ctx: &mut TestContext) -> TestResult {
        use std::io::Write;
        writeln!(ctx.output(), "this never reaches the report")?;
        Ok(())
    }
}

impl TestCase for TargetForRunTest {
    fn name(&self) -> &str {
        "TargetForRunTest"
    }

    fn tests(&self) -> Vec<TestMethod<Self>> {
        vec![
            TestMethod::new("methodThrowsExactMessage", Self::throws_exact_message),
            TestMethod::new("methodThrowsPartialMessage", Self::throws_partial_message),
            TestMethod::new("methodThrowsDifferentMessage", Self::throws_different_message),
            TestMethod::new("methodDoesNotThrow", Self::does_not_throw),
        ]
    }
}

#[derive(Default)]
pub struct ExpectExceptionMessageTest;

impl ExpectExceptionMessageTest {
    fn target(ctx: &TestContext) -> TestSuite<TargetForRunTest> {
        TestSuite::new(TargetForRunTest, ctx.results().clone())
    }

    fn test_success_when_exact_message_is_thrown(&mut self, ctx: &mut TestContext) -> TestResult {
        let mut target = Self::target(ctx);
        target.expect_exception_message("This is the exact message.");
        let line = target.run_test("methodThrowsExactMessage")?;
        ctx.assert_same(
            "✔ TargetForRunTest::methodThrowsExactMessage (expected exception caught)",
            line.as_str(),
            "exact message should satisfy the expectation",
        )
    }

    fn test_success_when_partial_message_is_thrown(&mut self, ctx: &mut TestContext) -> TestResult {
        let mut target = Self::target(ctx);
        target.expect_exception_message("partial text");
        let line = target.run_test("methodThrowsPartialMessage")?;
        ctx.assert_same(
            "✔ TargetForRunTest::methodThrowsPartialMessage (expected exception caught)",
            line.as_str(),
            "substring should satisfy the expectation",
        )
    }

    fn test_failure_when_exception_is_not_thrown(&mut self, ctx: &mut TestContext) -> TestResult {
        let mut target = Self::target(ctx);
        target.expect_exception_message("some error");
        let failure = target.run_test("methodDoesNotThrow").err();
        ctx.assert_same(
            Some("Failed asserting that exception message [some error] was thrown.".to_string()),
            failure.filter(TestFailure::is_expectation_failed).map(|f| f.to_string()),
            "ExpectationFailed should have been raised",
        )
    }

    fn test_failure_when_message_is_different(&mut self, ctx: &mut TestContext) -> TestResult {
        let mut target = Self::target(ctx);
        target.expect_exception_message("an expected message");
        let failure = target.run_test("methodThrowsDifferentMessage").err();
        ctx.assert_same(
            Some("This is a completely different message.".to_string()),
            failure
                .filter(|f| !f.is_expectation_failed())
                .map(|f| f.to_string()),
            "the original failure should propagate",
        )
    }
}

impl TestCase for ExpectExceptionMessageTest {
    fn name(&self) -> &str {
        "ExpectExceptionMessageTest"
    }

    fn tests(&self) -> Vec<TestMethod<Self>> {
        vec![
            TestMethod::new("testSuccessWhenExactMessageIsThrown", Self::test_success_when_exact_message_is_thrown),
            TestMethod::new(
                "testSuccessWhenPartialMessageIsThrown",
                Self::test_success_when_partial_message_is_thrown,
            ),
            TestMethod::new("testFailureWhenExceptionIsNotThrown", Self::test_failure_when_exception_is_not_thrown),
            TestMethod::new("testFailureWhenMessageIsDifferent", Self::test_failure_when_message_is_different),
        ]
    }
}

#[derive(Default)]
pub struct ResultAccumulatorTest;

impl ResultAccumulatorTest {
    fn test_summary_message_no_tests(&mut self, ctx: &mut TestContext) -> TestResult {
        let acc = ResultAccumulator::new();
        ctx.assert_same(
            "OK (0 tests, 0 assertions)".to_string(),
            acc.summary_message(),
            "empty run summary",
        )
    }

    fn test_summary_message_failure(&mut self, ctx: &mut TestContext) -> TestResult {
        let mut acc = ResultAccumulator::new();
        for _ in 0..3 {
            acc.increment_test_count();
        }
        for _ in 0..4 {
            acc.increment_assertion_count();
        }
        acc.record_failure("SomeTest::testFailingMethod");
        ctx.assert_same(
            "FAILURES!\nTests: 3 Assertions: 4 Failures: 1.".to_string(),
            acc.summary_message(),
            "failure summary",
        )?;
        ctx.assert_same(true, acc.has_failures(), "should have failures")
    }

    fn test_contexts_count_into_their_accumulator(&mut self, ctx: &mut TestContext) -> TestResult {
        let shared = Rc::new(RefCell::new(ResultAccumulator::new()));
        let mut nested = TestContext::new(shared.clone());
        let _ = nested.assert_same("a", "b", "mismatch still counts");
        let count = shared.borrow().assertion_count();
        ctx.assert_same(1, count, "one assertion per call")
    }
}

impl TestCase for ResultAccumulatorTest {
    fn name(&self) -> &str {
        "ResultAccumulatorTest"
    }

    fn tests(&self) -> Vec<TestMethod<Self>> {
        vec![
            TestMethod::new("testSummaryMessageNoTests", Self::test_summary_message_no_tests),
            TestMethod::new("testSummaryMessageFailure", Self::test_summary_message_failure),
            TestMethod::new(
                "testContextsCountIntoTheirAccumulator",
                Self::test_contexts_count_into_their_accumulator,
            ),
        ]
    }
}

#[derive(Default)]
pub struct TerminalStringTest;

impl TerminalStringTest {
    fn terminal(supported: bool) -> TerminalString {
        TerminalString::new(Rc::new(FixedColorSupport::new(supported)))
    }

    fn test_plain_text_when_no_color_support(&mut self, ctx: &mut TestContext) -> TestResult {
        let text = Self::terminal(false).text("hello", Some("red"), Some("green"));
        ctx.assert_same("hello".to_string(), text, "unsupported terminals get plain text")
    }

    fn test_color_text_when_supported(&mut self, ctx: &mut TestContext) -> TestResult {
        let text = Self::terminal(true).text("hello", Some("red"), Some("green"));
        ctx.assert_same("\x1b[31;42mhello\x1b[0m".to_string(), text, "both codes joined")
    }
}

impl TestCase for TerminalStringTest {
    fn name(&self) -> &str {
        "TerminalStringTest"
    }

    fn tests(&self) -> Vec<TestMethod<Self>> {
        vec![
            TestMethod::new("testPlainTextWhenNoColorSupport", Self::test_plain_text_when_no_color_support),
            TestMethod::new("testColorTextWhenSupported", Self::test_color_text_when_supported),
        ]
    }
}

/// Writes straight to stdout from every phase; none of it may reach the report.
#[derive(Default)]
pub struct OutputIsolationTest;

impl OutputIsolationTest {
    fn test_printed_output_is_swallowed(&mut self, _ctx: &mut TestContext) -> TestResult {
        println!("PRINTED FROM A TEST BODY");
        print!("PRINTED WITHOUT A NEWLINE");
        Ok(())
    }
}

impl TestCase for OutputIsolationTest {
    fn name(&self) -> &str {
        "OutputIsolationTest"
    }

    fn tests(&self) -> Vec<TestMethod<Self>> {
        vec![TestMethod::new(
            "testPrintedOutputIsSwallowed",
            Self::test_printed_output_is_swallowed,
        )]
    }

    fn set_up(&mut self, _ctx: &mut TestContext) -> TestResult {
        println!("PRINTED FROM SETUP");
        Ok(())
    }

    fn tear_down(&mut self, _ctx: &mut TestContext) -> TestResult {
        println!("PRINTED FROM TEARDOWN");
        Ok(())
    }
}
