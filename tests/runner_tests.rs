//! Runner: shared accumulator, summary block, exit codes.

use std::rc::Rc;

use sfut::output::SharedSink;
use sfut::{FixedColorSupport, Runner, TestCase, TestContext, TestFailure, TestMethod, TestRegistry, TestResult};

#[derive(Default)]
struct Green;

impl Green {
    fn one(&mut self, ctx: &mut TestContext) -> TestResult {
        ctx.assert_same(1, 1, "")?;
        ctx.assert_same("x", "x", "")
    }
}

impl TestCase for Green {
    fn name(&self) -> &str {
        "Green"
    }

    fn tests(&self) -> Vec<TestMethod<Self>> {
        vec![TestMethod::new("testOne", Self::one)]
    }
}

#[derive(Default)]
struct Red;

impl Red {
    fn fails(&mut self, ctx: &mut TestContext) -> TestResult {
        ctx.assert_same(1, 2, "one is not two")
    }

    fn raises(&mut self, _ctx: &mut TestContext) -> TestResult {
        Err(TestFailure::exception("Invalid argument"))
    }
}

impl TestCase for Red {
    fn name(&self) -> &str {
        "Red"
    }

    fn tests(&self) -> Vec<TestMethod<Self>> {
        vec![
            TestMethod::new("testFails", Self::fails),
            TestMethod::new("testRaises", Self::raises),
        ]
    }
}

fn runner(color: bool) -> (Runner, Rc<std::cell::RefCell<sfut::output::OutputBuffer>>) {
    let (sink, buffer) = SharedSink::buffer();
    (Runner::with_color_support(Rc::new(FixedColorSupport::new(color)), sink), buffer)
}

#[test]
fn all_green_run_exits_zero() {
    let mut registry = TestRegistry::new();
    registry.register::<Green>();
    let (mut runner, buffer) = runner(false);

    assert_eq!(runner.run_all(&registry), 0);
    assert_eq!(buffer.borrow().as_str(), "✔ Green::testOne\n\nOK (1 tests, 2 assertions)\n");
}

#[test]
fn failures_are_summarized_across_suites() {
    let mut registry = TestRegistry::new();
    registry.register::<Green>().register::<Red>();
    let (mut runner, buffer) = runner(false);

    assert_eq!(runner.run_all(&registry), 1);

    let report = buffer.borrow().as_str().to_string();
    assert!(report.ends_with(
        "\nFAILURES!\nTests: 3 Assertions: 3 Failures: 2.\n  - Red::testFails\n  - Red::testRaises\n"
    ));
    let results = runner.results().borrow();
    assert_eq!(results.fail_count(), results.failed_tests().len());
}

#[test]
fn summary_is_colored_per_line() {
    let mut registry = TestRegistry::new();
    registry.register::<Red>();
    let (mut runner, buffer) = runner(true);
    runner.run_all(&registry);

    let report = buffer.borrow().as_str().to_string();
    assert!(report.contains("\x1b[97;41mFAILURES!\x1b[0m\n\x1b[97;41mTests: 2 Assertions: 1 Failures: 2.\x1b[0m\n"));
    assert!(report.ends_with("  - Red::testFails\n  - Red::testRaises\n"));
}

#[test]
fn success_summary_is_black_on_green() {
    let mut registry = TestRegistry::new();
    registry.register::<Green>();
    let (mut runner, buffer) = runner(true);
    runner.run_all(&registry);
    assert!(buffer
        .borrow()
        .as_str()
        .ends_with("\n\x1b[30;42mOK (1 tests, 2 assertions)\x1b[0m\n"));
}

#[test]
fn empty_registry_reports_ok() {
    let (mut runner, buffer) = runner(false);
    assert_eq!(runner.run_all(&TestRegistry::new()), 0);
    assert_eq!(buffer.borrow().as_str(), "\nOK (0 tests, 0 assertions)\n");
}

#[test]
fn each_run_starts_from_fresh_counters() {
    let mut registry = TestRegistry::new();
    registry.register_with(|| Red);
    let (mut runner, _buffer) = runner(false);
    runner.run_all(&registry);
    runner.run_all(&registry);
    assert_eq!(runner.results().borrow().test_count(), 2);
}

#[test]
fn builtin_suites_pass() {
    let (mut runner, buffer) = runner(false);
    let code = runner.run_all(&sfut::selftest::registry());
    let report = buffer.borrow().as_str().to_string();
    assert_eq!(code, 0, "{report}");
    assert!(report.contains("✔ CalculatorTest::testInvalidOperationThrows (expected exception caught)"));
    assert!(!report.contains("this never reaches the report"));
}
