//! Run-wide counters and the list of failed tests.

use std::cell::RefCell;
use std::rc::Rc;

/// Handle to the accumulator every suite in a run writes into.
pub type SharedResults = Rc<RefCell<ResultAccumulator>>;

/// Counts tests, assertions and failures for one run. Counts only ever grow.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultAccumulator {
    test_count: usize,
    fail_count: usize,
    assertion_count: usize,
    failed_tests: Vec<String>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedResults {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn increment_test_count(&mut self) {
        self.test_count += 1;
    }

    pub fn increment_fail_count(&mut self) {
        self.fail_count += 1;
    }

    pub fn increment_assertion_count(&mut self) {
        self.assertion_count += 1;
    }

    pub fn add_failed_test(&mut self, identifier: impl Into<String>) {
        self.failed_tests.push(identifier.into());
    }

    /// Bumps the failure count and logs the identifier in one step.
    pub fn record_failure(&mut self, identifier: impl Into<String>) {
        self.increment_fail_count();
        self.add_failed_test(identifier);
    }

    pub fn test_count(&self) -> usize {
        self.test_count
    }

    pub fn fail_count(&self) -> usize {
        self.fail_count
    }

    pub fn assertion_count(&self) -> usize {
        self.assertion_count
    }

    pub fn failed_tests(&self) -> &[String] {
        &self.failed_tests
    }

    pub fn has_failures(&self) -> bool {
        self.fail_count > 0
    }

    pub fn summary_message(&self) -> String {
        if self.has_failures() {
            format!(
                "FAILURES!\nTests: {} Assertions: {} Failures: {}.",
                self.test_count, self.assertion_count, self.fail_count
            )
        } else {
            format!(
                "OK ({} tests, {} assertions)",
                self.test_count, self.assertion_count
            )
        }
    }

    /// Process exit status for this run.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_tests_keep_append_order() {
        let mut acc = ResultAccumulator::new();
        acc.add_failed_test("TestClass::testMethod1");
        assert_eq!(acc.failed_tests(), ["TestClass::testMethod1"]);
        acc.add_failed_test("TestClass::testMethod2");
        assert_eq!(
            acc.failed_tests(),
            ["TestClass::testMethod1", "TestClass::testMethod2"]
        );
    }

    #[test]
    fn has_failures_follows_fail_count_only() {
        let mut acc = ResultAccumulator::new();
        acc.add_failed_test("TestClass::testMethod1");
        assert!(!acc.has_failures());
        acc.increment_fail_count();
        assert!(acc.has_failures());
    }

    #[test]
    fn record_failure_keeps_count_and_list_in_step() {
        let mut acc = ResultAccumulator::new();
        for i in 0..3 {
            acc.record_failure(format!("T::test{i}"));
            assert_eq!(acc.fail_count(), acc.failed_tests().len());
            assert_eq!(acc.has_failures(), acc.fail_count() > 0);
        }
        acc.record_failure("T::test0");
        assert_eq!(acc.failed_tests().len(), 4);
    }

    #[test]
    fn empty_run_summary() {
        assert_eq!(ResultAccumulator::new().summary_message(), "OK (0 tests, 0 assertions)");
    }

    #[test]
    fn success_summary() {
        let mut acc = ResultAccumulator::new();
        acc.increment_test_count();
        acc.increment_test_count();
        for _ in 0..3 {
            acc.increment_assertion_count();
        }
        assert_eq!(acc.summary_message(), "OK (2 tests, 3 assertions)");
        assert_eq!(acc.exit_code(), 0);
    }

    #[test]
    fn failure_summary() {
        let mut acc = ResultAccumulator::new();
        acc.increment_test_count();
        acc.increment_assertion_count();
        acc.increment_assertion_count();
        acc.increment_test_count();
        acc.increment_assertion_count();
        acc.record_failure("SomeTest::testFailingMethod");
        acc.increment_test_count();
        acc.increment_assertion_count();

        assert_eq!(acc.failed_tests(), ["SomeTest::testFailingMethod"]);
        assert_eq!(
            acc.summary_message(),
            "FAILURES!\nTests: 3 Assertions: 4 Failures: 1."
        );
        assert_eq!(acc.exit_code(), 1);
    }
}
