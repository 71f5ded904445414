//! Runs every registered suite and prints the run summary.

use std::rc::Rc;

use tracing::info;

use crate::case::TestCase;
use crate::color::{ColorMode, ColorSupport};
use crate::engine::{RunnableSuite, TestSuite};
use crate::output::SharedSink;
use crate::results::{ResultAccumulator, SharedResults};
use crate::terminal::TerminalString;

/// Configuration for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerConfig {
    pub color: ColorMode,
}

/// Everything a factory needs to build a suite bound to the current run.
#[derive(Clone)]
pub struct SuiteEnv {
    pub results: SharedResults,
    pub terminal: TerminalString,
    pub sink: SharedSink,
}

type SuiteFactory = Box<dyn Fn(&SuiteEnv) -> Box<dyn RunnableSuite>>;

/// Ordered list of suites to run. Registration order is run order.
#[derive(Default)]
pub struct TestRegistry {
    factories: Vec<SuiteFactory>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a suite built with `Default`.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: TestCase + Default + 'static,
    {
        self.register_with(T::default)
    }

    /// Registers a suite built by `make` each time the registry is run.
    pub fn register_with<T, F>(&mut self, make: F) -> &mut Self
    where
        T: TestCase + 'static,
        F: Fn() -> T + 'static,
    {
        self.factories.push(Box::new(move |env: &SuiteEnv| {
            Box::new(TestSuite::with_output(
                make(),
                env.results.clone(),
                env.terminal.clone(),
                env.sink.clone(),
            )) as Box<dyn RunnableSuite>
        }));
        self
    }

    /// Instantiates every suite against `env`.
    pub fn instantiate(&self, env: &SuiteEnv) -> Vec<Box<dyn RunnableSuite>> {
        self.factories.iter().map(|make| make(env)).collect()
    }
}

/// Drives a [`TestRegistry`] and owns the run's accumulator.
pub struct Runner {
    env: SuiteEnv,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_output(
            TerminalString::from_boxed(config.color.color_support()),
            SharedSink::stdout(),
        )
    }

    pub fn with_color_support(color_support: Rc<dyn ColorSupport>, sink: SharedSink) -> Self {
        Self::with_output(TerminalString::new(color_support), sink)
    }

    pub fn with_output(terminal: TerminalString, sink: SharedSink) -> Self {
        Self {
            env: SuiteEnv {
                results: ResultAccumulator::shared(),
                terminal,
                sink,
            },
        }
    }

    pub fn results(&self) -> &SharedResults {
        &self.env.results
    }

    /// Runs every registered suite, prints the summary and returns the exit
    /// code: `0` when nothing failed, `1` otherwise.
    pub fn run_all(&mut self, registry: &TestRegistry) -> i32 {
        self.env.results = ResultAccumulator::shared();

        for mut suite in registry.instantiate(&self.env) {
            suite.run_tests();
        }

        self.show_results();
        self.env.results.borrow().exit_code()
    }

    fn show_results(&self) {
        let results = self.env.results.borrow();
        info!(
            tests = results.test_count(),
            assertions = results.assertion_count(),
            failures = results.fail_count(),
            "run finished"
        );

        let (fg, bg) = if results.has_failures() {
            ("white", "red")
        } else {
            ("black", "green")
        };
        self.env.sink.emit("");
        self.env
            .sink
            .emit(&self.env.terminal.text(&results.summary_message(), Some(fg), Some(bg)));
        for failed in results.failed_tests() {
            self.env.sink.emit(&format!("  - {failed}"));
        }
    }
}
