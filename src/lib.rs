//! sfut: a small unit-test harness that lives next to the code it tests.
//!
//! Suites implement [`TestCase`], list their units explicitly and get
//! fixture hooks, expected-exception checks and `assert_same`. A [`Runner`]
//! drives every suite in a [`TestRegistry`], prints one line per unit and a
//! colored summary, and returns the process exit code.

pub mod case;
pub mod cli;
pub mod color;
pub mod engine;
pub mod errors;
pub mod output;
pub mod results;
pub mod runner;
pub mod selftest;
pub mod terminal;

pub use crate::case::{TestCase, TestContext, TestMethod};
pub use crate::color::{ColorMode, ColorSupport, EnvColorSupport, FixedColorSupport};
pub use crate::engine::{Outcome, RunnableSuite, TestSuite};
pub use crate::errors::{TestFailure, TestResult};
pub use crate::results::{ResultAccumulator, SharedResults};
pub use crate::runner::{Runner, RunnerConfig, TestRegistry};
pub use crate::terminal::TerminalString;
