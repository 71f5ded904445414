//! The `sfut` command-line interface.
//!
//! Thin glue over the library: parse arguments, set up logging, run the
//! built-in suites and turn the run into an exit status.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use crate::cli::args::SfutArgs;
use crate::color::ColorMode;
use crate::output::SharedSink;
use crate::results::ResultAccumulator;
use crate::runner::{Runner, RunnerConfig, SuiteEnv, TestRegistry};
use crate::selftest;
use crate::terminal::TerminalString;

pub mod args;

/// Exit status reserved for usage errors; clap uses the same value.
pub const USAGE_ERROR: u8 = 2;

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    init_logging();
    let args = SfutArgs::parse();
    debug!(?args, "parsed arguments");

    let registry = selftest::registry();
    if args.list {
        list_units(&registry);
        return ExitCode::SUCCESS;
    }

    let mut runner = Runner::new(RunnerConfig { color: args.color });
    match runner.run_all(&registry) {
        0 => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

/// Logs go to stderr so they never interleave with the report on stdout.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}

fn list_units(registry: &TestRegistry) {
    let env = SuiteEnv {
        results: ResultAccumulator::shared(),
        terminal: TerminalString::from_boxed(ColorMode::Never.color_support()),
        sink: SharedSink::stdout(),
    };
    for suite in registry.instantiate(&env) {
        let class = suite.class_name();
        for name in suite.test_names() {
            env.sink.emit(&format!("{class}::{name}"));
        }
    }
}
