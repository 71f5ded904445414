//! Command-line arguments for the `sfut` binary.
//!
//! Parsed with clap's derive API; `--help` and `--version` come for free and
//! clap exits with status 2 on usage errors.

use clap::Parser;

use crate::color::ColorMode;

#[derive(Debug, Parser)]
#[command(
    name = "sfut",
    version,
    about = "Single File Unit Test: runs the registered test suites and reports a summary."
)]
pub struct SfutArgs {
    /// When to color the report.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Print the `Class::method` identifiers of every unit without running them.
    #[arg(long)]
    pub list: bool,
}
