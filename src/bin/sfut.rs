// sfut runner: executes the built-in suites and exits 0 on success, 1 on failures.
// Usage: cargo run --bin sfut -- [--color auto|always|never] [--list]

use std::process::ExitCode;

fn main() -> ExitCode {
    sfut::cli::run()
}
