//! Implements the `testmore` command.

/// Main entry point for `testmore`.
fn main() {
    testmore_cli::entry::run();
}
