//! Implements the command-line interface for `testmore`.

use clap::Parser;
use std::io::IsTerminal;
use testmore_core::{Options, TapReporter, TestRun};

use crate::args::{CommandLineArgs, Command};
use crate::{config, error::Error, events, productinfo};

/// Exit status for a passing assertion.
pub const EXIT_PASSED: u8 = 0;
/// Exit status for a failing assertion.
pub const EXIT_FAILED: u8 = 1;
/// Exit status when the assertion could not be evaluated.
pub const EXIT_HARNESS_ERROR: u8 = 2;

/// Main entry point for `testmore`.
pub fn run() {
    install_panic_handlers();

    let parsed_args = match CommandLineArgs::try_parse() {
        Ok(parsed_args) => parsed_args,
        Err(e) => {
            let _ = e.print();

            // clap returns errors for `--help` and `--version` too.
            let exit_code = match e.kind() {
                clap::error::ErrorKind::DisplayVersion | clap::error::ErrorKind::DisplayHelp => {
                    EXIT_PASSED
                }
                _ => EXIT_HARNESS_ERROR,
            };

            std::process::exit(i32::from(exit_code));
        }
    };

    let exit_code = match run_with_args(parsed_args) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("error: {err:#}");
            EXIT_HARNESS_ERROR
        }
    };

    std::process::exit(i32::from(exit_code));
}

/// Installs a panic handler reporting a human-readable message instead of a backtrace.
fn install_panic_handlers() {
    human_panic::setup_panic!(
        human_panic::Metadata::new(productinfo::PRODUCT_NAME, productinfo::PRODUCT_VERSION)
            .support("please file an issue describing the command that crashed")
    );
}

/// Evaluates the requested assertion. Returns the exit code.
///
/// # Arguments
///
/// * `args` - The parsed command-line arguments.
pub fn run_with_args(args: CommandLineArgs) -> Result<u8, Error> {
    let mut event_config =
        events::TraceEventConfig::init(&args.enabled_debug_events, &args.disabled_events);

    let options = load_options(&args, &mut event_config)?;

    if options.color {
        colored::control::set_override(true);
    }

    let reporter = TapReporter::stdio()
        .with_color(options.color)
        .with_locations(false)
        .numbered_from(args.number);

    let mut run = TestRun::new(reporter, options);

    let passed = run_command(&mut run, args.command, args.message.as_str())?;

    Ok(if passed { EXIT_PASSED } else { EXIT_FAILED })
}

fn load_options(
    args: &CommandLineArgs,
    event_config: &mut events::TraceEventConfig,
) -> Result<Options, Error> {
    let result = config::load_config(args.no_config, args.config_file.as_deref());

    if let Some(error) = result.error {
        if result.explicit_path {
            return Err(Error::Config {
                path: result.path.unwrap_or_default(),
                source: error,
            });
        }

        let path = result.path.unwrap_or_default();
        tracing::warn!("ignoring config file {}: {error}", path.display());
        return Ok(config::Config::default().to_options(args));
    }

    for event in &result.config.logging.debug_events {
        event_config.enable(*event)?;
    }

    Ok(result.config.to_options(args))
}

fn run_command(
    run: &mut TestRun,
    command: Command,
    message: &str,
) -> Result<bool, testmore_core::Error> {
    match command {
        Command::Eq { actual, expected } => run.ok_eq(&actual, &expected, message),
        Command::Ne { actual, unexpected } => run.ok_neq(&actual, &unexpected, message),
        Command::Like { actual, pattern } => run.ok_match(&actual, &pattern, message),
        Command::Unlike { actual, pattern } => run.nok_match(&actual, &pattern, message),
        Command::Grep { actual, regex } => run.ok_grep(&actual, &regex, message),
        Command::Nogrep { actual, regex } => run.nok_grep(&actual, &regex, message),
        Command::Diff { actual, expected } => run.ok_diff(actual, expected, message),
        Command::Lt(n) => run.ok_lt(n.actual, n.expected, message),
        Command::Le(n) => run.ok_le(n.actual, n.expected, message),
        Command::Gt(n) => run.ok_gt(n.actual, n.expected, message),
        Command::Ge(n) => run.ok_ge(n.actual, n.expected, message),
        Command::Test { expression } => run.ok_test(&expression, message),
        Command::Diag { text } => {
            if text.is_empty() {
                let stdin = std::io::stdin();
                if stdin.is_terminal() {
                    tracing::warn!("reading diagnostic text from terminal");
                }
                run.diag_from(&mut stdin.lock())?;
            } else {
                run.diag(text.join(" ").as_str())?;
            }
            Ok(true)
        }
        Command::Note { text } => {
            run.note(text.join(" ").as_str())?;
            Ok(true)
        }
    }
}
