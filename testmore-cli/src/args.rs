//! Command-line arguments for `testmore`.

use clap::{Parser, Subcommand, builder::styling};
use std::path::PathBuf;

use crate::{events, productinfo};

const SHORT_DESCRIPTION: &str = "TAP assertions for shell test scripts";

const LONG_DESCRIPTION: &str = r"
testmore evaluates a single assertion, prints its TAP result line to stdout, and on failure
prints an aligned diagnostic block to stderr.

Exit status is 0 if the assertion passed, 1 if it failed, and 2 if it could not be evaluated
(a malformed pattern or expression, for example).
";

/// Parsed command-line arguments for `testmore`.
#[derive(Parser)]
#[clap(name = productinfo::PRODUCT_NAME,
       version = productinfo::PRODUCT_VERSION,
       about = SHORT_DESCRIPTION,
       long_about = LONG_DESCRIPTION,
       styles = help_styles())]
#[allow(clippy::module_name_repetitions)]
pub struct CommandLineArgs {
    /// Number to give the assertion in its TAP result line.
    #[clap(
        short = 'n',
        long = "number",
        value_name = "N",
        default_value_t = 1,
        global = true
    )]
    pub number: u32,

    /// Description of the assertion.
    #[clap(
        short = 'm',
        long = "message",
        value_name = "DESC",
        default_value = "",
        global = true
    )]
    pub message: String,

    /// Path to a configuration file.
    #[clap(
        long = "config",
        env = "TESTMORE_CONFIG",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// Don't load any configuration file.
    #[clap(long = "no-config", global = true)]
    pub no_config: bool,

    /// Accept extended glob syntax (`@(a|b)`, `!(x)`, ...) in patterns.
    #[clap(long = "extglob", global = true)]
    pub extended_globbing: bool,

    /// Colorize the result line.
    #[clap(long = "color", global = true)]
    pub color: bool,

    /// Enable debug logging for classes of tracing events.
    #[clap(long = "debug", value_name = "EVENT", global = true)]
    pub enabled_debug_events: Vec<events::TraceEvent>,

    /// Disable logging for classes of tracing events.
    #[clap(long = "disable-event", value_name = "EVENT", global = true)]
    pub disabled_events: Vec<events::TraceEvent>,

    /// The assertion to evaluate.
    #[clap(subcommand)]
    pub command: Command,
}

/// An assertion, or a diagnostic to emit.
#[derive(Subcommand)]
pub enum Command {
    /// Passes if two strings are equal.
    Eq {
        /// The value under test.
        #[clap(allow_hyphen_values = true)]
        actual: String,
        /// The expected value.
        #[clap(allow_hyphen_values = true)]
        expected: String,
    },

    /// Passes if two strings differ.
    Ne {
        /// The value under test.
        #[clap(allow_hyphen_values = true)]
        actual: String,
        /// The value `actual` must not equal.
        #[clap(allow_hyphen_values = true)]
        unexpected: String,
    },

    /// Passes if a string matches a glob pattern in its entirety.
    Like {
        /// The value under test.
        #[clap(allow_hyphen_values = true)]
        actual: String,
        /// The glob pattern.
        #[clap(allow_hyphen_values = true)]
        pattern: String,
    },

    /// Passes if a string does not match a glob pattern.
    Unlike {
        /// The value under test.
        #[clap(allow_hyphen_values = true)]
        actual: String,
        /// The glob pattern.
        #[clap(allow_hyphen_values = true)]
        pattern: String,
    },

    /// Passes if a regular expression matches somewhere in a string.
    Grep {
        /// The value under test.
        #[clap(allow_hyphen_values = true)]
        actual: String,
        /// The regular expression.
        #[clap(allow_hyphen_values = true)]
        regex: String,
    },

    /// Passes if a regular expression matches nowhere in a string.
    Nogrep {
        /// The value under test.
        #[clap(allow_hyphen_values = true)]
        actual: String,
        /// The regular expression.
        #[clap(allow_hyphen_values = true)]
        regex: String,
    },

    /// Passes if two files have identical content.
    Diff {
        /// The file under test.
        actual: PathBuf,
        /// The file holding the expected content.
        expected: PathBuf,
    },

    /// Passes if `actual < expected`.
    Lt(NumericArgs),

    /// Passes if `actual <= expected`.
    Le(NumericArgs),

    /// Passes if `actual > expected`.
    Gt(NumericArgs),

    /// Passes if `actual >= expected`.
    Ge(NumericArgs),

    /// Passes if a `test` expression holds (e.g. `testmore test -- -f out.txt`).
    Test {
        /// The expression, as separate arguments.
        #[clap(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        expression: Vec<String>,
    },

    /// Prints a diagnostic to stderr; reads it from stdin when no text is given.
    Diag {
        /// Text of the diagnostic.
        #[clap(allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Prints a comment to stdout.
    Note {
        /// Text of the comment.
        #[clap(required = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
}

/// Operands of an integer comparison.
#[derive(clap::Args)]
pub struct NumericArgs {
    /// The value under test.
    #[clap(allow_negative_numbers = true)]
    pub actual: i64,
    /// The value to compare against.
    #[clap(allow_negative_numbers = true)]
    pub expected: i64,
}

/// Returns clap styling to be used for command-line help.
fn help_styles() -> clap::builder::Styles {
    styling::Styles::styled()
        .header(
            styling::AnsiColor::Yellow.on_default()
                | styling::Effects::BOLD
                | styling::Effects::UNDERLINE,
        )
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Magenta.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    #[test]
    fn global_options_precede_command() -> Result<()> {
        let args = CommandLineArgs::try_parse_from([
            "testmore", "-n", "3", "-m", "greeting", "eq", "foo", "bar",
        ])?;

        assert_eq!(args.number, 3);
        assert_eq!(args.message, "greeting");
        assert!(matches!(
            args.command,
            Command::Eq { ref actual, ref expected } if actual == "foo" && expected == "bar"
        ));

        Ok(())
    }

    #[test]
    fn negative_numbers_are_operands() -> Result<()> {
        let args = CommandLineArgs::try_parse_from(["testmore", "lt", "-5", "-3"])?;
        assert!(matches!(
            args.command,
            Command::Lt(NumericArgs {
                actual: -5,
                expected: -3
            })
        ));

        Ok(())
    }

    #[test]
    fn non_numeric_operands_are_rejected() {
        assert!(CommandLineArgs::try_parse_from(["testmore", "gt", "five", "3"]).is_err());
    }

    #[test]
    fn test_expression_keeps_hyphens() -> Result<()> {
        let args = CommandLineArgs::try_parse_from(["testmore", "test", "--", "-f", "x"])?;
        assert!(matches!(
            args.command,
            Command::Test { ref expression } if expression == &["-f", "x"]
        ));

        Ok(())
    }

    #[test]
    fn debug_events_are_parsed() -> Result<()> {
        let args = CommandLineArgs::try_parse_from([
            "testmore", "--debug", "pattern", "--debug", "assert", "note", "hi",
        ])?;
        assert_eq!(
            args.enabled_debug_events,
            vec![events::TraceEvent::Pattern, events::TraceEvent::Assert]
        );

        Ok(())
    }
}
