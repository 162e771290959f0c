//! The comparator set: pure predicates that evaluate one condition and describe why it
//! failed. Nothing here reports; see [`crate::TestRun`] for that.

use std::path::Path;

use crate::diagnostics::{Diagnostics, quoted};
use crate::{Pattern, Regex, error, filediff, testexpr, trace_categories};

/// Outcome of evaluating a single check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    /// Whether the check passed.
    pub passed: bool,
    /// Why the check failed; empty when it passed.
    pub diagnostics: Diagnostics,
}

impl Check {
    /// Returns a passing check.
    pub const fn pass() -> Self {
        Self {
            passed: true,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Returns a failing check with the given diagnostics.
    pub const fn fail(diagnostics: Diagnostics) -> Self {
        Self {
            passed: false,
            diagnostics,
        }
    }

    fn from_outcome(passed: bool, describe: impl FnOnce() -> Diagnostics) -> Self {
        tracing::debug!(target: trace_categories::ASSERT, "check passed: {passed}");

        if passed {
            Self::pass()
        } else {
            Self::fail(describe())
        }
    }
}

fn got_expected(actual: impl std::fmt::Display, expected: impl Into<String>) -> Diagnostics {
    Diagnostics::new()
        .labeled("got", quoted(actual))
        .labeled("expected", expected)
}

/// Checks that two strings are identical.
pub fn string_eq(actual: &str, expected: &str) -> Check {
    Check::from_outcome(actual == expected, || {
        got_expected(actual, quoted(expected))
    })
}

/// Checks that two strings differ.
pub fn string_ne(actual: &str, unexpected: &str) -> Check {
    Check::from_outcome(actual != unexpected, || {
        got_expected(actual, "(something else)")
    })
}

/// Checks whether a string matches a glob pattern in its entirety.
///
/// # Arguments
///
/// * `actual` - The value under test.
/// * `pattern` - The glob pattern.
/// * `negate` - If true, the check passes when the value does *not* match.
pub fn glob(actual: &str, pattern: &Pattern, negate: bool) -> Result<Check, error::Error> {
    let matched = pattern.exactly_matches(actual)?;

    Ok(Check::from_outcome(matched != negate, || {
        let relation = if negate { "not matching" } else { "matching" };
        got_expected(
            actual,
            std::format!("a glob {relation} {}", quoted(pattern.as_str())),
        )
    }))
}

/// Checks whether a regular expression matches anywhere in a string.
///
/// # Arguments
///
/// * `actual` - The value under test.
/// * `regex` - The regular expression.
/// * `negate` - If true, the check passes when the expression does *not* match.
pub fn regex(actual: &str, regex: &Regex, negate: bool) -> Result<Check, error::Error> {
    let matched = regex.is_match(actual)?;

    Ok(Check::from_outcome(matched != negate, || {
        let relation = if negate { "not matching" } else { "matching" };
        got_expected(
            actual,
            std::format!("a regex {relation} {}", quoted(regex.as_str())),
        )
    }))
}

/// An integer ordering relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericComparison {
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqualTo,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqualTo,
}

impl NumericComparison {
    /// Returns whether `left <op> right` holds.
    pub const fn holds(self, left: i64, right: i64) -> bool {
        match self {
            Self::LessThan => left < right,
            Self::LessThanOrEqualTo => left <= right,
            Self::GreaterThan => left > right,
            Self::GreaterThanOrEqualTo => left >= right,
        }
    }

    const fn phrase(self) -> &'static str {
        match self {
            Self::LessThan => "less than",
            Self::LessThanOrEqualTo => "less than or equal to",
            Self::GreaterThan => "greater than",
            Self::GreaterThanOrEqualTo => "greater than or equal to",
        }
    }
}

/// Checks an integer ordering relation between two values.
pub fn numeric(actual: i64, op: NumericComparison, expected: i64) -> Check {
    Check::from_outcome(op.holds(actual, expected), || {
        got_expected(actual, std::format!("a number {} {expected}", op.phrase()))
    })
}

/// Checks that two files have byte-for-byte identical content. A file that is missing or
/// unreadable fails the check without any content being compared.
pub fn files_equal(left: &Path, right: &Path) -> Check {
    let comparison = filediff::compare_files(left, right);

    Check::from_outcome(comparison.is_same(), || {
        filediff::to_diagnostics(&comparison, left, right)
    })
}

/// Checks an arbitrary `test`-style expression, given as its separate arguments
/// (e.g. `["-f", "out.txt"]`).
pub fn expression<S: AsRef<str>>(args: &[S]) -> Result<Check, error::Error> {
    let expr = testmore_parser::test_command::parse(args)?;
    let passed = testexpr::eval_test_expr(&expr)?;

    Ok(Check::from_outcome(passed, || {
        Diagnostics::new().labeled("failed test", expr.to_string())
    }))
}

/// Describes a harness error (a malformed pattern, say) as a failure diagnostic.
pub fn harness_error(err: &error::Error) -> Check {
    Check::fail(Diagnostics::new().labeled("error", err.to_string()))
}
