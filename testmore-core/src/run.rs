use std::io::{BufRead, Write};
use std::panic::Location;
use std::path::Path;

use crate::checks::{self, Check, NumericComparison};
use crate::diagnostics::Diagnostics;
use crate::{Options, Pattern, Regex, Reporter, Summary, TapReporter, error, trace_categories};

/// A test run: the context through which a test script makes its assertions.
///
/// Every assertion method evaluates its check, reports the outcome along with the caller's
/// source location, and on failure emits the check's diagnostics. Each returns `Ok(true)`
/// when the assertion passed and `Ok(false)` when it failed. A harness error (a malformed
/// pattern or expression) is recorded as a failed assertion whose diagnostic names the
/// error, and is then returned as `Err`.
pub struct TestRun<R: Reporter = TapReporter<std::io::Stdout, std::io::Stderr>> {
    reporter: R,
    options: Options,
}

impl TestRun {
    /// Returns a run reporting TAP to stdout, with diagnostics on stderr.
    ///
    /// # Arguments
    ///
    /// * `options` - Options for the run.
    pub fn stdio(options: Options) -> Self {
        let reporter = TapReporter::stdio().with_color(options.color);
        Self::new(reporter, options)
    }
}

impl<R: Reporter> TestRun<R> {
    /// Returns a run reporting to the given reporter.
    ///
    /// # Arguments
    ///
    /// * `reporter` - Receives the outcome of every assertion.
    /// * `options` - Options for the run.
    pub const fn new(reporter: R, options: Options) -> Self {
        Self { reporter, options }
    }

    /// Returns the run's reporter.
    pub const fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Consumes the run, returning its reporter.
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Asserts that a condition holds.
    #[track_caller]
    pub fn ok(&mut self, passed: bool, description: &str) -> Result<bool, error::Error> {
        let check = if passed {
            Check::pass()
        } else {
            Check::fail(Diagnostics::new())
        };

        self.record(check, description, Location::caller())
    }

    /// Records an unconditional pass.
    #[track_caller]
    pub fn pass(&mut self, description: &str) -> Result<bool, error::Error> {
        self.record(Check::pass(), description, Location::caller())
    }

    /// Records an unconditional failure.
    #[track_caller]
    pub fn fail(&mut self, description: &str) -> Result<bool, error::Error> {
        self.record(Check::fail(Diagnostics::new()), description, Location::caller())
    }

    /// Asserts that a `test`-style expression, given as separate arguments, holds.
    #[track_caller]
    pub fn ok_test<S: AsRef<str>>(
        &mut self,
        args: &[S],
        description: &str,
    ) -> Result<bool, error::Error> {
        let result = checks::expression(args);
        self.record_result(result, description, Location::caller())
    }

    /// Asserts that two strings are equal.
    #[track_caller]
    pub fn ok_eq(
        &mut self,
        actual: &str,
        expected: &str,
        description: &str,
    ) -> Result<bool, error::Error> {
        let check = checks::string_eq(actual, expected);
        self.record(check, description, Location::caller())
    }

    /// Asserts that two strings differ.
    #[track_caller]
    pub fn ok_neq(
        &mut self,
        actual: &str,
        unexpected: &str,
        description: &str,
    ) -> Result<bool, error::Error> {
        let check = checks::string_ne(actual, unexpected);
        self.record(check, description, Location::caller())
    }

    /// Asserts that a string matches a glob pattern in its entirety.
    #[track_caller]
    pub fn ok_match(
        &mut self,
        actual: &str,
        pattern: &str,
        description: &str,
    ) -> Result<bool, error::Error> {
        let result = checks::glob(actual, &self.pattern(pattern), false);
        self.record_result(result, description, Location::caller())
    }

    /// Asserts that a string does not match a glob pattern.
    #[track_caller]
    pub fn nok_match(
        &mut self,
        actual: &str,
        pattern: &str,
        description: &str,
    ) -> Result<bool, error::Error> {
        let result = checks::glob(actual, &self.pattern(pattern), true);
        self.record_result(result, description, Location::caller())
    }

    /// Asserts that a regular expression matches somewhere in a string.
    #[track_caller]
    pub fn ok_grep(
        &mut self,
        actual: &str,
        regex: &str,
        description: &str,
    ) -> Result<bool, error::Error> {
        let result = checks::regex(actual, &Regex::from(regex), false);
        self.record_result(result, description, Location::caller())
    }

    /// Asserts that a regular expression matches nowhere in a string.
    #[track_caller]
    pub fn nok_grep(
        &mut self,
        actual: &str,
        regex: &str,
        description: &str,
    ) -> Result<bool, error::Error> {
        let result = checks::regex(actual, &Regex::from(regex), true);
        self.record_result(result, description, Location::caller())
    }

    /// Asserts that two files have identical content.
    #[track_caller]
    pub fn ok_diff(
        &mut self,
        actual: impl AsRef<Path>,
        expected: impl AsRef<Path>,
        description: &str,
    ) -> Result<bool, error::Error> {
        let check = checks::files_equal(actual.as_ref(), expected.as_ref());
        self.record(check, description, Location::caller())
    }

    /// Asserts that `actual < expected`.
    #[track_caller]
    pub fn ok_lt(
        &mut self,
        actual: i64,
        expected: i64,
        description: &str,
    ) -> Result<bool, error::Error> {
        let check = checks::numeric(actual, NumericComparison::LessThan, expected);
        self.record(check, description, Location::caller())
    }

    /// Asserts that `actual <= expected`.
    #[track_caller]
    pub fn ok_le(
        &mut self,
        actual: i64,
        expected: i64,
        description: &str,
    ) -> Result<bool, error::Error> {
        let check = checks::numeric(actual, NumericComparison::LessThanOrEqualTo, expected);
        self.record(check, description, Location::caller())
    }

    /// Asserts that `actual > expected`.
    #[track_caller]
    pub fn ok_gt(
        &mut self,
        actual: i64,
        expected: i64,
        description: &str,
    ) -> Result<bool, error::Error> {
        let check = checks::numeric(actual, NumericComparison::GreaterThan, expected);
        self.record(check, description, Location::caller())
    }

    /// Asserts that `actual >= expected`.
    #[track_caller]
    pub fn ok_ge(
        &mut self,
        actual: i64,
        expected: i64,
        description: &str,
    ) -> Result<bool, error::Error> {
        let check = checks::numeric(actual, NumericComparison::GreaterThanOrEqualTo, expected);
        self.record(check, description, Location::caller())
    }

    /// Emits free-form diagnostic text.
    pub fn diag(&mut self, text: &str) -> Result<(), error::Error> {
        self.reporter.diag(text)
    }

    /// Emits every line read from the given reader as a diagnostic.
    pub fn diag_from(&mut self, reader: &mut dyn BufRead) -> Result<(), error::Error> {
        self.reporter.diag_from(reader)
    }

    /// Emits free-form text alongside the result lines.
    pub fn note(&mut self, text: &str) -> Result<(), error::Error> {
        self.reporter.note(text)
    }

    fn pattern(&self, pattern: &str) -> Pattern {
        Pattern::from(pattern).set_extended_globbing(self.options.extended_globbing)
    }

    fn record(
        &mut self,
        check: Check,
        description: &str,
        location: &Location<'_>,
    ) -> Result<bool, error::Error> {
        let number = self
            .reporter
            .report(check.passed, description, Some(location))?;

        tracing::debug!(
            target: trace_categories::ASSERT,
            "assertion {number} at {location}: passed={}",
            check.passed
        );

        if !check.diagnostics.is_empty() {
            let rendered = check.diagnostics.render(self.options.label_width);
            self.reporter.diag(rendered.as_str())?;
        }

        Ok(check.passed)
    }

    fn record_result(
        &mut self,
        result: Result<Check, error::Error>,
        description: &str,
        location: &Location<'_>,
    ) -> Result<bool, error::Error> {
        match result {
            Ok(check) => self.record(check, description, location),
            Err(err) => {
                tracing::debug!(target: trace_categories::ASSERT, "harness error at {location}: {err}");
                self.record(checks::harness_error(&err), description, location)?;
                Err(err)
            }
        }
    }
}

impl<O: Write, D: Write> TestRun<TapReporter<O, D>> {
    /// Declares the number of assertions the run will make.
    pub fn plan(&mut self, count: u32) -> Result<(), error::Error> {
        self.reporter.plan(count)
    }

    /// Records a skipped assertion.
    pub fn skip(&mut self, reason: &str) -> Result<u32, error::Error> {
        self.reporter.skip(reason)
    }

    /// Declares that the whole run is skipped.
    pub fn skip_all(&mut self, reason: &str) -> Result<(), error::Error> {
        self.reporter.skip_all(reason)
    }

    /// Aborts the run; always returns [`crate::Error::BailOut`].
    pub fn bail_out(&mut self, reason: &str) -> Result<(), error::Error> {
        self.reporter.bail_out(reason)
    }

    /// Finishes the run and summarizes it.
    pub fn done_testing(&mut self) -> Result<Summary, error::Error> {
        self.reporter.done_testing()
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    type BufferRun = TestRun<TapReporter<Vec<u8>, Vec<u8>>>;

    fn new_run() -> BufferRun {
        TestRun::new(TapReporter::new(vec![], vec![]), Options::default())
    }

    fn output(run: BufferRun) -> Result<(String, String)> {
        let (out, diag) = run.into_reporter().into_writers();
        Ok((String::from_utf8(out)?, String::from_utf8(diag)?))
    }

    #[test]
    fn passing_assertion_emits_no_diagnostics() -> Result<()> {
        let mut run = new_run();
        assert!(run.ok_eq("foo", "foo", "desc")?);

        let (out, diag) = output(run)?;
        assert_eq!(out, "ok 1 - desc\n");
        assert_eq!(diag, "");

        Ok(())
    }

    #[test]
    fn failing_assertion_is_attributed_to_caller() -> Result<()> {
        let mut run = new_run();
        let line = line!() + 1;
        assert!(!run.ok_eq("foo", "bar", "desc")?);

        let (out, diag) = output(run)?;
        assert_eq!(out, "not ok 1 - desc\n");
        assert_eq!(
            diag,
            std::format!(
                "#   Failed test 'desc'\n#   at {} line {line}.\n#          got: 'foo'\n#     expected: 'bar'\n",
                file!()
            )
        );

        Ok(())
    }

    #[test]
    fn missing_file_fails_with_diagnostic() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing");
        let other = dir.path().join("other");
        std::fs::write(&other, "x")?;

        let mut run = new_run();
        assert!(!run.ok_diff(&missing, &other, "")?);
        assert!(run.ok_diff(&other, &other, "")?);

        let (out, diag) = output(run)?;
        assert_eq!(out, "not ok 1\nok 2\n");
        assert!(diag.contains(&std::format!("'{}' doesn't exist", missing.display())));

        Ok(())
    }

    #[test]
    fn numeric_assertions() -> Result<()> {
        let mut run = new_run();
        assert!(run.ok_lt(3, 5, "")?);
        assert!(!run.ok_lt(5, 3, "")?);
        assert!(run.ok_le(3, 3, "")?);
        assert!(run.ok_gt(4, 3, "")?);
        assert!(run.ok_ge(3, 3, "")?);

        assert_eq!(run.reporter().counters().failed, 1);

        let (_, diag) = output(run)?;
        assert!(diag.contains("#     expected: a number less than 3\n"));

        Ok(())
    }

    #[test]
    fn matching_assertions() -> Result<()> {
        let mut run = new_run();
        assert!(run.ok_match("hello world", "hello*", "")?);
        assert!(run.nok_match("hello world", "world*", "")?);
        assert!(run.ok_grep("line one\nline two", "^line two$", "")?);
        assert!(run.nok_grep("abc", "[0-9]", "")?);
        assert!(run.ok_neq("a", "b", "")?);
        assert!(run.ok_test(&["-n", "x"], "")?);

        assert_eq!(run.reporter().counters().passed, 6);

        Ok(())
    }

    #[test]
    fn extended_globbing_follows_options() -> Result<()> {
        let options = Options::builder().extended_globbing(true).build();
        let mut run = TestRun::new(TapReporter::new(vec![], vec![]), options);

        assert!(run.ok_match("b.txt", "@(a|b).txt", "")?);

        Ok(())
    }

    #[test]
    fn malformed_regex_is_recorded_and_returned() -> Result<()> {
        let mut run = new_run();
        assert!(run.nok_grep("abc", "(", "bad regex").is_err());
        assert_eq!(run.reporter().counters().failed, 1);

        let (out, diag) = output(run)?;
        assert_eq!(out, "not ok 1 - bad regex\n");
        assert!(diag.contains("#        error: invalid regex"));

        Ok(())
    }

    #[test]
    fn label_width_follows_options() -> Result<()> {
        let options = Options::builder().label_width(4).build();
        let mut run = TestRun::new(TapReporter::new(vec![], vec![]), options);
        run.ok_eq("a", "b", "")?;

        let (_, diag) = output(run)?;
        assert!(diag.ends_with("#  got: 'a'\n# expected: 'b'\n"));

        Ok(())
    }

    #[test]
    fn plan_and_done_testing() -> Result<()> {
        let mut run = new_run();
        run.plan(2)?;
        run.pass("first")?;
        run.skip("not today")?;
        run.note("a note")?;

        let summary = run.done_testing()?;
        assert!(summary.is_success());

        let (out, _) = output(run)?;
        assert_eq!(out, "1..2\nok 1 - first\nok 2 # skip not today\n# a note\n");

        Ok(())
    }

    #[test]
    fn explicit_failures() -> Result<()> {
        let mut run = new_run();
        assert!(!run.ok(false, "")?);
        assert!(!run.fail("")?);
        run.diag_from(&mut "extra\n".as_bytes())?;

        let summary = run.done_testing()?;
        assert_eq!(summary.exit_code(), 2);

        let (_, diag) = output(run)?;
        assert!(diag.contains("# extra\n"));
        assert!(diag.ends_with("# Looks like you failed 2 tests of 2.\n"));

        Ok(())
    }
}
