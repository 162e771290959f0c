//! Reporting of assertion outcomes in the Test Anything Protocol (TAP) format.

use std::io::{BufRead, Write};
use std::panic::Location;

use colored::Colorize;

use crate::{error, trace_categories};

/// Running tally of assertion outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Number of assertions reported, including skipped ones.
    pub run: u32,
    /// Number of assertions that passed (skipped assertions count as passed).
    pub passed: u32,
    /// Number of assertions that failed.
    pub failed: u32,
    /// Number of assertions that were skipped.
    pub skipped: u32,
}

/// Receives the outcome of each assertion and the free-form diagnostics that accompany
/// failures.
pub trait Reporter {
    /// Records the outcome of one assertion and emits its result line. Returns the number
    /// assigned to the assertion.
    ///
    /// # Arguments
    ///
    /// * `passed` - Whether the assertion passed.
    /// * `description` - Caller-supplied description of the assertion; may be empty.
    /// * `location` - Source location of the assertion in the calling test, if known.
    fn report(
        &mut self,
        passed: bool,
        description: &str,
        location: Option<&Location<'_>>,
    ) -> Result<u32, error::Error>;

    /// Emits each line of the given text as a diagnostic.
    fn diag(&mut self, text: &str) -> Result<(), error::Error>;

    /// Emits each line read from the given reader as a diagnostic.
    fn diag_from(&mut self, reader: &mut dyn BufRead) -> Result<(), error::Error> {
        for line in reader.lines() {
            self.diag(line?.as_str())?;
        }

        Ok(())
    }

    /// Emits each line of the given text as a comment alongside the result lines.
    fn note(&mut self, text: &str) -> Result<(), error::Error>;

    /// Returns the running tally.
    fn counters(&self) -> &Counters;
}

/// Final outcome of a test run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Number of assertions the run planned (or, without a plan, the number it ran).
    pub planned: u32,
    /// Final tally.
    pub counters: Counters,
}

impl Summary {
    /// Returns whether the number of assertions run differs from the plan.
    pub const fn plan_mismatch(&self) -> bool {
        self.planned != self.counters.run
    }

    /// Returns whether every planned assertion ran and passed.
    pub const fn is_success(&self) -> bool {
        self.counters.failed == 0 && !self.plan_mismatch()
    }

    /// Returns the conventional process exit code for the run: the number of failures
    /// (capped at 254), 255 when the plan wasn't followed, or 0.
    pub fn exit_code(&self) -> u8 {
        if self.counters.failed > 0 {
            u8::try_from(self.counters.failed.min(254)).unwrap_or(254)
        } else if self.plan_mismatch() {
            255
        } else {
            0
        }
    }
}

/// A [`Reporter`] writing TAP result lines and notes to one stream and diagnostics to
/// another.
pub struct TapReporter<O: Write, D: Write> {
    out: O,
    diag: D,
    counters: Counters,
    planned: Option<u32>,
    /// `None` once the largest representable number has been used.
    next_number: Option<u32>,
    color: bool,
    show_locations: bool,
}

impl TapReporter<std::io::Stdout, std::io::Stderr> {
    /// Returns a reporter writing results to stdout and diagnostics to stderr.
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write, D: Write> TapReporter<O, D> {
    /// Returns a reporter writing to the given streams.
    ///
    /// # Arguments
    ///
    /// * `out` - Stream receiving plans, result lines, and notes.
    /// * `diag` - Stream receiving diagnostics.
    pub const fn new(out: O, diag: D) -> Self {
        Self {
            out,
            diag,
            counters: Counters {
                run: 0,
                passed: 0,
                failed: 0,
                skipped: 0,
            },
            planned: None,
            next_number: Some(1),
            color: false,
            show_locations: true,
        }
    }

    /// Enables or disables coloring of result lines.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Enables or disables naming the source location of failed assertions. Locations
    /// are only meaningful when assertions are made from Rust code.
    #[must_use]
    pub const fn with_locations(mut self, enabled: bool) -> Self {
        self.show_locations = enabled;
        self
    }

    /// Starts numbering assertions at the given number instead of 1. Used when each
    /// assertion of a script runs in its own process.
    #[must_use]
    pub const fn numbered_from(mut self, first: u32) -> Self {
        self.next_number = Some(first);
        self
    }

    /// Declares the number of assertions the run will report.
    pub fn plan(&mut self, count: u32) -> Result<(), error::Error> {
        self.check_can_plan()?;

        writeln!(self.out, "1..{count}")?;
        self.out.flush()?;
        self.planned = Some(count);

        Ok(())
    }

    /// Declares that the whole run is skipped.
    pub fn skip_all(&mut self, reason: &str) -> Result<(), error::Error> {
        self.check_can_plan()?;

        if reason.is_empty() {
            writeln!(self.out, "1..0")?;
        } else {
            writeln!(self.out, "1..0 # SKIP {}", escape(reason))?;
        }
        self.out.flush()?;
        self.planned = Some(0);

        Ok(())
    }

    /// Records a skipped assertion. Skipped assertions count as passed.
    pub fn skip(&mut self, reason: &str) -> Result<u32, error::Error> {
        let number = self.take_number()?;

        self.counters.run += 1;
        self.counters.passed += 1;
        self.counters.skipped += 1;

        let line = if reason.is_empty() {
            std::format!("ok {number} # skip")
        } else {
            std::format!("ok {number} # skip {}", escape(reason))
        };

        let line = self.colorize(line, true);
        writeln!(self.out, "{line}")?;
        self.out.flush()?;

        Ok(number)
    }

    /// Aborts the run. Always returns [`crate::Error::BailOut`] once the bail-out line has
    /// been written.
    pub fn bail_out(&mut self, reason: &str) -> Result<(), error::Error> {
        if reason.is_empty() {
            writeln!(self.out, "Bail out!")?;
        } else {
            writeln!(self.out, "Bail out!  {reason}")?;
        }
        self.out.flush()?;

        tracing::debug!(target: trace_categories::REPORT, "bailed out: {reason}");

        Err(error::Error::BailOut(reason.to_owned()))
    }

    /// Finishes the run: emits the trailing plan if none was declared, and a summary
    /// diagnostic when assertions failed or the plan wasn't followed.
    pub fn done_testing(&mut self) -> Result<Summary, error::Error> {
        let planned = if let Some(planned) = self.planned {
            planned
        } else {
            writeln!(self.out, "1..{}", self.counters.run)?;
            self.out.flush()?;
            self.planned = Some(self.counters.run);
            self.counters.run
        };

        let summary = Summary {
            planned,
            counters: self.counters,
        };

        let run = summary.counters.run;

        if summary.plan_mismatch() {
            self.diag(
                std::format!(
                    "Looks like you planned {planned} {} but ran {run}.",
                    tests_noun(planned)
                )
                .as_str(),
            )?;
        }

        if summary.counters.failed > 0 {
            let failed = summary.counters.failed;
            let suffix = if summary.plan_mismatch() { " run" } else { "" };
            self.diag(
                std::format!(
                    "Looks like you failed {failed} {} of {run}{suffix}.",
                    tests_noun(failed)
                )
                .as_str(),
            )?;
        }

        tracing::debug!(target: trace_categories::REPORT, "done testing: {summary:?}");

        Ok(summary)
    }

    /// Consumes the reporter, returning its output and diagnostic streams.
    pub fn into_writers(self) -> (O, D) {
        (self.out, self.diag)
    }

    const fn check_can_plan(&self) -> Result<(), error::Error> {
        if self.planned.is_some() {
            Err(error::Error::PlanAlreadyDeclared)
        } else if self.counters.run > 0 {
            Err(error::Error::PlanAfterTests)
        } else {
            Ok(())
        }
    }

    fn take_number(&mut self) -> Result<u32, error::Error> {
        let number = self.next_number.ok_or(error::Error::NumbersExhausted)?;
        self.next_number = number.checked_add(1);
        Ok(number)
    }

    fn colorize(&self, line: String, passed: bool) -> String {
        if !self.color {
            line
        } else if passed {
            line.green().to_string()
        } else {
            line.red().to_string()
        }
    }
}

impl<O: Write, D: Write> Reporter for TapReporter<O, D> {
    fn report(
        &mut self,
        passed: bool,
        description: &str,
        location: Option<&Location<'_>>,
    ) -> Result<u32, error::Error> {
        let number = self.take_number()?;

        self.counters.run += 1;
        if passed {
            self.counters.passed += 1;
        } else {
            self.counters.failed += 1;
        }

        let status = if passed { "ok" } else { "not ok" };
        let line = if description.is_empty() {
            std::format!("{status} {number}")
        } else {
            std::format!("{status} {number} - {}", escape(description))
        };

        tracing::debug!(target: trace_categories::REPORT, "{line}");

        let line = self.colorize(line, passed);
        writeln!(self.out, "{line}")?;
        self.out.flush()?;

        if !passed {
            if description.is_empty() {
                self.diag("  Failed test")?;
            } else {
                self.diag(std::format!("  Failed test '{description}'").as_str())?;
            }

            if let Some(location) = location.filter(|_| self.show_locations) {
                self.diag(
                    std::format!("  at {} line {}.", location.file(), location.line()).as_str(),
                )?;
            }
        }

        Ok(number)
    }

    fn diag(&mut self, text: &str) -> Result<(), error::Error> {
        write_commented(&mut self.diag, text)?;
        Ok(())
    }

    fn note(&mut self, text: &str) -> Result<(), error::Error> {
        write_commented(&mut self.out, text)?;
        Ok(())
    }

    fn counters(&self) -> &Counters {
        &self.counters
    }
}

fn write_commented(writer: &mut impl Write, text: &str) -> std::io::Result<()> {
    for line in text.lines() {
        if line.is_empty() {
            writeln!(writer, "#")?;
        } else {
            writeln!(writer, "# {line}")?;
        }
    }

    writer.flush()
}

/// Escapes text for use after a result line's number, where `#` introduces a directive.
fn escape(text: &str) -> String {
    text.replace('#', "\\#").replace('\n', "\n# ")
}

const fn tests_noun(count: u32) -> &'static str {
    if count == 1 { "test" } else { "tests" }
}
