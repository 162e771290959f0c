//! Formatting of failure diagnostics.

use std::fmt::Write as _;

/// Width that labels are right-aligned to unless configured otherwise.
pub const DEFAULT_LABEL_WIDTH: usize = 12;

/// A single line of a diagnostic block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticLine {
    /// A `label: value` line; the label is right-aligned when rendered.
    Labeled {
        /// The label (e.g. `got`).
        label: String,
        /// The value displayed after the label.
        value: String,
    },
    /// A line emitted verbatim (e.g. a line of diff output).
    Raw(String),
}

/// An ordered block of diagnostic lines describing why an assertion failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    lines: Vec<DiagnosticLine>,
}

impl Diagnostics {
    /// Returns an empty diagnostic block.
    pub const fn new() -> Self {
        Self { lines: vec![] }
    }

    /// Appends a labeled line, returning the block.
    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_labeled(label, value);
        self
    }

    /// Appends a labeled line.
    pub fn push_labeled(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.lines.push(DiagnosticLine::Labeled {
            label: label.into(),
            value: value.into(),
        });
    }

    /// Appends a verbatim line.
    pub fn push_raw(&mut self, line: impl Into<String>) {
        self.lines.push(DiagnosticLine::Raw(line.into()));
    }

    /// Returns whether the block has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the lines of the block, in order.
    pub fn lines(&self) -> &[DiagnosticLine] {
        &self.lines
    }

    /// Renders the block to text, one line per entry, without a trailing newline.
    ///
    /// # Arguments
    ///
    /// * `label_width` - Width that labels are right-aligned to.
    pub fn render(&self, label_width: usize) -> String {
        let mut rendered = String::new();

        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                rendered.push('\n');
            }

            match line {
                DiagnosticLine::Labeled { label, value } => {
                    let _ = write!(rendered, "{label:>label_width$}: {value}");
                }
                DiagnosticLine::Raw(text) => rendered.push_str(text),
            }
        }

        rendered
    }
}

/// Wraps a value in single quotes for display in a diagnostic.
pub fn quoted(value: impl std::fmt::Display) -> String {
    std::format!("'{value}'")
}
