//! Byte-level comparison of two files, with a line diff for display.

use std::path::{Path, PathBuf};

use crate::diagnostics::{Diagnostics, quoted};
use crate::trace_categories;

/// A reason one side of a file comparison could not be read.
#[derive(Debug)]
pub enum FileProblem {
    /// The file doesn't exist.
    Missing(PathBuf),
    /// The file exists but could not be read.
    Unreadable(PathBuf, std::io::Error),
}

impl FileProblem {
    /// Returns the path of the file with the problem.
    pub fn path(&self) -> &Path {
        match self {
            Self::Missing(path) | Self::Unreadable(path, _) => path.as_path(),
        }
    }
}

impl std::fmt::Display for FileProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "'{}' doesn't exist", path.display()),
            Self::Unreadable(path, err) => write!(f, "cannot read '{}': {err}", path.display()),
        }
    }
}

/// One line of a rendered diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// Present only in the left file.
    Removed(String),
    /// Present only in the right file.
    Added(String),
    /// Present in both files.
    Context(String),
}

impl std::fmt::Display for DiffLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Removed(line) => write!(f, "-{line}"),
            Self::Added(line) => write!(f, "+{line}"),
            Self::Context(line) => write!(f, " {line}"),
        }
    }
}

/// Outcome of comparing two files.
#[derive(Debug)]
pub enum FileComparison {
    /// The files have identical content.
    Same,
    /// At least one of the files could not be read; content was not compared.
    Unavailable(Vec<FileProblem>),
    /// The files differ.
    Differs(Vec<DiffLine>),
}

impl FileComparison {
    /// Returns whether the files were found to be identical.
    pub const fn is_same(&self) -> bool {
        matches!(self, Self::Same)
    }
}

/// Compares the contents of two files byte for byte. Both files are read before any content
/// is compared, so every unreadable side is reported.
///
/// # Arguments
///
/// * `left` - Path to the file under test.
/// * `right` - Path to the file holding the expected content.
pub fn compare_files(left: &Path, right: &Path) -> FileComparison {
    let left_contents = read_file(left);
    let right_contents = read_file(right);

    let (left_contents, right_contents) = match (left_contents, right_contents) {
        (Ok(l), Ok(r)) => (l, r),
        (l, r) => {
            let problems: Vec<_> = [l.err(), r.err()].into_iter().flatten().collect();
            for problem in &problems {
                tracing::debug!(
                    target: trace_categories::DIFF,
                    "unable to compare using '{}': {problem}",
                    problem.path().display()
                );
            }
            return FileComparison::Unavailable(problems);
        }
    };

    if left_contents == right_contents {
        return FileComparison::Same;
    }

    let left_text = String::from_utf8_lossy(&left_contents);
    let right_text = String::from_utf8_lossy(&right_contents);

    let mut lines: Vec<_> = diff::lines(&left_text, &right_text)
        .into_iter()
        .map(|d| match d {
            diff::Result::Left(l) => DiffLine::Removed(l.to_owned()),
            diff::Result::Both(l, _) => DiffLine::Context(l.to_owned()),
            diff::Result::Right(r) => DiffLine::Added(r.to_owned()),
        })
        .collect();

    // Differences invisible to a line diff: trailing newline, or bytes lost to lossy decoding.
    if !lines.iter().any(|l| !matches!(l, DiffLine::Context(_))) {
        lines.push(DiffLine::Context(
            "(files differ in line endings or non-text bytes)".to_owned(),
        ));
    }

    tracing::debug!(
        target: trace_categories::DIFF,
        "'{}' and '{}' differ ({} diff lines)",
        left.display(),
        right.display(),
        lines.len()
    );

    FileComparison::Differs(lines)
}

fn read_file(path: &Path) -> Result<Vec<u8>, FileProblem> {
    std::fs::read(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            FileProblem::Missing(path.to_owned())
        } else {
            FileProblem::Unreadable(path.to_owned(), err)
        }
    })
}

/// Renders a comparison as a diagnostic block. Returns an empty block when the files are
/// the same.
///
/// # Arguments
///
/// * `comparison` - The comparison to render.
/// * `left` - Path to the file under test.
/// * `right` - Path to the file holding the expected content.
pub fn to_diagnostics(comparison: &FileComparison, left: &Path, right: &Path) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    match comparison {
        FileComparison::Same => (),
        FileComparison::Unavailable(problems) => {
            for problem in problems {
                let label = match problem {
                    FileProblem::Missing(_) => "missing",
                    FileProblem::Unreadable(..) => "unreadable",
                };
                diagnostics.push_labeled(label, problem.to_string());
            }
        }
        FileComparison::Differs(lines) => {
            diagnostics.push_labeled("got", quoted(left.display()));
            diagnostics.push_labeled(
                "expected",
                std::format!("same content as {}", quoted(right.display())),
            );
            diagnostics.push_raw(std::format!("--- {}", left.display()));
            diagnostics.push_raw(std::format!("+++ {}", right.display()));
            for line in lines {
                diagnostics.push_raw(line.to_string());
            }
        }
    }

    diagnostics
}
