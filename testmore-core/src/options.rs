//! Options for a test run.

use crate::diagnostics::DEFAULT_LABEL_WIDTH;

/// Options affecting how assertions are evaluated and reported.
#[derive(Clone, Debug, PartialEq, Eq, bon::Builder)]
pub struct Options {
    /// Width that diagnostic labels are right-aligned to.
    #[builder(default = DEFAULT_LABEL_WIDTH)]
    pub label_width: usize,
    /// Whether glob patterns accept extended (extglob) syntax.
    #[builder(default)]
    pub extended_globbing: bool,
    /// Whether TAP result lines are colorized.
    #[builder(default)]
    pub color: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self::builder().build()
    }
}
