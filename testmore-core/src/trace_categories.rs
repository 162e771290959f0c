//! Trace utilities

/// Trace category for assertion outcomes.
pub const ASSERT: &str = "assert";
/// Trace category for file comparisons.
pub const DIFF: &str = "diff";
/// Trace category for glob and regex matching.
pub const PATTERN: &str = "pattern";
/// Trace category for TAP reporting.
pub const REPORT: &str = "report";
