//! Core of `testmore`: a small library of TAP assertion helpers.
//!
//! Each comparator evaluates one condition (string equality, glob or regex match, integer
//! ordering, byte equality of two files, or a `test`-style expression), forwards the
//! outcome to a [`Reporter`], and on failure emits an aligned diagnostic block:
//!
//! ```text
//! not ok 2 - greeting
//! #   Failed test 'greeting'
//! #   at tests/greeting.rs line 12.
//! #          got: 'foo'
//! #     expected: 'bar'
//! ```
//!
//! The pass/fail tally is owned by the reporter, which is owned by a [`TestRun`]; there is
//! no process-wide state.

pub mod checks;
pub mod diagnostics;
mod error;
pub mod filediff;
pub mod options;
mod patterns;
mod regex;
pub mod reporter;
mod run;
mod sys;
mod testexpr;
pub mod trace_categories;

pub use error::Error;
pub use options::Options;
pub use patterns::Pattern;
pub use regex::Regex;
pub use reporter::{Counters, Reporter, Summary, TapReporter};
pub use run::TestRun;
pub use testexpr::eval_test_expr;
