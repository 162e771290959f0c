//! Implements the parsers used by `testmore`: shell glob patterns (translated to regular
//! expressions) and `test`-style argument vectors (parsed into an expression tree).

pub mod ast;
pub mod pattern;
pub mod test_command;

mod error;

pub use error::{PatternParseError, TestCommandParseError};
