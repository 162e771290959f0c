/// Represents an error that occurred while parsing a shell glob pattern.
#[derive(Debug, thiserror::Error)]
pub enum PatternParseError {
    /// The pattern could not be translated into a regular expression.
    #[error("failed to parse pattern '{0}'")]
    Pattern(String, peg::error::ParseError<peg::str::LineCol>),
}

/// Represents an error that occurred while parsing a test expression.
#[derive(Debug, thiserror::Error)]
pub enum TestCommandParseError {
    /// An error occurred while parsing a test expression.
    #[error("failed to parse test expression")]
    TestCommand(peg::error::ParseError<usize>),
}
