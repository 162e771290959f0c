/// Monolithic error type for harness-level failures.
///
/// A failed assertion is not an error: comparators report it and return `Ok(false)`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The indicated glob pattern is invalid.
    #[error("invalid pattern: '{0}'")]
    InvalidPattern(String),

    /// A glob pattern could not be parsed.
    #[error("{0}")]
    PatternParseError(#[from] testmore_parser::PatternParseError),

    /// A regular expression error occurred while matching.
    #[error("regex error: {0}")]
    RegexError(#[from] fancy_regex::Error),

    /// An invalid regular expression was provided.
    #[error("invalid regex: {0}; expression: '{1}'")]
    InvalidRegexError(fancy_regex::Error, String),

    /// Unable to parse a test expression.
    #[error("{0}")]
    TestCommandParseError(#[from] testmore_parser::TestCommandParseError),

    /// An arithmetic test operator was given a non-integer operand.
    #[error("{0}: integer expression expected")]
    IntegerExpected(String),

    /// An I/O error occurred.
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    /// A plan was declared more than once.
    #[error("plan already declared")]
    PlanAlreadyDeclared,

    /// A plan was declared after assertions had already been reported.
    #[error("cannot declare a plan after tests have run")]
    PlanAfterTests,

    /// Every assertion number has been used.
    #[error("no assertion numbers left to report with")]
    NumbersExhausted,

    /// The test run was aborted.
    #[error("bail out: {0}")]
    BailOut(String),
}
