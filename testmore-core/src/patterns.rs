use crate::{error, regex, trace_categories};

/// A shell glob pattern, matched against whole values the way a shell `case` statement
/// matches them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
    text: String,
    enable_extended_globbing: bool,
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Self {
            text: value.to_owned(),
            ..Self::default()
        }
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Self {
            text: value,
            ..Self::default()
        }
    }
}

impl Pattern {
    /// Enables or disables extended globbing (`@(a|b)`, `!(x)`, ...) for this pattern.
    ///
    /// # Arguments
    ///
    /// * `value` - Whether extended globbing is enabled.
    #[must_use]
    pub const fn set_extended_globbing(mut self, value: bool) -> Self {
        self.enable_extended_globbing = value;
        self
    }

    /// Returns the pattern as it was provided.
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Converts the pattern to an anchored regular expression string. Wildcards match
    /// newlines, as they do in the shell.
    pub(crate) fn to_regex_str(&self) -> Result<String, error::Error> {
        let regex_piece = testmore_parser::pattern::pattern_to_regex_str(
            self.text.as_str(),
            self.enable_extended_globbing,
        )?;

        Ok(std::format!("(?s)^(?:{regex_piece})$"))
    }

    /// Converts the pattern to a compiled regular expression.
    pub(crate) fn to_regex(&self) -> Result<fancy_regex::Regex, error::Error> {
        let regex_str = self.to_regex_str()?;

        tracing::debug!(target: trace_categories::PATTERN, "pattern: '{}' => regex: '{regex_str}'", self.text);

        regex::compile_regex(regex_str).map_err(|_| error::Error::InvalidPattern(self.text.clone()))
    }

    /// Checks if the pattern matches the entire given string. An error result is returned
    /// if the pattern is found to be invalid or malformed.
    ///
    /// # Arguments
    ///
    /// * `value` - The string to check for a match.
    pub fn exactly_matches(&self, value: &str) -> Result<bool, error::Error> {
        let re = self.to_regex()?;
        Ok(re.is_match(value)?)
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_pattern_translation() -> Result<()> {
        assert_eq!(Pattern::from("a*").to_regex_str()?, "(?s)^(?:a.*)$");
        assert_eq!(Pattern::from("").to_regex_str()?, "(?s)^(?:)$");
        Ok(())
    }

    #[test]
    fn test_matching() -> Result<()> {
        assert!(Pattern::from("abc").exactly_matches("abc")?);

        assert!(!Pattern::from("abc").exactly_matches("ABC")?);
        assert!(!Pattern::from("abc").exactly_matches("xabcx")?);
        assert!(!Pattern::from("abc").exactly_matches("")?);
        assert!(!Pattern::from("abc").exactly_matches("abcd")?);

        assert!(Pattern::from("*").exactly_matches("")?);
        assert!(Pattern::from("*").exactly_matches("abc")?);

        assert!(Pattern::from("a*").exactly_matches("a")?);
        assert!(Pattern::from("a*").exactly_matches("ab")?);
        assert!(!Pattern::from("a*").exactly_matches("")?);
        assert!(!Pattern::from("a*").exactly_matches(" a")?);

        assert!(Pattern::from("*a").exactly_matches("ba")?);
        assert!(!Pattern::from("*a").exactly_matches("ab")?);

        assert!(Pattern::from("f?o").exactly_matches("foo")?);
        assert!(!Pattern::from("f?o").exactly_matches("fo")?);

        assert!(Pattern::from("[abc]x").exactly_matches("bx")?);
        assert!(!Pattern::from("[!abc]x").exactly_matches("bx")?);
        assert!(Pattern::from("v[0-9].*").exactly_matches("v1.2.3")?);

        Ok(())
    }

    #[test]
    fn test_close_bracket_as_first_member() -> Result<()> {
        assert!(Pattern::from("[]]").exactly_matches("]")?);
        assert!(Pattern::from("[!]]").exactly_matches("a")?);
        assert!(!Pattern::from("[!]]").exactly_matches("]")?);
        assert!(Pattern::from("[]abc]x").exactly_matches("]x")?);
        assert!(Pattern::from("[]abc]x").exactly_matches("bx")?);
        assert!(Pattern::from("[]").exactly_matches("[]")?);

        Ok(())
    }

    #[test]
    fn test_wildcards_span_lines() -> Result<()> {
        assert!(Pattern::from("first*last").exactly_matches("first\nmiddle\nlast")?);
        assert!(Pattern::from("a?b").exactly_matches("a\nb")?);
        Ok(())
    }

    #[test]
    fn test_regex_metacharacters_are_literal() -> Result<()> {
        assert!(Pattern::from("a.c").exactly_matches("a.c")?);
        assert!(!Pattern::from("a.c").exactly_matches("abc")?);
        assert!(Pattern::from("(x)|y").exactly_matches("(x)|y")?);
        Ok(())
    }

    #[test]
    fn test_extglob_matching() -> Result<()> {
        let pattern = Pattern::from("@(foo|bar).txt").set_extended_globbing(true);
        assert!(pattern.exactly_matches("foo.txt")?);
        assert!(pattern.exactly_matches("bar.txt")?);
        assert!(!pattern.exactly_matches("baz.txt")?);

        let pattern = Pattern::from("!(foo)").set_extended_globbing(true);
        assert!(pattern.exactly_matches("bar")?);
        assert!(!pattern.exactly_matches("foo")?);

        Ok(())
    }
}
