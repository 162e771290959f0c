use crate::{error, trace_categories};

/// A regular expression searched for within a value, the way `grep` searches its input:
/// the match may occur anywhere, and `^`/`$` anchor at line boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Regex {
    text: String,
}

impl From<&str> for Regex {
    fn from(value: &str) -> Self {
        Self {
            text: value.to_owned(),
        }
    }
}

impl From<String> for Regex {
    fn from(value: String) -> Self {
        Self { text: value }
    }
}

impl Regex {
    /// Returns the expression as it was provided.
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Computes whether the expression matches somewhere within the given value. An error
    /// result is returned if the expression is malformed.
    ///
    /// # Arguments
    ///
    /// * `value` - The string to search.
    pub fn is_match(&self, value: &str) -> Result<bool, error::Error> {
        let re = compile_regex(std::format!("(?m){}", self.text))
            .map_err(|e| error::Error::InvalidRegexError(e, self.text.clone()))?;

        let matched = re.is_match(value)?;

        tracing::debug!(target: trace_categories::PATTERN, "regex '{}' vs '{value}' => {matched}", self.text);

        Ok(matched)
    }
}

#[allow(clippy::needless_pass_by_value)]
#[cached::proc_macro::cached(size = 64, result = true)]
pub(crate) fn compile_regex(regex_str: String) -> Result<fancy_regex::Regex, fancy_regex::Error> {
    fancy_regex::Regex::new(regex_str.as_str())
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_substring_search() -> Result<()> {
        assert!(Regex::from("b.r").is_match("foo bar baz")?);
        assert!(Regex::from("^foo").is_match("foo bar")?);
        assert!(!Regex::from("^bar").is_match("foo bar")?);
        assert!(Regex::from("[0-9]+").is_match("version 42")?);
        assert!(!Regex::from("[0-9]+").is_match("version")?);
        Ok(())
    }

    #[test]
    fn test_anchors_are_line_oriented() -> Result<()> {
        let output = "first line\nsecond line\n";
        assert!(Regex::from("^second").is_match(output)?);
        assert!(Regex::from("first line$").is_match(output)?);
        assert!(!Regex::from("^line").is_match(output)?);
        Ok(())
    }

    #[test]
    fn test_malformed_regex_is_an_error() {
        let result = Regex::from("(unclosed").is_match("anything");
        assert!(matches!(
            result,
            Err(error::Error::InvalidRegexError(_, ref text)) if text == "(unclosed"
        ));
    }
}
