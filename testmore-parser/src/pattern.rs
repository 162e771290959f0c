//! Implements translation of shell glob and extglob patterns into regular expressions.

use crate::error;

/// The operator introducing an extended glob group, e.g. the `+` in `+(a|b)`.
#[derive(Clone, Copy)]
enum ExtglobOperator {
    /// `+(...)`: one or more occurrences of the group.
    OneOrMore,
    /// `@(...)`: exactly one of the alternatives.
    ExactlyOne,
    /// `!(...)`: anything except the alternatives.
    Not,
    /// `?(...)`: zero or one occurrence of the group.
    ZeroOrOne,
    /// `*(...)`: zero or more occurrences of the group.
    ZeroOrMore,
}

/// One member of a bracket expression, already rendered as regex class syntax.
/// `None` stands for a range whose bounds are reversed; it contributes nothing.
type BracketMember = Option<String>;

/// Converts a shell pattern to a regular expression string. The result is not anchored;
/// callers decide whether the pattern must match the whole input.
///
/// # Arguments
///
/// * `pattern` - The shell pattern to convert.
/// * `enable_extended_globbing` - Whether to enable extended globbing (extglob).
pub fn pattern_to_regex_str(
    pattern: &str,
    enable_extended_globbing: bool,
) -> Result<String, error::PatternParseError> {
    glob_grammar::pattern(pattern, enable_extended_globbing)
        .map_err(|e| error::PatternParseError::Pattern(pattern.to_owned(), e))
}

peg::parser! {
    grammar glob_grammar(extglob: bool) for str {
        pub(crate) rule pattern() -> String =
            pieces:piece()* { pieces.concat() }

        // Anything that fails to parse as a construct falls through to a literal, so
        // an unterminated `[` or a disabled extglob operator is matched as text.
        rule piece() -> String =
            escaped() /
            bracket() /
            extglob_on() g:extglob() { g } /
            "*" { String::from(".*") } /
            "?" { String::from(".") } /
            c:[_] { literal(c) }

        rule escaped() -> String =
            "\\" c:[_] { literal(c) }

        // A `]` directly after the opening bracket (or its negation) is a member.
        rule bracket() -> String =
            "[" negated:$(negation())? first:leading_bracket_member() rest:bracket_member()* "]" {
                let mut members = vec![first];
                members.extend(rest);
                bracket_to_regex(negated.is_some(), members)
            }

        rule negation() =
            ['!' | '^']

        rule leading_bracket_member() -> BracketMember =
            "]" "-" hi:bracket_char() { char_range(&(String::from("\\]"), ']'), &hi) } /
            "]" { Some(String::from("\\]")) } /
            bracket_member()

        rule bracket_member() -> BracketMember =
            c:char_class() { Some(c) } /
            lo:bracket_char() "-" hi:bracket_char() { char_range(&lo, &hi) } /
            c:bracket_char() { Some(c.0) }

        rule char_class() -> String =
            c:$("[:" class_name() ":]") { c.to_owned() }

        rule class_name() =
            "alnum" / "alpha" / "blank" / "cntrl" / "digit" / "graph" /
            "lower" / "print" / "punct" / "space" / "upper" / "xdigit"

        // Yields the member's class-safe rendering alongside the character it denotes.
        rule bracket_char() -> (String, char) =
            "\\" c:[_] { (std::format!("\\{c}"), c) } /
            "[" { (String::from("\\["), '[') } /
            c:[^ ']'] { (c.to_string(), c) }

        rule extglob_on() =
            &[_] {? if extglob { Ok(()) } else { Err("extglob disabled") } }

        pub(crate) rule extglob() -> String =
            op:extglob_operator() "(" alternatives:extglob_alternatives() ")" {
                extglob_to_regex(op, &alternatives)
            }

        rule extglob_operator() -> ExtglobOperator =
            "+" { ExtglobOperator::OneOrMore } /
            "@" { ExtglobOperator::ExactlyOne } /
            "!" { ExtglobOperator::Not } /
            "?" { ExtglobOperator::ZeroOrOne } /
            "*" { ExtglobOperator::ZeroOrMore }

        pub(crate) rule extglob_alternatives() -> Vec<String> =
            &")" { vec![] } /
            extglob_alternative() ** "|"

        rule extglob_alternative() -> String =
            pieces:(![ '|' | ')' ] p:piece() { p })* { pieces.concat() }
    }
}

/// Renders a parsed bracket expression as a regex character class.
fn bracket_to_regex(negated: bool, members: Vec<BracketMember>) -> String {
    let members: Vec<String> = members.into_iter().flatten().collect();

    match (members.is_empty(), negated) {
        // Only reversed ranges: nothing can match, or anything can when negated.
        (true, false) => String::from("(?!)"),
        (true, true) => String::from("."),
        (false, false) => std::format!("[{}]", members.concat()),
        (false, true) => std::format!("[^{}]", members.concat()),
    }
}

/// Renders `lo-hi` as a class range, or `None` when `hi` sorts before `lo`.
fn char_range(lo: &(String, char), hi: &(String, char)) -> BracketMember {
    (lo.1 <= hi.1).then(|| std::format!("{}-{}", lo.0, hi.0))
}

/// Renders an extglob group. `!(...)` relies on fancy-regex lookaround.
fn extglob_to_regex(op: ExtglobOperator, alternatives: &[String]) -> String {
    let group = alternatives.join("|");

    match op {
        ExtglobOperator::Not if alternatives.is_empty() => String::from("(?:.+)"),
        ExtglobOperator::Not => {
            std::format!("(?:(?!{group}).*|(?>{group}).+?|)")
        }
        ExtglobOperator::ExactlyOne => std::format!("({group})"),
        ExtglobOperator::OneOrMore => std::format!("({group})+"),
        ExtglobOperator::ZeroOrOne => std::format!("({group})?"),
        ExtglobOperator::ZeroOrMore => std::format!("({group})*"),
    }
}

/// Renders a character that must match itself.
fn literal(c: char) -> String {
    if regex_char_needs_escaping(c) {
        std::format!("\\{c}")
    } else {
        c.to_string()
    }
}

/// Returns whether or not a given character needs to be escaped in a regular expression.
///
/// # Arguments
///
/// * `c` - The character to check.
pub const fn regex_char_needs_escaping(c: char) -> bool {
    matches!(
        c,
        '[' | ']' | '(' | ')' | '{' | '}' | '*' | '?' | '.' | '+' | '^' | '$' | '|' | '\\' | '-'
    )
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wildcards_and_literals() -> Result<()> {
        assert_eq!(pattern_to_regex_str("*", false)?, ".*");
        assert_eq!(pattern_to_regex_str("a?c", false)?, "a.c");
        assert_eq!(pattern_to_regex_str("foo.txt", false)?, r"foo\.txt");
        assert_eq!(pattern_to_regex_str("a+b", false)?, r"a\+b");
        assert_eq!(pattern_to_regex_str(r"\*", false)?, r"\*");
        assert_eq!(pattern_to_regex_str(r"\a", false)?, "a");
        assert_eq!(pattern_to_regex_str("", false)?, "");
        Ok(())
    }

    #[test]
    fn test_bracket_expressions() -> Result<()> {
        assert_eq!(pattern_to_regex_str("[a-z]", true)?, "[a-z]");
        assert_eq!(pattern_to_regex_str("[z-a]", true)?, "(?!)");
        assert_eq!(pattern_to_regex_str("[!z-a]", true)?, ".");
        assert_eq!(pattern_to_regex_str("[abc]", true)?, "[abc]");
        assert_eq!(pattern_to_regex_str("[!abc]", true)?, "[^abc]");
        assert_eq!(pattern_to_regex_str(r"[\(]", true)?, r"[\(]");
        assert_eq!(pattern_to_regex_str("[[:digit:]]", true)?, "[[:digit:]]");
        assert_eq!(pattern_to_regex_str(r"[-(),!]*", true)?, r"[-(),!].*");
        Ok(())
    }

    #[test]
    fn test_leading_close_bracket_is_a_member() -> Result<()> {
        assert_eq!(pattern_to_regex_str("[]]", false)?, r"[\]]");
        assert_eq!(pattern_to_regex_str("[!]]", false)?, r"[^\]]");
        assert_eq!(pattern_to_regex_str("[^]]", false)?, r"[^\]]");
        assert_eq!(pattern_to_regex_str("[]abc]x", false)?, r"[\]abc]x");
        assert_eq!(pattern_to_regex_str("[]-a]", false)?, r"[\]-a]");
        Ok(())
    }

    #[test]
    fn test_unterminated_bracket_is_literal() -> Result<()> {
        assert_eq!(pattern_to_regex_str("[abc", false)?, r"\[abc");
        assert_eq!(pattern_to_regex_str("[]", false)?, r"\[\]");
        assert_eq!(pattern_to_regex_str("[!]", false)?, r"\[!\]");
        Ok(())
    }

    #[test]
    fn test_extended_glob() -> Result<()> {
        assert_eq!(glob_grammar::extglob("@(a|b)", true)?, "(a|b)");
        assert_eq!(
            glob_grammar::extglob_alternatives("ab|ac", true)?,
            vec!["ab", "ac"],
        );
        assert_eq!(glob_grammar::extglob("*(ab|ac)", true)?, "(ab|ac)*");
        assert_eq!(glob_grammar::extglob("?(|x)", true)?, "(|x)?");
        assert_eq!(glob_grammar::extglob("!()", true)?, "(?:.+)");

        assert_eq!(pattern_to_regex_str("+(x)", true)?, "(x)+");
        assert_eq!(pattern_to_regex_str("+(x)", false)?, r"\+\(x\)");

        Ok(())
    }
}
