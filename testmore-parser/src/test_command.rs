//! Parser for `test`-style expressions.

use crate::{ast, error};

/// Parses a test expression given as an argument vector, the way the `test` utility
/// receives it (e.g. `["-f", "/etc/passwd"]` or `["3", "-lt", "5"]`).
///
/// # Arguments
///
/// * `input` - The arguments making up the expression.
pub fn parse<S: AsRef<str>>(input: &[S]) -> Result<ast::TestExpr, error::TestCommandParseError> {
    let input: Vec<_> = input.iter().map(|s| s.as_ref()).collect();

    let expr = test_command::full_expression(input.as_slice())
        .map_err(error::TestCommandParseError::TestCommand)?;

    Ok(expr)
}

peg::parser! {
    grammar test_command<'a>() for [&'a str] {
        pub(crate) rule full_expression() -> ast::TestExpr =
            end() { ast::TestExpr::False } /
            e:one_arg_expr() end() { e } /
            e:two_arg_expr() end()  { e } /
            e:three_arg_expr() end()  { e } /
            e:four_arg_expr() end()  { e } /
            expression()

        rule one_arg_expr() -> ast::TestExpr =
            [s] { ast::TestExpr::Literal(s.into()) }

        rule two_arg_expr() -> ast::TestExpr =
            ["!"] e:one_arg_expr() { ast::TestExpr::Not(Box::from(e)) } /
            op:unary_op() [s] { ast::TestExpr::UnaryTest(op, s.into()) } /
            [_] [_] { ast::TestExpr::False }

        rule three_arg_expr() -> ast::TestExpr =
            [left] op:binary_op() [right] { ast::TestExpr::BinaryTest(op, left.into(), right.into()) } /
            [left] ["-a"] [right] { ast::TestExpr::And(Box::from(ast::TestExpr::Literal(left.into())), Box::from(ast::TestExpr::Literal(right.into()))) } /
            [left] ["-o"] [right] { ast::TestExpr::Or(Box::from(ast::TestExpr::Literal(left.into())), Box::from(ast::TestExpr::Literal(right.into()))) } /
            ["!"] e:two_arg_expr() { ast::TestExpr::Not(Box::from(e)) } /
            ["("] e:one_arg_expr() [")"] { ast::TestExpr::Parenthesized(Box::from(e)) } /
            [_] [_] [_] { ast::TestExpr::False }

        rule four_arg_expr() -> ast::TestExpr =
            ["!"] e:three_arg_expr() { ast::TestExpr::Not(Box::from(e)) } /
            ["("] e:two_arg_expr() [")"] { ast::TestExpr::Parenthesized(Box::from(e)) }

        rule expression() -> ast::TestExpr = precedence! {
            left:(@) ["-o"] right:@ { ast::TestExpr::Or(Box::from(left), Box::from(right)) }
            --
            left:(@) ["-a"] right:@ { ast::TestExpr::And(Box::from(left), Box::from(right)) }
            --
            ["("] e:expression() [")"] { ast::TestExpr::Parenthesized(Box::from(e)) }
            --
            ["!"] e:@ { ast::TestExpr::Not(Box::from(e)) }
            --
            [left] op:binary_op() [right] { ast::TestExpr::BinaryTest(op, left.into(), right.into()) }
            --
            op:unary_op() [operand] { ast::TestExpr::UnaryTest(op, operand.into()) }
            --
            [s] { ast::TestExpr::Literal(s.into()) }
        }

        rule unary_op() -> ast::UnaryPredicate =
            ["-a"] { ast::UnaryPredicate::FileExists } /
            ["-b"] { ast::UnaryPredicate::FileExistsAndIsBlockSpecialFile } /
            ["-c"] { ast::UnaryPredicate::FileExistsAndIsCharSpecialFile } /
            ["-d"] { ast::UnaryPredicate::FileExistsAndIsDir } /
            ["-e"] { ast::UnaryPredicate::FileExists } /
            ["-f"] { ast::UnaryPredicate::FileExistsAndIsRegularFile } /
            ["-g"] { ast::UnaryPredicate::FileExistsAndIsSetgid } /
            ["-h"] { ast::UnaryPredicate::FileExistsAndIsSymlink } /
            ["-k"] { ast::UnaryPredicate::FileExistsAndHasStickyBit } /
            ["-n"] { ast::UnaryPredicate::StringHasNonZeroLength } /
            ["-p"] { ast::UnaryPredicate::FileExistsAndIsFifo } /
            ["-r"] { ast::UnaryPredicate::FileExistsAndIsReadable } /
            ["-s"] { ast::UnaryPredicate::FileExistsAndIsNotZeroLength } /
            ["-u"] { ast::UnaryPredicate::FileExistsAndIsSetuid } /
            ["-w"] { ast::UnaryPredicate::FileExistsAndIsWritable } /
            ["-x"] { ast::UnaryPredicate::FileExistsAndIsExecutable } /
            ["-z"] { ast::UnaryPredicate::StringHasZeroLength } /
            ["-G"] { ast::UnaryPredicate::FileExistsAndOwnedByEffectiveGroupId } /
            ["-L"] { ast::UnaryPredicate::FileExistsAndIsSymlink } /
            ["-O"] { ast::UnaryPredicate::FileExistsAndOwnedByEffectiveUserId } /
            ["-S"] { ast::UnaryPredicate::FileExistsAndIsSocket }

        rule binary_op() -> ast::BinaryPredicate =
            ["-ef"] { ast::BinaryPredicate::FilesReferToSameDeviceAndInodeNumbers } /
            ["-eq"] { ast::BinaryPredicate::ArithmeticEqualTo } /
            ["-ge"] { ast::BinaryPredicate::ArithmeticGreaterThanOrEqualTo } /
            ["-gt"] { ast::BinaryPredicate::ArithmeticGreaterThan } /
            ["-le"] { ast::BinaryPredicate::ArithmeticLessThanOrEqualTo } /
            ["-lt"] { ast::BinaryPredicate::ArithmeticLessThan } /
            ["-ne"] { ast::BinaryPredicate::ArithmeticNotEqualTo } /
            ["-nt"] { ast::BinaryPredicate::LeftFileIsNewerOrExistsWhenRightDoesNot } /
            ["-ot"] { ast::BinaryPredicate::LeftFileIsOlderOrDoesNotExistWhenRightDoes } /
            ["=="] { ast::BinaryPredicate::StringsAreEqual } /
            ["="] { ast::BinaryPredicate::StringsAreEqual } /
            ["!="] { ast::BinaryPredicate::StringsAreNotEqual } /
            ["<"] { ast::BinaryPredicate::LeftSortsBeforeRight } /
            [">"] { ast::BinaryPredicate::LeftSortsAfterRight }

        rule end() = ![_]
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use crate::ast::{BinaryPredicate, TestExpr, UnaryPredicate};
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    fn lit(s: &str) -> Box<TestExpr> {
        Box::new(TestExpr::Literal(s.into()))
    }

    #[test]
    fn parse_empty_and_single() -> Result<()> {
        assert_eq!(parse::<&str>(&[])?, TestExpr::False);
        assert_eq!(parse(&["x"])?, TestExpr::Literal("x".into()));
        assert_eq!(parse(&["-f"])?, TestExpr::Literal("-f".into()));
        Ok(())
    }

    #[test]
    fn parse_two_args() -> Result<()> {
        assert_eq!(
            parse(&["-f", "/etc/passwd"])?,
            TestExpr::UnaryTest(UnaryPredicate::FileExistsAndIsRegularFile, "/etc/passwd".into())
        );
        assert_eq!(parse(&["!", ""])?, TestExpr::Not(lit("")));
        Ok(())
    }

    #[test]
    fn parse_three_args() -> Result<()> {
        assert_eq!(
            parse(&["3", "-lt", "5"])?,
            TestExpr::BinaryTest(BinaryPredicate::ArithmeticLessThan, "3".into(), "5".into())
        );
        assert_eq!(
            parse(&["a", "=", "b"])?,
            TestExpr::BinaryTest(BinaryPredicate::StringsAreEqual, "a".into(), "b".into())
        );
        assert_eq!(parse(&["a", "-a", "b"])?, TestExpr::And(lit("a"), lit("b")));
        assert_eq!(
            parse(&["(", "x", ")"])?,
            TestExpr::Parenthesized(lit("x"))
        );
        Ok(())
    }

    #[test]
    fn parse_compound() -> Result<()> {
        let expr = parse(&["-n", "a", "-a", "!", "-z", "b", "-o", "x", "=", "y"])?;
        assert_eq!(
            expr,
            TestExpr::Or(
                Box::new(TestExpr::And(
                    Box::new(TestExpr::UnaryTest(
                        UnaryPredicate::StringHasNonZeroLength,
                        "a".into()
                    )),
                    Box::new(TestExpr::Not(Box::new(TestExpr::UnaryTest(
                        UnaryPredicate::StringHasZeroLength,
                        "b".into()
                    ))))
                )),
                Box::new(TestExpr::BinaryTest(
                    BinaryPredicate::StringsAreEqual,
                    "x".into(),
                    "y".into()
                ))
            )
        );
        Ok(())
    }

    #[test]
    fn display_round_trips_to_test_syntax() -> Result<()> {
        assert_eq!(parse(&["3", "-lt", "5"])?.to_string(), "3 -lt 5");
        assert_eq!(parse(&["!", "-d", "/tmp"])?.to_string(), "! -d /tmp");
        Ok(())
    }

    #[test]
    fn unbalanced_parens_fail() {
        assert!(parse(&["(", "a", "-a", "b"]).is_err());
    }
}
