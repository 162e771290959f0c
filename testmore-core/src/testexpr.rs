use std::path::Path;
use std::time::SystemTime;

use testmore_parser::ast::{BinaryPredicate, TestExpr, UnaryPredicate};

use crate::{error, sys::PathExt};

/// Evaluates a parsed `test` expression with POSIX `test` semantics.
///
/// # Arguments
///
/// * `expr` - The expression to evaluate.
pub fn eval_test_expr(expr: &TestExpr) -> Result<bool, error::Error> {
    match expr {
        TestExpr::False => Ok(false),
        TestExpr::Literal(s) => Ok(!s.is_empty()),
        TestExpr::And(left, right) => Ok(eval_test_expr(left)? && eval_test_expr(right)?),
        TestExpr::Or(left, right) => Ok(eval_test_expr(left)? || eval_test_expr(right)?),
        TestExpr::Not(expr) => Ok(!eval_test_expr(expr)?),
        TestExpr::Parenthesized(expr) => eval_test_expr(expr),
        TestExpr::UnaryTest(op, operand) => Ok(apply_unary_predicate(*op, operand.as_str())),
        TestExpr::BinaryTest(op, left, right) => {
            apply_binary_predicate(*op, left.as_str(), right.as_str())
        }
    }
}

fn apply_unary_predicate(op: UnaryPredicate, operand: &str) -> bool {
    let path = Path::new(operand);

    match op {
        UnaryPredicate::StringHasNonZeroLength => !operand.is_empty(),
        UnaryPredicate::StringHasZeroLength => operand.is_empty(),
        UnaryPredicate::FileExists => path.exists(),
        UnaryPredicate::FileExistsAndIsBlockSpecialFile => path.exists_and_is_block_device(),
        UnaryPredicate::FileExistsAndIsCharSpecialFile => path.exists_and_is_char_device(),
        UnaryPredicate::FileExistsAndIsDir => path.is_dir(),
        UnaryPredicate::FileExistsAndIsRegularFile => path.is_file(),
        UnaryPredicate::FileExistsAndIsSetgid => path.exists_and_is_setgid(),
        UnaryPredicate::FileExistsAndIsSymlink => path.is_symlink(),
        UnaryPredicate::FileExistsAndHasStickyBit => path.exists_and_is_sticky_bit(),
        UnaryPredicate::FileExistsAndIsFifo => path.exists_and_is_fifo(),
        UnaryPredicate::FileExistsAndIsReadable => path.readable(),
        UnaryPredicate::FileExistsAndIsNotZeroLength => {
            path.metadata().is_ok_and(|metadata| metadata.len() > 0)
        }
        UnaryPredicate::FileExistsAndIsSetuid => path.exists_and_is_setuid(),
        UnaryPredicate::FileExistsAndIsWritable => path.writable(),
        UnaryPredicate::FileExistsAndIsExecutable => path.executable(),
        UnaryPredicate::FileExistsAndOwnedByEffectiveGroupId => {
            path.exists_and_owned_by_effective_group()
        }
        UnaryPredicate::FileExistsAndOwnedByEffectiveUserId => {
            path.exists_and_owned_by_effective_user()
        }
        UnaryPredicate::FileExistsAndIsSocket => path.exists_and_is_socket(),
    }
}

fn apply_binary_predicate(
    op: BinaryPredicate,
    left: &str,
    right: &str,
) -> Result<bool, error::Error> {
    match op {
        BinaryPredicate::StringsAreEqual => Ok(left == right),
        BinaryPredicate::StringsAreNotEqual => Ok(left != right),
        // `<` and `>` order strings by code point, as in the C locale.
        BinaryPredicate::LeftSortsBeforeRight => Ok(left < right),
        BinaryPredicate::LeftSortsAfterRight => Ok(left > right),
        BinaryPredicate::ArithmeticEqualTo => {
            apply_binary_arithmetic_predicate(left, right, |left, right| left == right)
        }
        BinaryPredicate::ArithmeticNotEqualTo => {
            apply_binary_arithmetic_predicate(left, right, |left, right| left != right)
        }
        BinaryPredicate::ArithmeticLessThan => {
            apply_binary_arithmetic_predicate(left, right, |left, right| left < right)
        }
        BinaryPredicate::ArithmeticLessThanOrEqualTo => {
            apply_binary_arithmetic_predicate(left, right, |left, right| left <= right)
        }
        BinaryPredicate::ArithmeticGreaterThan => {
            apply_binary_arithmetic_predicate(left, right, |left, right| left > right)
        }
        BinaryPredicate::ArithmeticGreaterThanOrEqualTo => {
            apply_binary_arithmetic_predicate(left, right, |left, right| left >= right)
        }
        BinaryPredicate::FilesReferToSameDeviceAndInodeNumbers => {
            Ok(Path::new(left).same_file_as(Path::new(right)))
        }
        BinaryPredicate::LeftFileIsNewerOrExistsWhenRightDoesNot => {
            match (modified_time(left), modified_time(right)) {
                (Some(left), Some(right)) => Ok(left > right),
                (Some(_), None) => Ok(true),
                _ => Ok(false),
            }
        }
        BinaryPredicate::LeftFileIsOlderOrDoesNotExistWhenRightDoes => {
            match (modified_time(left), modified_time(right)) {
                (Some(left), Some(right)) => Ok(left < right),
                (None, Some(_)) => Ok(true),
                _ => Ok(false),
            }
        }
    }
}

fn apply_binary_arithmetic_predicate(
    left: &str,
    right: &str,
    op: fn(i64, i64) -> bool,
) -> Result<bool, error::Error> {
    Ok(op(parse_integer(left)?, parse_integer(right)?))
}

fn parse_integer(s: &str) -> Result<i64, error::Error> {
    s.trim()
        .parse()
        .map_err(|_| error::Error::IntegerExpected(s.to_owned()))
}

fn modified_time(path: &str) -> Option<SystemTime> {
    Path::new(path).metadata().and_then(|md| md.modified()).ok()
}
