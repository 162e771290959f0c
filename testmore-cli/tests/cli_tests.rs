//! Integration tests for the `testmore` command.

#![allow(clippy::panic_in_result_fn)]

use assert_fs::prelude::*;
use predicates::prelude::*;

fn testmore() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("testmore"));
    cmd.env_remove("TESTMORE_CONFIG").arg("--no-config");
    cmd
}

#[test]
fn eq_passes_silently() {
    testmore()
        .args(["-m", "same", "eq", "foo", "foo"])
        .assert()
        .success()
        .stdout("ok 1 - same\n")
        .stderr("");
}

#[test]
fn eq_failure_shows_both_values() {
    testmore()
        .args(["-m", "differ", "eq", "foo", "bar"])
        .assert()
        .code(1)
        .stdout("not ok 1 - differ\n")
        .stderr("#   Failed test 'differ'\n#          got: 'foo'\n#     expected: 'bar'\n");
}

#[test]
fn ne_hides_expected_value() {
    testmore()
        .args(["ne", "foo", "foo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected: (something else)"));
}

#[test]
fn result_number_is_configurable() {
    testmore()
        .args(["-n", "4", "ne", "a", "b"])
        .assert()
        .success()
        .stdout("ok 4\n");
}

#[test]
fn largest_result_number_is_accepted() {
    testmore()
        .args(["-n", "4294967295", "eq", "a", "a"])
        .assert()
        .success()
        .stdout("ok 4294967295\n");
}

#[test]
fn glob_matching() {
    testmore().args(["like", "hello.txt", "*.txt"]).assert().success();
    testmore().args(["unlike", "hello.txt", "*.txt"]).assert().code(1);

    testmore()
        .args(["like", "b.txt", "@(a|b).txt"])
        .assert()
        .code(1);
    testmore()
        .args(["--extglob", "like", "b.txt", "@(a|b).txt"])
        .assert()
        .success();

    testmore().args(["like", "]", "[]]"]).assert().success();
    testmore().args(["like", "a", "[!]]"]).assert().success();
    testmore().args(["like", "]x", "[]abc]x"]).assert().success();
}

#[test]
fn regex_matching() {
    testmore()
        .args(["grep", "line one\nline two", "^line two$"])
        .assert()
        .success();

    testmore()
        .args(["nogrep", "abc", "b"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected: a regex not matching 'b'"));
}

#[test]
fn malformed_regex_is_a_harness_error() {
    testmore()
        .args(["nogrep", "abc", "("])
        .assert()
        .code(2)
        .stdout("not ok 1\n")
        .stderr(predicate::str::contains("error: invalid regex"));
}

#[test]
fn numeric_comparisons() {
    testmore().args(["lt", "3", "5"]).assert().success();
    testmore().args(["le", "5", "5"]).assert().success();
    testmore().args(["gt", "-2", "-3"]).assert().success();
    testmore().args(["ge", "4", "5"]).assert().code(1);

    testmore()
        .args(["lt", "5", "3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected: a number less than 3"));
}

#[test]
fn non_numeric_operand_is_rejected() {
    testmore().args(["lt", "five", "3"]).assert().code(2);
}

#[test]
fn diff_of_files() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;
    let a = dir.child("a.txt");
    let b = dir.child("b.txt");
    let c = dir.child("c.txt");
    a.write_str("one\ntwo\n")?;
    b.write_str("one\ntwo\n")?;
    c.write_str("one\n2\n")?;

    testmore()
        .arg("diff")
        .arg(a.path())
        .arg(b.path())
        .assert()
        .success();

    testmore()
        .arg("diff")
        .arg(a.path())
        .arg(c.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("#     expected: same content as"))
        .stderr(predicate::str::contains("# -two\n# +2\n"));

    testmore()
        .arg("diff")
        .arg(dir.child("missing.txt").path())
        .arg(a.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("doesn't exist"))
        .stderr(predicate::str::contains("cannot read").not());

    Ok(())
}

#[test]
fn test_expression() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;
    let file = dir.child("present");
    file.touch()?;

    testmore()
        .args(["test", "--", "-f"])
        .arg(file.path())
        .assert()
        .success();

    testmore()
        .args(["test", "--", "abc", "=", "abd"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed test: abc = abd"));

    testmore()
        .args(["test", "--", "x", "-lt", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("integer expression expected"));

    Ok(())
}

#[test]
fn diag_reads_stdin_without_arguments() {
    testmore()
        .arg("diag")
        .write_stdin("first\nsecond\n")
        .assert()
        .success()
        .stdout("")
        .stderr("# first\n# second\n");

    testmore()
        .args(["diag", "hello", "world"])
        .assert()
        .success()
        .stderr("# hello world\n");
}

#[test]
fn note_goes_to_stdout() {
    testmore()
        .args(["note", "for the log"])
        .assert()
        .success()
        .stdout("# for the log\n");
}

#[test]
fn config_file_sets_label_width() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;
    let config = dir.child("config.toml");
    config.write_str("[diagnostics]\nlabel-width = 4\n")?;

    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("testmore"))
        .arg("--config")
        .arg(config.path())
        .args(["eq", "a", "b"])
        .assert()
        .code(1)
        .stderr(predicate::str::ends_with("#  got: 'a'\n# expected: 'b'\n"));

    Ok(())
}

#[test]
fn missing_explicit_config_is_fatal() {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("testmore"))
        .env("TESTMORE_CONFIG", "/nonexistent/testmore/config.toml")
        .args(["eq", "a", "a"])
        .assert()
        .code(2)
        .stdout("");
}
