//! Integration tests for the `softspoken` binary.
//!
//! stdout is a pipe under test, so spinners take the non-animated path and
//! print their message once, with the done text, when they stop.

mod common;

use predicates::prelude::*;

use common::softspoken_cmd;

// ============================================================================
// Plain output
// ============================================================================

#[test]
fn test_version_includes_git_hash() {
    softspoken_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("("));
}

#[test]
fn test_log_is_indented() {
    softspoken_cmd()
        .args(["log", "hello", "world"])
        .assert()
        .success()
        .stdout("    hello world\n");
}

#[test]
fn test_log_as_caption() {
    softspoken_cmd()
        .args(["log", "--as", "caption", "Summary"])
        .assert()
        .success()
        .stdout("\n    Summary\n");
}

#[test]
fn test_indent_flag() {
    softspoken_cmd()
        .args(["--indent", "2", "log", "hi"])
        .assert()
        .success()
        .stdout("  hi\n");
}

#[test]
fn test_long_log_wraps() {
    // 60 - 4 - 4 = 52 columns of text.
    let words = "word ".repeat(20);
    let output = softspoken_cmd()
        .args(["log", words.trim()])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.lines().count() > 1);
    assert!(stdout.lines().all(|l| l.len() <= 56 && l.starts_with("    word")));
}

#[test]
fn test_props_align() {
    softspoken_cmd()
        .args(["props", "a=1", "bb=2"])
        .assert()
        .success()
        .stdout("    a  1\n    bb 2\n");
}

#[test]
fn test_props_rejects_missing_equals() {
    softspoken_cmd()
        .args(["props", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[error]"))
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_define() {
    softspoken_cmd()
        .args(["define", "term", "meaning"])
        .assert()
        .success()
        .stdout("    term\n        meaning\n");
}

#[test]
fn test_list_with_bullet() {
    softspoken_cmd()
        .args(["list", "--bullet", "-", "one", "two"])
        .assert()
        .success()
        .stdout("    - one\n    - two\n");
}

#[test]
fn test_table() {
    softspoken_cmd()
        .args(["table", "--header", "NAME,AGE", "ann,31", "bob,4"])
        .assert()
        .success()
        .stdout("    NAME  AGE\n    ann   31\n    bob   4\n");
}

#[test]
fn test_table_boxed_glyphs() {
    softspoken_cmd()
        .args(["--table-glyphs", "boxed"])
        .args(["table", "--expanded", "--header", "NAME,AGE", "ann,31", "bob,4"])
        .assert()
        .success()
        .stdout(concat!(
            "    ╔════╤═══╗\n",
            "    ║NAME│AGE║\n",
            "    ╟────┼───╢\n",
            "    ║ann │31 ║\n",
            "    ╟────┼───╢\n",
            "    ║bob │4  ║\n",
            "    ╚════╧═══╝\n",
        ));
}

#[test]
fn test_table_glyphs_rejects_unknown_set() {
    softspoken_cmd()
        .env("SOFTSPOKEN_TABLE_GLYPHS", "rounded")
        .args(["table", "--header", "A", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("plain, rules, boxed"));
}

#[test]
fn test_inspect() {
    softspoken_cmd()
        .args(["inspect", r#"{"a": [1, 2]}"#])
        .assert()
        .success()
        .stdout("    { a: [ 1, 2 ] }\n");
}

#[test]
fn test_inspect_rejects_bad_json() {
    softspoken_cmd()
        .args(["inspect", "{nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"))
        .stderr(predicate::str::contains("Cause:"));
}

// ============================================================================
// Spinners
// ============================================================================

#[test]
fn test_spin_without_terminal() {
    softspoken_cmd()
        .args(["spin", "--millis", "10", "--done", "finished", "Working"])
        .assert()
        .success()
        .stdout("    Working finished\n");
}

#[test]
fn test_spin_reports_elapsed() {
    softspoken_cmd()
        .args(["spin", "--millis", "20", "Working"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("    Working ("))
        .stdout(predicate::str::ends_with(")\n"));
}

#[test]
fn test_demo_runs() {
    softspoken_cmd()
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Properties"))
        .stdout(predicate::str::contains("softspoken-core"))
        .stdout(predicate::str::contains("Downloading ("))
        .stdout(predicate::str::contains("Unpacking ("));
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_zero_width_is_rejected() {
    softspoken_cmd()
        .args(["--width", "0", "log", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("width"));
}

#[test]
fn test_unknown_theme_style_is_rejected() {
    softspoken_cmd()
        .args(["--theme", r#"{"error": "sparkly"}"#, "log", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sparkly"));
}

#[test]
fn test_env_sets_driver() {
    softspoken_cmd()
        .env("SOFTSPOKEN_DRIVER", "wheel")
        .args(["log", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wheel"));
}
