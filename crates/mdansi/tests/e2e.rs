//! End-to-end integration tests for the mdansi CLI.
//!
//! These run the real binary with stdout piped, so color is off unless a test
//! passes `--color`. `COLUMNS` and `NO_COLOR` are cleared to keep output
//! independent of the calling shell.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// Get a Command for the mdansi binary.
#[allow(deprecated)]
fn mdansi_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mdansi").unwrap();
    cmd.env_remove("COLUMNS")
        .env_remove("NO_COLOR")
        .env_remove("MDANSI_LOG");
    cmd
}

fn markdown_file(content: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::new().unwrap();
    temp.write_all(content.as_bytes()).unwrap();
    temp
}

// =============================================================================
// Input and Output
// =============================================================================

mod input_output {
    use super::*;

    #[test]
    fn test_render_stdin_by_default() {
        mdansi_cmd()
            .write_stdin("# From Stdin\n\nHello!")
            .assert()
            .success()
            .stdout("\nFrom Stdin\nHello!\n");
    }

    #[test]
    fn test_render_stdin_with_dash() {
        mdansi_cmd()
            .args(["--in", "-"])
            .write_stdin("plain words")
            .assert()
            .success()
            .stdout("plain words\n");
    }

    #[test]
    fn test_render_empty_input() {
        mdansi_cmd().write_stdin("").assert().success().stdout("");
    }

    #[test]
    fn test_render_file() {
        let temp = markdown_file("# Title\n\n- one\n- two\n");
        mdansi_cmd()
            .arg("--in")
            .arg(temp.path())
            .assert()
            .success()
            .stdout("\nTitle\n- one\n- two\n");
    }

    #[test]
    fn test_write_output_file() {
        let temp = markdown_file("**bold** text");
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        mdansi_cmd()
            .arg("--in")
            .arg(temp.path())
            .arg("--out")
            .arg(&out)
            .assert()
            .success()
            .stdout("");
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "bold text\n");
    }

    #[test]
    fn test_unicode_content() {
        let temp = markdown_file("# 日本語\n\nCafé ☕ ok");
        mdansi_cmd()
            .arg("--in")
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("日本語"))
            .stdout(predicate::str::contains("Café ☕ ok"));
    }
}

// =============================================================================
// Error Handling
// =============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_invalid_utf8_fails() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[b'#', b' ', 0xff, 0xfe]).unwrap();
        mdansi_cmd()
            .arg("--in")
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("UTF-8"));
    }

    #[test]
    fn test_invalid_utf8_on_stdin_fails() {
        mdansi_cmd()
            .write_stdin(vec![0xc3, 0x28])
            .assert()
            .failure()
            .stderr(predicate::str::contains("UTF-8"));
    }

    #[test]
    fn test_file_not_found() {
        mdansi_cmd()
            .args(["--in", "/nonexistent/path/file.md"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("/nonexistent/path/file.md"));
    }

    #[test]
    fn test_directory_instead_of_file() {
        let dir = TempDir::new().unwrap();
        mdansi_cmd().arg("--in").arg(dir.path()).assert().failure();
    }

    #[test]
    fn test_unknown_theme() {
        mdansi_cmd()
            .args(["--theme", "neon"])
            .write_stdin("x")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown theme"));
    }

    #[test]
    fn test_invalid_width() {
        mdansi_cmd()
            .args(["--width", "wide"])
            .write_stdin("x")
            .assert()
            .failure();
    }

    #[test]
    fn test_malformed_theme_file() {
        let theme = markdown_file("{ not json");
        mdansi_cmd()
            .arg("--theme-file")
            .arg(theme.path())
            .write_stdin("x")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid theme file"));
    }
}

// =============================================================================
// Rendering Flags
// =============================================================================

mod flags {
    use super::*;

    const TABLE: &str = "| h1 | h2 |\n| --- | --- |\n| a | b |";

    #[test]
    fn test_width_wraps() {
        mdansi_cmd()
            .args(["--width", "10"])
            .write_stdin("one two three four five")
            .assert()
            .success()
            .stdout(predicate::str::contains("three four\nfive\n"))
            .stdout(predicate::function(|out: &str| {
                out.lines().all(|line| line.chars().count() <= 10)
            }));
    }

    #[test]
    fn test_no_wrap() {
        let text = "word ".repeat(30);
        mdansi_cmd()
            .args(["--no-wrap", "--width", "10"])
            .write_stdin(text.trim())
            .assert()
            .success()
            .stdout(format!("{}\n", text.trim()));
    }

    #[test]
    fn test_table_border_ascii() {
        mdansi_cmd()
            .args(["--table-border", "ascii"])
            .write_stdin(TABLE)
            .assert()
            .success()
            .stdout(predicate::str::contains("+----+----+"))
            .stdout(predicate::str::contains("| a  | b  |"));
    }

    #[test]
    fn test_table_dense() {
        mdansi_cmd()
            .arg("--table-dense")
            .write_stdin(TABLE)
            .assert()
            .success()
            .stdout(predicate::str::contains("├").not());
    }

    #[test]
    fn test_table_truncate_toggle() {
        let table = "| h |\n| --- |\n| abcdefghijklmnopqrstuvwxyz |";
        mdansi_cmd()
            .args(["--width", "12"])
            .write_stdin(table)
            .assert()
            .success()
            .stdout(predicate::str::contains("…"));
        mdansi_cmd()
            .args(["--width", "12", "--no-table-truncate"])
            .write_stdin(table)
            .assert()
            .success()
            .stdout(predicate::str::contains("…").not());
        mdansi_cmd()
            .args(["--width", "12", "--table-truncate", "false"])
            .write_stdin(table)
            .assert()
            .success()
            .stdout(predicate::str::contains("…").not());
    }

    #[test]
    fn test_code_gutter_without_box() {
        mdansi_cmd()
            .args(["--code-gutter", "--no-code-box"])
            .write_stdin("```\nalpha\nbeta\n```")
            .assert()
            .success()
            .stdout("1 alpha\n2 beta\n\n");
    }

    #[test]
    fn test_code_box_flag_value() {
        mdansi_cmd()
            .args(["--code-box", "false"])
            .write_stdin("```\nalpha\nbeta\n```")
            .assert()
            .success()
            .stdout("alpha\nbeta\n\n");
    }

    #[test]
    fn test_list_and_quote_options() {
        mdansi_cmd()
            .args(["--list-marker", "*", "--quote-prefix", "> "])
            .write_stdin("- item\n\n> quoted")
            .assert()
            .success()
            .stdout("* item\n> quoted\n");
    }

    #[test]
    fn test_links_plain_without_color() {
        mdansi_cmd()
            .arg("--force-links")
            .write_stdin("[x](https://example.com)")
            .assert()
            .success()
            .stdout("x (https://example.com)\n");
    }

    #[test]
    fn test_forced_color_and_links() {
        mdansi_cmd()
            .args(["--color", "--force-links"])
            .write_stdin("[x](https://example.com)")
            .assert()
            .success()
            .stdout(predicate::str::contains("\x1b]8;;https://example.com\x07"));
    }

    #[test]
    fn test_no_color_env_is_respected() {
        mdansi_cmd()
            .env("NO_COLOR", "1")
            .write_stdin("**b**")
            .assert()
            .success()
            .stdout("b\n");
    }

    #[test]
    fn test_theme_file_applies() {
        let theme = markdown_file(r#"{ "strong": { "color": "red", "bold": false } }"#);
        mdansi_cmd()
            .arg("--color")
            .arg("--theme-file")
            .arg(theme.path())
            .write_stdin("**b**")
            .assert()
            .success()
            .stdout("\x1b[31mb\x1b[0m\n");
    }

    #[test]
    fn test_every_theme_name() {
        for theme in ["default", "dim", "bright", "solarized", "monochrome", "contrast"] {
            mdansi_cmd()
                .args(["--theme", theme])
                .write_stdin("# Heading")
                .assert()
                .success()
                .stdout("\nHeading\n");
        }
    }

    #[test]
    fn test_verbose_logs_to_stderr() {
        mdansi_cmd()
            .arg("-vv")
            .write_stdin("text")
            .assert()
            .success()
            .stdout("text\n")
            .stderr(predicate::str::contains("Rendering input"));
    }
}

// =============================================================================
// Help and Version
// =============================================================================

mod help_version {
    use super::*;

    #[test]
    fn test_help_flag() {
        mdansi_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--table-border"))
            .stdout(predicate::str::contains("--theme-file"));
    }

    #[test]
    fn test_version_flag() {
        mdansi_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("mdansi"));
    }
}
