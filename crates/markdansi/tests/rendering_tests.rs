//! End-to-end rendering scenarios.
//!
//! Every test renders through the public facade against an empty
//! [`Environment`], so the width defaults to 80 and color is off unless a test
//! turns it on.

use markdansi::width::visible_width;
use markdansi::{render_with_environment, Environment, RenderOptions, TableBorder, Theme, ThemeName};

fn render_env(markdown: &str, options: &RenderOptions) -> String {
    render_with_environment(markdown, options, &Environment::new())
}

fn plain(markdown: &str) -> String {
    render_env(markdown, &RenderOptions::new().color(false))
}

// ===========================================================================
// Wrapping
// ===========================================================================

#[test]
fn test_paragraph_wraps_to_width() {
    let options = RenderOptions::new().color(false).width(10);
    let out = render_env("one two three four five six seven eight nine ten", &options);
    let first = out.lines().next().unwrap_or_default();
    assert!(visible_width(first) <= 10, "first line too wide: {first:?}");
    assert!(out.lines().all(|line| visible_width(line) <= 10));
}

#[test]
fn test_wrap_off_keeps_long_lines() {
    let text = "word ".repeat(30);
    let options = RenderOptions::new().color(false).wrap(false);
    let out = render_env(text.trim(), &options);
    assert_eq!(out, format!("{}\n", text.trim()));
}

#[test]
fn test_plain_text_round_trips() {
    let options = RenderOptions::new()
        .color(false)
        .wrap(false)
        .hyperlinks(false)
        .code_box(false);
    assert_eq!(render_env("just some plain text", &options), "just some plain text\n");
}

// ===========================================================================
// Code blocks
// ===========================================================================

#[test]
fn test_diff_is_boxed_and_unwrapped() {
    let markdown = "```\n--- a/foo\n+++ b/foo\n@@ -1 +1 @@\n-old\n+ another very very very very long line\n```";
    let options = RenderOptions::new().color(false).width(20);
    let expected = concat!(
        "┌ [diff]──────────────────────────────────┐\n",
        "│ --- a/foo                               │\n",
        "│ +++ b/foo                               │\n",
        "│ @@ -1 +1 @@                             │\n",
        "│ -old                                    │\n",
        "│ + another very very very very long line │\n",
        "└─────────────────────────────────────────┘\n",
        "\n",
    );
    assert_eq!(render_env(markdown, &options), expected);
}

#[test]
fn test_code_list_merges_into_one_box() {
    let markdown = "- ```\n  first\n  ```\n- ```\n  second\n  ```";
    let expected = concat!(
        "┌ ────── ┐\n",
        "│ first  │\n",
        "│ second │\n",
        "└────────┘\n",
        "\n",
    );
    assert_eq!(plain(markdown), expected);
}

#[test]
fn test_adjacent_fences_merge() {
    let out = plain("```\nfirst\n```\n\n```\nsecond\n```");
    assert_eq!(out.matches('┌').count(), 1);
    assert!(out.contains("│ first  │"));
    assert!(out.contains("│ second │"));
}

#[test]
fn test_label_paragraph_names_language() {
    let out = plain("[rust]\n\n```\nfn main() {}\nlet x = 1;\n```");
    assert!(out.starts_with("┌ [rust]"), "{out}");
    assert!(!out.contains("\n[rust]\n"));
}

#[test]
fn test_single_line_code_has_no_box() {
    assert_eq!(plain("```\nonly\n```"), "only\n\n");
}

#[test]
fn test_code_box_can_be_disabled() {
    let options = RenderOptions::new().color(false).code_box(false);
    assert_eq!(render_env("```\na\nb\n```", &options), "a\nb\n\n");
}

#[test]
fn test_gutter_numbers_lines() {
    let options = RenderOptions::new()
        .color(false)
        .code_box(false)
        .code_gutter(true);
    let out = render_env("```\nalpha\nbeta\n```", &options);
    assert!(out.starts_with("1 alpha\n"));
    assert!(out.contains("2 beta"));
}

#[test]
fn test_gutter_widens_for_two_digits() {
    let body: Vec<String> = (1..=12).map(|n| format!("line {n}")).collect();
    let markdown = format!("```\n{}\n```", body.join("\n"));
    let options = RenderOptions::new()
        .color(false)
        .code_box(false)
        .code_gutter(true);
    let out = render_env(&markdown, &options);
    assert!(out.contains("12 line 12"));
    assert!(out.starts_with("1  line 1"));
}

#[test]
fn test_code_wraps_inside_box() {
    let options = RenderOptions::new().color(false).width(12);
    let out = render_env("```\n0123456789ABCDEFGHIJ\nx\n```", &options);
    assert!(out.lines().all(|line| visible_width(line) <= 12), "{out}");
    assert!(out.contains("│ 01234567 │"));
}

#[test]
fn test_code_wrap_can_be_disabled() {
    let options = RenderOptions::new().color(false).width(12).code_wrap(false);
    let out = render_env("```\n0123456789ABCDEFGHIJ\nx\n```", &options);
    assert!(out.contains("│ 0123456789ABCDEFGHIJ │"));
}

#[test]
fn test_reference_like_code_is_not_boxed() {
    let markdown = "```\n[1]: https://example.com/icon \"\n    Icon Composer Notes\n\"\n```";
    let out = plain(markdown);
    assert!(out.contains("[1]: https://example.com/icon"));
    assert!(out.contains("Icon Composer Notes"));
    assert!(!out.contains('┌'));
}

#[test]
fn test_custom_highlighter_is_used() {
    let options = RenderOptions::new()
        .color(false)
        .highlighter(|code, _lang| code.to_uppercase());
    let out = render_env("```js\nconst x = 1;\n```", &options);
    assert!(out.contains("CONST X = 1;"));
}

// ===========================================================================
// Tables
// ===========================================================================

const SIMPLE_TABLE: &str = "| h1 | h2 |\n| --- | --- |\n| a | b |";

#[test]
fn test_unicode_table_snapshot() {
    let expected = concat!(
        "┌────┬────┐\n",
        "│ h1 │ h2 │\n",
        "├────┼────┤\n",
        "│ a  │ b  │\n",
        "└────┴────┘\n",
        "\n",
    );
    assert_eq!(plain(SIMPLE_TABLE), expected);
}

#[test]
fn test_ascii_table_snapshot() {
    let options = RenderOptions::new()
        .color(false)
        .table_border(TableBorder::Ascii);
    let expected = concat!(
        "+----+----+\n",
        "| h1 | h2 |\n",
        "+----+----+\n",
        "| a  | b  |\n",
        "+----+----+\n",
        "\n",
    );
    assert_eq!(render_env(SIMPLE_TABLE, &options), expected);
}

#[test]
fn test_borderless_table() {
    let options = RenderOptions::new()
        .color(false)
        .table_border(TableBorder::None);
    assert_eq!(render_env(SIMPLE_TABLE, &options), " h1  |  h2 \n a   |  b  \n\n");
}

#[test]
fn test_dense_table_with_wide_padding() {
    let options = RenderOptions::new()
        .color(false)
        .table_padding(3)
        .table_dense(true);
    let out = render_env("| h1 |\n| --- |\n| a |", &options);
    assert!(out.contains("│   a    │"), "{out}");
    assert!(!out.contains('├'));
}

#[test]
fn test_table_alignment() {
    let out = plain("| left | right | mid |\n| :--- | ---: | :---: |\n| a | b | c |");
    assert!(out.contains("│ a    │     b │  c  │"), "{out}");
}

#[test]
fn test_table_truncates_long_cells() {
    let markdown = "| name | note |\n| --- | --- |\n| x | a very long cell value that keeps going |";
    let options = RenderOptions::new().color(false).width(24);
    let out = render_env(markdown, &options);
    assert!(out.contains('…'), "{out}");
    assert!(out.lines().all(|line| visible_width(line) <= 24), "{out}");
}

#[test]
fn test_table_without_truncation_wraps_cells() {
    let markdown = "| name | note |\n| --- | --- |\n| x | alpha beta gamma delta epsilon |";
    let options = RenderOptions::new()
        .color(false)
        .width(24)
        .table_truncate(false);
    let out = render_env(markdown, &options);
    assert!(!out.contains('…'));
    for word in ["alpha", "beta", "gamma", "delta", "epsilon"] {
        assert!(out.contains(word), "missing {word} in {out}");
    }
}

#[test]
fn test_custom_ellipsis() {
    let markdown = "| h |\n| --- |\n| abcdefghijklmnopqrstuvwxyz |";
    let options = RenderOptions::new()
        .color(false)
        .width(12)
        .table_ellipsis("...");
    assert!(render_env(markdown, &options).contains("..."));
}

// ===========================================================================
// Links and definitions
// ===========================================================================

#[test]
fn test_hyperlink_with_color() {
    let options = RenderOptions::new().color(true).hyperlinks(true);
    let out = render_env("[x](https://example.com)", &options);
    assert!(out.contains("\x1b]8;;https://example.com\x07"));
    assert!(out.contains("\x1b]8;;\x07"));
}

#[test]
fn test_hyperlink_without_color_is_plain() {
    let options = RenderOptions::new().color(false).hyperlinks(true);
    let out = render_env("[x](https://example.com)", &options);
    assert_eq!(out, "x (https://example.com)\n");
    assert!(!out.contains('\x1b'));
}

#[test]
fn test_hyperlinks_follow_terminal_capability() {
    let env = Environment::new().tty(true).var("TERM_PROGRAM", "WezTerm");
    let out = render_with_environment("[x](https://example.com)", &RenderOptions::new(), &env);
    assert!(out.contains("\x1b]8;;https://example.com\x07"));

    let no_links = RenderOptions::new().hyperlinks(false);
    let out = render_with_environment("[x](https://example.com)", &no_links, &env);
    assert!(!out.contains("\x1b]8;;"));
    assert!(out.contains("(https://example.com)"));
}

#[test]
fn test_definition_footer_gets_blank_line() {
    let markdown = "Body line.\n[1]: https://example.com \"Title\"\nNext.";
    assert_eq!(plain(markdown), "Body line.\n\n[1]: https://example.com \"Title\"\nNext.\n");
}

#[test]
fn test_wrapped_reference_definition_is_rejoined() {
    let markdown = "[1]: https://example.com/icon \"\n\n    Icon Composer Notes\n    \"";
    let out = plain(markdown);
    assert!(out.contains("[1]: https://example.com/icon Icon Composer Notes"), "{out}");
    assert!(!out.contains('┌'));
}

// ===========================================================================
// Other blocks
// ===========================================================================

#[test]
fn test_html_is_ignored() {
    assert_eq!(plain("<div>ignored</div>"), "");
}

#[test]
fn test_block_quote_prefix_is_configurable() {
    let options = RenderOptions::new().color(false).quote_prefix("> ");
    assert_eq!(render_env("> quoted", &options), "> quoted\n");
}

#[test]
fn test_task_list() {
    let out = plain("- [ ] open\n- [x] done");
    assert!(out.contains("[ ] open"));
    assert!(out.contains("[x] done"));
}

#[test]
fn test_double_digit_marker_snapshot() {
    let options = RenderOptions::new().color(false).width(20);
    let out = render_env("9. one two\n10. alpha beta gamma delta epsilon zeta", &options);
    assert_eq!(
        out,
        "9. one two\n10. alpha beta gamma\n    delta epsilon \n    zeta\n"
    );
}

#[test]
fn test_quoted_code_box_snapshot() {
    let options = RenderOptions::new().color(false).width(24);
    let out = render_env("> ```sh\n> echo alpha beta gamma delta\n> ls\n> ```", &options);
    assert_eq!(
        out,
        "│ ┌ [sh]───────────────┐\n\
         │ │ echo alpha beta ga │\n\
         │ │ mma delta          │\n\
         │ │ ls                 │\n\
         │ └────────────────────┘\n"
    );
}

#[test]
fn test_nested_task_list_fits_width() {
    let options = RenderOptions::new().color(false).width(24).list_indent(4);
    let out = render_env(
        "- [ ] outer item with several words\n\n  - [x] inner item with several more words",
        &options,
    );
    assert_eq!(
        out,
        "[ ] outer item with \n    several words\n    [x] inner item with \n        several more \n        words\n\n"
    );
    assert!(out.lines().all(|line| visible_width(line) <= 24), "{out}");
}

#[test]
fn test_rule_is_capped() {
    assert_eq!(plain("---"), format!("{}\n", "—".repeat(40)));
}

// ===========================================================================
// Themes
// ===========================================================================

#[test]
fn test_default_theme_colors() {
    let options = RenderOptions::new().color(true);
    let out = render_env("# Head\n\n`code`\n\n```\nblock\nmore\n```", &options);
    assert!(out.contains("\x1b[33m"), "heading yellow");
    assert!(out.contains("\x1b[36m"), "inline code cyan");
    assert!(out.contains("\x1b[32m"), "block code green");
}

#[test]
fn test_dim_theme_dims() {
    let options = RenderOptions::new().color(true).theme(ThemeName::Dim);
    let out = render_env("`code`", &options);
    assert!(out.contains("\x1b[2m"));
}

#[test]
fn test_empty_custom_theme_has_no_color() {
    let options = RenderOptions::new().color(true).custom_theme(Theme::empty());
    let out = render_env("*a* `b` [c](https://e.com)", &options);
    assert_eq!(out, "a b c\x1b[2m (https://e.com)\x1b[0m\n");
}

#[test]
fn test_every_theme_renders_same_text() {
    let markdown = "# T\n\n- **a**\n- `b`\n\n> q";
    let expected = plain(markdown);
    for name in ThemeName::ALL {
        let options = RenderOptions::new().color(true).theme(name);
        let out = render_env(markdown, &options);
        assert_eq!(markdansi::width::strip_ansi(&out), expected, "theme {name}");
    }
}
