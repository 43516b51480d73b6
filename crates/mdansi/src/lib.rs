#![forbid(unsafe_code)]

//! # mdansi
//!
//! Command-line front end for [`markdansi`].
//!
//! Reads markdown from a file or stdin, renders it for the terminal and writes
//! the result to stdout or a file. Every rendering flag maps onto one
//! [`RenderOptions`] field; flags left out keep the library defaults.
//!
//! ## Usage
//!
//! ```bash
//! mdansi --in README.md
//! cat README.md | mdansi --width 60 --theme bright
//! mdansi --in notes.md --out notes.txt --no-color
//! mdansi --in table.md --table-border ascii --no-table-truncate
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use markdansi::{Environment, RenderOptions, Renderer, TableBorder, Theme, ThemeName};

/// Render markdown to styled terminal text.
#[derive(Parser, Debug, Clone)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "CLI flags are naturally bools"
)]
#[command(
    name = "mdansi",
    author,
    version,
    about = "Render markdown to styled terminal text",
    long_about = "Render markdown to ANSI-styled terminal text with wrapping, \
                  boxed code blocks, bordered tables and OSC-8 hyperlinks."
)]
pub struct Cli {
    /// Markdown input file, `-` for stdin
    #[arg(long = "in", value_name = "PATH", default_value = "-")]
    pub input: PathBuf,

    /// Write output to this file instead of stdout
    #[arg(long = "out", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Wrap width in columns (defaults to the terminal width, else 80)
    #[arg(long)]
    pub width: Option<usize>,

    /// Disable word wrapping
    #[arg(long)]
    pub no_wrap: bool,

    /// Force color output off
    ///
    /// Respects the `NO_COLOR` environment variable
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Force color output on, even when stdout is not a terminal
    ///
    /// Overrides --no-color and `NO_COLOR`
    #[arg(long)]
    pub color: bool,

    /// Never emit OSC-8 hyperlinks
    #[arg(long, conflicts_with = "force_links")]
    pub no_links: bool,

    /// Emit OSC-8 hyperlinks even if the terminal is not known to support them
    #[arg(long)]
    pub force_links: bool,

    /// Built-in theme
    ///
    /// Available themes: default, dim, bright, solarized, monochrome, contrast
    #[arg(long, short = 't', default_value = "default")]
    pub theme: ThemeName,

    /// Path to a JSON theme file
    ///
    /// Overrides --theme when given
    #[arg(long, value_name = "PATH")]
    pub theme_file: Option<PathBuf>,

    /// Spaces per list nesting level
    #[arg(long)]
    pub list_indent: Option<usize>,

    /// Bullet for unordered lists
    #[arg(long)]
    pub list_marker: Option<String>,

    /// Prefix for block quote lines
    #[arg(long)]
    pub quote_prefix: Option<String>,

    /// Table border style: unicode, ascii or none
    #[arg(long)]
    pub table_border: Option<TableBorder>,

    /// Spaces on each side of a table cell
    #[arg(long)]
    pub table_padding: Option<usize>,

    /// Omit the separator between table header and body
    #[arg(long)]
    pub table_dense: bool,

    /// Truncate table cells that do not fit
    #[arg(long, value_name = "BOOL", conflicts_with = "no_table_truncate")]
    pub table_truncate: Option<bool>,

    /// Wrap table cells instead of truncating them
    #[arg(long)]
    pub no_table_truncate: bool,

    /// Marker for truncated table cells
    #[arg(long)]
    pub table_ellipsis: Option<String>,

    /// Wrap long code lines
    #[arg(long, value_name = "BOOL", conflicts_with = "no_code_wrap")]
    pub code_wrap: Option<bool>,

    /// Never wrap code lines
    #[arg(long)]
    pub no_code_wrap: bool,

    /// Draw a box around multi-line code blocks
    #[arg(long, value_name = "BOOL", conflicts_with = "no_code_box")]
    pub code_box: Option<bool>,

    /// Never box code blocks
    #[arg(long)]
    pub no_code_box: bool,

    /// Number code block lines
    #[arg(long)]
    pub code_gutter: bool,

    /// Syntect theme for code highlighting
    #[cfg(feature = "syntax-highlighting")]
    #[arg(long, value_name = "NAME")]
    pub syntax_theme: Option<String>,

    /// Verbose logging to stderr (repeat for more)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter directive for the verbosity count.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Whether input comes from stdin.
    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    /// Build render options from the flags.
    ///
    /// # Errors
    ///
    /// Returns an error when the theme file cannot be read or parsed.
    pub fn to_render_options(&self) -> Result<RenderOptions> {
        let mut options = RenderOptions::new().theme(self.theme).wrap(!self.no_wrap);
        if let Some(width) = self.width {
            options = options.width(width);
        }
        if self.color {
            options = options.color(true);
        } else if self.no_color {
            options = options.color(false);
        }
        if self.no_links {
            options = options.hyperlinks(false);
        } else if self.force_links {
            options = options.hyperlinks(true);
        }
        if let Some(path) = &self.theme_file {
            options = options.custom_theme(load_theme(path)?);
        }
        if let Some(indent) = self.list_indent {
            options = options.list_indent(indent);
        }
        if let Some(marker) = &self.list_marker {
            options = options.list_marker(marker.clone());
        }
        if let Some(prefix) = &self.quote_prefix {
            options = options.quote_prefix(prefix.clone());
        }
        if let Some(border) = self.table_border {
            options = options.table_border(border);
        }
        if let Some(padding) = self.table_padding {
            options = options.table_padding(padding);
        }
        if self.table_dense {
            options = options.table_dense(true);
        }
        if let Some(truncate) = either_flag(self.table_truncate, self.no_table_truncate) {
            options = options.table_truncate(truncate);
        }
        if let Some(ellipsis) = &self.table_ellipsis {
            options = options.table_ellipsis(ellipsis.clone());
        }
        if let Some(wrap) = either_flag(self.code_wrap, self.no_code_wrap) {
            options = options.code_wrap(wrap);
        }
        if let Some(code_box) = either_flag(self.code_box, self.no_code_box) {
            options = options.code_box(code_box);
        }
        if self.code_gutter {
            options = options.code_gutter(true);
        }
        #[cfg(feature = "syntax-highlighting")]
        if let Some(theme) = &self.syntax_theme {
            options = options.shared_highlighter(markdansi::syntax::highlighter(theme));
        }
        Ok(options)
    }

    /// Read the raw input bytes.
    ///
    /// # Errors
    ///
    /// Returns an error when the input file or stdin cannot be read.
    pub fn read_input(&self) -> Result<Vec<u8>> {
        if self.reads_stdin() {
            let mut bytes = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            return Ok(bytes);
        }
        fs::read(&self.input).with_context(|| format!("failed to read {}", self.input.display()))
    }
}

/// `--flag <bool>` wins; `--no-flag` means false; neither leaves the default.
fn either_flag(value: Option<bool>, negated: bool) -> Option<bool> {
    value.or(negated.then_some(false))
}

/// Load a custom theme from a JSON file. Missing roles keep their defaults.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not a valid theme.
pub fn load_theme(path: &Path) -> Result<Theme> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read theme file {}", path.display()))?;
    let theme = serde_json::from_str(&json)
        .with_context(|| format!("invalid theme file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded theme file");
    Ok(theme)
}

/// Render markdown bytes with the CLI's options.
///
/// # Errors
///
/// Returns an error when the input is not UTF-8 or the options cannot be
/// built.
pub fn render_input(cli: &Cli, bytes: &[u8], env: &Environment) -> Result<String> {
    let options = cli.to_render_options()?;
    let markdown = std::str::from_utf8(bytes).map_err(markdansi::Error::from)?;
    let renderer = Renderer::with_environment(&options, env);
    tracing::info!(
        markdansi.bytes = bytes.len(),
        markdansi.width = ?renderer.options().width,
        markdansi.color = renderer.options().color,
        "Rendering input"
    );
    Ok(renderer.render(markdown))
}

/// Run the CLI: read, render, write.
///
/// # Errors
///
/// Returns an error for unreadable input, non-UTF-8 input, bad theme files
/// and failed writes.
pub fn run(cli: &Cli, env: &Environment) -> Result<()> {
    let bytes = cli.read_input()?;
    let rendered = render_input(cli, &bytes, env)?;
    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Whether an error comes from writing into a closed pipe.
#[must_use]
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["mdansi"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn plain_env() -> Environment {
        Environment::new()
    }

    // =========================================================================
    // Argument Parsing Tests
    // =========================================================================

    #[test]
    fn cli_parses_defaults() {
        let cli = cli(&[]);
        assert!(cli.reads_stdin());
        assert!(cli.output.is_none());
        assert_eq!(cli.theme, ThemeName::Default);
        assert!(!cli.no_wrap);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parses_input_and_output() {
        let cli = cli(&["--in", "doc.md", "--out", "doc.txt"]);
        assert!(!cli.reads_stdin());
        assert_eq!(cli.input, PathBuf::from("doc.md"));
        assert_eq!(cli.output, Some(PathBuf::from("doc.txt")));
    }

    #[test]
    fn cli_parses_theme_and_border() {
        let cli = cli(&["--theme", "solarized", "--table-border", "ascii"]);
        assert_eq!(cli.theme, ThemeName::Solarized);
        assert_eq!(cli.table_border, Some(TableBorder::Ascii));
    }

    #[test]
    fn cli_rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["mdansi", "--theme", "neon"]).is_err());
        assert!(Cli::try_parse_from(["mdansi", "--table-border", "double"]).is_err());
    }

    #[test]
    fn cli_rejects_conflicting_flags() {
        assert!(Cli::try_parse_from(["mdansi", "--no-links", "--force-links"]).is_err());
        assert!(Cli::try_parse_from(["mdansi", "--code-box", "true", "--no-code-box"]).is_err());
    }

    #[test]
    fn log_filter_follows_verbosity() {
        assert_eq!(cli(&[]).log_filter(), "warn");
        assert_eq!(cli(&["-v"]).log_filter(), "info");
        assert_eq!(cli(&["-vv"]).log_filter(), "debug");
        assert_eq!(cli(&["-vvvv"]).log_filter(), "trace");
    }

    // =========================================================================
    // Option Mapping Tests
    // =========================================================================

    #[test]
    fn unset_flags_leave_options_unset() {
        let options = cli(&[]).to_render_options().unwrap();
        assert_eq!(options.wrap, Some(true));
        assert_eq!(options.width, None);
        assert_eq!(options.hyperlinks, None);
        assert_eq!(options.table_truncate, None);
        assert_eq!(options.code_box, None);
    }

    #[test]
    fn flags_map_onto_options() {
        let options = cli(&[
            "--width",
            "60",
            "--no-wrap",
            "--no-color",
            "--no-links",
            "--list-indent",
            "4",
            "--list-marker",
            "*",
            "--quote-prefix",
            "> ",
            "--table-padding",
            "2",
            "--table-dense",
            "--table-ellipsis",
            "...",
            "--code-gutter",
        ])
        .to_render_options()
        .unwrap();
        assert_eq!(options.width, Some(60));
        assert_eq!(options.wrap, Some(false));
        assert_eq!(options.color, Some(false));
        assert_eq!(options.hyperlinks, Some(false));
        assert_eq!(options.list_indent, Some(4));
        assert_eq!(options.list_marker.as_deref(), Some("*"));
        assert_eq!(options.quote_prefix.as_deref(), Some("> "));
        assert_eq!(options.table_padding, Some(2));
        assert_eq!(options.table_dense, Some(true));
        assert_eq!(options.table_ellipsis.as_deref(), Some("..."));
        assert_eq!(options.code_gutter, Some(true));
    }

    #[test]
    fn bool_flags_and_negations() {
        let options = cli(&["--table-truncate", "false", "--code-wrap", "true", "--no-code-box"])
            .to_render_options()
            .unwrap();
        assert_eq!(options.table_truncate, Some(false));
        assert_eq!(options.code_wrap, Some(true));
        assert_eq!(options.code_box, Some(false));

        let options = cli(&["--no-table-truncate", "--no-code-wrap"])
            .to_render_options()
            .unwrap();
        assert_eq!(options.table_truncate, Some(false));
        assert_eq!(options.code_wrap, Some(false));
    }

    #[test]
    fn missing_theme_file_is_an_error() {
        let err = cli(&["--theme-file", "/nonexistent/theme.json"])
            .to_render_options()
            .unwrap_err();
        assert!(err.to_string().contains("failed to read theme file"));
    }

    // =========================================================================
    // Rendering Tests
    // =========================================================================

    #[test]
    fn render_input_plain() {
        let out = render_input(&cli(&[]), b"# Title\n\nbody", &plain_env()).unwrap();
        assert_eq!(out, "\nTitle\nbody\n");
    }

    #[test]
    fn render_input_rejects_invalid_utf8() {
        let err = render_input(&cli(&[]), &[0xff, 0xfe], &plain_env()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<markdansi::Error>(),
            Some(markdansi::Error::InvalidUtf8(_))
        ));
    }

    #[test]
    fn render_input_forced_color() {
        let out = render_input(&cli(&["--color"]), b"**b**", &plain_env()).unwrap();
        assert_eq!(out, "\x1b[1mb\x1b[0m\n");
    }

    #[test]
    fn broken_pipe_is_detected() {
        let err = anyhow::Error::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(is_broken_pipe(&err));
        let err = anyhow::Error::from(io::Error::from(io::ErrorKind::NotFound));
        assert!(!is_broken_pipe(&err));
    }
}
