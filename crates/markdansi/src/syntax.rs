//! Syntect-backed code highlighting.
//!
//! Enabled by the `syntax-highlighting` feature. The renderer itself never
//! depends on this module; it only produces a [`Highlighter`] to plug into
//! [`RenderOptions::shared_highlighter`](crate::RenderOptions::shared_highlighter).
//!
//! # Example
//!
//! ```rust,ignore
//! use markdansi::{render, RenderOptions};
//! use markdansi::syntax::SyntaxHighlighter;
//!
//! let options = RenderOptions::new()
//!     .color(true)
//!     .shared_highlighter(SyntaxHighlighter::new("base16-ocean.dark").into_fn());
//! let out = render("```rust\nfn main() {}\n```", &options);
//! ```

use std::sync::{Arc, LazyLock};

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::as_24_bit_terminal_escaped;

use crate::options::Highlighter;

/// Theme used by [`SyntaxHighlighter::default`].
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntax definitions, loaded on first use.
pub static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Bundled color themes, loaded on first use.
pub static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Maps fence info strings to syntect syntax definitions.
///
/// Handles common aliases ("rs", "py", "sh") and falls back to plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    /// Creates a detector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Finds the syntax for a language id. Never fails: unknown ids get
    /// plain text.
    #[must_use]
    pub fn detect(&self, lang: &str) -> &'static SyntaxReference {
        let lang = lang.trim().to_lowercase();
        if lang.is_empty() {
            return SYNTAX_SET.find_syntax_plain_text();
        }
        if let Some(syntax) = SYNTAX_SET.find_syntax_by_token(&lang) {
            return syntax;
        }
        let canonical = Self::resolve_alias(&lang);
        if canonical != lang {
            if let Some(syntax) = SYNTAX_SET.find_syntax_by_token(canonical) {
                return syntax;
            }
        }
        SYNTAX_SET
            .find_syntax_by_extension(&lang)
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
    }

    /// Whether the id resolves to something other than plain text.
    #[must_use]
    pub fn is_supported(&self, lang: &str) -> bool {
        self.detect(lang).name != "Plain Text"
    }

    fn resolve_alias(lang: &str) -> &str {
        match lang {
            "js" | "mjs" | "cjs" | "jsx" => "javascript",
            "ts" | "mts" | "cts" | "tsx" => "typescript",
            "rs" => "rust",
            "py" | "py3" | "python3" => "python",
            "rb" => "ruby",
            "sh" | "zsh" | "shell" | "console" | "shellscript" => "bash",
            "yml" => "yaml",
            "md" => "markdown",
            "htm" => "html",
            "c++" | "cxx" | "hpp" | "cc" => "cpp",
            "h" => "c",
            "cs" | "csharp" => "c#",
            "golang" => "go",
            "kt" | "kts" => "kotlin",
            "ex" | "exs" => "elixir",
            "erl" => "erlang",
            "hs" => "haskell",
            "ml" | "mli" => "ocaml",
            "pl" | "pm" => "perl",
            "tex" => "latex",
            "patch" => "diff",
            "make" | "mk" => "makefile",
            "bat" | "cmd" => "batch file",
            "jsonc" | "json5" => "json",
            _ => lang,
        }
    }
}

/// Highlights code blocks with one syntect theme into 24-bit ANSI.
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter {
    theme: Option<&'static SyntectTheme>,
    detector: LanguageDetector,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl SyntaxHighlighter {
    /// Creates a highlighter for a bundled theme. An unknown name gives a
    /// highlighter that returns code unchanged.
    #[must_use]
    pub fn new(theme: &str) -> Self {
        let found = THEME_SET.themes.get(theme);
        if found.is_none() {
            tracing::warn!(markdansi.syntax_theme = theme, "Unknown syntax theme");
        }
        Self {
            theme: found,
            detector: LanguageDetector::new(),
        }
    }

    /// Names of the bundled themes.
    #[must_use]
    pub fn theme_names() -> Vec<&'static str> {
        THEME_SET.themes.keys().map(String::as_str).collect()
    }

    /// Highlight a whole code block. One parser runs over all lines in order,
    /// so strings and comments spanning lines keep their colors. Each output
    /// line ends with a reset. Returns the input unchanged when the language
    /// is missing or highlighting fails.
    #[must_use]
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let (Some(lang), Some(theme)) = (lang.filter(|l| !l.trim().is_empty()), self.theme) else {
            return code.to_string();
        };
        let syntax = self.detector.detect(lang);
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut out: Vec<String> = Vec::new();
        for line in code.split('\n') {
            // The newline-aware syntax set expects every line terminated.
            let line = format!("{line}\n");
            match highlighter.highlight_line(&line, &SYNTAX_SET) {
                Ok(ranges) => {
                    let escaped = as_24_bit_terminal_escaped(&ranges, false);
                    out.push(format!("{}\x1b[0m", escaped.trim_end_matches('\n')));
                }
                Err(err) => {
                    tracing::debug!(markdansi.language = lang, error = %err, "Highlighting failed");
                    return code.to_string();
                }
            }
        }
        out.join("\n")
    }

    /// Wrap into the renderer's highlighter hook.
    #[must_use]
    pub fn into_fn(self) -> Highlighter {
        Arc::new(move |code, lang| self.highlight(code, lang))
    }
}

/// Shorthand for `SyntaxHighlighter::new(theme).into_fn()`.
#[must_use]
pub fn highlighter(theme: &str) -> Highlighter {
    SyntaxHighlighter::new(theme).into_fn()
}
