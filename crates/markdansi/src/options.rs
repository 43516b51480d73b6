//! Caller-facing render options and their resolution against the environment.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::env::Environment;
use crate::error::Error;
use crate::theme::{Theme, ThemeName};

/// Width used when wrapping is on and the terminal width is unknown.
pub const DEFAULT_WIDTH: usize = 80;
const DEFAULT_LIST_INDENT: usize = 2;
const DEFAULT_LIST_MARKER: &str = "-";
const DEFAULT_QUOTE_PREFIX: &str = "│ ";
const DEFAULT_TABLE_PADDING: usize = 1;
const DEFAULT_TABLE_ELLIPSIS: &str = "…";

/// External syntax highlighter: `(code, language) -> styled code`.
///
/// Called once per code block with the whole block, lines joined by `\n`.
/// The result is split back into lines and wrapped to the code width.
///
/// The returned text may contain escape sequences; they are stripped again
/// when color output is off.
pub type Highlighter = Arc<dyn Fn(&str, Option<&str>) -> String + Send + Sync>;

/// Table border glyph style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TableBorder {
    /// Box-drawing characters.
    #[default]
    Unicode,
    /// `+`, `-` and `|`.
    Ascii,
    /// No frame; cells joined with ` | `.
    None,
}

impl TableBorder {
    /// The lowercase name used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TableBorder::Unicode => "unicode",
            TableBorder::Ascii => "ascii",
            TableBorder::None => "none",
        }
    }
}

impl fmt::Display for TableBorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableBorder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unicode" => Ok(TableBorder::Unicode),
            "ascii" => Ok(TableBorder::Ascii),
            "none" => Ok(TableBorder::None),
            _ => Err(Error::UnknownTableBorder(s.to_string())),
        }
    }
}

/// Render options. Every field is optional; unset fields take defaults derived
/// from the [`Environment`] and the default theme.
///
/// # Example
///
/// ```rust
/// use markdansi::{RenderOptions, TableBorder, ThemeName};
///
/// let options = RenderOptions::new()
///     .width(60)
///     .color(false)
///     .theme(ThemeName::Solarized)
///     .table_border(TableBorder::Ascii);
/// assert_eq!(options.width, Some(60));
/// ```
#[derive(Clone, Default)]
pub struct RenderOptions {
    pub wrap: Option<bool>,
    pub width: Option<usize>,
    pub color: Option<bool>,
    pub hyperlinks: Option<bool>,
    pub theme: Option<ThemeName>,
    /// Replaces the named theme entirely when set.
    pub custom_theme: Option<Theme>,
    pub list_indent: Option<usize>,
    pub list_marker: Option<String>,
    pub quote_prefix: Option<String>,
    pub table_border: Option<TableBorder>,
    pub table_padding: Option<usize>,
    pub table_dense: Option<bool>,
    pub table_truncate: Option<bool>,
    pub table_ellipsis: Option<String>,
    pub code_box: Option<bool>,
    pub code_gutter: Option<bool>,
    pub code_wrap: Option<bool>,
    pub highlighter: Option<Highlighter>,
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("wrap", &self.wrap)
            .field("width", &self.width)
            .field("color", &self.color)
            .field("hyperlinks", &self.hyperlinks)
            .field("theme", &self.theme)
            .field("custom_theme", &self.custom_theme.is_some())
            .field("list_indent", &self.list_indent)
            .field("list_marker", &self.list_marker)
            .field("quote_prefix", &self.quote_prefix)
            .field("table_border", &self.table_border)
            .field("table_padding", &self.table_padding)
            .field("table_dense", &self.table_dense)
            .field("table_truncate", &self.table_truncate)
            .field("table_ellipsis", &self.table_ellipsis)
            .field("code_box", &self.code_box)
            .field("code_gutter", &self.code_gutter)
            .field("code_wrap", &self.code_wrap)
            .field("highlighter", &self.highlighter.is_some())
            .finish()
    }
}

impl RenderOptions {
    /// Creates options with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables hard wrapping.
    #[must_use]
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = Some(wrap);
        self
    }

    /// Sets the wrap width in columns.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Enables or disables ANSI output.
    #[must_use]
    pub fn color(mut self, color: bool) -> Self {
        self.color = Some(color);
        self
    }

    /// Enables or disables OSC-8 hyperlinks. Ignored when color is off.
    #[must_use]
    pub fn hyperlinks(mut self, hyperlinks: bool) -> Self {
        self.hyperlinks = Some(hyperlinks);
        self
    }

    /// Selects a built-in theme.
    #[must_use]
    pub fn theme(mut self, theme: ThemeName) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Supplies a full custom theme.
    #[must_use]
    pub fn custom_theme(mut self, theme: Theme) -> Self {
        self.custom_theme = Some(theme);
        self
    }

    /// Spaces per list nesting level.
    #[must_use]
    pub fn list_indent(mut self, indent: usize) -> Self {
        self.list_indent = Some(indent);
        self
    }

    /// Bullet glyph for unordered lists.
    #[must_use]
    pub fn list_marker(mut self, marker: impl Into<String>) -> Self {
        self.list_marker = Some(marker.into());
        self
    }

    /// Prefix put before every block quote line.
    #[must_use]
    pub fn quote_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.quote_prefix = Some(prefix.into());
        self
    }

    /// Table border style.
    #[must_use]
    pub fn table_border(mut self, border: TableBorder) -> Self {
        self.table_border = Some(border);
        self
    }

    /// Spaces on each side of table cell content.
    #[must_use]
    pub fn table_padding(mut self, padding: usize) -> Self {
        self.table_padding = Some(padding);
        self
    }

    /// Omits the separator between the header and body rows.
    #[must_use]
    pub fn table_dense(mut self, dense: bool) -> Self {
        self.table_dense = Some(dense);
        self
    }

    /// Truncates overlong cells instead of wrapping them.
    #[must_use]
    pub fn table_truncate(mut self, truncate: bool) -> Self {
        self.table_truncate = Some(truncate);
        self
    }

    /// Marker appended to truncated cells.
    #[must_use]
    pub fn table_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.table_ellipsis = Some(ellipsis.into());
        self
    }

    /// Draws a box around multi-line code blocks.
    #[must_use]
    pub fn code_box(mut self, code_box: bool) -> Self {
        self.code_box = Some(code_box);
        self
    }

    /// Shows line numbers next to code.
    #[must_use]
    pub fn code_gutter(mut self, gutter: bool) -> Self {
        self.code_gutter = Some(gutter);
        self
    }

    /// Wraps long code lines.
    #[must_use]
    pub fn code_wrap(mut self, wrap: bool) -> Self {
        self.code_wrap = Some(wrap);
        self
    }

    /// Sets the external syntax highlighter.
    #[must_use]
    pub fn highlighter<F>(mut self, highlighter: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> String + Send + Sync + 'static,
    {
        self.highlighter = Some(Arc::new(highlighter));
        self
    }

    /// Sets an already shared highlighter.
    #[must_use]
    pub fn shared_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = Some(highlighter);
        self
    }
}

/// [`RenderOptions`] with every field decided.
#[derive(Clone)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag is an independent render toggle"
)]
pub struct ResolvedOptions {
    pub wrap: bool,
    pub width: Option<usize>,
    pub color: bool,
    /// Never true when `color` is false.
    pub hyperlinks: bool,
    pub theme: Theme,
    pub highlighter: Option<Highlighter>,
    pub list_indent: usize,
    pub list_marker: String,
    pub quote_prefix: String,
    pub table_border: TableBorder,
    pub table_padding: usize,
    pub table_dense: bool,
    pub table_truncate: bool,
    pub table_ellipsis: String,
    pub code_box: bool,
    pub code_gutter: bool,
    pub code_wrap: bool,
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("wrap", &self.wrap)
            .field("width", &self.width)
            .field("color", &self.color)
            .field("hyperlinks", &self.hyperlinks)
            .field("theme", &self.theme)
            .field("highlighter", &self.highlighter.is_some())
            .field("list_indent", &self.list_indent)
            .field("list_marker", &self.list_marker)
            .field("quote_prefix", &self.quote_prefix)
            .field("table_border", &self.table_border)
            .field("table_padding", &self.table_padding)
            .field("table_dense", &self.table_dense)
            .field("table_truncate", &self.table_truncate)
            .field("table_ellipsis", &self.table_ellipsis)
            .field("code_box", &self.code_box)
            .field("code_gutter", &self.code_gutter)
            .field("code_wrap", &self.code_wrap)
            .finish()
    }
}

/// Resolve caller options against an environment snapshot.
///
/// Pure: the same options and environment always give the same result.
#[must_use]
pub fn resolve(user: &RenderOptions, env: &Environment) -> ResolvedOptions {
    let wrap = user.wrap.unwrap_or(true);
    let auto_width = wrap.then(|| env.columns.unwrap_or(DEFAULT_WIDTH));
    let width = user.width.or(auto_width);
    let color = user.color.unwrap_or(env.stdout_is_tty);
    let hyperlinks = color && user.hyperlinks.unwrap_or_else(|| env.supports_hyperlinks());
    let theme = user
        .custom_theme
        .clone()
        .unwrap_or_else(|| user.theme.unwrap_or_default().theme());

    let resolved = ResolvedOptions {
        wrap,
        width,
        color,
        hyperlinks,
        theme,
        highlighter: user.highlighter.clone(),
        list_indent: user.list_indent.unwrap_or(DEFAULT_LIST_INDENT),
        list_marker: user
            .list_marker
            .clone()
            .unwrap_or_else(|| DEFAULT_LIST_MARKER.to_string()),
        quote_prefix: user
            .quote_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_QUOTE_PREFIX.to_string()),
        table_border: user.table_border.unwrap_or_default(),
        table_padding: user.table_padding.unwrap_or(DEFAULT_TABLE_PADDING),
        table_dense: user.table_dense.unwrap_or(false),
        table_truncate: user.table_truncate.unwrap_or(true),
        table_ellipsis: user
            .table_ellipsis
            .clone()
            .unwrap_or_else(|| DEFAULT_TABLE_ELLIPSIS.to_string()),
        code_box: user.code_box.unwrap_or(true),
        code_gutter: user.code_gutter.unwrap_or(false),
        code_wrap: user.code_wrap.unwrap_or(true),
    };
    tracing::debug!(
        markdansi.wrap = resolved.wrap,
        markdansi.width = ?resolved.width,
        markdansi.color = resolved.color,
        markdansi.hyperlinks = resolved.hyperlinks,
        "Render options resolved"
    );
    resolved
}
