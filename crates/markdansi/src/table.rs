//! Table layout: column widths, cell fitting and border drawing.
//!
//! Cells arrive already rendered (they may carry ANSI styling). The layout
//! measures them by visible width, shrinks columns to fit the target width,
//! truncates or wraps each cell and frames the result.
//!
//! # Example
//!
//! ```rust
//! use markdansi::table::{Alignment, TableLayout};
//!
//! let header = vec!["h1".to_string(), "h2".to_string()];
//! let rows = vec![vec!["a".to_string(), "b".to_string()]];
//! let out = TableLayout::new().render(&header, &rows, &[Alignment::None; 2]);
//! assert_eq!(
//!     out,
//!     "┌────┬────┐\n│ h1 │ h2 │\n├────┼────┤\n│ a  │ b  │\n└────┴────┘\n\n"
//! );
//! ```

use crate::options::TableBorder;
use crate::style::{StyleIntent, Styler};
use crate::width::{close_open_styles, truncate, visible_width};
use crate::wrap::wrap_text;

/// Widest a column grows from its content alone, before padding.
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// No alignment given; rendered like [`Alignment::Left`].
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(alignment: pulldown_cmark::Alignment) -> Self {
        match alignment {
            pulldown_cmark::Alignment::None => Alignment::None,
            pulldown_cmark::Alignment::Left => Alignment::Left,
            pulldown_cmark::Alignment::Center => Alignment::Center,
            pulldown_cmark::Alignment::Right => Alignment::Right,
        }
    }
}

// ============================================================================
// Border Glyphs
// ============================================================================

/// Border characters for table rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBox {
    /// Top-left corner character.
    pub top_left: &'static str,
    /// Top-right corner character.
    pub top_right: &'static str,
    /// Bottom-left corner character.
    pub bottom_left: &'static str,
    /// Bottom-right corner character.
    pub bottom_right: &'static str,
    /// Horizontal line character.
    pub horizontal: &'static str,
    /// Vertical line character.
    pub vertical: &'static str,
    /// Cross intersection character.
    pub cross: &'static str,
    /// Top T-intersection character.
    pub top_t: &'static str,
    /// Bottom T-intersection character.
    pub bottom_t: &'static str,
    /// Left T-intersection character.
    pub left_t: &'static str,
    /// Right T-intersection character.
    pub right_t: &'static str,
}

/// Box-drawing border.
pub const UNICODE_BOX: TableBox = TableBox {
    top_left: "┌",
    top_right: "┐",
    bottom_left: "└",
    bottom_right: "┘",
    horizontal: "─",
    vertical: "│",
    cross: "┼",
    top_t: "┬",
    bottom_t: "┴",
    left_t: "├",
    right_t: "┤",
};

/// ASCII border using `+`, `-` and `|`.
pub const ASCII_BOX: TableBox = TableBox {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    horizontal: "-",
    vertical: "|",
    cross: "+",
    top_t: "+",
    bottom_t: "+",
    left_t: "+",
    right_t: "+",
};

impl TableBox {
    /// Glyphs for a border style; `None` for the frameless style.
    #[must_use]
    pub fn for_border(border: TableBorder) -> Option<&'static TableBox> {
        match border {
            TableBorder::Unicode => Some(&UNICODE_BOX),
            TableBorder::Ascii => Some(&ASCII_BOX),
            TableBorder::None => None,
        }
    }
}

/// Position of a horizontal border line within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderPosition {
    /// Top edge of the table.
    Top,
    /// Between header and body.
    Middle,
    /// Bottom edge of the table.
    Bottom,
}

/// Render a horizontal border line for columns of the given full widths.
///
/// ```rust
/// use markdansi::table::{render_horizontal_border, BorderPosition, ASCII_BOX};
///
/// let line = render_horizontal_border(&[7, 5], &ASCII_BOX, BorderPosition::Top);
/// assert_eq!(line, "+-------+-----+");
/// ```
#[must_use]
pub fn render_horizontal_border(
    widths: &[usize],
    border: &TableBox,
    position: BorderPosition,
) -> String {
    let (left, mid, right) = match position {
        BorderPosition::Top => (border.top_left, border.top_t, border.top_right),
        BorderPosition::Middle => (border.left_t, border.cross, border.right_t),
        BorderPosition::Bottom => (border.bottom_left, border.bottom_t, border.bottom_right),
    };

    let segments: Vec<String> = widths.iter().map(|w| border.horizontal.repeat(*w)).collect();
    format!("{left}{}{right}", segments.join(mid))
}

// ============================================================================
// Cell Alignment and Padding
// ============================================================================

/// Pad content to a target visible width with the given alignment.
///
/// Content already at or over the width is returned unchanged. Centered
/// content puts the odd space on the right.
///
/// ```rust
/// use markdansi::table::{pad_content, Alignment};
///
/// assert_eq!(pad_content("Hi", 6, Alignment::Left), "Hi    ");
/// assert_eq!(pad_content("Hi", 6, Alignment::Right), "    Hi");
/// assert_eq!(pad_content("Hi", 5, Alignment::Center), " Hi  ");
/// ```
#[must_use]
pub fn pad_content(content: &str, width: usize, alignment: Alignment) -> String {
    let padding_needed = width.saturating_sub(visible_width(content));
    if padding_needed == 0 {
        return content.to_string();
    }

    match alignment {
        Alignment::None | Alignment::Left => {
            format!("{}{}", content, " ".repeat(padding_needed))
        }
        Alignment::Right => {
            format!("{}{}", " ".repeat(padding_needed), content)
        }
        Alignment::Center => {
            let left_pad = padding_needed / 2;
            let right_pad = padding_needed - left_pad;
            format!(
                "{}{}{}",
                " ".repeat(left_pad),
                content,
                " ".repeat(right_pad)
            )
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Table layout settings.
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Spaces on each side of cell content.
    pub padding: usize,
    /// Target total width; columns shrink only when set and `wrap` is on.
    pub width: Option<usize>,
    /// Whether overlong cells may wrap onto extra lines.
    pub wrap: bool,
    /// Cut overlong cells with `ellipsis` instead of wrapping them.
    pub truncate: bool,
    pub ellipsis: String,
    pub border: TableBorder,
    /// Omit the line between header and body.
    pub dense: bool,
    pub styler: Styler,
    pub header_style: Option<StyleIntent>,
    pub cell_style: Option<StyleIntent>,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            padding: 1,
            width: None,
            wrap: true,
            truncate: true,
            ellipsis: "…".to_string(),
            border: TableBorder::Unicode,
            dense: false,
            styler: Styler::new(false),
            header_style: None,
            cell_style: None,
        }
    }
}

impl TableLayout {
    /// Creates a layout with default settings and no styling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cell padding.
    #[must_use]
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the target total width.
    #[must_use]
    pub fn width(mut self, width: Option<usize>) -> Self {
        self.width = width;
        self
    }

    /// Enables or disables wrapping.
    #[must_use]
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Enables or disables truncation.
    #[must_use]
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Sets the truncation marker.
    #[must_use]
    pub fn ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    /// Sets the border style.
    #[must_use]
    pub fn border(mut self, border: TableBorder) -> Self {
        self.border = border;
        self
    }

    /// Sets dense mode.
    #[must_use]
    pub fn dense(mut self, dense: bool) -> Self {
        self.dense = dense;
        self
    }

    /// Sets the styler and the header and body cell styles.
    #[must_use]
    pub fn styles(
        mut self,
        styler: Styler,
        header: Option<StyleIntent>,
        cell: Option<StyleIntent>,
    ) -> Self {
        self.styler = styler;
        self.header_style = header;
        self.cell_style = cell;
        self
    }

    /// Narrowest usable content width: room for one character plus the ellipsis.
    fn min_content(&self) -> usize {
        (visible_width(&self.ellipsis) + 1).max(1)
    }

    /// Narrowest column, padding included.
    #[must_use]
    pub fn min_column_width(&self) -> usize {
        self.padding * 2 + self.min_content()
    }

    /// Width taken by separators for `columns` columns.
    #[must_use]
    pub fn border_overhead(&self, columns: usize) -> usize {
        match self.border {
            TableBorder::None => 3 * columns.saturating_sub(1),
            TableBorder::Unicode | TableBorder::Ascii => columns + 1,
        }
    }

    /// Compute full column widths (padding included) for a matrix of cells.
    ///
    /// Over budget, the widest column (the first one on ties) loses one column
    /// at a time until the table fits or every column is at its minimum.
    #[must_use]
    pub fn column_widths(&self, rows: &[Vec<String>], columns: usize) -> Vec<usize> {
        let mut widths = vec![0; columns];
        for row in rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(visible_width(cell).min(MAX_COLUMN_WIDTH));
            }
        }
        for width in &mut widths {
            *width += self.padding * 2;
        }

        let min_width = self.min_column_width();
        if let Some(target) = self.width.filter(|_| self.wrap) {
            let mut total: usize = widths.iter().sum::<usize>() + self.border_overhead(columns);
            let natural = total;
            while total > target {
                let Some(widest) = widths.iter().copied().max() else {
                    break;
                };
                let Some(i) = widths.iter().position(|&w| w == widest) else {
                    break;
                };
                if widths[i] <= min_width {
                    break;
                }
                widths[i] -= 1;
                total -= 1;
            }
            if natural != total {
                tracing::trace!(
                    markdansi.table_natural = natural,
                    markdansi.table_width = total,
                    markdansi.table_target = target,
                    "Shrunk table columns"
                );
            }
        }
        for width in &mut widths {
            *width = (*width).max(min_width);
        }
        widths
    }

    /// Fit one row into physical lines: one entry per line, one cell per column.
    fn layout_row(
        &self,
        row: &[String],
        widths: &[usize],
        alignments: &[Alignment],
        header: bool,
    ) -> Vec<Vec<String>> {
        let pad = " ".repeat(self.padding);
        let align = |i: usize| alignments.get(i).copied().unwrap_or_default();
        let pad_cell =
            |text: &str, i: usize| pad_content(&format!("{pad}{text}{pad}"), widths[i], align(i));

        let columns: Vec<Vec<String>> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = row.get(i).map_or("", String::as_str);
                let target = width
                    .saturating_sub(self.padding * 2)
                    .max(self.min_content());
                let fitted = if self.truncate && visible_width(cell) > target {
                    truncate(cell, target, &self.ellipsis)
                } else {
                    cell.to_string()
                };
                close_open_styles(wrap_text(&fitted, target, self.wrap))
                    .iter()
                    .map(|line| pad_cell(line, i))
                    .collect()
            })
            .collect();

        let style = if header {
            self.header_style.as_ref()
        } else {
            self.cell_style.as_ref()
        };
        let height = columns.iter().map(Vec::len).max().unwrap_or(1);
        (0..height)
            .map(|line| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| {
                        let content = column.get(line).cloned().unwrap_or_else(|| pad_cell("", i));
                        self.styler.apply(&content, style)
                    })
                    .collect()
            })
            .collect()
    }

    /// Render a table. Rows shorter than the widest row get empty cells.
    ///
    /// Boxed output ends with one blank line, borderless output with two
    /// newlines. A table without columns renders as nothing.
    #[must_use]
    pub fn render(&self, header: &[String], rows: &[Vec<String>], alignments: &[Alignment]) -> String {
        let mut matrix: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
        matrix.push(header.to_vec());
        matrix.extend(rows.iter().cloned());
        let columns = matrix.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return String::new();
        }

        let widths = self.column_widths(&matrix, columns);
        let head_lines = self.layout_row(header, &widths, alignments, true);
        let body_lines: Vec<Vec<String>> = rows
            .iter()
            .flat_map(|row| self.layout_row(row, &widths, alignments, false))
            .collect();

        let Some(glyphs) = TableBox::for_border(self.border) else {
            let lines: Vec<String> = head_lines
                .iter()
                .chain(&body_lines)
                .map(|parts| parts.join(" | "))
                .collect();
            return format!("{}\n\n", lines.join("\n"));
        };

        let flat = |lines: &[Vec<String>]| -> String {
            lines
                .iter()
                .map(|parts| {
                    format!(
                        "{v}{}{v}\n",
                        parts.join(glyphs.vertical),
                        v = glyphs.vertical
                    )
                })
                .collect()
        };

        let mut out = String::new();
        out.push_str(&render_horizontal_border(&widths, glyphs, BorderPosition::Top));
        out.push('\n');
        out.push_str(&flat(&head_lines));
        if !self.dense {
            out.push_str(&render_horizontal_border(&widths, glyphs, BorderPosition::Middle));
            out.push('\n');
        }
        out.push_str(&flat(&body_lines));
        out.push_str(&render_horizontal_border(&widths, glyphs, BorderPosition::Bottom));
        out.push_str("\n\n");
        out
    }
}
