//! Block and inline rendering.
//!
//! Each block renders to a list of terminal lines that already carry their
//! trailing newline, so the document is the plain concatenation of all
//! pieces. Inline content renders to one styled string in which soft and hard
//! breaks are newlines.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{plain_text, Block, CodeBlock, Inline, List, ListItem, Table};
use crate::env::osc8;
use crate::normalize::{flatten_code_list, LINE_MARKERS, WHITESPACE_RUN};
use crate::options::{ResolvedOptions, DEFAULT_WIDTH};
use crate::style::{StyleIntent, Styler};
use crate::table::TableLayout;
use crate::width::{close_open_styles, visible_width};
use crate::wrap::{wrap_code_line, wrap_with_prefix};

/// Length of a thematic break, and its cap when wrapping.
const RULE_WIDTH: usize = 40;

/// Columns a code box adds around its content.
const CODE_BOX_PADDING: usize = 4;

/// A line starting a reference or footnote definition.
static DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]]+\]:\s+\S").expect("Invalid definition regex"));

const DIM: StyleIntent = StyleIntent {
    color: None,
    bg_color: None,
    bold: false,
    italic: false,
    underline: false,
    dim: true,
    strike: false,
};

const STRIKE: StyleIntent = StyleIntent {
    color: None,
    bg_color: None,
    bold: false,
    italic: false,
    underline: false,
    dim: false,
    strike: true,
};

/// Render already-normalized blocks with resolved options.
///
/// Color is applied as configured; callers wanting a guaranteed plain result
/// strip it afterwards (the crate-level `render` functions do).
#[must_use]
pub fn render_blocks(blocks: &[Block], options: &ResolvedOptions) -> String {
    BlockRenderer::new(options).blocks(blocks, options.width).concat()
}

/// Split rendered text into lines, dropping the final terminator.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.strip_suffix('\n').unwrap_or(text).split('\n')
}

/// Width left after `used` columns, keeping at least one.
fn narrow(width: Option<usize>, used: usize) -> Option<usize> {
    width.map(|width| width.saturating_sub(used).max(1))
}

struct BlockRenderer<'a> {
    options: &'a ResolvedOptions,
    styler: Styler,
}

impl<'a> BlockRenderer<'a> {
    fn new(options: &'a ResolvedOptions) -> Self {
        Self {
            options,
            styler: Styler::new(options.color),
        }
    }

    fn indent(&self, level: usize) -> usize {
        self.options.list_indent * level
    }

    /// Render blocks into `width` columns. Nested containers pass their
    /// children whatever is left after their own prefix.
    fn blocks(&self, blocks: &[Block], width: Option<usize>) -> Vec<String> {
        let mut out = Vec::new();
        for block in blocks {
            match block {
                Block::Paragraph(inlines) => out.extend(self.paragraph(inlines, width)),
                Block::Heading { content, .. } => out.push(self.heading(content)),
                Block::ThematicBreak => out.push(self.rule(width)),
                Block::BlockQuote(children) => out.extend(self.block_quote(children, width)),
                Block::List(list) => out.extend(self.list(list, width, 0)),
                Block::CodeBlock(code) if is_reference_like(code) => {
                    out.push(reference_line(code));
                }
                Block::CodeBlock(code) => out.push(self.code_block(code, width)),
                Block::Table(table) => out.push(self.table(table, width)),
                Block::Html(_) => {}
            }
        }
        out
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    fn paragraph(&self, inlines: &[Inline], width: Option<usize>) -> Vec<String> {
        let text = self.inline(inlines);

        let mut lines: Vec<String> = Vec::new();
        let mut in_definitions = false;
        for line in text.split('\n') {
            if DEFINITION.is_match(line) {
                if lines.last().is_some_and(|last| !last.is_empty()) {
                    lines.push(String::new());
                }
                lines.push(line.replace(['\u{201c}', '\u{201d}'], "\""));
                in_definitions = true;
                continue;
            }
            if in_definitions && line.trim().is_empty() {
                continue;
            }
            in_definitions = false;
            lines.push(line.to_string());
        }

        let starts_with_definition = lines
            .iter()
            .find(|line| !line.is_empty())
            .is_some_and(|line| DEFINITION.is_match(line));
        let mut wrapped = wrap_with_prefix(
            &lines.join("\n"),
            width.unwrap_or(DEFAULT_WIDTH),
            self.options.wrap,
            "",
        );
        if starts_with_definition {
            wrapped.insert(0, String::new());
        }
        wrapped.into_iter().map(|line| line + "\n").collect()
    }

    fn heading(&self, content: &[Inline]) -> String {
        let text = self.inline(content);
        let bold = StyleIntent::new().bold(true);
        let style = self.options.theme.heading.as_ref().unwrap_or(&bold);
        format!("\n{}\n", self.styler.apply(&text, Some(style)))
    }

    fn rule(&self, width: Option<usize>) -> String {
        let width = if self.options.wrap {
            width.unwrap_or(RULE_WIDTH).min(RULE_WIDTH)
        } else {
            RULE_WIDTH
        };
        let line = "—".repeat(width);
        format!("{}\n", self.styler.apply(&line, self.options.theme.hr.as_ref()))
    }

    /// Children are laid out in the width left after the prefix, so the
    /// prefixing step never has to re-wrap boxes or tables.
    fn block_quote(&self, children: &[Block], width: Option<usize>) -> Vec<String> {
        let inner = narrow(width, visible_width(&self.options.quote_prefix));
        let body = self.blocks(children, inner).concat();
        let prefix = self
            .styler
            .apply(&self.options.quote_prefix, self.options.theme.quote.as_ref());
        wrap_with_prefix(body.trim_matches('\n'), 0, false, &prefix)
            .into_iter()
            .map(|line| line + "\n")
            .collect()
    }

    /// Render a list whose markers sit `list_indent * level` columns in.
    fn list(&self, list: &List, width: Option<usize>, level: usize) -> Vec<String> {
        if let Some(code) = flatten_code_list(list) {
            let indent = " ".repeat(self.indent(level));
            let boxed = self.code_block(&code, narrow(width, self.indent(level)));
            if indent.is_empty() {
                return vec![boxed];
            }
            return vec![indent_lines(&boxed, &indent)];
        }
        let tight = is_tight(list);
        let mut out = Vec::new();
        for (index, item) in list.items.iter().enumerate() {
            let marker = match list.start {
                Some(start) => format!("{}.", start.saturating_add(index as u64)),
                None => self.options.list_marker.clone(),
            };
            out.extend(self.list_item(item, &marker, width, level, tight));
        }
        out
    }

    /// Content hangs under the text after the marker and is laid out in the
    /// width left beside that hanging indent. Nested lists keep their own
    /// indent, one `list_indent` step deeper.
    fn list_item(
        &self,
        item: &ListItem,
        marker: &str,
        width: Option<usize>,
        level: usize,
        tight: bool,
    ) -> Vec<String> {
        let marker = match item.checked {
            Some(true) => "[x]",
            Some(false) => "[ ]",
            None => marker,
        };
        let hanging_width = self.indent(level) + visible_width(marker) + 1;
        let inner = narrow(width, hanging_width);
        let styled_marker = self
            .styler
            .apply(marker, self.options.theme.list_marker.as_ref());
        let indent = " ".repeat(self.indent(level));
        let hanging = " ".repeat(hanging_width);

        // (line, hangs under the marker)
        let mut lines: Vec<(String, bool)> = Vec::new();
        for child in &item.children {
            if let Block::List(nested) = child {
                let nested = self.list(nested, width, level + 1).concat();
                lines.extend(split_lines(&nested).map(|line| (line.to_string(), false)));
            } else {
                let body = self.blocks(std::slice::from_ref(child), inner).concat();
                lines.extend(split_lines(&body).map(|line| (line.to_string(), true)));
            }
        }
        let is_blank = |(line, _): &(String, bool)| line.trim().is_empty();
        let start = lines.iter().position(|line| !is_blank(line)).unwrap_or(lines.len());
        let end = lines.iter().rposition(|line| !is_blank(line)).map_or(start, |i| i + 1);

        let mut rendered = Vec::with_capacity(end - start + 2);
        let mut body = lines[start..end].iter();
        match body.next() {
            Some((first, true)) => {
                rendered.push(format!("{indent}{styled_marker} {}\n", first.trim_start()));
            }
            Some((first, false)) => {
                rendered.push(format!("{indent}{styled_marker}\n"));
                rendered.push(format!("{first}\n"));
            }
            None => rendered.push(format!("{indent}{styled_marker}\n")),
        }
        for (line, hangs) in body {
            if *hangs && !line.is_empty() {
                rendered.push(format!("{hanging}{line}\n"));
            } else {
                rendered.push(format!("{line}\n"));
            }
        }
        if !tight {
            rendered.push("\n".to_string());
        }
        rendered
    }

    fn code_block(&self, code: &CodeBlock, width: Option<usize>) -> String {
        let mut lines: Vec<&str> = code.code.split('\n').collect();
        while lines.len() > 1 && lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let language = match code.language.as_deref() {
            None if looks_like_diff(&code.code) => {
                tracing::trace!("Labelled untagged code block as diff");
                Some("diff")
            }
            other => other,
        };

        // The highlighter sees the whole block at once so multi-line
        // constructs keep their state.
        let highlighted: Option<Vec<String>> = self.options.highlighter.as_ref().map(|highlight| {
            let out = highlight(&lines.join("\n"), language);
            let mut out: Vec<String> = split_lines(&out).map(str::to_string).collect();
            while out.len() > 1 && out.last().is_some_and(|line| line.is_empty()) {
                out.pop();
            }
            out
        });
        let line_count = highlighted.as_ref().map_or(lines.len(), Vec::len);

        let is_diff = language.is_some_and(|lang| lang.eq_ignore_ascii_case("diff"));
        let gutter = self.options.code_gutter;
        let gutter_width = if gutter {
            line_count.to_string().len() + 2
        } else {
            0
        };
        let use_box = self.options.code_box && line_count > 1;
        let box_padding = if use_box { CODE_BOX_PADDING } else { 0 };
        let wrap_limit = width
            .filter(|_| !is_diff && self.options.code_wrap && self.options.wrap)
            .map(|width| width.saturating_sub(box_padding + gutter_width).max(1));

        let mut numbers: Vec<Option<usize>> = Vec::new();
        let mut segments: Vec<String> = Vec::new();
        let sources: Vec<&str> = match &highlighted {
            Some(highlighted) => highlighted.iter().map(String::as_str).collect(),
            None => lines,
        };
        for (index, line) in sources.iter().enumerate() {
            for (segment_index, segment) in wrap_code_line(line, wrap_limit).into_iter().enumerate() {
                numbers.push((segment_index == 0).then_some(index + 1));
                segments.push(segment);
            }
        }
        let segments = if highlighted.is_some() {
            close_open_styles(segments)
        } else {
            let code_style = self
                .options
                .theme
                .block_code
                .as_ref()
                .or(self.options.theme.inline_code.as_ref());
            segments
                .iter()
                .map(|segment| self.styler.apply(segment, code_style))
                .collect()
        };

        let number_width = gutter_width.saturating_sub(2).max(1);
        let body: Vec<String> = segments
            .into_iter()
            .zip(numbers)
            .map(|(segment, number)| {
                if !gutter {
                    return segment;
                }
                let number = match number {
                    Some(number) => format!("{number:<number_width$}"),
                    None => " ".repeat(number_width),
                };
                format!("{} {segment}", self.styler.apply(&number, Some(&DIM)))
            })
            .collect();

        if !use_box {
            return format!("{}\n\n", body.join("\n"));
        }
        self.code_box(&body, language)
    }

    fn code_box(&self, body: &[String], language: Option<&str>) -> String {
        let dim = |s: &str| self.styler.apply(s, Some(&DIM));
        let label = language.map(|lang| format!("[{lang}]"));
        let label_width = label.as_deref().map_or(0, visible_width);
        let inner = body
            .iter()
            .map(|line| visible_width(line))
            .max()
            .unwrap_or(0)
            .max(label_width);

        let top = match &label {
            Some(label) => format!(
                "{}{}{}",
                dim("┌ "),
                dim(label),
                dim(&format!("{}┐", "─".repeat(inner - label_width + 1)))
            ),
            None => dim(&format!("┌ {} ┐", "─".repeat(inner))),
        };
        let bottom = dim(&format!("└{}┘", "─".repeat(inner + 2)));
        let left = dim("│ ");
        let right = dim(" │");
        let middle: Vec<String> = body
            .iter()
            .map(|line| {
                let pad = " ".repeat(inner.saturating_sub(visible_width(line)));
                format!("{left}{line}{pad}{right}")
            })
            .collect();
        format!("{top}\n{}\n{bottom}\n\n", middle.join("\n"))
    }

    fn table(&self, table: &Table, width: Option<usize>) -> String {
        let header: Vec<String> = table.header.iter().map(|cell| self.inline(cell)).collect();
        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| self.inline(cell)).collect())
            .collect();
        let theme = &self.options.theme;
        TableLayout::new()
            .padding(self.options.table_padding)
            .width(width)
            .wrap(self.options.wrap)
            .truncate(self.options.table_truncate)
            .ellipsis(self.options.table_ellipsis.clone())
            .border(self.options.table_border)
            .dense(self.options.table_dense)
            .styles(
                self.styler,
                theme.table_header.clone(),
                theme.table_cell.clone(),
            )
            .render(&header, &rows, &table.alignments)
    }

    // ========================================================================
    // Inlines
    // ========================================================================

    fn inline(&self, inlines: &[Inline]) -> String {
        let theme = &self.options.theme;
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(text) => out.push_str(text),
                Inline::Emphasis(children) => {
                    out.push_str(&self.styler.apply(&self.inline(children), theme.emph.as_ref()));
                }
                Inline::Strong(children) => {
                    out.push_str(&self.styler.apply(&self.inline(children), theme.strong.as_ref()));
                }
                Inline::Strikethrough(children) => {
                    out.push_str(&self.styler.apply(&self.inline(children), Some(&STRIKE)));
                }
                Inline::Code(code) => {
                    let style = theme.inline_code.as_ref().or(theme.block_code.as_ref());
                    out.push_str(&self.styler.apply(code, style));
                }
                Inline::Link {
                    destination,
                    children,
                } => out.push_str(&self.link(destination, children)),
                Inline::Image {
                    destination,
                    children,
                } => out.push_str(&self.image(destination, children)),
                Inline::SoftBreak | Inline::HardBreak => out.push('\n'),
                Inline::Html(_) => {}
            }
        }
        out
    }

    fn link(&self, destination: &str, children: &[Inline]) -> String {
        let label = self.inline(children);
        if destination.starts_with("mailto:") {
            return label;
        }
        let styled = self.styler.apply(&label, self.options.theme.link.as_ref());
        if destination.is_empty() {
            return styled;
        }
        if self.options.hyperlinks {
            return osc8(destination, &styled);
        }
        if label == destination {
            return styled;
        }
        let suffix = self.styler.apply(&format!(" ({destination})"), Some(&DIM));
        format!("{styled}{suffix}")
    }

    fn image(&self, destination: &str, children: &[Inline]) -> String {
        let alt = self
            .styler
            .apply(&self.inline(children), self.options.theme.link.as_ref());
        if destination.is_empty() {
            return alt;
        }
        let suffix = self.styler.apply(&format!(" ({destination})"), Some(&DIM));
        format!("{alt}{suffix}")
    }
}

/// Tight unless some item holds more than one block or an empty paragraph.
fn is_tight(list: &List) -> bool {
    list.items.iter().all(|item| match item.children.as_slice() {
        [] => true,
        [Block::Paragraph(inlines)] => !plain_text(inlines).trim().is_empty(),
        [_] => true,
        _ => false,
    })
}

/// Heuristic for unified diffs in untagged code blocks.
fn looks_like_diff(code: &str) -> bool {
    let lines: Vec<&str> = code
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let has_header = lines.iter().any(|line| {
        ["diff --git", "--- a/", "+++ b/", "@@ "]
            .iter()
            .any(|marker| line.starts_with(marker))
    });
    if has_header {
        return true;
    }
    if lines.len() < 3 {
        return false;
    }
    let markers = lines
        .iter()
        .filter(|line| line.starts_with(['+', '-', '@']))
        .count();
    markers >= 3 && markers * 5 >= lines.len() * 3
}

/// Untagged code whose content reads like a reference definition.
fn is_reference_like(code: &CodeBlock) -> bool {
    if code.language.is_some() {
        return false;
    }
    let stripped = LINE_MARKERS.replace_all(&code.code, "");
    stripped.trim().starts_with('[') && stripped.contains("]:")
}

/// Prefix every non-empty line of rendered text with `indent`.
fn indent_lines(text: &str, indent: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line == "\n" {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect()
}

fn reference_line(code: &CodeBlock) -> String {
    let stripped = LINE_MARKERS.replace_all(&code.code, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    format!("{}\n", collapsed.trim())
}
