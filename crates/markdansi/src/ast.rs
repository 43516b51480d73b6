//! Document tree and the pulldown-cmark adapter that builds it.
//!
//! pulldown-cmark produces a flat event stream. [`parse`] folds it into the
//! closed [`Block`] and [`Inline`] enums so every later stage can match on
//! node kinds exhaustively.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

pub use crate::table::Alignment;

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    ThematicBreak,
    BlockQuote(Vec<Block>),
    List(List),
    CodeBlock(CodeBlock),
    Table(Table),
    /// Raw HTML block. Never rendered.
    Html(String),
}

/// An ordered or unordered list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct List {
    /// First number of an ordered list; `None` for bullet lists.
    pub start: Option<u64>,
    pub items: Vec<ListItem>,
}

impl List {
    /// Whether the list is numbered.
    #[must_use]
    pub fn ordered(&self) -> bool {
        self.start.is_some()
    }
}

/// One list item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    /// Task-list checkbox state, if the item has one.
    pub checked: Option<bool>,
    pub children: Vec<Block>,
}

/// A fenced or indented code block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
}

impl CodeBlock {
    /// Creates a code block.
    #[must_use]
    pub fn new(language: Option<&str>, code: impl Into<String>) -> Self {
        Self {
            language: language.map(str::to_string),
            code: code.into(),
        }
    }

    /// The language, with an untagged block reading as the empty string.
    #[must_use]
    pub fn language_key(&self) -> &str {
        self.language.as_deref().unwrap_or("")
    }
}

/// A GFM table. Cells hold inline content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub alignments: Vec<Alignment>,
    pub header: Vec<Vec<Inline>>,
    pub rows: Vec<Vec<Vec<Inline>>>,
}

/// An inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Code(String),
    Link {
        destination: String,
        children: Vec<Inline>,
    },
    Image {
        destination: String,
        children: Vec<Inline>,
    },
    SoftBreak,
    HardBreak,
    /// Raw inline HTML. Never rendered.
    Html(String),
}

/// Concatenated text of inline content: text, code and the contents of
/// emphasis, strong and strikethrough. Links, images and breaks contribute
/// nothing.
#[must_use]
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_plain(inlines, &mut out);
    out
}

fn collect_plain(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children) => collect_plain(children, out),
            Inline::Link { .. }
            | Inline::Image { .. }
            | Inline::SoftBreak
            | Inline::HardBreak
            | Inline::Html(_) => {}
        }
    }
}

/// Remove the leading whitespace shared by every non-blank line.
///
/// Spaces and tabs both count as one column.
///
/// ```rust
/// use markdansi::ast::dedent;
///
/// assert_eq!(dedent("    # Title\n\n    body"), "# Title\n\nbody");
/// assert_eq!(dedent("flush\n  indented"), "flush\n  indented");
/// ```
#[must_use]
pub fn dedent(markdown: &str) -> String {
    let min_indent = markdown
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| *c == ' ' || *c == '\t').count())
        .min()
        .unwrap_or(0);
    if min_indent == 0 {
        return markdown.to_string();
    }

    markdown
        .split('\n')
        .map(|line| {
            let cut = line
                .char_indices()
                .nth(min_indent)
                .map_or(line.len(), |(i, _)| i);
            &line[cut..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse markdown into blocks. Tables, strikethrough and task lists are on.
#[must_use]
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, opts) {
        builder.handle_event(event);
    }
    builder.finish()
}

// ============================================================================
// Tree Builder
// ============================================================================

#[derive(Debug)]
enum SpanKind {
    Emphasis,
    Strong,
    Strikethrough,
    Link(String),
    Image(String),
}

/// An open container on the builder stack.
#[derive(Debug)]
enum Frame {
    Document(Vec<Block>),
    /// `implicit` paragraphs wrap the bare inline content of tight list items.
    Paragraph { inlines: Vec<Inline>, implicit: bool },
    Heading { level: u8, inlines: Vec<Inline> },
    BlockQuote(Vec<Block>),
    List { start: Option<u64>, items: Vec<ListItem> },
    Item { checked: Option<bool>, children: Vec<Block> },
    CodeBlock { language: Option<String>, code: String },
    HtmlBlock(String),
    Table {
        alignments: Vec<Alignment>,
        header: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    Row { cells: Vec<Vec<Inline>>, header: bool },
    Cell(Vec<Inline>),
    Span { kind: SpanKind, children: Vec<Inline> },
    /// Unsupported block container; its blocks go to the enclosing one.
    Passthrough,
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::Document(Vec::new())],
        }
    }

    fn finish(mut self) -> Vec<Block> {
        while self.stack.len() > 1 {
            self.close();
        }
        match self.stack.pop() {
            Some(Frame::Document(blocks)) => blocks,
            _ => Vec::new(),
        }
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push_inline(Inline::Code(code.into_string())),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.push_inline(Inline::Text(math.into_string()));
            }
            Event::Html(html) => self.html(&html),
            Event::InlineHtml(html) => self.push_inline(Inline::Html(html.into_string())),
            Event::FootnoteReference(label) => {
                self.push_inline(Inline::Text(format!("[^{label}]")));
            }
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => {
                self.close_implicit_paragraph();
                self.push_block(Block::ThematicBreak);
            }
            Event::TaskListMarker(checked) => self.mark_task(checked),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Emphasis => Frame::Span {
                kind: SpanKind::Emphasis,
                children: Vec::new(),
            },
            Tag::Strong => Frame::Span {
                kind: SpanKind::Strong,
                children: Vec::new(),
            },
            Tag::Strikethrough => Frame::Span {
                kind: SpanKind::Strikethrough,
                children: Vec::new(),
            },
            Tag::Link { dest_url, .. } => Frame::Span {
                kind: SpanKind::Link(dest_url.into_string()),
                children: Vec::new(),
            },
            Tag::Image { dest_url, .. } => Frame::Span {
                kind: SpanKind::Image(dest_url.into_string()),
                children: Vec::new(),
            },
            Tag::TableHead => Frame::Row {
                cells: Vec::new(),
                header: true,
            },
            Tag::TableRow => Frame::Row {
                cells: Vec::new(),
                header: false,
            },
            Tag::TableCell => Frame::Cell(Vec::new()),
            Tag::Item => Frame::Item {
                checked: None,
                children: Vec::new(),
            },
            block => {
                self.close_implicit_paragraph();
                match block {
                    Tag::Paragraph => Frame::Paragraph {
                        inlines: Vec::new(),
                        implicit: false,
                    },
                    Tag::Heading { level, .. } => Frame::Heading {
                        level: level as u8,
                        inlines: Vec::new(),
                    },
                    Tag::BlockQuote(_) => Frame::BlockQuote(Vec::new()),
                    Tag::CodeBlock(kind) => Frame::CodeBlock {
                        language: match kind {
                            CodeBlockKind::Fenced(info) => {
                                info.split_whitespace().next().map(str::to_string)
                            }
                            CodeBlockKind::Indented => None,
                        },
                        code: String::new(),
                    },
                    Tag::HtmlBlock => Frame::HtmlBlock(String::new()),
                    Tag::List(start) => Frame::List {
                        start,
                        items: Vec::new(),
                    },
                    Tag::Table(alignments) => Frame::Table {
                        alignments: alignments.into_iter().map(Alignment::from).collect(),
                        header: Vec::new(),
                        rows: Vec::new(),
                    },
                    _ => Frame::Passthrough,
                }
            }
        };

        if matches!(frame, Frame::Span { .. }) {
            self.ensure_inline_container();
        }
        self.stack.push(frame);
    }

    fn end(&mut self) {
        self.close_implicit_paragraph();
        if self.stack.len() > 1 {
            self.close();
        }
    }

    fn close_implicit_paragraph(&mut self) {
        if matches!(
            self.stack.last(),
            Some(Frame::Paragraph { implicit: true, .. })
        ) {
            self.close();
        }
    }

    /// Pop the top frame and attach what it built to its parent.
    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Document(blocks) => self.stack.push(Frame::Document(blocks)),
            Frame::Paragraph { inlines, .. } => self.push_block(Block::Paragraph(inlines)),
            Frame::Heading { level, inlines } => self.push_block(Block::Heading {
                level,
                content: inlines,
            }),
            Frame::BlockQuote(children) => self.push_block(Block::BlockQuote(children)),
            Frame::List { start, items } => self.push_block(Block::List(List { start, items })),
            Frame::Item { checked, children } => {
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(ListItem { checked, children });
                }
            }
            Frame::CodeBlock { language, code } => {
                self.push_block(Block::CodeBlock(CodeBlock { language, code }));
            }
            Frame::HtmlBlock(html) => self.push_block(Block::Html(html)),
            Frame::Table {
                alignments,
                header,
                rows,
            } => self.push_block(Block::Table(Table {
                alignments,
                header,
                rows,
            })),
            Frame::Row { cells, header } => {
                if let Some(Frame::Table {
                    header: head,
                    rows,
                    ..
                }) = self.stack.last_mut()
                {
                    if header {
                        *head = cells;
                    } else {
                        rows.push(cells);
                    }
                }
            }
            Frame::Cell(inlines) => {
                if let Some(Frame::Row { cells, .. }) = self.stack.last_mut() {
                    cells.push(inlines);
                }
            }
            Frame::Span { kind, children } => match kind {
                SpanKind::Emphasis => self.push_inline(Inline::Emphasis(children)),
                SpanKind::Strong => self.push_inline(Inline::Strong(children)),
                SpanKind::Strikethrough => self.push_inline(Inline::Strikethrough(children)),
                SpanKind::Link(destination) => self.push_inline(Inline::Link {
                    destination,
                    children,
                }),
                SpanKind::Image(destination) => self.push_inline(Inline::Image {
                    destination,
                    children,
                }),
            },
            Frame::Passthrough => {}
        }
    }

    /// Index of the innermost frame that is not a passthrough.
    fn target(&self) -> usize {
        self.stack
            .iter()
            .rposition(|frame| !matches!(frame, Frame::Passthrough))
            .unwrap_or(0)
    }

    fn push_block(&mut self, block: Block) {
        let index = self
            .stack
            .iter()
            .rposition(|frame| {
                matches!(
                    frame,
                    Frame::Document(_) | Frame::BlockQuote(_) | Frame::Item { .. }
                )
            })
            .unwrap_or(0);
        if let Some(Frame::Document(blocks) | Frame::BlockQuote(blocks)) =
            self.stack.get_mut(index)
        {
            blocks.push(block);
        } else if let Some(Frame::Item { children, .. }) = self.stack.get_mut(index) {
            children.push(block);
        }
    }

    /// Open an implicit paragraph when inline content lands in a block container.
    fn ensure_inline_container(&mut self) {
        let index = self.target();
        if matches!(
            self.stack.get(index),
            Some(Frame::Document(_) | Frame::BlockQuote(_) | Frame::Item { .. })
        ) {
            self.stack.push(Frame::Paragraph {
                inlines: Vec::new(),
                implicit: true,
            });
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        self.ensure_inline_container();
        let index = self.target();
        let inlines = match self.stack.get_mut(index) {
            Some(
                Frame::Paragraph { inlines, .. }
                | Frame::Heading { inlines, .. }
                | Frame::Cell(inlines)
                | Frame::Span {
                    children: inlines, ..
                },
            ) => inlines,
            _ => return,
        };
        if let (Inline::Text(more), Some(Inline::Text(last))) = (&inline, inlines.last_mut()) {
            last.push_str(more);
            return;
        }
        inlines.push(inline);
    }

    fn text(&mut self, text: &str) {
        let index = self.target();
        match self.stack.get_mut(index) {
            Some(Frame::CodeBlock { code, .. }) => code.push_str(text),
            Some(Frame::HtmlBlock(html)) => html.push_str(text),
            _ => self.push_inline(Inline::Text(text.to_string())),
        }
    }

    fn html(&mut self, html: &str) {
        let index = self.target();
        if let Some(Frame::HtmlBlock(block)) = self.stack.get_mut(index) {
            block.push_str(html);
        } else {
            self.push_inline(Inline::Html(html.to_string()));
        }
    }

    fn mark_task(&mut self, checked: bool) {
        if let Some(Frame::Item { checked: slot, .. }) = self
            .stack
            .iter_mut()
            .rev()
            .find(|frame| matches!(frame, Frame::Item { .. }))
        {
            *slot = Some(checked);
        }
    }
}
