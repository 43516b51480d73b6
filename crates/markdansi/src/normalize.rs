//! Tree rewrites applied between parsing and rendering.
//!
//! Markdown produced by tools (and by people pasting into chat) often splits one
//! logical code block into several fences, writes the language as a `[lang]`
//! line above an untagged fence, or wraps a long reference definition so the
//! tail gets parsed as indented code. These passes repair that before
//! rendering. Every pass takes the block sequence by value and returns a new
//! one.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{plain_text, Block, CodeBlock, Inline, List, ListItem};

/// `[id]: url "` with the title left open.
static OPEN_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\[(\d+|\w+)\]:\s+\S.*"\s*$"#).expect("Invalid open definition regex")
});

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]$").expect("Invalid label regex"));

/// Leading indentation and quote markers on each line.
pub(crate) static LINE_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t>]+").expect("Invalid line marker regex"));

pub(crate) static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Run all four passes in order.
#[must_use]
pub fn normalize(blocks: Vec<Block>) -> Vec<Block> {
    let merged = merge_reference_continuations(blocks);
    let labelled = apply_label_paragraphs(merged);
    let coalesced = merge_adjacent_code_blocks(labelled);
    flatten_code_lists(coalesced)
}

/// Join a paragraph holding an open reference definition with the untagged
/// code block that follows it.
#[must_use]
pub fn merge_reference_continuations(blocks: Vec<Block>) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut iter = blocks.into_iter().peekable();
    while let Some(block) = iter.next() {
        let Block::Paragraph(inlines) = &block else {
            out.push(block);
            continue;
        };
        let text = plain_text(inlines);
        let continues = OPEN_DEFINITION.is_match(&text)
            && matches!(iter.peek(), Some(Block::CodeBlock(code)) if code.language.is_none());
        if !continues {
            out.push(block);
            continue;
        }
        let Some(Block::CodeBlock(code)) = iter.next() else {
            out.push(block);
            continue;
        };

        let unmarked = LINE_MARKERS.replace_all(&code.code, " ");
        let collapsed = WHITESPACE_RUN.replace_all(&unmarked, " ");
        let continuation = collapsed.trim();
        let head = text.trim();
        let head = head.strip_suffix('"').unwrap_or(head).trim_end();
        let merged = format!("{head} {continuation}").trim().to_string();
        tracing::debug!(markdansi.definition = %merged, "Merged reference continuation");
        out.push(Block::Paragraph(vec![Inline::Text(merged)]));
    }
    out
}

/// Turn a lone `[lang]` paragraph into the language of the untagged code
/// block right after it.
#[must_use]
pub fn apply_label_paragraphs(blocks: Vec<Block>) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut iter = blocks.into_iter().peekable();
    while let Some(block) = iter.next() {
        let label = match &block {
            Block::Paragraph(inlines) => match inlines.as_slice() {
                [Inline::Text(text)] => LABEL
                    .captures(text.trim())
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string()),
                _ => None,
            },
            _ => None,
        };
        let Some(label) = label else {
            out.push(block);
            continue;
        };
        let next_untagged = iter.peek_mut().and_then(|next| match next {
            Block::CodeBlock(code) if code.language.is_none() => Some(code),
            _ => None,
        });
        if let Some(code) = next_untagged {
            tracing::trace!(markdansi.language = %label, "Promoted label paragraph");
            code.language = Some(label);
            continue;
        }
        out.push(block);
    }
    out
}

/// Concatenate consecutive code blocks, and code-only lists, that share a
/// language.
#[must_use]
pub fn merge_adjacent_code_blocks(blocks: Vec<Block>) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut pending: Option<CodeBlock> = None;
    for block in blocks {
        let code = match block {
            Block::CodeBlock(code) => code,
            Block::List(list) => match flatten_code_list(&list) {
                Some(code) => code,
                None => {
                    out.extend(pending.take().map(Block::CodeBlock));
                    out.push(Block::List(list));
                    continue;
                }
            },
            other => {
                out.extend(pending.take().map(Block::CodeBlock));
                out.push(other);
                continue;
            }
        };

        pending = Some(match pending.take() {
            Some(mut prev) if prev.language_key() == code.language_key() => {
                tracing::trace!(
                    markdansi.language = prev.language_key(),
                    "Merged adjacent code blocks"
                );
                prev.code = join_code(&prev.code, &code.code);
                prev
            }
            Some(prev) => {
                out.push(Block::CodeBlock(prev));
                code
            }
            None => code,
        });
    }
    out.extend(pending.map(Block::CodeBlock));
    out
}

/// Collapse lists whose items are each a single code block in one shared
/// language, including lists nested in quotes and other lists.
#[must_use]
pub fn flatten_code_lists(blocks: Vec<Block>) -> Vec<Block> {
    blocks
        .into_iter()
        .map(|block| match block {
            Block::List(list) => match flatten_code_list(&list) {
                Some(code) => Block::CodeBlock(code),
                None => Block::List(List {
                    start: list.start,
                    items: list
                        .items
                        .into_iter()
                        .map(|item| ListItem {
                            checked: item.checked,
                            children: flatten_code_lists(item.children),
                        })
                        .collect(),
                }),
            },
            Block::BlockQuote(children) => Block::BlockQuote(flatten_code_lists(children)),
            other => other,
        })
        .collect()
}

/// The single code block a code-only list stands for, if it is one.
#[must_use]
pub fn flatten_code_list(list: &List) -> Option<CodeBlock> {
    let codes: Vec<&CodeBlock> = list
        .items
        .iter()
        .map(|item| match item.children.as_slice() {
            [Block::CodeBlock(code)] => Some(code),
            _ => None,
        })
        .collect::<Option<_>>()?;
    let first = codes.first()?;
    if codes.iter().any(|c| c.language_key() != first.language_key()) {
        return None;
    }
    let body: Vec<&str> = codes
        .iter()
        .map(|c| c.code.trim_end_matches('\n'))
        .collect();
    Some(CodeBlock {
        language: first.language.clone(),
        code: body.join("\n"),
    })
}

fn join_code(a: &str, b: &str) -> String {
    format!("{}\n{}", a.trim_end_matches('\n'), b.trim_end_matches('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Block {
        Block::Paragraph(vec![Inline::Text(text.to_string())])
    }

    fn code(language: Option<&str>, body: &str) -> Block {
        Block::CodeBlock(CodeBlock::new(language, body))
    }

    fn code_list(items: &[(Option<&str>, &str)]) -> Block {
        Block::List(List {
            start: None,
            items: items
                .iter()
                .map(|(lang, body)| ListItem {
                    checked: None,
                    children: vec![code(*lang, body)],
                })
                .collect(),
        })
    }

    #[test]
    fn reference_continuation_merges() {
        let blocks = vec![
            para("[1]: https://example.com/icon \""),
            code(None, "    Icon Composer\n  >  Notes\n\"\n"),
        ];
        let out = merge_reference_continuations(blocks);
        assert_eq!(
            out,
            vec![para("[1]: https://example.com/icon Icon Composer Notes \"")]
        );
    }

    #[test]
    fn reference_continuation_needs_untagged_code() {
        let blocks = vec![
            para("[1]: https://example.com \""),
            code(Some("text"), "tail\n"),
        ];
        assert_eq!(merge_reference_continuations(blocks.clone()), blocks);
        let not_open = vec![para("[1]: https://example.com"), code(None, "x\n")];
        assert_eq!(merge_reference_continuations(not_open.clone()), not_open);
    }

    #[test]
    fn label_paragraph_becomes_language() {
        let out = apply_label_paragraphs(vec![para(" [rust] "), code(None, "fn x() {}\n")]);
        assert_eq!(out, vec![code(Some("rust"), "fn x() {}\n")]);
    }

    #[test]
    fn label_paragraph_kept_before_tagged_code() {
        let blocks = vec![para("[note]"), code(Some("sh"), "ls\n")];
        assert_eq!(apply_label_paragraphs(blocks.clone()), blocks);
        let trailing = vec![para("[note]")];
        assert_eq!(apply_label_paragraphs(trailing.clone()), trailing);
    }

    #[test]
    fn adjacent_code_blocks_merge() {
        let out = merge_adjacent_code_blocks(vec![
            code(None, "first\n\n"),
            code(None, "second\n"),
            code(Some("rust"), "third\n"),
        ]);
        assert_eq!(
            out,
            vec![code(None, "first\nsecond"), code(Some("rust"), "third\n")]
        );
    }

    #[test]
    fn code_list_merges_with_preceding_block() {
        let out = merge_adjacent_code_blocks(vec![
            code(None, "first\n"),
            code_list(&[(None, "second\n")]),
        ]);
        assert_eq!(out, vec![code(None, "first\nsecond")]);
    }

    #[test]
    fn other_blocks_break_merging() {
        let blocks = vec![code(None, "a\n"), para("between"), code(None, "b\n")];
        assert_eq!(merge_adjacent_code_blocks(blocks.clone()), blocks);
    }

    #[test]
    fn code_list_flattens() {
        let out = flatten_code_lists(vec![code_list(&[(None, "first\n"), (None, "second\n")])]);
        assert_eq!(out, vec![code(None, "first\nsecond")]);
    }

    #[test]
    fn mixed_language_list_is_kept() {
        let list = code_list(&[(Some("rust"), "a\n"), (Some("sh"), "b\n")]);
        assert_eq!(flatten_code_lists(vec![list.clone()]), vec![list]);
    }

    #[test]
    fn nested_code_list_flattens_inside_quote() {
        let quote = Block::BlockQuote(vec![code_list(&[(Some("sh"), "ls\n"), (Some("sh"), "pwd\n")])]);
        assert_eq!(
            flatten_code_lists(vec![quote]),
            vec![Block::BlockQuote(vec![code(Some("sh"), "ls\npwd")])]
        );
    }

    #[test]
    fn empty_list_is_not_code() {
        assert_eq!(flatten_code_list(&List::default()), None);
    }

    #[test]
    fn full_pipeline_on_parsed_markdown() {
        let blocks = crate::ast::parse("[python]\n\n```\nprint(1)\n```\n\n```python\nprint(2)\n```");
        assert_eq!(normalize(blocks), vec![code(Some("python"), "print(1)\nprint(2)")]);
    }
}
