//! Word-aware and character-packing line wrapping.
//!
//! All measurements use [`visible_width`], so styled text wraps by what the
//! terminal shows rather than by bytes.
//!
//! # Example
//!
//! ```rust
//! use markdansi::wrap::{wrap_text, wrap_with_prefix};
//!
//! assert_eq!(wrap_text("one two three", 7, true), vec!["one two", "three"]);
//! assert_eq!(wrap_with_prefix("a b", 3, true, "> "), vec!["> a", "> b"]);
//! ```

use crate::width::{char_width, close_open_styles, visible_width, Segment, Segments};

/// Split into maximal runs of whitespace and of non-whitespace.
fn tokens(text: &str) -> impl Iterator<Item = (&str, bool)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|&(_, c)| c.is_whitespace() != space)
            .map_or(rest.len(), |(i, _)| i);
        let (token, tail) = rest.split_at(end);
        rest = tail;
        Some((token, space))
    })
}

/// Greedily wrap `text` to `width` visible columns.
///
/// A word wider than `width` is put on its own line and overflows. Whitespace
/// that would overflow ends the line and is dropped. With `wrap` off or a zero
/// width the text comes back as a single line.
#[must_use]
pub fn wrap_text(text: &str, width: usize, wrap: bool) -> Vec<String> {
    if !wrap || width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for (token, is_space) in tokens(text) {
        let w = visible_width(token);
        if !is_space && !current.is_empty() && current_width + w > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(token);
            current_width = w;
            continue;
        }
        if is_space && current_width + w > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
            continue;
        }
        current.push_str(token);
        current_width += w;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Wrap every line of `text` and prepend `prefix` to each output line.
///
/// The prefix width comes out of the budget, leaving at least one column.
/// Explicit newlines are kept as hard breaks and blank lines still get the
/// prefix. Styles spanning a break are closed before it and re-opened after
/// the prefix, so the prefix never picks them up.
#[must_use]
pub fn wrap_with_prefix(text: &str, width: usize, wrap: bool, prefix: &str) -> Vec<String> {
    let chunks: Vec<String> = if wrap {
        let available = width.saturating_sub(visible_width(prefix)).max(1);
        text.split('\n')
            .flat_map(|line| wrap_text(line, available, true))
            .collect()
    } else {
        text.split('\n').map(str::to_string).collect()
    };
    close_open_styles(chunks)
        .into_iter()
        .map(|chunk| format!("{prefix}{chunk}"))
        .collect()
}

/// Pack a code line into chunks of at most `width` columns, breaking anywhere.
///
/// Without a width (or with zero) the line is returned whole. A character
/// wider than the budget still gets its own chunk. Escape sequences are
/// zero-width and stay with the text before them; styles are not re-opened
/// here (see [`close_open_styles`]).
#[must_use]
pub fn wrap_code_line(text: &str, width: Option<usize>) -> Vec<String> {
    let Some(width) = width.filter(|&w| w > 0) else {
        return vec![text.to_string()];
    };

    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for segment in Segments::new(text) {
        let c = match segment {
            Segment::Escape(escape) => {
                current.push_str(escape);
                continue;
            }
            Segment::Char(c) => c,
        };
        let w = char_width(c);
        if current_width > 0 && current_width + w > width {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(c);
        current_width += w;
    }
    if !current.is_empty() {
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}
