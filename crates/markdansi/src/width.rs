//! Visible width of terminal text.
//!
//! Every measurement in the renderer goes through this module. ANSI control
//! sequences (CSI `ESC [ ... final` and OSC `ESC ] ... BEL`) are zero-width,
//! combining marks are zero-width and east-asian wide characters and emoji
//! count as two columns.
//!
//! # Example
//!
//! ```rust
//! use markdansi::width::{strip_ansi, visible_width};
//!
//! let styled = "\x1b[1mbold\x1b[0m";
//! assert_eq!(visible_width(styled), 4);
//! assert_eq!(strip_ansi(styled), "bold");
//! assert_eq!(visible_width("日本"), 4);
//! ```

use unicode_width::UnicodeWidthChar;

/// A piece of terminal text: either a whole escape sequence or one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Escape(&'a str),
    Char(char),
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    Esc,
    Csi,
    Osc,
}

/// Iterator splitting a string into escape sequences and visible characters.
pub(crate) struct Segments<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let first = rest.chars().next()?;
        if first != '\x1b' {
            self.pos += first.len_utf8();
            return Some(Segment::Char(first));
        }

        let mut state = State::Esc;
        let mut end = rest.len();
        for (i, c) in rest.char_indices().skip(1) {
            match state {
                State::Esc => {
                    if c == '[' {
                        state = State::Csi;
                    } else if c == ']' {
                        state = State::Osc;
                    } else {
                        // Two-byte escape such as ESC 7 or the ST terminator.
                        end = i + c.len_utf8();
                        break;
                    }
                }
                State::Csi => {
                    if ('@'..='~').contains(&c) {
                        end = i + c.len_utf8();
                        break;
                    }
                }
                State::Osc => {
                    if c == '\x07' {
                        end = i + c.len_utf8();
                        break;
                    }
                    if c == '\x1b' {
                        // ST (ESC \) ends the OSC too.
                        end = if rest[i + 1..].starts_with('\\') {
                            i + 2
                        } else {
                            i
                        };
                        break;
                    }
                }
            }
        }

        let escape = &rest[..end];
        self.pos += end;
        Some(Segment::Escape(escape))
    }
}

/// Display width of a single character. Control characters are zero-width.
pub(crate) fn char_width(c: char) -> usize {
    if c.is_control() {
        return 0;
    }
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Calculate the visible width of a string (excluding ANSI escapes).
#[must_use]
pub fn visible_width(text: &str) -> usize {
    Segments::new(text)
        .map(|segment| match segment {
            Segment::Escape(_) => 0,
            Segment::Char(c) => char_width(c),
        })
        .sum()
}

/// Strip ANSI escape sequences from a string.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    if !text.contains('\x1b') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for segment in Segments::new(text) {
        if let Segment::Char(c) = segment {
            out.push(c);
        }
    }
    out
}

/// Truncate text to `width` visible columns, ending it with `ellipsis`.
///
/// Characters are dropped one at a time from the end until the remainder plus
/// the ellipsis fits. Escape sequences before the cut are kept intact and a
/// reset is emitted when any were kept.
///
/// ```rust
/// use markdansi::width::truncate;
///
/// assert_eq!(truncate("Hello, World!", 5, "…"), "Hell…");
/// assert_eq!(truncate("Hi", 10, "…"), "Hi");
/// assert_eq!(truncate("日本語", 4, "…"), "日…");
/// ```
#[must_use]
pub fn truncate(text: &str, width: usize, ellipsis: &str) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    let ellipsis_width = visible_width(ellipsis);
    if width <= ellipsis_width {
        return ellipsis.chars().take(width).collect();
    }

    let target = width - ellipsis_width;
    let mut out = String::new();
    let mut used = 0;
    let mut styled = false;
    for segment in Segments::new(text) {
        match segment {
            Segment::Escape(escape) => {
                styled = true;
                out.push_str(escape);
            }
            Segment::Char(c) => {
                let w = char_width(c);
                if used + w > target {
                    break;
                }
                out.push(c);
                used += w;
            }
        }
    }
    if styled {
        out.push_str("\x1b[0m");
    }
    out.push_str(ellipsis);
    out
}

const RESET: &str = "\x1b[0m";
const LINK_CLOSE: &str = "\x1b]8;;\x07";

/// Make every line carry its own styling.
///
/// Text styled across a line break is closed with a reset at the end of the
/// line and re-opened at the start of the next one, so whatever is printed in
/// front of a line (a quote bar, a hanging indent) stays unstyled. Open OSC-8
/// hyperlinks are closed and re-opened the same way. Empty lines are left
/// alone.
///
/// ```rust
/// use markdansi::width::close_open_styles;
///
/// let lines = vec!["\x1b[1mone".to_string(), "two\x1b[0m".to_string()];
/// assert_eq!(
///     close_open_styles(lines),
///     vec!["\x1b[1mone\x1b[0m", "\x1b[1mtwo\x1b[0m"]
/// );
/// ```
#[must_use]
pub fn close_open_styles(lines: Vec<String>) -> Vec<String> {
    let mut sgr: Vec<&str> = Vec::new();
    let mut link: Option<&str> = None;
    let mut out = Vec::with_capacity(lines.len());
    for line in &lines {
        if line.is_empty() || (sgr.is_empty() && link.is_none() && !line.contains('\x1b')) {
            out.push(line.clone());
            continue;
        }
        let mut balanced = String::with_capacity(line.len());
        if let Some(open) = link {
            balanced.push_str(open);
        }
        balanced.extend(sgr.iter().copied());
        balanced.push_str(line);
        for segment in Segments::new(line) {
            if let Segment::Escape(escape) = segment {
                track_escape(escape, &mut sgr, &mut link);
            }
        }
        if !sgr.is_empty() {
            balanced.push_str(RESET);
        }
        if link.is_some() {
            balanced.push_str(LINK_CLOSE);
        }
        out.push(balanced);
    }
    out
}

/// Update the active SGR stack and hyperlink for one escape sequence.
fn track_escape<'a>(escape: &'a str, sgr: &mut Vec<&'a str>, link: &mut Option<&'a str>) {
    if let Some(params) = escape.strip_prefix("\x1b[").and_then(|rest| rest.strip_suffix('m')) {
        if params.is_empty() || params == "0" {
            sgr.clear();
        } else {
            sgr.push(escape);
        }
        return;
    }
    if let Some(body) = escape.strip_prefix("\x1b]8;") {
        let body = body.trim_end_matches('\x07').trim_end_matches("\x1b\\");
        let url = body.split_once(';').map_or("", |(_, url)| url);
        *link = if url.is_empty() { None } else { Some(escape) };
    }
}
