//! Style intents and their translation to ANSI SGR sequences.
//!
//! A [`StyleIntent`] is a plain value describing how text should look. The
//! [`Styler`] turns it into escape sequences, or does nothing when color output
//! is disabled.
//!
//! # Example
//!
//! ```rust
//! use markdansi::style::{StyleIntent, Styler};
//!
//! let styler = Styler::new(true);
//! let heading = StyleIntent::new().color("yellow").bold(true);
//! assert_eq!(styler.apply("Title", Some(&heading)), "\x1b[1m\x1b[33mTitle\x1b[0m");
//!
//! let plain = Styler::new(false);
//! assert_eq!(plain.apply("Title", Some(&heading)), "Title");
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const RESET: &str = "\x1b[0m";

/// Visual attributes for a span of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleIntent {
    /// Foreground color: an ANSI color name or `#RRGGBB`.
    pub color: Option<String>,
    /// Background color: an ANSI color name or `#RRGGBB`.
    pub bg_color: Option<String>,
    /// Bold text.
    pub bold: bool,
    /// Italic text.
    pub italic: bool,
    /// Underlined text.
    pub underline: bool,
    /// Faint text.
    pub dim: bool,
    /// Struck-through text.
    pub strike: bool,
}

impl StyleIntent {
    /// Creates an empty intent (no attributes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the foreground color.
    #[must_use]
    pub fn color(mut self, c: impl Into<String>) -> Self {
        self.color = Some(c.into());
        self
    }

    /// Sets the background color.
    #[must_use]
    pub fn bg_color(mut self, c: impl Into<String>) -> Self {
        self.bg_color = Some(c.into());
        self
    }

    /// Sets bold.
    #[must_use]
    pub fn bold(mut self, b: bool) -> Self {
        self.bold = b;
        self
    }

    /// Sets italic.
    #[must_use]
    pub fn italic(mut self, i: bool) -> Self {
        self.italic = i;
        self
    }

    /// Sets underline.
    #[must_use]
    pub fn underline(mut self, u: bool) -> Self {
        self.underline = u;
        self
    }

    /// Sets faint.
    #[must_use]
    pub fn dim(mut self, d: bool) -> Self {
        self.dim = d;
        self
    }

    /// Sets strikethrough.
    #[must_use]
    pub fn strike(mut self, s: bool) -> Self {
        self.strike = s;
        self
    }

    /// SGR sequences for this intent, in application order.
    fn sgr_codes(&self) -> Vec<String> {
        let mut codes = Vec::new();
        if self.bold {
            codes.push("\x1b[1m".to_string());
        }
        if self.italic {
            codes.push("\x1b[3m".to_string());
        }
        if self.underline {
            codes.push("\x1b[4m".to_string());
        }
        if self.dim {
            codes.push("\x1b[2m".to_string());
        }
        if self.strike {
            codes.push("\x1b[9m".to_string());
        }
        if let Some(fg) = self.color.as_deref().and_then(|c| color_code(c, Layer::Foreground)) {
            codes.push(fg);
        }
        if let Some(bg) = self
            .bg_color
            .as_deref()
            .and_then(|c| color_code(c, Layer::Background))
        {
            codes.push(bg);
        }
        codes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Foreground,
    Background,
}

/// Resolve a color spec to its SGR sequence. Unknown specs resolve to nothing.
fn color_code(spec: &str, layer: Layer) -> Option<String> {
    if spec.is_empty() {
        return None;
    }

    if let Some(hex) = spec.strip_prefix('#') {
        let (r, g, b) = parse_hex_rgb(hex)?;
        let selector = match layer {
            Layer::Foreground => 38,
            Layer::Background => 48,
        };
        return Some(format!("\x1b[{selector};2;{r};{g};{b}m"));
    }

    let base = match spec.to_ascii_lowercase().as_str() {
        "black" => 30,
        "red" => 31,
        "green" => 32,
        "yellow" => 33,
        "blue" => 34,
        "magenta" => 35,
        "cyan" => 36,
        "white" => 37,
        "gray" => 90,
        _ => return None,
    };
    let code = match layer {
        Layer::Foreground => base,
        Layer::Background => base + 10,
    };
    Some(format!("\x1b[{code}m"))
}

fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Applies style intents as ANSI SGR sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styler {
    enable_color: bool,
}

impl Styler {
    /// Creates a styler. With `enable_color` off every call is a passthrough.
    #[must_use]
    pub fn new(enable_color: bool) -> Self {
        Self { enable_color }
    }

    /// Whether this styler emits escape sequences.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enable_color
    }

    /// Wrap `text` in the SGR sequences of `style`, followed by one reset.
    ///
    /// Returns the text unchanged when color is off, there is no intent, or the
    /// intent resolves to no codes.
    #[must_use]
    pub fn apply(&self, text: &str, style: Option<&StyleIntent>) -> String {
        let Some(style) = style.filter(|_| self.enable_color) else {
            return text.to_string();
        };
        let codes = style.sgr_codes();
        if codes.is_empty() {
            return text.to_string();
        }
        let mut out = codes.concat();
        out.push_str(text);
        out.push_str(RESET);
        out
    }
}
