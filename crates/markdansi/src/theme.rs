//! Themes: style intents per semantic role, plus the built-in presets.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::style::StyleIntent;

/// Style per semantic role. A role without an intent renders unstyled.
///
/// With the `serde` feature a theme can be deserialized from JSON; roles
/// missing from the document keep the [`ThemeName::Default`] preset's style.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Theme {
    pub heading: Option<StyleIntent>,
    pub strong: Option<StyleIntent>,
    pub emph: Option<StyleIntent>,
    pub inline_code: Option<StyleIntent>,
    pub block_code: Option<StyleIntent>,
    pub link: Option<StyleIntent>,
    pub quote: Option<StyleIntent>,
    pub hr: Option<StyleIntent>,
    pub list_marker: Option<StyleIntent>,
    pub table_header: Option<StyleIntent>,
    pub table_cell: Option<StyleIntent>,
}

impl Default for Theme {
    fn default() -> Self {
        default_theme()
    }
}

impl Theme {
    /// A theme with no styles at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            heading: None,
            strong: None,
            emph: None,
            inline_code: None,
            block_code: None,
            link: None,
            quote: None,
            hr: None,
            list_marker: None,
            table_header: None,
            table_cell: None,
        }
    }

    /// The preset registered under `name`.
    #[must_use]
    pub fn named(name: ThemeName) -> Self {
        name.theme()
    }
}

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ThemeName {
    /// Yellow headings, cyan code, blue links.
    #[default]
    Default,
    /// Every role dimmed.
    Dim,
    /// Magenta headings and yellow markers.
    Bright,
    /// Solarized accent colors.
    Solarized,
    /// Attributes only, no colors.
    Monochrome,
    /// Bold high-contrast colors.
    Contrast,
}

impl ThemeName {
    /// All presets in declaration order.
    pub const ALL: [ThemeName; 6] = [
        ThemeName::Default,
        ThemeName::Dim,
        ThemeName::Bright,
        ThemeName::Solarized,
        ThemeName::Monochrome,
        ThemeName::Contrast,
    ];

    /// The lowercase name used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Dim => "dim",
            ThemeName::Bright => "bright",
            ThemeName::Solarized => "solarized",
            ThemeName::Monochrome => "monochrome",
            ThemeName::Contrast => "contrast",
        }
    }

    /// Builds the preset.
    #[must_use]
    pub fn theme(self) -> Theme {
        match self {
            ThemeName::Default => default_theme(),
            ThemeName::Dim => dim_theme(),
            ThemeName::Bright => bright_theme(),
            ThemeName::Solarized => solarized_theme(),
            ThemeName::Monochrome => monochrome_theme(),
            ThemeName::Contrast => contrast_theme(),
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownTheme(s.to_string()))
    }
}

fn fg(color: &str) -> StyleIntent {
    StyleIntent::new().color(color)
}

/// Creates the default theme.
#[must_use]
pub fn default_theme() -> Theme {
    Theme {
        heading: Some(fg("yellow").bold(true)),
        strong: Some(StyleIntent::new().bold(true)),
        emph: Some(StyleIntent::new().italic(true)),
        inline_code: Some(fg("cyan")),
        block_code: Some(fg("green")),
        link: Some(fg("blue").underline(true)),
        quote: Some(StyleIntent::new().dim(true)),
        hr: Some(StyleIntent::new().dim(true)),
        list_marker: Some(fg("cyan")),
        table_header: Some(fg("yellow").bold(true)),
        table_cell: Some(StyleIntent::new()),
    }
}

/// Creates the dim theme.
#[must_use]
pub fn dim_theme() -> Theme {
    Theme {
        heading: Some(fg("white").bold(true).dim(true)),
        strong: Some(StyleIntent::new().bold(true)),
        emph: Some(StyleIntent::new().italic(true)),
        inline_code: Some(fg("cyan").dim(true)),
        block_code: Some(fg("green").dim(true)),
        link: Some(fg("blue").underline(true).dim(true)),
        quote: Some(StyleIntent::new().dim(true)),
        hr: Some(StyleIntent::new().dim(true)),
        list_marker: Some(fg("cyan").dim(true)),
        table_header: Some(fg("yellow").bold(true).dim(true)),
        table_cell: Some(StyleIntent::new().dim(true)),
    }
}

/// Creates the bright theme.
#[must_use]
pub fn bright_theme() -> Theme {
    Theme {
        heading: Some(fg("magenta").bold(true)),
        inline_code: Some(fg("green")),
        link: Some(fg("cyan").underline(true)),
        list_marker: Some(fg("yellow")),
        ..default_theme()
    }
}

/// Creates the solarized theme.
#[must_use]
pub fn solarized_theme() -> Theme {
    Theme {
        block_code: Some(fg("#2aa198")),
        quote: Some(fg("white").dim(true)),
        hr: Some(fg("white").dim(true)),
        ..default_theme()
    }
}

/// Creates the monochrome theme.
#[must_use]
pub fn monochrome_theme() -> Theme {
    Theme {
        heading: Some(StyleIntent::new().bold(true)),
        strong: Some(StyleIntent::new().bold(true)),
        emph: Some(StyleIntent::new().italic(true)),
        inline_code: Some(StyleIntent::new().dim(true)),
        block_code: Some(StyleIntent::new().dim(true)),
        link: Some(StyleIntent::new().underline(true)),
        quote: Some(StyleIntent::new().dim(true)),
        hr: Some(StyleIntent::new().dim(true)),
        list_marker: Some(StyleIntent::new().dim(true)),
        table_header: Some(StyleIntent::new().bold(true)),
        table_cell: Some(StyleIntent::new()),
    }
}

/// Creates the high-contrast theme.
#[must_use]
pub fn contrast_theme() -> Theme {
    Theme {
        heading: Some(fg("magenta").bold(true)),
        strong: Some(fg("white").bold(true)),
        emph: Some(fg("white").italic(true)),
        inline_code: Some(fg("cyan").bold(true)),
        block_code: Some(fg("green").bold(true)),
        link: Some(fg("blue").underline(true)),
        quote: Some(fg("white").dim(true)),
        hr: Some(fg("white").dim(true)),
        list_marker: Some(fg("yellow").bold(true)),
        table_header: Some(fg("yellow").bold(true)),
        table_cell: Some(fg("white")),
    }
}
