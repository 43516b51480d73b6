#![forbid(unsafe_code)]

//! # markdansi
//!
//! Markdown to ANSI terminal text.
//!
//! markdansi turns markdown into styled terminal output with:
//! - ANSI-aware word wrapping that keeps styled text within the width
//! - Boxed code blocks with optional line numbers and `[language]` labels
//! - Bordered tables with alignment, wrapping and truncation
//! - OSC-8 hyperlinks where the terminal supports them
//! - Six built-in themes, plus custom ones
//!
//! Rendering is a pure function of the markdown, the [`RenderOptions`] and an
//! [`Environment`] snapshot. With color off the output never contains escape
//! sequences.
//!
//! ## Example
//!
//! ```rust
//! use markdansi::{render_with_environment, Environment, RenderOptions};
//!
//! let options = RenderOptions::new().color(false);
//! let out = render_with_environment("# Hello\n\nThis is **bold**.", &options, &Environment::new());
//! assert_eq!(out, "\nHello\nThis is bold.\n");
//! ```
//!
//! Use a [`Renderer`] to resolve options once and render many documents:
//!
//! ```rust
//! use markdansi::{Environment, RenderOptions, Renderer};
//!
//! let renderer = Renderer::with_environment(&RenderOptions::new().width(40), &Environment::new());
//! assert_eq!(renderer.options().width, Some(40));
//! let out = renderer.render("- one\n- two");
//! assert_eq!(out, "- one\n- two\n");
//! ```

pub mod ast;
pub mod env;
pub mod error;
pub mod normalize;
pub mod options;
pub mod render;
pub mod style;
#[cfg(feature = "syntax-highlighting")]
pub mod syntax;
pub mod table;
pub mod theme;
pub mod width;
pub mod wrap;

pub use env::Environment;
pub use error::{Error, Result};
pub use options::{resolve, Highlighter, RenderOptions, ResolvedOptions, TableBorder};
pub use style::{StyleIntent, Styler};
pub use theme::{Theme, ThemeName};

use crate::ast::{dedent, parse};
use crate::normalize::normalize;
use crate::render::render_blocks;
use crate::width::strip_ansi;

// ============================================================================
// Renderer
// ============================================================================

/// A renderer with options resolved against one environment.
#[derive(Debug, Clone)]
pub struct Renderer {
    options: ResolvedOptions,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&RenderOptions::default())
    }
}

impl Renderer {
    /// Creates a renderer, resolving options against the current process
    /// environment.
    #[must_use]
    pub fn new(options: &RenderOptions) -> Self {
        Self::with_environment(options, &Environment::detect())
    }

    /// Creates a renderer against an explicit environment snapshot.
    #[must_use]
    pub fn with_environment(options: &RenderOptions, env: &Environment) -> Self {
        Self {
            options: resolve(options, env),
        }
    }

    /// The resolved options this renderer uses.
    #[must_use]
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// Renders markdown to terminal text.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let source = dedent(markdown);
        let blocks = normalize(parse(&source));
        tracing::trace!(
            markdansi.bytes = markdown.len(),
            markdansi.blocks = blocks.len(),
            "Rendering document"
        );
        let out = render_blocks(&blocks, &self.options);
        if self.options.color {
            out
        } else {
            strip_ansi(&out)
        }
    }
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Renders markdown with options resolved against the process environment.
#[must_use]
pub fn render(markdown: &str, options: &RenderOptions) -> String {
    Renderer::new(options).render(markdown)
}

/// Renders markdown against an explicit environment snapshot.
#[must_use]
pub fn render_with_environment(markdown: &str, options: &RenderOptions, env: &Environment) -> String {
    Renderer::with_environment(options, env).render(markdown)
}

/// Renders plain text: color and hyperlinks forced off.
#[must_use]
pub fn strip(markdown: &str, options: &RenderOptions) -> String {
    let options = options.clone().color(false).hyperlinks(false);
    render(markdown, &options)
}

/// Renders raw bytes, rejecting input that is not UTF-8.
///
/// # Errors
///
/// Returns [`Error::InvalidUtf8`] when `bytes` is not valid UTF-8.
pub fn render_bytes(bytes: &[u8], options: &RenderOptions) -> Result<String> {
    let markdown = std::str::from_utf8(bytes)?;
    Ok(render(markdown, options))
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        render, render_bytes, render_with_environment, strip, Environment, RenderOptions,
        Renderer, StyleIntent, TableBorder, Theme, ThemeName,
    };
}

// ============================================================================
// Tests
// ============================================================================
