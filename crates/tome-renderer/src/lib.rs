//! Markdown conversion for tome with pluggable output backends.
//!
//! Markdown is tokenized by `pulldown-cmark`; this crate walks the event
//! stream with a generic [`MarkdownRenderer`] and delegates the spelling of
//! each element to a [`RenderBackend`]:
//!
//! - [`HtmlBackend`]: HTML5, or XHTML with self-closing void elements
//! - [`VbCodeBackend`]: vBulletin forum markup
//!
//! [`Renderer::select`] picks and configures a backend from a format name,
//! and [`convert`] runs a whole document through it.
//!
//! # Example
//!
//! ```
//! use tome_config::{Extensions, RenderConfig};
//! use tome_renderer::{Renderer, convert};
//!
//! let renderer = Renderer::select("html", &RenderConfig::default()).unwrap();
//! let output = convert(b"# Hello\n\nWorld\n", &renderer, &Extensions::empty());
//! assert_eq!(output, b"<h1>Hello</h1>\n<p>World</p>\n");
//! ```

mod backend;
mod convert;
mod error;
mod filter;
mod format;
mod html;
mod preprocess;
mod renderer;
mod smartypants;
mod state;
mod util;
mod vbcode;

pub use backend::{Block, RenderBackend, Span};
pub use convert::convert;
pub use error::RenderError;
pub use format::{OutputFormat, Renderer};
pub use html::HtmlBackend;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use smartypants::SmartypantsOptions;
pub use state::{Footnote, TocEntry, escape_html, slugify};
pub use vbcode::VbCodeBackend;
