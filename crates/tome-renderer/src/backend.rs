//! Render backend trait for format-specific rendering.
//!
//! This trait abstracts the differences between HTML and forum markup output,
//! allowing the main renderer to be generic over the output format. The
//! renderer owns document structure (nesting, headings, footnotes, alt text);
//! the backend decides how each element is spelled.

use std::borrow::Cow;

use pulldown_cmark::Alignment;

use crate::smartypants::SmartypantsOptions;
use crate::state::{Footnote, TocEntry};

/// Block-level containers without parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Block {
    Paragraph,
    BlockQuote,
    Item,
    DefinitionList,
    DefinitionTitle,
    Definition,
    Table,
    TableHead,
    TableRow,
}

/// Inline spans without parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Span {
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Subscript,
}

/// Backend trait for format-specific rendering operations.
///
/// All writers append to `out`. Inline content passed in (`content`, `alt`)
/// is already rendered in the backend's own format.
pub trait RenderBackend {
    /// Escape plain text for this format.
    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str>;

    /// Typographic substitution settings, `None` to disable.
    fn smartypants(&self) -> Option<SmartypantsOptions> {
        None
    }

    /// Whether raw HTML in the source is dropped.
    fn skip_raw_html(&self) -> bool {
        false
    }

    /// Whether images are dropped.
    fn skip_images(&self) -> bool {
        false
    }

    /// Whether a table of contents is emitted (headings then always get ids).
    fn wants_toc(&self) -> bool {
        false
    }

    /// Render block container start.
    fn block_start(&self, block: Block, out: &mut String);

    /// Render block container end.
    fn block_end(&self, block: Block, out: &mut String);

    /// Render inline span start.
    fn span_start(&self, span: Span, out: &mut String);

    /// Render inline span end.
    fn span_end(&self, span: Span, out: &mut String);

    /// Render a heading.
    ///
    /// # Arguments
    ///
    /// * `level` - Source heading level (1-6)
    /// * `id` - Anchor id, if the heading has one
    /// * `content` - Rendered heading content
    /// * `out` - Output buffer to write to
    fn heading(&self, level: u8, id: Option<&str>, content: &str, out: &mut String);

    /// Render a document title block.
    fn title_block(&self, text: &str, out: &mut String);

    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier (e.g., "rust", "python")
    /// * `content` - The raw code content
    /// * `out` - Output buffer to write to
    fn code_block(&self, lang: Option<&str>, content: &str, out: &mut String);

    /// Render list start. `start` is `Some` for ordered lists.
    fn list_start(&self, start: Option<u64>, out: &mut String);

    /// Render list end.
    fn list_end(&self, ordered: bool, out: &mut String);

    /// Render table cell start.
    fn table_cell_start(&self, head: bool, align: Alignment, out: &mut String);

    /// Render table cell end.
    fn table_cell_end(&self, head: bool, out: &mut String);

    /// Render inline code.
    fn inline_code(&self, code: &str, out: &mut String);

    /// Render link start.
    fn link_start(&self, dest: &str, title: &str, out: &mut String);

    /// Render link end. `dest` matches the one given to `link_start`.
    fn link_end(&self, dest: &str, out: &mut String);

    /// Render an image.
    ///
    /// # Arguments
    ///
    /// * `src` - Image source URL
    /// * `alt` - Alt text for the image
    /// * `title` - Title, empty when absent
    /// * `out` - Output buffer to write to
    fn image(&self, src: &str, alt: &str, title: &str, out: &mut String);

    /// Render a footnote reference.
    fn footnote_ref(&self, id: &str, number: usize, out: &mut String);

    /// Render the collected footnotes after the body.
    fn footnotes(&self, notes: &[Footnote], out: &mut String);

    /// Render the table of contents before the body.
    fn toc(&self, _entries: &[TocEntry], _out: &mut String) {}

    /// Render a soft line break.
    fn soft_break(&self, out: &mut String) {
        out.push('\n');
    }

    /// Render a hard line break.
    fn hard_break(&self, out: &mut String);

    /// Render a horizontal rule.
    fn horizontal_rule(&self, out: &mut String);

    /// Wrap the finished document.
    ///
    /// Default returns the body unchanged.
    fn finish(&self, body: String, _title: Option<&str>) -> String {
        body
    }
}
