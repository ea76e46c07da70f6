//! vBulletin backend for markdown rendering.
//!
//! Produces forum markup (`[b]`, `[url=…]`, `[list]`, …) for pasting into
//! vBulletin-style boards. Markup tags are the only syntax, so text is
//! written as-is and raw HTML is dropped.

use std::borrow::Cow;
use std::fmt::Write;

use pulldown_cmark::Alignment;

use crate::backend::{Block, RenderBackend, Span};
use crate::state::{Footnote, TocEntry};

/// vBulletin render backend.
///
/// Takes no configuration: rendering flags and parameters only affect the
/// HTML backends.
#[derive(Clone, Copy, Debug, Default)]
pub struct VbCodeBackend;

impl VbCodeBackend {
    /// `[size]` for a heading level: H1 is largest.
    fn heading_size(level: u8) -> u8 {
        7 - level.clamp(1, 6)
    }
}

impl RenderBackend for VbCodeBackend {
    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }

    fn skip_raw_html(&self) -> bool {
        true
    }

    fn block_start(&self, block: Block, out: &mut String) {
        out.push_str(match block {
            Block::Paragraph | Block::DefinitionList | Block::Definition => "",
            Block::BlockQuote => "[quote]",
            Block::Item => "[*]",
            Block::DefinitionTitle => "[b]",
            Block::Table => "[table]\n",
            Block::TableHead | Block::TableRow => "[tr]\n",
        });
    }

    fn block_end(&self, block: Block, out: &mut String) {
        out.push_str(match block {
            Block::Paragraph => "\n\n",
            Block::BlockQuote => "[/quote]\n",
            Block::Item | Block::DefinitionList | Block::Definition => "\n",
            Block::DefinitionTitle => "[/b]\n",
            Block::Table => "[/table]\n",
            Block::TableHead | Block::TableRow => "[/tr]\n",
        });
    }

    fn span_start(&self, span: Span, out: &mut String) {
        out.push_str(match span {
            Span::Emphasis => "[i]",
            Span::Strong => "[b]",
            Span::Strikethrough => "[s]",
            Span::Superscript => "[sup]",
            Span::Subscript => "[sub]",
        });
    }

    fn span_end(&self, span: Span, out: &mut String) {
        out.push_str(match span {
            Span::Emphasis => "[/i]",
            Span::Strong => "[/b]",
            Span::Strikethrough => "[/s]",
            Span::Superscript => "[/sup]",
            Span::Subscript => "[/sub]",
        });
    }

    fn heading(&self, level: u8, _id: Option<&str>, content: &str, out: &mut String) {
        write!(
            out,
            "[size={}][b]{content}[/b][/size]\n\n",
            Self::heading_size(level)
        )
        .unwrap();
    }

    fn title_block(&self, text: &str, out: &mut String) {
        write!(out, "[size=7][b]{text}[/b][/size]\n\n").unwrap();
    }

    fn code_block(&self, _lang: Option<&str>, content: &str, out: &mut String) {
        writeln!(out, "[code]{content}[/code]").unwrap();
    }

    fn list_start(&self, start: Option<u64>, out: &mut String) {
        match start {
            Some(n) => writeln!(out, "[list={n}]").unwrap(),
            None => out.push_str("[list]\n"),
        }
    }

    fn list_end(&self, _ordered: bool, out: &mut String) {
        out.push_str("[/list]\n");
    }

    fn table_cell_start(&self, head: bool, _align: Alignment, out: &mut String) {
        out.push_str(if head { "[td][b]" } else { "[td]" });
    }

    fn table_cell_end(&self, head: bool, out: &mut String) {
        out.push_str(if head { "[/b][/td]\n" } else { "[/td]\n" });
    }

    fn inline_code(&self, code: &str, out: &mut String) {
        write!(out, "[font=Courier New]{code}[/font]").unwrap();
    }

    fn link_start(&self, dest: &str, _title: &str, out: &mut String) {
        write!(out, "[url={dest}]").unwrap();
    }

    fn link_end(&self, _dest: &str, out: &mut String) {
        out.push_str("[/url]");
    }

    fn image(&self, src: &str, _alt: &str, _title: &str, out: &mut String) {
        write!(out, "[img]{src}[/img]").unwrap();
    }

    fn footnote_ref(&self, _id: &str, number: usize, out: &mut String) {
        write!(out, "[sup]{number}[/sup]").unwrap();
    }

    fn footnotes(&self, notes: &[Footnote], out: &mut String) {
        out.push_str("[hr]\n[list=1]\n");
        for note in notes {
            writeln!(out, "[*]{}", note.content.trim_end()).unwrap();
        }
        out.push_str("[/list]\n");
    }

    fn toc(&self, _entries: &[TocEntry], _out: &mut String) {}

    fn soft_break(&self, out: &mut String) {
        out.push(' ');
    }

    fn hard_break(&self, out: &mut String) {
        out.push('\n');
    }

    fn horizontal_rule(&self, out: &mut String) {
        out.push_str("[hr]\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkdownRenderer;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Options, Parser};

    fn render(markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_FOOTNOTES;
        MarkdownRenderer::new(&VbCodeBackend)
            .render(Parser::new_ext(markdown, options))
            .output
    }

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            render("# Hello\n\nWorld\n"),
            "[size=6][b]Hello[/b][/size]\n\nWorld\n\n"
        );
    }

    #[test]
    fn test_heading_sizes() {
        assert_eq!(VbCodeBackend::heading_size(1), 6);
        assert_eq!(VbCodeBackend::heading_size(6), 1);
    }

    #[test]
    fn test_inline_spans() {
        assert_eq!(
            render("*a* **b** ~~c~~ `d`"),
            "[i]a[/i] [b]b[/b] [s]c[/s] [font=Courier New]d[/font]\n\n"
        );
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            render("[site](https://example.com) ![logo](logo.png)"),
            "[url=https://example.com]site[/url] [img]logo.png[/img]\n\n"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(render("- a\n- b\n"), "[list]\n[*]a\n[*]b\n[/list]\n");
        assert_eq!(render("2. a\n"), "[list=2]\n[*]a\n[/list]\n");
    }

    #[test]
    fn test_code_block_and_quote() {
        assert_eq!(
            render("```rust\nlet x = 1 < 2;\n```\n\n> quoted\n"),
            "[code]let x = 1 < 2;\n[/code]\n[quote]quoted\n\n[/quote]\n"
        );
    }

    #[test]
    fn test_table_head_is_bold() {
        assert_eq!(
            render("| A |\n|---|\n| 1 |"),
            "[table]\n[tr]\n[td][b]A[/b][/td]\n[/tr]\n[tr]\n[td]1[/td]\n[/tr]\n[/table]\n"
        );
    }

    #[test]
    fn test_raw_html_dropped_and_text_unescaped() {
        assert_eq!(render("a <b>x</b> & b"), "a x & b\n\n");
    }

    #[test]
    fn test_footnotes_listed_at_end() {
        assert_eq!(
            render("Text[^1].\n\n[^1]: Note.\n"),
            "Text[sup]1[/sup].\n\n[hr]\n[list=1]\n[*]Note.\n[/list]\n"
        );
    }

    #[test]
    fn test_output_has_no_html_tags() {
        let out = render("# Title\n\nSome **bold** and a [link](/x).\n\n---\n");
        assert!(!out.contains('<'));
        assert!(out.contains("[hr]"));
    }
}
