//! HTML backend for markdown rendering.
//!
//! Produces HTML5 fragments or complete pages, and XHTML when
//! [`HtmlFlag::UseXhtml`] is set.

use std::borrow::Cow;
use std::fmt::Write;

use pulldown_cmark::Alignment;
use tome_config::{HtmlFlag, HtmlFlags, HtmlParams};

use crate::backend::{Block, RenderBackend, Span};
use crate::smartypants::SmartypantsOptions;
use crate::state::{Footnote, TocEntry, escape_html};
use crate::util::{is_relative_link, is_safe_link};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_RETURN_LINK: &str = "<sup>[return]</sup>";

const XHTML_DOCTYPE: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \
\"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n\
<html xmlns=\"http://www.w3.org/1999/xhtml\">\n";

const HTML_DOCTYPE: &str = "<!DOCTYPE html>\n<html>\n";

/// HTML render backend.
///
/// Produces HTML with:
/// - `<pre><code>` for code blocks
/// - link policy from the rendering flags (skipping, `rel`, `target`)
/// - heading ids with configurable prefix/suffix and level offset
/// - footnotes collected into a trailing `<div class="footnotes">`
#[derive(Clone, Debug, Default)]
pub struct HtmlBackend {
    flags: HtmlFlags,
    params: HtmlParams,
}

impl HtmlBackend {
    /// Create a backend with the given flags and parameters.
    #[must_use]
    pub fn new(flags: HtmlFlags, params: HtmlParams) -> Self {
        Self { flags, params }
    }

    /// The rendering flags in effect.
    #[must_use]
    pub fn flags(&self) -> &HtmlFlags {
        &self.flags
    }

    fn has(&self, flag: HtmlFlag) -> bool {
        self.flags.contains(flag)
    }

    /// Closing sequence for void elements.
    fn void_end(&self) -> &'static str {
        if self.has(HtmlFlag::UseXhtml) {
            " />"
        } else {
            ">"
        }
    }

    fn heading_anchor(&self, id: &str) -> String {
        format!(
            "{}{id}{}",
            self.params.heading_id_prefix.as_deref().unwrap_or_default(),
            self.params.heading_id_suffix.as_deref().unwrap_or_default()
        )
    }

    fn footnote_anchor(&self, id: &str) -> String {
        format!(
            "{}{id}",
            self.params
                .footnote_anchor_prefix
                .as_deref()
                .unwrap_or_default()
        )
    }

    fn output_level(&self, level: u8) -> i32 {
        i32::from(level)
            .saturating_add(self.params.heading_level_offset)
            .clamp(1, 6)
    }

    /// Links are written as plain `<tt>` text when skipped or unsafe.
    fn skip_link(&self, dest: &str) -> bool {
        self.has(HtmlFlag::SkipLinks) || (self.has(HtmlFlag::Safelink) && !is_safe_link(dest))
    }

    /// `rel` and `target` attributes for a link.
    fn link_attrs(&self, dest: &str) -> String {
        if is_relative_link(dest) {
            return String::new();
        }
        let rel: Vec<&str> = [
            (HtmlFlag::NofollowLinks, "nofollow"),
            (HtmlFlag::NoreferrerLinks, "noreferrer"),
            (HtmlFlag::NoopenerLinks, "noopener"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.has(*flag))
        .map(|(_, token)| token)
        .collect();

        let mut attrs = String::new();
        if !rel.is_empty() {
            write!(attrs, r#" rel="{}""#, rel.join(" ")).unwrap();
        }
        if self.has(HtmlFlag::HrefTargetBlank) {
            attrs.push_str(r#" target="_blank""#);
        }
        attrs
    }

    fn page_header(&self, title: Option<&str>, out: &mut String) {
        let end = self.void_end();
        out.push_str(if self.has(HtmlFlag::UseXhtml) {
            XHTML_DOCTYPE
        } else {
            HTML_DOCTYPE
        });
        out.push_str("<head>\n");
        if let Some(title) = self.params.title.as_deref().or(title) {
            writeln!(out, "  <title>{}</title>", escape_html(title)).unwrap();
        }
        writeln!(out, r#"  <meta name="generator" content="tome v{VERSION}"{end}"#).unwrap();
        writeln!(out, r#"  <meta charset="utf-8"{end}"#).unwrap();
        if let Some(css) = &self.params.css {
            writeln!(
                out,
                r#"  <link rel="stylesheet" type="text/css" href="{}"{end}"#,
                escape_html(css)
            )
            .unwrap();
        }
        if let Some(icon) = &self.params.icon {
            writeln!(
                out,
                r#"  <link rel="icon" type="image/x-icon" href="{}"{end}"#,
                escape_html(icon)
            )
            .unwrap();
        }
        out.push_str("</head>\n<body>\n\n");
    }
}

impl RenderBackend for HtmlBackend {
    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.contains(['&', '<', '>', '"', '\'']) {
            Cow::Owned(escape_html(text))
        } else {
            Cow::Borrowed(text)
        }
    }

    fn smartypants(&self) -> Option<SmartypantsOptions> {
        self.has(HtmlFlag::Smartypants).then(|| SmartypantsOptions {
            fractions: self.has(HtmlFlag::SmartypantsFractions),
            dashes: self.has(HtmlFlag::SmartypantsDashes),
            latex_dashes: self.has(HtmlFlag::SmartypantsLatexDashes),
            angled_quotes: self.has(HtmlFlag::SmartypantsAngledQuotes),
            quotes_nbsp: self.has(HtmlFlag::SmartypantsQuotesNbsp),
        })
    }

    fn skip_raw_html(&self) -> bool {
        self.has(HtmlFlag::SkipHtml)
    }

    fn skip_images(&self) -> bool {
        self.has(HtmlFlag::SkipImages)
    }

    fn wants_toc(&self) -> bool {
        self.has(HtmlFlag::Toc)
    }

    fn block_start(&self, block: Block, out: &mut String) {
        out.push_str(match block {
            Block::Paragraph => "<p>",
            Block::BlockQuote => "<blockquote>\n",
            Block::Item => "<li>",
            Block::DefinitionList => "<dl>\n",
            Block::DefinitionTitle => "<dt>",
            Block::Definition => "<dd>",
            Block::Table => "<table>\n",
            Block::TableHead => "<thead>\n<tr>\n",
            Block::TableRow => "<tr>\n",
        });
    }

    fn block_end(&self, block: Block, out: &mut String) {
        out.push_str(match block {
            Block::Paragraph => "</p>\n",
            Block::BlockQuote => "</blockquote>\n",
            Block::Item => "</li>\n",
            Block::DefinitionList => "</dl>\n",
            Block::DefinitionTitle => "</dt>\n",
            Block::Definition => "</dd>\n",
            Block::Table => "</tbody>\n</table>\n",
            Block::TableHead => "</tr>\n</thead>\n<tbody>\n",
            Block::TableRow => "</tr>\n",
        });
    }

    fn span_start(&self, span: Span, out: &mut String) {
        out.push_str(match span {
            Span::Emphasis => "<em>",
            Span::Strong => "<strong>",
            Span::Strikethrough => "<del>",
            Span::Superscript => "<sup>",
            Span::Subscript => "<sub>",
        });
    }

    fn span_end(&self, span: Span, out: &mut String) {
        out.push_str(match span {
            Span::Emphasis => "</em>",
            Span::Strong => "</strong>",
            Span::Strikethrough => "</del>",
            Span::Superscript => "</sup>",
            Span::Subscript => "</sub>",
        });
    }

    fn heading(&self, level: u8, id: Option<&str>, content: &str, out: &mut String) {
        let level = self.output_level(level);
        match id {
            Some(id) => writeln!(
                out,
                r#"<h{level} id="{}">{content}</h{level}>"#,
                escape_html(&self.heading_anchor(id))
            )
            .unwrap(),
            None => writeln!(out, "<h{level}>{content}</h{level}>").unwrap(),
        }
    }

    fn title_block(&self, text: &str, out: &mut String) {
        writeln!(out, r#"<h1 class="title">{}</h1>"#, escape_html(text)).unwrap();
    }

    fn code_block(&self, lang: Option<&str>, content: &str, out: &mut String) {
        if let Some(lang) = lang {
            writeln!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap();
        } else {
            writeln!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
        }
    }

    fn list_start(&self, start: Option<u64>, out: &mut String) {
        match start {
            Some(1) => out.push_str("<ol>\n"),
            Some(n) => writeln!(out, r#"<ol start="{n}">"#).unwrap(),
            None => out.push_str("<ul>\n"),
        }
    }

    fn list_end(&self, ordered: bool, out: &mut String) {
        out.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
    }

    fn table_cell_start(&self, head: bool, align: Alignment, out: &mut String) {
        let tag = if head { "th" } else { "td" };
        let style = match align {
            Alignment::Left => r#" style="text-align:left""#,
            Alignment::Center => r#" style="text-align:center""#,
            Alignment::Right => r#" style="text-align:right""#,
            Alignment::None => "",
        };
        write!(out, "<{tag}{style}>").unwrap();
    }

    fn table_cell_end(&self, head: bool, out: &mut String) {
        out.push_str(if head { "</th>\n" } else { "</td>\n" });
    }

    fn inline_code(&self, code: &str, out: &mut String) {
        write!(out, "<code>{}</code>", escape_html(code)).unwrap();
    }

    fn link_start(&self, dest: &str, title: &str, out: &mut String) {
        if self.skip_link(dest) {
            out.push_str("<tt>");
            return;
        }
        write!(out, r#"<a href="{}""#, escape_html(dest)).unwrap();
        if !title.is_empty() {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        out.push_str(&self.link_attrs(dest));
        out.push('>');
    }

    fn link_end(&self, dest: &str, out: &mut String) {
        out.push_str(if self.skip_link(dest) { "</tt>" } else { "</a>" });
    }

    fn image(&self, src: &str, alt: &str, title: &str, out: &mut String) {
        write!(
            out,
            r#"<img src="{}" alt="{}""#,
            escape_html(src),
            escape_html(alt)
        )
        .unwrap();
        if !title.is_empty() {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        out.push_str(self.void_end());
    }

    fn footnote_ref(&self, id: &str, number: usize, out: &mut String) {
        let anchor = escape_html(&self.footnote_anchor(id));
        write!(
            out,
            r##"<sup class="footnote-ref" id="fnref:{anchor}"><a href="#fn:{anchor}">{number}</a></sup>"##
        )
        .unwrap();
    }

    fn footnotes(&self, notes: &[Footnote], out: &mut String) {
        writeln!(out, "<div class=\"footnotes\">\n<hr{}\n<ol>", self.void_end()).unwrap();
        for note in notes {
            let anchor = escape_html(&self.footnote_anchor(&note.id));
            write!(out, r#"<li id="fn:{anchor}">{}"#, note.content).unwrap();
            if self.has(HtmlFlag::FootnoteReturnLinks) {
                let contents = self
                    .params
                    .footnote_return_link_contents
                    .as_deref()
                    .unwrap_or(DEFAULT_RETURN_LINK);
                write!(
                    out,
                    r##"<a class="footnote-return" href="#fnref:{anchor}">{contents}</a>"##
                )
                .unwrap();
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ol>\n</div>\n");
    }

    fn toc(&self, entries: &[TocEntry], out: &mut String) {
        out.push_str("<nav>\n");
        // Levels of the currently open lists; the last item of each is open.
        let mut open: Vec<u8> = Vec::new();
        for entry in entries {
            match open.last() {
                None => {
                    out.push_str("<ul>\n");
                    open.push(entry.level);
                }
                Some(&top) if entry.level > top => {
                    out.push_str("\n<ul>\n");
                    open.push(entry.level);
                }
                Some(_) => {
                    out.push_str("</li>\n");
                    while let [.., parent, top] = open[..]
                        && entry.level < top
                    {
                        if entry.level > parent {
                            // Shallower than its siblings but deeper than the parent
                            if let Some(last) = open.last_mut() {
                                *last = entry.level;
                            }
                            break;
                        }
                        out.push_str("</ul>\n</li>\n");
                        open.pop();
                    }
                }
            }
            write!(
                out,
                r##"<li><a href="#{}">{}</a>"##,
                escape_html(&self.heading_anchor(&entry.id)),
                escape_html(&entry.title)
            )
            .unwrap();
        }
        if !open.is_empty() {
            out.push_str("</li>\n");
            for _ in 1..open.len() {
                out.push_str("</ul>\n</li>\n");
            }
            out.push_str("</ul>\n");
        }
        out.push_str("</nav>\n");
    }

    fn hard_break(&self, out: &mut String) {
        writeln!(out, "<br{}", self.void_end()).unwrap();
    }

    fn horizontal_rule(&self, out: &mut String) {
        writeln!(out, "<hr{}", self.void_end()).unwrap();
    }

    fn finish(&self, body: String, title: Option<&str>) -> String {
        if !self.has(HtmlFlag::CompletePage) {
            return body;
        }
        let mut page = String::with_capacity(body.len() + 512);
        self.page_header(title, &mut page);
        page.push_str(&body);
        page.push_str("\n</body>\n</html>\n");
        page
    }
}
