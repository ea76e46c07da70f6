//! Event-stream walker shared by every output format.

use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};

use crate::backend::{Block, RenderBackend, Span};
use crate::smartypants::Smartypants;
use crate::state::{
    CodeBlockState, FootnoteState, HeadingIds, HeadingState, ImageState, TableState, TocEntry,
};
use crate::util::{fence_language, heading_level_to_num};

/// A rendered document and what was learned while rendering it.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Finished document in the backend's format.
    pub output: String,
    /// Document title: the title block if present, else the first H1.
    pub title: Option<String>,
    /// Table of contents entries (headings that received an id).
    pub toc: Vec<TocEntry>,
}

/// Generic markdown renderer with pluggable backend.
///
/// Uses the [`RenderBackend`] trait to delegate format-specific rendering
/// while handling document structure (headings, footnotes, image alt text,
/// table state) generically.
pub struct MarkdownRenderer<'b, B: RenderBackend> {
    backend: &'b B,
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    /// Heading, title and table of contents state.
    heading: HeadingState,
    /// Footnote numbering and captured definitions.
    footnotes: FootnoteState,
    smartypants: Option<Smartypants>,
    /// `(src, title)` of open images, completed once their alt text is known.
    pending_images: Vec<(String, String)>,
    /// Destinations of the links we're inside.
    link_stack: Vec<String>,
    /// Raw title block text, written before the body.
    title_block: Option<String>,
}

impl<'b, B: RenderBackend> MarkdownRenderer<'b, B> {
    /// Create a new renderer for a backend.
    #[must_use]
    pub fn new(backend: &'b B) -> Self {
        let ids = if backend.wants_toc() {
            HeadingIds::Numbered
        } else {
            HeadingIds::None
        };
        Self {
            backend,
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::new(ids),
            footnotes: FootnoteState::default(),
            smartypants: backend.smartypants().map(Smartypants::new),
            pending_images: Vec::new(),
            link_stack: Vec::new(),
            title_block: None,
        }
    }

    /// Give every heading without an explicit id one slugged from its text.
    #[must_use]
    pub fn with_auto_heading_ids(mut self, enabled: bool) -> Self {
        if enabled {
            self.heading = HeadingState::new(HeadingIds::Slugged);
        }
        self
    }

    /// Render a title block before the document body.
    #[must_use]
    pub fn with_title_block(mut self, title_block: Option<String>) -> Self {
        self.title_block = title_block;
        self
    }

    /// Output buffer for inline content: the heading buffer inside headings.
    fn sink(&mut self) -> (&'b B, &mut String) {
        let out = if self.heading.is_active() {
            self.heading.html_buffer()
        } else {
            &mut self.output
        };
        (self.backend, out)
    }

    /// Render markdown events and return the finished document.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        let title_block = self.title_block.take();
        if let Some(text) = &title_block {
            self.backend.title_block(text, &mut self.output);
        }

        for event in events {
            self.process_event(event);
        }

        let body = std::mem::take(&mut self.output);
        let toc = self.heading.take_toc();
        let notes = self.footnotes.take_footnotes();

        let mut document = String::with_capacity(body.len() + 256);
        if self.backend.wants_toc() && !toc.is_empty() {
            self.backend.toc(&toc, &mut document);
        }
        document.push_str(&body);
        if !notes.is_empty() {
            self.backend.footnotes(&notes, &mut document);
        }

        let title = title_block
            .map(|text| text.replace('\n', " "))
            .or_else(|| self.heading.take_title());

        RenderResult {
            output: self.backend.finish(document, title.as_deref()),
            title,
            toc,
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            Event::Rule => self.backend.horizontal_rule(&mut self.output),
            Event::FootnoteReference(label) => self.footnote_reference(&label),
            Event::TaskListMarker(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled in the parser
            }
        }
    }

    fn reset_smartypants(&mut self) {
        if let Some(sp) = &mut self.smartypants {
            sp.reset();
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.reset_smartypants();
                self.backend.block_start(Block::Paragraph, &mut self.output);
            }
            Tag::Heading { level, id, .. } => {
                // Opening tag is written in end_tag once the id is known.
                self.reset_smartypants();
                self.heading
                    .start_heading(heading_level_to_num(level), id.map(|id| id.to_string()));
            }
            Tag::BlockQuote(_) => self.backend.block_start(Block::BlockQuote, &mut self.output),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => self.backend.list_start(start, &mut self.output),
            Tag::Item => {
                self.reset_smartypants();
                self.backend.block_start(Block::Item, &mut self.output);
            }
            Tag::FootnoteDefinition(label) => {
                self.footnotes.start_definition(&label, &mut self.output);
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self
                .backend
                .block_start(Block::DefinitionList, &mut self.output),
            Tag::DefinitionListTitle => {
                self.reset_smartypants();
                self.backend
                    .block_start(Block::DefinitionTitle, &mut self.output);
            }
            Tag::DefinitionListDefinition => {
                self.reset_smartypants();
                self.backend.block_start(Block::Definition, &mut self.output);
            }
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.backend.block_start(Block::Table, &mut self.output);
            }
            Tag::TableHead => {
                self.table.start_head();
                self.backend.block_start(Block::TableHead, &mut self.output);
            }
            Tag::TableRow => {
                self.table.start_row();
                self.backend.block_start(Block::TableRow, &mut self.output);
            }
            Tag::TableCell => {
                self.reset_smartypants();
                self.backend.table_cell_start(
                    self.table.is_in_head(),
                    self.table.current_alignment(),
                    &mut self.output,
                );
            }
            Tag::Emphasis => self.span_start(Span::Emphasis),
            Tag::Strong => self.span_start(Span::Strong),
            Tag::Strikethrough => self.span_start(Span::Strikethrough),
            Tag::Superscript => self.span_start(Span::Superscript),
            Tag::Subscript => self.span_start(Span::Subscript),
            Tag::Link {
                dest_url, title, ..
            } => {
                // Links inside alt text contribute only their text
                if !self.image.is_active() {
                    let (backend, out) = self.sink();
                    backend.link_start(&dest_url, &title, out);
                    self.link_stack.push(dest_url.to_string());
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Written in end_tag once the alt text is complete
                self.image.start();
                self.pending_images
                    .push((dest_url.to_string(), title.to_string()));
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.backend.block_end(Block::Paragraph, &mut self.output),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.heading.complete_heading() {
                    self.backend.heading(
                        heading.level,
                        heading.id.as_deref(),
                        &heading.html,
                        &mut self.output,
                    );
                }
            }
            TagEnd::BlockQuote(_) => self.backend.block_end(Block::BlockQuote, &mut self.output),
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                self.backend
                    .code_block(lang.as_deref(), &content, &mut self.output);
            }
            TagEnd::List(ordered) => self.backend.list_end(ordered, &mut self.output),
            TagEnd::Item => self.backend.block_end(Block::Item, &mut self.output),
            TagEnd::FootnoteDefinition => self.footnotes.end_definition(&mut self.output),
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self
                .backend
                .block_end(Block::DefinitionList, &mut self.output),
            TagEnd::DefinitionListTitle => self
                .backend
                .block_end(Block::DefinitionTitle, &mut self.output),
            TagEnd::DefinitionListDefinition => {
                self.backend.block_end(Block::Definition, &mut self.output);
            }
            TagEnd::Table => self.backend.block_end(Block::Table, &mut self.output),
            TagEnd::TableHead => {
                self.backend.block_end(Block::TableHead, &mut self.output);
                self.table.end_head();
            }
            TagEnd::TableRow => self.backend.block_end(Block::TableRow, &mut self.output),
            TagEnd::TableCell => {
                self.backend
                    .table_cell_end(self.table.is_in_head(), &mut self.output);
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.span_end(Span::Emphasis),
            TagEnd::Strong => self.span_end(Span::Strong),
            TagEnd::Strikethrough => self.span_end(Span::Strikethrough),
            TagEnd::Superscript => self.span_end(Span::Superscript),
            TagEnd::Subscript => self.span_end(Span::Subscript),
            TagEnd::Link => {
                if !self.image.is_active()
                    && let Some(dest) = self.link_stack.pop()
                {
                    let (backend, out) = self.sink();
                    backend.link_end(&dest, out);
                }
            }
            TagEnd::Image => {
                let pending = self.pending_images.pop();
                if let (Some(alt), Some((src, title))) = (self.image.end(), pending)
                    && !self.backend.skip_images()
                {
                    let (backend, out) = self.sink();
                    backend.image(&src, &alt, &title, out);
                }
            }
        }
    }

    fn span_start(&mut self, span: Span) {
        if !self.image.is_active() {
            let (backend, out) = self.sink();
            backend.span_start(span, out);
        }
    }

    fn span_end(&mut self, span: Span) {
        if !self.image.is_active() {
            let (backend, out) = self.sink();
            backend.span_end(span, out);
        }
    }

    fn text(&mut self, text: &str) {
        // Priority: code > image alt > heading > normal text
        if self.code.is_active() {
            self.code.push_str(text);
            return;
        }

        if self.image.is_active() {
            self.image.push_str(text);
            return;
        }

        let rendered = match &mut self.smartypants {
            Some(sp) => sp.render(text),
            None => self.backend.escape(text).into_owned(),
        };

        if self.heading.is_active() {
            self.heading.push_text(text);
        }
        let (_, out) = self.sink();
        out.push_str(&rendered);
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        let (backend, out) = self.sink();
        backend.inline_code(code, out);
    }

    fn raw_html(&mut self, html: &str) {
        if self.backend.skip_raw_html() || self.image.is_active() {
            return;
        }
        let (_, out) = self.sink();
        out.push_str(html);
    }

    fn soft_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(" ");
        }
        let (backend, out) = self.sink();
        backend.soft_break(out);
    }

    fn hard_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
            return;
        }
        let (backend, out) = self.sink();
        backend.hard_break(out);
    }

    fn footnote_reference(&mut self, label: &str) {
        let footnote = self.footnotes.reference(label);
        let (backend, out) = self.sink();
        backend.footnote_ref(&footnote.id, footnote.number, out);
    }
}
