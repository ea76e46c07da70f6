//! Per-document rendering state.
//!
//! The renderer keeps one of each of these while walking the event stream.
//! None of them know about output formats.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::Alignment;

/// Code block being collected.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    /// Fence language, if any.
    language: Option<String>,
    /// Raw block text.
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// Finish the block, returning its language and text.
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Position inside a table.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    /// One entry per column.
    alignments: Vec<Alignment>,
    /// Column of the cell being rendered.
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Alignment of the current cell.
    pub(crate) fn current_alignment(&self) -> Alignment {
        self.alignments
            .get(self.cell_index)
            .copied()
            .unwrap_or(Alignment::None)
    }
}

/// Alt text capture for images.
#[derive(Default)]
pub(crate) struct ImageState {
    /// Nesting depth; images may appear inside image alt text.
    depth: usize,
    /// Buffer for alt text.
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        if self.depth == 0 {
            self.alt_text.clear();
        }
        self.depth += 1;
    }

    /// End image capture. Returns the alt text once the outermost image closes.
    pub(crate) fn end(&mut self) -> Option<String> {
        self.depth = self.depth.saturating_sub(1);
        (self.depth == 0).then(|| std::mem::take(&mut self.alt_text))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6) as written in the source.
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Heading id the entry links to.
    pub id: String,
}

/// How headings without an explicit id get one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum HeadingIds {
    /// No generated ids.
    #[default]
    None,
    /// `toc_N` ids, used when a table of contents needs anchors.
    Numbered,
    /// Ids slugged from the heading text.
    Slugged,
}

/// A heading ready to be written.
pub(crate) struct CompletedHeading {
    pub(crate) level: u8,
    pub(crate) id: Option<String>,
    pub(crate) html: String,
}

/// State for tracking headings, title extraction and table of contents.
#[derive(Default)]
pub(crate) struct HeadingState {
    ids: HeadingIds,
    /// Text of the first H1.
    title: Option<String>,
    /// Current heading level being processed (None if not in a heading).
    current_level: Option<u8>,
    /// Explicit `{#id}` of the current heading.
    explicit_id: Option<String>,
    /// Buffer for heading plain text (for table of contents and slug).
    text: String,
    /// Buffer for heading markup (with inline formatting).
    html: String,
    toc: Vec<TocEntry>,
    /// Number of headings seen so far.
    count: usize,
    /// Counter for generating unique heading IDs.
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn new(ids: HeadingIds) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    /// Check if we're currently inside any heading.
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    /// Start tracking a heading.
    pub(crate) fn start_heading(&mut self, level: u8, explicit_id: Option<String>) {
        self.current_level = Some(level);
        self.explicit_id = explicit_id.filter(|id| !id.is_empty());
        self.text.clear();
        self.html.clear();
    }

    /// Complete heading and record its table of contents entry.
    pub(crate) fn complete_heading(&mut self) -> Option<CompletedHeading> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        self.count += 1;

        if level == 1 && self.title.is_none() {
            self.title = Some(text.trim().to_owned());
        }

        let id = match (self.explicit_id.take(), self.ids) {
            (Some(id), _) => {
                *self.id_counts.entry(id.clone()).or_default() += 1;
                Some(id)
            }
            (None, HeadingIds::Slugged) => Some(self.generate_id(&text)),
            (None, HeadingIds::Numbered) => Some(format!("toc_{}", self.count - 1)),
            (None, HeadingIds::None) => None,
        };

        if let Some(id) = &id {
            self.toc.push(TocEntry {
                level,
                title: text.trim().to_owned(),
                id: id.clone(),
            });
        }

        Some(CompletedHeading {
            level,
            id,
            html: html.trim().to_owned(),
        })
    }

    /// Generate a unique ID for a heading.
    fn generate_id(&mut self, text: &str) -> String {
        let base_id = slugify(text);
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take().filter(|t| !t.is_empty())
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// A footnote definition in reference order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footnote {
    /// Anchor-safe form of the footnote label.
    pub id: String,
    /// 1-based number, assigned by first reference.
    pub number: usize,
    /// Rendered body of the definition.
    pub content: String,
}

/// A referenced footnote: its number and anchor id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FootnoteRef {
    pub(crate) number: usize,
    pub(crate) id: String,
}

/// State for collecting footnote references and definitions.
///
/// Labels match case-insensitively with whitespace runs collapsed, the way
/// the parser pairs references with definitions.
#[derive(Default)]
pub(crate) struct FootnoteState {
    /// Normalized label -> number and id, assigned on first reference.
    refs: HashMap<String, FootnoteRef>,
    /// Anchor ids handed out so far.
    used_ids: HashSet<String>,
    /// Normalized label -> rendered definition body.
    definitions: HashMap<String, String>,
    /// Label of the definition being captured.
    current: Option<String>,
    /// Document output saved while a definition is captured.
    saved_output: String,
}

impl FootnoteState {
    /// Number and id for a reference, assigning the next ones on first use.
    pub(crate) fn reference(&mut self, label: &str) -> FootnoteRef {
        let key = normalize_label(label);
        if let Some(existing) = self.refs.get(&key) {
            return existing.clone();
        }
        let number = self.refs.len() + 1;
        let id = self.unique_id(&slugify(label), number);
        let footnote = FootnoteRef { number, id };
        self.refs.insert(key, footnote.clone());
        footnote
    }

    /// Slug made unique among earlier footnotes; the number when empty.
    fn unique_id(&mut self, slug: &str, number: usize) -> String {
        let base = if slug.is_empty() {
            number.to_string()
        } else {
            slug.to_owned()
        };
        let mut id = base.clone();
        let mut n = 1;
        while self.used_ids.contains(&id) {
            id = format!("{base}-{n}");
            n += 1;
        }
        self.used_ids.insert(id.clone());
        id
    }

    /// Begin capturing a definition. The current output is parked until
    /// [`end_definition`](Self::end_definition).
    pub(crate) fn start_definition(&mut self, label: &str, output: &mut String) {
        self.current = Some(normalize_label(label));
        self.saved_output = std::mem::take(output);
    }

    /// Finish capturing and restore the document output.
    pub(crate) fn end_definition(&mut self, output: &mut String) {
        let content = std::mem::replace(output, std::mem::take(&mut self.saved_output));
        if let Some(label) = self.current.take() {
            // First definition of a label wins
            self.definitions.entry(label).or_insert(content);
        }
    }

    /// Referenced footnotes that have a definition, ordered by number.
    pub(crate) fn take_footnotes(&mut self) -> Vec<Footnote> {
        self.used_ids.clear();
        let mut notes: Vec<Footnote> = self
            .refs
            .drain()
            .filter_map(|(label, footnote)| {
                self.definitions.remove(&label).map(|content| Footnote {
                    id: footnote.id,
                    number: footnote.number,
                    content,
                })
            })
            .collect();
        notes.sort_by_key(|note| note.number);
        notes
    }
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Lowercase anchor id for a piece of text.
///
/// Letters and digits are kept, runs of whitespace, `-` and `_` collapse to
/// one dash, and everything else is dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }
    slug
}

/// Escape text for HTML content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("Don't Panic!"), "dont-panic");
        assert_eq!(slugify("  padded - title  "), "padded-title");
        assert_eq!(slugify("tab\tand__under"), "tab-and-under");
        assert_eq!(slugify("?!"), "");
        assert_eq!(slugify("Ärger"), "ärger");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("1 < 2 && 3 > 2"), "1 &lt; 2 &amp;&amp; 3 &gt; 2");
        assert_eq!(escape_html(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_html("o'clock"), "o&#x27;clock");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_table_state_alignment() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::Right]);
        state.start_head();
        assert!(state.is_in_head());
        assert_eq!(state.current_alignment(), Alignment::Left);
        state.next_cell();
        assert_eq!(state.current_alignment(), Alignment::Right);
        state.next_cell();
        assert_eq!(state.current_alignment(), Alignment::None);
        state.end_head();
        assert!(!state.is_in_head());
    }

    #[test]
    fn test_nested_image_alt_returned_once() {
        let mut state = ImageState::default();
        state.start();
        state.push_str("outer ");
        state.start();
        state.push_str("inner");
        assert_eq!(state.end(), None);
        assert!(state.is_active());
        assert_eq!(state.end(), Some("outer inner".to_owned()));
        assert!(!state.is_active());
    }

    #[test]
    fn test_heading_without_ids() {
        let mut state = HeadingState::new(HeadingIds::None);
        state.start_heading(1, None);
        state.push_text("Title");
        state.html_buffer().push_str("Title");
        let heading = state.complete_heading().unwrap();
        assert_eq!(heading.level, 1);
        assert_eq!(heading.id, None);
        assert_eq!(state.take_title(), Some("Title".to_owned()));
        assert!(state.take_toc().is_empty());
    }

    #[test]
    fn test_slugged_ids_are_unique() {
        let mut state = HeadingState::new(HeadingIds::Slugged);
        let mut ids = Vec::new();
        for _ in 0..3 {
            state.start_heading(2, None);
            state.push_text("FAQ");
            ids.push(state.complete_heading().unwrap().id.unwrap());
        }
        assert_eq!(ids, ["faq", "faq-1", "faq-2"]);
        assert_eq!(state.take_toc().len(), 3);
    }

    #[test]
    fn test_explicit_id_wins() {
        let mut state = HeadingState::new(HeadingIds::Slugged);
        state.start_heading(2, Some("custom".to_owned()));
        state.push_text("Something");
        assert_eq!(
            state.complete_heading().unwrap().id.as_deref(),
            Some("custom")
        );
    }

    #[test]
    fn test_numbered_ids() {
        let mut state = HeadingState::new(HeadingIds::Numbered);
        state.start_heading(1, None);
        assert_eq!(state.complete_heading().unwrap().id.as_deref(), Some("toc_0"));
        state.start_heading(2, None);
        assert_eq!(state.complete_heading().unwrap().id.as_deref(), Some("toc_1"));
    }

    #[test]
    fn test_footnotes_ordered_by_first_reference() {
        let mut state = FootnoteState::default();
        assert_eq!(state.reference("b").number, 1);
        assert_eq!(state.reference("a").number, 2);
        assert_eq!(state.reference("b").number, 1);

        let mut output = String::from("body");
        for label in ["a", "b", "unused"] {
            state.start_definition(label, &mut output);
            output.push_str(label);
            state.end_definition(&mut output);
        }
        assert_eq!(output, "body");

        let notes = state.take_footnotes();
        let labels: Vec<_> = notes.iter().map(|n| (n.number, n.content.as_str())).collect();
        assert_eq!(labels, [(1, "b"), (2, "a")]);
    }

    #[test]
    fn test_footnote_labels_match_case_insensitively() {
        let mut state = FootnoteState::default();
        let first = state.reference("Big  Note");
        assert_eq!(state.reference("big note"), first);

        let mut output = String::new();
        state.start_definition("BIG NOTE", &mut output);
        output.push_str("body");
        state.end_definition(&mut output);

        let notes = state.take_footnotes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "big-note");
        assert_eq!(notes[0].content, "body");
    }

    #[test]
    fn test_footnote_ids_are_unique_and_never_empty() {
        let mut state = FootnoteState::default();
        assert_eq!(state.reference("a b").id, "a-b");
        assert_eq!(state.reference("a-b").id, "a-b-1");
        assert_eq!(state.reference("*").id, "3");
        assert_eq!(state.reference("a b").id, "a-b");
    }
}
