//! Event-stream filters applied between the parser and the renderer.

use std::collections::VecDeque;
use std::ops::Range;

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};

/// URL prefixes recognised in plain text.
const URL_PREFIXES: &[&str] = &["https://", "http://", "ftp://", "www."];

/// Trailing characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '"', '\''];

/// Turn soft line breaks into hard ones when `enabled`.
pub(crate) fn hard_line_breaks<'a, I>(events: I, enabled: bool) -> impl Iterator<Item = Event<'a>>
where
    I: Iterator<Item = Event<'a>>,
{
    events.map(move |event| match event {
        Event::SoftBreak if enabled => Event::HardBreak,
        other => other,
    })
}

/// Undoes parser choices that depend on the source text.
///
/// Without `backslash_breaks`, a backslash before a newline stays a literal
/// backslash followed by a soft break. With `no_intra_emphasis`, `*` runs
/// touching a letter or digit on either side are kept as literal text.
pub(crate) struct SourceFixups<'a, I> {
    inner: I,
    source: &'a str,
    no_intra_emphasis: bool,
    backslash_breaks: bool,
    /// Closing marker for each open emphasis span, when it was made literal.
    spans: Vec<Option<&'a str>>,
    pending: Option<Event<'a>>,
}

impl<'a, I> SourceFixups<'a, I>
where
    I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
    pub(crate) fn new(
        inner: I,
        source: &'a str,
        no_intra_emphasis: bool,
        backslash_breaks: bool,
    ) -> Self {
        Self {
            inner,
            source,
            no_intra_emphasis,
            backslash_breaks,
            spans: Vec::new(),
            pending: None,
        }
    }

    fn inside_word(&self, range: &Range<usize>) -> bool {
        let before = self.source[..range.start].chars().next_back();
        let after = self.source[range.end..].chars().next();
        before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric)
    }

    /// Opening and closing markers of an emphasis span, if it is intra-word.
    fn literal_markers(&self, range: &Range<usize>, len: usize) -> Option<(&'a str, &'a str)> {
        let source = self.source;
        if !self.no_intra_emphasis || !self.inside_word(range) {
            return None;
        }
        let open = source.get(range.start..range.start + len)?;
        let close = source.get(range.end.checked_sub(len)?..range.end)?;
        Some((open, close))
    }
}

impl<'a, I> Iterator for SourceFixups<'a, I>
where
    I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }
        let (event, range) = self.inner.next()?;
        match event {
            Event::HardBreak
                if !self.backslash_breaks && self.source[range.start..].starts_with('\\') =>
            {
                self.pending = Some(Event::SoftBreak);
                Some(Event::Text(CowStr::Borrowed("\\")))
            }
            Event::Start(Tag::Emphasis | Tag::Strong) => {
                let len = if matches!(event, Event::Start(Tag::Strong)) { 2 } else { 1 };
                match self.literal_markers(&range, len) {
                    Some((open, close)) => {
                        self.spans.push(Some(close));
                        Some(Event::Text(CowStr::Borrowed(open)))
                    }
                    None => {
                        self.spans.push(None);
                        Some(event)
                    }
                }
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong) => match self.spans.pop().flatten() {
                Some(close) => Some(Event::Text(CowStr::Borrowed(close))),
                None => Some(event),
            },
            other => Some(other),
        }
    }
}

/// Wraps bare URLs in text with link events.
///
/// Text inside links, images and code blocks is left alone. Expects merged
/// text events so a URL is never split across two of them.
pub(crate) struct Autolinks<'a, I> {
    inner: I,
    enabled: bool,
    /// Depth of links/images/code blocks we're inside.
    suppress: usize,
    pending: VecDeque<Event<'a>>,
}

impl<'a, I> Autolinks<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub(crate) fn new(inner: I, enabled: bool) -> Self {
        Self {
            inner,
            enabled,
            suppress: 0,
            pending: VecDeque::new(),
        }
    }

    fn split_text(&mut self, text: &str) {
        let mut rest = text;
        while let Some((start, end)) = find_url(rest) {
            if start > 0 {
                self.push_text(&rest[..start]);
            }
            let url = &rest[start..end];
            let dest = if url.starts_with("www.") {
                format!("http://{url}")
            } else {
                url.to_owned()
            };
            self.pending.push_back(Event::Start(Tag::Link {
                link_type: LinkType::Autolink,
                dest_url: CowStr::from(dest),
                title: CowStr::Borrowed(""),
                id: CowStr::Borrowed(""),
            }));
            self.push_text(url);
            self.pending.push_back(Event::End(TagEnd::Link));
            rest = &rest[end..];
        }
        if !rest.is_empty() {
            self.push_text(rest);
        }
    }

    fn push_text(&mut self, text: &str) {
        self.pending
            .push_back(Event::Text(CowStr::from(text.to_owned())));
    }
}

impl<'a, I> Iterator for Autolinks<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        let event = self.inner.next()?;
        if !self.enabled {
            return Some(event);
        }
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                self.suppress += 1;
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                self.suppress = self.suppress.saturating_sub(1);
            }
            Event::Text(text) if self.suppress == 0 && find_url(text).is_some() => {
                let text = text.to_string();
                self.split_text(&text);
                return self.pending.pop_front();
            }
            _ => {}
        }
        Some(event)
    }
}

/// Byte range of the first URL in `text`.
fn find_url(text: &str) -> Option<(usize, usize)> {
    let mut search_from = 0;
    loop {
        let (start, prefix) = URL_PREFIXES
            .iter()
            .filter_map(|prefix| {
                text[search_from..]
                    .find(prefix)
                    .map(|pos| (search_from + pos, *prefix))
            })
            .min_by_key(|(pos, _)| *pos)?;

        let preceded_by_word = text[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        let end = url_end(text, start);

        if !preceded_by_word && end > start + prefix.len() {
            return Some((start, end));
        }
        search_from = start + prefix.len();
    }
}

/// End of a URL starting at `start`, with trailing punctuation trimmed.
fn url_end(text: &str, start: usize) -> usize {
    let raw = text[start..]
        .find(|c: char| c.is_whitespace() || c == '<')
        .map_or(text.len(), |len| start + len);
    let mut url = &text[start..raw];
    loop {
        let trimmed = url.trim_end_matches(TRAILING_PUNCTUATION);
        let trimmed = if trimmed.ends_with(')')
            && trimmed.matches(')').count() > trimmed.matches('(').count()
        {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };
        if trimmed.len() == url.len() {
            break;
        }
        url = trimmed;
    }
    start + url.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Parser, TextMergeStream};

    fn fixed(markdown: &str, no_intra_emphasis: bool, backslash_breaks: bool) -> Vec<Event<'_>> {
        let events = Parser::new(markdown).into_offset_iter();
        TextMergeStream::new(SourceFixups::new(
            events,
            markdown,
            no_intra_emphasis,
            backslash_breaks,
        ))
        .collect()
    }

    fn link_dests(markdown: &str) -> Vec<String> {
        Autolinks::new(TextMergeStream::new(Parser::new(markdown)), true)
            .filter_map(|event| match event {
                Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_find_url_trims_punctuation() {
        let text = "see https://example.com/a.";
        let (start, end) = find_url(text).unwrap();
        assert_eq!(&text[start..end], "https://example.com/a");
    }

    #[test]
    fn test_find_url_balances_parens() {
        let text = "(https://en.wikipedia.org/wiki/Rust_(language))";
        let (start, end) = find_url(text).unwrap();
        assert_eq!(
            &text[start..end],
            "https://en.wikipedia.org/wiki/Rust_(language)"
        );
    }

    #[test]
    fn test_find_url_needs_word_boundary() {
        assert_eq!(find_url("xhttp://nope"), None);
        assert_eq!(find_url("http://"), None);
    }

    #[test]
    fn test_autolink_bare_urls() {
        assert_eq!(
            link_dests("Visit https://example.com or www.rust-lang.org today"),
            ["https://example.com", "http://www.rust-lang.org"]
        );
    }

    #[test]
    fn test_autolink_skips_existing_links_and_code() {
        assert_eq!(
            link_dests("[https://a.example](https://b.example)\n\n    https://c.example\n"),
            ["https://b.example"]
        );
    }

    #[test]
    fn test_autolink_disabled_passes_through() {
        let count = Autolinks::new(Parser::new("https://example.com"), false)
            .filter(|e| matches!(e, Event::Start(Tag::Link { .. })))
            .count();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_hard_line_breaks() {
        let events: Vec<_> = hard_line_breaks(Parser::new("a\nb"), true).collect();
        assert!(events.contains(&Event::HardBreak));
        assert!(!events.contains(&Event::SoftBreak));

        let events: Vec<_> = hard_line_breaks(Parser::new("a\nb"), false).collect();
        assert!(events.contains(&Event::SoftBreak));
    }

    #[test]
    fn test_intra_word_emphasis_kept_literal() {
        let events = fixed("foo*bar*baz and **x**y", true, true);
        assert!(!events.iter().any(|e| matches!(e, Event::Start(Tag::Emphasis | Tag::Strong))));
        assert!(events.contains(&Event::Text(CowStr::from("foo*bar*baz and **x**y"))));
    }

    #[test]
    fn test_word_bounded_emphasis_still_applies() {
        let events = fixed("a *b* c", true, true);
        assert!(events.contains(&Event::Start(Tag::Emphasis)));

        let events = fixed("foo*bar*baz", false, true);
        assert!(events.contains(&Event::Start(Tag::Emphasis)));
    }

    #[test]
    fn test_backslash_break_needs_extension() {
        let events = fixed("a\\\nb", false, false);
        assert!(!events.contains(&Event::HardBreak));
        assert_eq!(
            events[1..4],
            [
                Event::Text(CowStr::from("a\\")),
                Event::SoftBreak,
                Event::Text(CowStr::from("b")),
            ]
        );

        let events = fixed("a\\\nb", false, true);
        assert!(events.contains(&Event::HardBreak));
    }

    #[test]
    fn test_trailing_space_break_unaffected() {
        let events = fixed("a  \nb", false, false);
        assert!(events.contains(&Event::HardBreak));
    }
}
