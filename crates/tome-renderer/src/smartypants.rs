//! Typographic substitution for HTML text.
//!
//! Converts straight quotes, dashes, ellipses, symbols and simple fractions
//! into HTML entities while escaping the rest of the text. Quote direction
//! is decided from the characters on either side and carries over between
//! consecutive text runs of the same block.

/// Which substitutions are enabled beyond the basic set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SmartypantsOptions {
    /// Any `n/d` becomes `<sup>n</sup>&frasl;<sub>d</sub>`.
    pub fractions: bool,
    /// Dash substitution.
    pub dashes: bool,
    /// `--` is an en dash and `---` an em dash.
    pub latex_dashes: bool,
    /// Double quotes become `&laquo;`/`&raquo;`.
    pub angled_quotes: bool,
    /// `&nbsp;` between double quotes and the quoted text.
    pub quotes_nbsp: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Context {
    /// Start or end of the text run.
    Edge,
    Space,
    Punct,
    Word,
}

impl Context {
    fn of(c: Option<char>) -> Self {
        match c {
            None => Self::Edge,
            Some(c) if c.is_whitespace() => Self::Space,
            Some(c) if c.is_ascii_punctuation() => Self::Punct,
            Some(_) => Self::Word,
        }
    }

    fn is_boundary(self) -> bool {
        self != Self::Word
    }
}

/// Stateful substitution over the text runs of a document.
pub(crate) struct Smartypants {
    options: SmartypantsOptions,
    /// Last character of the previous run in the same block.
    prev: Option<char>,
    double_open: bool,
    single_open: bool,
}

impl Smartypants {
    pub(crate) fn new(options: SmartypantsOptions) -> Self {
        Self {
            options,
            prev: None,
            double_open: false,
            single_open: false,
        }
    }

    /// Forget the preceding context at a block boundary.
    pub(crate) fn reset(&mut self) {
        self.prev = None;
    }

    /// Substitute and escape one text run.
    pub(crate) fn render(&mut self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len() + 16);
        let mut i = 0;

        while i < chars.len() {
            let prev = if i == 0 { self.prev } else { Some(chars[i - 1]) };
            let rest = &chars[i..];
            let consumed = match rest[0] {
                '"' => {
                    self.double_quote(prev, rest.get(1).copied(), &mut out);
                    1
                }
                '\'' => {
                    self.single_quote(prev, rest.get(1).copied(), &mut out);
                    1
                }
                '(' => substitute(symbol(rest), '(', &mut out),
                '.' => substitute(ellipsis(rest), '.', &mut out),
                '-' if self.options.dashes => substitute(self.dash(prev, rest), '-', &mut out),
                '0'..='9' if Context::of(prev).is_boundary() => {
                    let fraction = if self.options.fractions {
                        generic_fraction(rest)
                    } else {
                        common_fraction(rest).map(|(entity, len)| (entity.to_owned(), len))
                    };
                    match fraction {
                        Some((html, len)) => {
                            out.push_str(&html);
                            len
                        }
                        None => {
                            out.push(rest[0]);
                            1
                        }
                    }
                }
                '&' => push_str(&mut out, "&amp;"),
                '<' => push_str(&mut out, "&lt;"),
                '>' => push_str(&mut out, "&gt;"),
                c => {
                    out.push(c);
                    1
                }
            };
            i += consumed;
        }

        if let Some(&last) = chars.last() {
            self.prev = Some(last);
        }
        out
    }

    fn double_quote(&mut self, prev: Option<char>, next: Option<char>, out: &mut String) {
        let open = opens(Context::of(prev), Context::of(next), self.double_open);
        self.double_open = open;
        let (open_entity, close_entity) = if self.options.angled_quotes {
            ("&laquo;", "&raquo;")
        } else {
            ("&ldquo;", "&rdquo;")
        };
        match (open, self.options.quotes_nbsp) {
            (true, true) => {
                out.push_str(open_entity);
                out.push_str("&nbsp;");
            }
            (true, false) => out.push_str(open_entity),
            (false, true) => {
                out.push_str("&nbsp;");
                out.push_str(close_entity);
            }
            (false, false) => out.push_str(close_entity),
        }
    }

    fn single_quote(&mut self, prev: Option<char>, next: Option<char>, out: &mut String) {
        let open = opens(Context::of(prev), Context::of(next), self.single_open);
        self.single_open = open;
        out.push_str(if open { "&lsquo;" } else { "&rsquo;" });
    }

    fn dash(&self, prev: Option<char>, rest: &[char]) -> Option<(&'static str, usize)> {
        if self.options.latex_dashes {
            return match rest {
                ['-', '-', '-', ..] => Some(("&mdash;", 3)),
                ['-', '-', ..] => Some(("&ndash;", 2)),
                _ => None,
            };
        }
        match rest {
            ['-', '-', ..] => Some(("&mdash;", 2)),
            ['-', next, ..]
                if Context::of(prev).is_boundary() && Context::of(Some(*next)).is_boundary() =>
            {
                Some(("&ndash;", 1))
            }
            _ => None,
        }
    }
}

/// Decide whether a quote opens, given its neighbours.
fn opens(prev: Context, next: Context, was_open: bool) -> bool {
    use Context::{Edge, Punct, Space, Word};
    match (prev, next) {
        (Edge, Edge) => !was_open,
        (Space, Edge | Punct) | (Edge | Space | Punct, Word) => true,
        (_, Edge | Space | Punct) | (Word, Word) => false,
    }
}

fn push_str(out: &mut String, s: &str) -> usize {
    out.push_str(s);
    1
}

/// Write the entity if matched, otherwise the literal character.
fn substitute(found: Option<(&str, usize)>, literal: char, out: &mut String) -> usize {
    match found {
        Some((entity, len)) => {
            out.push_str(entity);
            len
        }
        None => {
            out.push(literal);
            1
        }
    }
}

fn symbol(rest: &[char]) -> Option<(&'static str, usize)> {
    let lower: Vec<char> = rest
        .iter()
        .take(4)
        .map(char::to_ascii_lowercase)
        .collect();
    match lower.as_slice() {
        ['(', 'c', ')', ..] => Some(("&copy;", 3)),
        ['(', 'r', ')', ..] => Some(("&reg;", 3)),
        ['(', 't', 'm', ')'] => Some(("&trade;", 4)),
        _ => None,
    }
}

fn ellipsis(rest: &[char]) -> Option<(&'static str, usize)> {
    match rest {
        ['.', '.', '.', ..] => Some(("&hellip;", 3)),
        ['.', ' ', '.', ' ', '.', ..] => Some(("&hellip;", 5)),
        _ => None,
    }
}

/// `1/2`, `1/4`, `3/4` (and `3/4ths`).
fn common_fraction(rest: &[char]) -> Option<(&'static str, usize)> {
    let after = |n: usize| Context::of(rest.get(n).copied()).is_boundary();
    match rest {
        ['1', '/', '2', ..] if after(3) => Some(("&frac12;", 3)),
        ['1', '/', '4', ..] if after(3) => Some(("&frac14;", 3)),
        ['3', '/', '4', 't' | 'T', 'h' | 'H', ..] => Some(("&frac34;", 3)),
        ['3', '/', '4', ..] if after(3) => Some(("&frac34;", 3)),
        _ => None,
    }
}

/// Any `digits/digits` followed by a boundary.
fn generic_fraction(rest: &[char]) -> Option<(String, usize)> {
    let numerator = rest.iter().take_while(|c| c.is_ascii_digit()).count();
    if rest.get(numerator) != Some(&'/') {
        return None;
    }
    let denominator = rest[numerator + 1..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if denominator == 0 {
        return None;
    }
    let end = numerator + 1 + denominator;
    if !Context::of(rest.get(end).copied()).is_boundary() {
        return None;
    }
    let num: String = rest[..numerator].iter().collect();
    let den: String = rest[numerator + 1..end].iter().collect();
    Some((format!("<sup>{num}</sup>&frasl;<sub>{den}</sub>"), end))
}
