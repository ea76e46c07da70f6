//! Named flag sets for rendering and parser toggles.
//!
//! Toggles are kept as sets of enum variants rather than bitmasks. The
//! renderer converts [`Extensions`] into the parser's bitmask at the
//! engine boundary.

use std::collections::BTreeSet;
use std::fmt;

/// Rendering toggle for the HTML backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HtmlFlag {
    /// Drop raw HTML blocks and inline HTML.
    SkipHtml,
    /// Drop images.
    SkipImages,
    /// Render links as plain `<tt>` text.
    SkipLinks,
    /// Only link to known-safe destinations.
    Safelink,
    /// Add `rel="nofollow"` to absolute links.
    NofollowLinks,
    /// Add `rel="noreferrer"` to absolute links.
    NoreferrerLinks,
    /// Add `rel="noopener"` to absolute links.
    NoopenerLinks,
    /// Add `target="_blank"` to absolute links.
    HrefTargetBlank,
    /// Wrap the output in a full HTML document.
    CompletePage,
    /// Add a return link to each footnote.
    FootnoteReturnLinks,
    /// Typographic substitution (quotes, ellipsis, symbols).
    Smartypants,
    /// Any `n/d` becomes a typeset fraction.
    SmartypantsFractions,
    /// Dash substitution.
    SmartypantsDashes,
    /// LaTeX-style dashes (`--` en dash, `---` em dash).
    SmartypantsLatexDashes,
    /// Angled (French) double quotes.
    SmartypantsAngledQuotes,
    /// Non-breaking spaces inside angled quotes.
    SmartypantsQuotesNbsp,
    /// Emit a table of contents before the body.
    Toc,
    /// Self-closing void elements and XHTML doctype.
    UseXhtml,
}

impl HtmlFlag {
    /// Flags enabled by `--common-html-flags`.
    pub const COMMON: &'static [HtmlFlag] = &[
        HtmlFlag::UseXhtml,
        HtmlFlag::Smartypants,
        HtmlFlag::SmartypantsFractions,
        HtmlFlag::SmartypantsDashes,
        HtmlFlag::SmartypantsLatexDashes,
    ];
}

/// Parser extension toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Extension {
    NoIntraEmphasis,
    Tables,
    FencedCode,
    Autolink,
    Strikethrough,
    LaxHtmlBlocks,
    SpaceHeadings,
    HardLineBreak,
    TabSizeEight,
    Footnotes,
    NoEmptyLineBeforeBlock,
    /// Explicit `{#id}` heading attributes.
    HeadingIds,
    /// Pandoc-style `%` title block.
    Titleblock,
    /// Heading ids generated from heading text.
    AutoHeadingIds,
    BackslashLineBreak,
    DefinitionLists,
}

impl Extension {
    /// Extensions enabled by `--common-extensions`.
    pub const COMMON: &'static [Extension] = &[
        Extension::NoIntraEmphasis,
        Extension::Tables,
        Extension::FencedCode,
        Extension::Autolink,
        Extension::Strikethrough,
        Extension::SpaceHeadings,
        Extension::HeadingIds,
        Extension::BackslashLineBreak,
        Extension::DefinitionLists,
    ];
}

/// Ordered set of named flags.
///
/// Insertion is idempotent, so enabling a bundle and one of its members
/// yields the same set as enabling the bundle alone.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FlagSet<F: Ord> {
    flags: BTreeSet<F>,
}

/// Rendering flags for the HTML backend.
pub type HtmlFlags = FlagSet<HtmlFlag>;

/// Parser extension flags.
pub type Extensions = FlagSet<Extension>;

impl<F: Ord + Copy> FlagSet<F> {
    /// Create an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            flags: BTreeSet::new(),
        }
    }

    /// Add a single flag.
    pub fn insert(&mut self, flag: F) {
        self.flags.insert(flag);
    }

    /// Add a flag when `enabled` is set.
    pub fn set(&mut self, flag: F, enabled: bool) {
        if enabled {
            self.insert(flag);
        }
    }

    /// Add every flag of a bundle.
    pub fn extend_from(&mut self, bundle: &[F]) {
        self.flags.extend(bundle.iter().copied());
    }

    /// Return a copy with `flag` added.
    #[must_use]
    pub fn with(mut self, flag: F) -> Self {
        self.insert(flag);
        self
    }

    #[must_use]
    pub fn contains(&self, flag: F) -> bool {
        self.flags.contains(&flag)
    }

    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        self.flags.is_superset(&other.flags)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Iterate flags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        self.flags.iter().copied()
    }
}

impl<F: Ord + Copy> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: Ord + Copy> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

impl<F: Ord + fmt::Debug> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.flags.iter()).finish()
    }
}
