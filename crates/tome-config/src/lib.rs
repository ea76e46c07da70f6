//! Render configuration for tome.
//!
//! Translates the flat set of command-line values ([`CliSettings`]) into an
//! immutable [`RenderConfig`]:
//!
//! - boolean rendering options become [`HtmlFlags`]
//! - boolean syntax options become [`Extensions`]
//! - text and integer options become [`HtmlParams`]
//!
//! Bundle options (`common_html_flags`, `common_extensions`) are unions over
//! the individual flags, so combining them with a member flag is a no-op.

mod flags;

pub use flags::{Extension, Extensions, FlagSet, HtmlFlag, HtmlFlags};

/// Raw option values as parsed from the command line.
///
/// Text values use the empty string for "unset"; the translation turns them
/// into `None` so renderers never see an empty artifact.
#[derive(Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CliSettings {
    pub footnote_anchor_prefix: String,
    pub footnote_return_link_content: String,
    pub heading_id_prefix: String,
    pub heading_id_suffix: String,
    pub title: String,
    pub css: String,
    pub icon: String,
    pub heading_level_offset: i32,

    pub skip_html: bool,
    pub skip_images: bool,
    pub skip_links: bool,
    pub safelink: bool,
    pub nofollow_links: bool,
    pub noreferrer_links: bool,
    pub noopener_links: bool,
    pub href_target_blank: bool,
    pub complete_page: bool,
    pub footnote_return_links: bool,
    pub smartypants: bool,
    pub smartypants_fractions: bool,
    pub smartypants_dashes: bool,
    pub smartypants_latex_dashes: bool,
    pub smartypants_angled_quotes: bool,
    pub smartypants_quotes_nbsp: bool,
    pub toc: bool,
    pub common_html_flags: bool,

    pub no_intra_emphasis: bool,
    pub tables: bool,
    pub fenced_code: bool,
    pub autolink: bool,
    pub strikethrough: bool,
    pub lax_html_blocks: bool,
    pub space_headings: bool,
    pub hard_line_break: bool,
    pub tab_size_eight: bool,
    pub footnotes: bool,
    pub no_empty_line_before_blocks: bool,
    pub heading_ids: bool,
    pub titleblock: bool,
    pub auto_heading_ids: bool,
    pub backslash_line_break: bool,
    pub definition_list: bool,
    pub common_extensions: bool,
}

/// Scalar parameters for the HTML backend.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HtmlParams {
    /// Prefix inserted into footnote anchor ids.
    pub footnote_anchor_prefix: Option<String>,
    /// HTML used as the footnote return link text.
    pub footnote_return_link_contents: Option<String>,
    /// Prefix added to every heading id.
    pub heading_id_prefix: Option<String>,
    /// Suffix added to every heading id.
    pub heading_id_suffix: Option<String>,
    /// Added to each heading level, result clamped to 1..=6.
    pub heading_level_offset: i32,
    /// Document title for complete pages.
    pub title: Option<String>,
    /// Stylesheet URL for complete pages.
    pub css: Option<String>,
    /// Icon URL for complete pages.
    pub icon: Option<String>,
}

/// Immutable configuration for one conversion.
#[derive(Debug, Default, Clone)]
pub struct RenderConfig {
    pub html_flags: HtmlFlags,
    pub extensions: Extensions,
    pub params: HtmlParams,
}

impl RenderConfig {
    /// Build the configuration from raw option values.
    #[must_use]
    pub fn from_settings(settings: &CliSettings) -> Self {
        let config = Self {
            html_flags: html_flags(settings),
            extensions: extensions(settings),
            params: HtmlParams {
                footnote_anchor_prefix: non_empty(&settings.footnote_anchor_prefix),
                footnote_return_link_contents: non_empty(&settings.footnote_return_link_content),
                heading_id_prefix: non_empty(&settings.heading_id_prefix),
                heading_id_suffix: non_empty(&settings.heading_id_suffix),
                heading_level_offset: settings.heading_level_offset,
                title: non_empty(&settings.title),
                css: non_empty(&settings.css),
                icon: non_empty(&settings.icon),
            },
        };
        tracing::debug!(
            html_flags = ?config.html_flags,
            extensions = ?config.extensions,
            "Built render configuration"
        );
        config
    }
}

fn html_flags(s: &CliSettings) -> HtmlFlags {
    let mut flags = HtmlFlags::empty();
    flags.set(HtmlFlag::SkipHtml, s.skip_html);
    flags.set(HtmlFlag::SkipImages, s.skip_images);
    flags.set(HtmlFlag::SkipLinks, s.skip_links);
    flags.set(HtmlFlag::Safelink, s.safelink);
    flags.set(HtmlFlag::NofollowLinks, s.nofollow_links);
    flags.set(HtmlFlag::NoreferrerLinks, s.noreferrer_links);
    flags.set(HtmlFlag::NoopenerLinks, s.noopener_links);
    flags.set(HtmlFlag::HrefTargetBlank, s.href_target_blank);
    flags.set(HtmlFlag::CompletePage, s.complete_page);
    flags.set(HtmlFlag::FootnoteReturnLinks, s.footnote_return_links);
    flags.set(HtmlFlag::Smartypants, s.smartypants);
    flags.set(HtmlFlag::SmartypantsFractions, s.smartypants_fractions);
    flags.set(HtmlFlag::SmartypantsDashes, s.smartypants_dashes);
    flags.set(HtmlFlag::SmartypantsLatexDashes, s.smartypants_latex_dashes);
    flags.set(HtmlFlag::SmartypantsAngledQuotes, s.smartypants_angled_quotes);
    flags.set(HtmlFlag::SmartypantsQuotesNbsp, s.smartypants_quotes_nbsp);
    flags.set(HtmlFlag::Toc, s.toc);
    if s.common_html_flags {
        flags.extend_from(HtmlFlag::COMMON);
    }
    flags
}

fn extensions(s: &CliSettings) -> Extensions {
    let mut ext = Extensions::empty();
    ext.set(Extension::NoIntraEmphasis, s.no_intra_emphasis);
    ext.set(Extension::Tables, s.tables);
    ext.set(Extension::FencedCode, s.fenced_code);
    ext.set(Extension::Autolink, s.autolink);
    ext.set(Extension::Strikethrough, s.strikethrough);
    ext.set(Extension::LaxHtmlBlocks, s.lax_html_blocks);
    ext.set(Extension::SpaceHeadings, s.space_headings);
    ext.set(Extension::HardLineBreak, s.hard_line_break);
    ext.set(Extension::TabSizeEight, s.tab_size_eight);
    ext.set(Extension::Footnotes, s.footnotes);
    ext.set(Extension::NoEmptyLineBeforeBlock, s.no_empty_line_before_blocks);
    ext.set(Extension::HeadingIds, s.heading_ids);
    ext.set(Extension::Titleblock, s.titleblock);
    ext.set(Extension::AutoHeadingIds, s.auto_heading_ids);
    ext.set(Extension::BackslashLineBreak, s.backslash_line_break);
    ext.set(Extension::DefinitionLists, s.definition_list);
    if s.common_extensions {
        ext.extend_from(Extension::COMMON);
    }
    ext
}

/// Empty strings mean "unset".
fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_empty() {
        let config = RenderConfig::from_settings(&CliSettings::default());
        assert!(config.html_flags.is_empty());
        assert!(config.extensions.is_empty());
        assert_eq!(config.params, HtmlParams::default());
    }

    #[test]
    fn test_each_bool_sets_one_flag() {
        let settings = CliSettings {
            nofollow_links: true,
            toc: true,
            footnotes: true,
            ..CliSettings::default()
        };
        let config = RenderConfig::from_settings(&settings);
        assert_eq!(config.html_flags.len(), 2);
        assert!(config.html_flags.contains(HtmlFlag::NofollowLinks));
        assert!(config.html_flags.contains(HtmlFlag::Toc));
        assert_eq!(config.extensions.len(), 1);
        assert!(config.extensions.contains(Extension::Footnotes));
    }

    #[test]
    fn test_common_html_flags_superset_of_individual() {
        let individual = CliSettings {
            smartypants: true,
            smartypants_fractions: true,
            smartypants_dashes: true,
            smartypants_latex_dashes: true,
            ..CliSettings::default()
        };
        let bundle = CliSettings {
            common_html_flags: true,
            ..CliSettings::default()
        };
        let individual = RenderConfig::from_settings(&individual).html_flags;
        let bundle = RenderConfig::from_settings(&bundle).html_flags;
        assert!(bundle.is_superset(&individual));
        assert!(bundle.contains(HtmlFlag::UseXhtml));
    }

    #[test]
    fn test_bundle_plus_member_is_idempotent() {
        let bundle = CliSettings {
            common_extensions: true,
            ..CliSettings::default()
        };
        let bundle_and_member = CliSettings {
            common_extensions: true,
            tables: true,
            ..CliSettings::default()
        };
        assert_eq!(
            RenderConfig::from_settings(&bundle).extensions,
            RenderConfig::from_settings(&bundle_and_member).extensions
        );
    }

    #[test]
    fn test_bundle_unions_with_non_member() {
        let settings = CliSettings {
            common_extensions: true,
            footnotes: true,
            ..CliSettings::default()
        };
        let ext = RenderConfig::from_settings(&settings).extensions;
        assert_eq!(ext.len(), Extension::COMMON.len() + 1);
        assert!(ext.contains(Extension::Footnotes));
    }

    #[test]
    fn test_text_params_pass_through() {
        let settings = CliSettings {
            title: "Guide".to_owned(),
            css: "style.css".to_owned(),
            heading_id_prefix: "doc-".to_owned(),
            heading_level_offset: 2,
            ..CliSettings::default()
        };
        let params = RenderConfig::from_settings(&settings).params;
        assert_eq!(params.title.as_deref(), Some("Guide"));
        assert_eq!(params.css.as_deref(), Some("style.css"));
        assert_eq!(params.heading_id_prefix.as_deref(), Some("doc-"));
        assert_eq!(params.heading_level_offset, 2);
        assert_eq!(params.icon, None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("x"), Some("x".to_owned()));
    }
}
