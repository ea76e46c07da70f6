//! Command-line options.
//!
//! Every option is declared once here. Long options also accept a single
//! leading dash (`-format xhtml`, `-toc`), see [`normalize_args`]. Boolean
//! options take an optional `=true` or `=false`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser};
use tome_config::CliSettings;

/// Markdown processor producing HTML, XHTML or vBulletin markup.
///
/// Reads from INPUTFILE (or stdin) and writes to OUTPUTFILE (or stdout).
#[derive(Debug, Parser)]
#[command(name = "tome", version, about)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) render: RenderArgs,

    #[command(flatten)]
    pub(crate) extensions: ExtensionArgs,

    /// Enable verbose output (info-level logs on stderr).
    #[arg(short, long)]
    pub(crate) verbose: bool,

    /// [inputfile [outputfile]]
    #[arg(value_name = "FILE")]
    pub(crate) files: Vec<PathBuf>,
}

/// Output format, rendering flags and page parameters.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
#[command(next_help_heading = "Rendering")]
pub(crate) struct RenderArgs {
    /// Format of the output (html, xhtml, vb-code).
    #[arg(long, default_value = "html")]
    pub(crate) format: String,

    /// Prefix for footnote anchor ids.
    #[arg(long, default_value = "")]
    footnote_anchor_prefix: String,

    /// HTML for footnote return links (default `<sup>[return]</sup>`).
    #[arg(long, default_value = "")]
    footnote_return_link_content: String,

    /// Prefix for heading ids.
    #[arg(long, default_value = "")]
    heading_id_prefix: String,

    /// Suffix for heading ids.
    #[arg(long, default_value = "")]
    heading_id_suffix: String,

    /// Page title for --complete-page.
    #[arg(long, default_value = "")]
    title: String,

    /// Stylesheet URL for --complete-page.
    #[arg(long, default_value = "")]
    css: String,

    /// Icon URL for --complete-page.
    #[arg(long, default_value = "")]
    icon: String,

    /// Added to every heading level (result kept within 1-6).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    heading_level_offset: i32,

    /// Drop raw HTML.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    skip_html: bool,

    /// Drop images.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    skip_images: bool,

    /// Render links as plain text.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    skip_links: bool,

    /// Only render links with safe protocols.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    safelink: bool,

    /// Add rel="nofollow" to absolute links.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    nofollow_links: bool,

    /// Add rel="noreferrer" to absolute links.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    noreferrer_links: bool,

    /// Add rel="noopener" to absolute links.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    noopener_links: bool,

    /// Add target="_blank" to absolute links.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    href_target_blank: bool,

    /// Wrap the output in a complete HTML page.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    complete_page: bool,

    /// Add return links to footnotes.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    footnote_return_links: bool,

    /// Typographic quotes, dashes and symbols.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    smartypants: bool,

    /// Render any n/d as a fraction.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    smartypants_fractions: bool,

    /// Render -- and spaced - as dashes.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    smartypants_dashes: bool,

    /// Render --- as em dash and -- as en dash.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    smartypants_latex_dashes: bool,

    /// Use angled double quotes.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    smartypants_angled_quotes: bool,

    /// Put non-breaking spaces inside double quotes.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    smartypants_quotes_nbsp: bool,

    /// Emit a table of contents before the document.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    toc: bool,

    /// XHTML output with smartypants fractions and dashes.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    common_html_flags: bool,
}

/// Markdown syntax extensions.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
#[command(next_help_heading = "Extensions")]
pub(crate) struct ExtensionArgs {
    /// Ignore emphasis markers inside words.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    no_intra_emphasis: bool,

    /// Parse pipe tables.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    tables: bool,

    /// Parse fenced code blocks.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    fenced_code: bool,

    /// Turn bare URLs into links.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    autolink: bool,

    /// Parse ~~strikethrough~~.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    strikethrough: bool,

    /// Loosen HTML block parsing.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    lax_html_blocks: bool,

    /// Require a space after heading markers.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    space_headings: bool,

    /// Turn every newline into a line break.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    hard_line_break: bool,

    /// Expand tabs to eight columns.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    tab_size_eight: bool,

    /// Parse footnotes.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    footnotes: bool,

    /// Allow blocks without a preceding blank line.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    no_empty_line_before_blocks: bool,

    /// Parse {#id} heading attributes.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    heading_ids: bool,

    /// Parse a leading % title block.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    titleblock: bool,

    /// Generate heading ids from heading text.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    auto_heading_ids: bool,

    /// Treat a trailing backslash as a line break.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    backslash_line_break: bool,

    /// Parse definition lists.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    definition_list: bool,

    /// Enable the common extension set.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    common_extensions: bool,
}

impl Cli {
    /// Raw option values for the configuration layer.
    pub(crate) fn settings(&self) -> CliSettings {
        let r = &self.render;
        let e = &self.extensions;
        CliSettings {
            footnote_anchor_prefix: r.footnote_anchor_prefix.clone(),
            footnote_return_link_content: r.footnote_return_link_content.clone(),
            heading_id_prefix: r.heading_id_prefix.clone(),
            heading_id_suffix: r.heading_id_suffix.clone(),
            title: r.title.clone(),
            css: r.css.clone(),
            icon: r.icon.clone(),
            heading_level_offset: r.heading_level_offset,

            skip_html: r.skip_html,
            skip_images: r.skip_images,
            skip_links: r.skip_links,
            safelink: r.safelink,
            nofollow_links: r.nofollow_links,
            noreferrer_links: r.noreferrer_links,
            noopener_links: r.noopener_links,
            href_target_blank: r.href_target_blank,
            complete_page: r.complete_page,
            footnote_return_links: r.footnote_return_links,
            smartypants: r.smartypants,
            smartypants_fractions: r.smartypants_fractions,
            smartypants_dashes: r.smartypants_dashes,
            smartypants_latex_dashes: r.smartypants_latex_dashes,
            smartypants_angled_quotes: r.smartypants_angled_quotes,
            smartypants_quotes_nbsp: r.smartypants_quotes_nbsp,
            toc: r.toc,
            common_html_flags: r.common_html_flags,

            no_intra_emphasis: e.no_intra_emphasis,
            tables: e.tables,
            fenced_code: e.fenced_code,
            autolink: e.autolink,
            strikethrough: e.strikethrough,
            lax_html_blocks: e.lax_html_blocks,
            space_headings: e.space_headings,
            hard_line_break: e.hard_line_break,
            tab_size_eight: e.tab_size_eight,
            footnotes: e.footnotes,
            no_empty_line_before_blocks: e.no_empty_line_before_blocks,
            heading_ids: e.heading_ids,
            titleblock: e.titleblock,
            auto_heading_ids: e.auto_heading_ids,
            backslash_line_break: e.backslash_line_break,
            definition_list: e.definition_list,
            common_extensions: e.common_extensions,
        }
    }
}

/// Rewrite single-dash long options (`-format`) to their `--` form.
///
/// Short options (`-v`), negative numbers and everything after `--` are
/// left untouched.
pub(crate) fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.to_str() {
                Some(s) if is_single_dash_long(s) => OsString::from(format!("-{s}")),
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    arg.strip_prefix('-').is_some_and(|rest| {
        rest.len() > 1 && rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["tome"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(normalize_args(argv)).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.render.format, "html");
        assert!(cli.files.is_empty());
        assert!(!cli.verbose);

        let settings = cli.settings();
        assert_eq!(settings.heading_level_offset, 0);
        assert_eq!(settings.title, "");
        assert!(!settings.toc);
        assert!(!settings.common_extensions);
    }

    #[test]
    fn test_single_dash_long_options() {
        let cli = parse(&["-format", "xhtml", "-toc", "-tables", "in.md", "out.html"]);
        assert_eq!(cli.render.format, "xhtml");
        let settings = cli.settings();
        assert!(settings.toc);
        assert!(settings.tables);
        assert_eq!(
            cli.files,
            [PathBuf::from("in.md"), PathBuf::from("out.html")]
        );
    }

    #[test]
    fn test_double_dash_and_equals_forms() {
        let cli = parse(&["--format=vb-code", "-title=Doc", "--heading-level-offset", "-2"]);
        assert_eq!(cli.render.format, "vb-code");
        let settings = cli.settings();
        assert_eq!(settings.title, "Doc");
        assert_eq!(settings.heading_level_offset, -2);
    }

    #[test]
    fn test_every_flag_maps_to_its_setting() {
        let settings = parse(&[
            "-common-html-flags",
            "-common-extensions",
            "-no-empty-line-before-blocks",
            "-definition-list",
            "-smartypants-quotes-nbsp",
            "-footnote-return-link-content",
            "back",
        ])
        .settings();
        assert!(settings.common_html_flags);
        assert!(settings.common_extensions);
        assert!(settings.no_empty_line_before_blocks);
        assert!(settings.definition_list);
        assert!(settings.smartypants_quotes_nbsp);
        assert_eq!(settings.footnote_return_link_content, "back");
    }

    #[test]
    fn test_normalize_args() {
        let args = normalize_args(["tome", "-v", "-toc", "-", "-5", "--", "-notaflag"]);
        assert_eq!(
            args,
            ["tome", "-v", "--toc", "-", "-5", "--", "-notaflag"]
                .map(OsString::from)
                .to_vec()
        );
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(normalize_args(["tome", "-bogus"])).is_err());
    }

    #[test]
    fn test_verbose_flag() {
        assert!(parse(&["-v"]).verbose);
        assert!(parse(&["--verbose"]).verbose);
        assert!(parse(&["-verbose"]).verbose);
    }

    #[test]
    fn test_boolean_flags_take_explicit_values() {
        let settings = parse(&["-toc=false", "-tables=true", "--safelink", "in.md"]).settings();
        assert!(!settings.toc);
        assert!(settings.tables);
        assert!(settings.safelink);

        let cli = parse(&["-toc", "in.md"]);
        assert!(cli.settings().toc);
        assert_eq!(cli.files, [PathBuf::from("in.md")]);

        assert!(Cli::try_parse_from(normalize_args(["tome", "-toc=maybe"])).is_err());
    }
}
