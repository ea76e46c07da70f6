//! Whole-document conversion from markdown bytes to rendered bytes.

use std::borrow::Cow;

use pulldown_cmark::{Options, Parser, TextMergeStream};
use tome_config::{Extension, Extensions};

use crate::backend::RenderBackend;
use crate::filter::{Autolinks, SourceFixups, hard_line_breaks};
use crate::format::Renderer;
use crate::preprocess::{expand_tabs, split_title_block};
use crate::renderer::MarkdownRenderer;

/// Parser options each extension turns on.
const PARSER_OPTIONS: &[(Extension, Options)] = &[
    (Extension::Tables, Options::ENABLE_TABLES),
    (Extension::Strikethrough, Options::ENABLE_STRIKETHROUGH),
    (Extension::Footnotes, Options::ENABLE_FOOTNOTES),
    (Extension::HeadingIds, Options::ENABLE_HEADING_ATTRIBUTES),
    (Extension::DefinitionLists, Options::ENABLE_DEFINITION_LIST),
];

/// Convert a markdown document with the given renderer and extensions.
///
/// Input that is not valid UTF-8 is decoded lossily.
#[must_use]
pub fn convert(input: &[u8], renderer: &Renderer, extensions: &Extensions) -> Vec<u8> {
    let text = String::from_utf8_lossy(input);
    let text = if extensions.contains(Extension::TabSizeEight) {
        Cow::Owned(expand_tabs(&text, 8))
    } else {
        text
    };
    let (title_block, markdown) = if extensions.contains(Extension::Titleblock) {
        split_title_block(&text)
    } else {
        (None, &*text)
    };

    let output = match renderer {
        Renderer::Html(backend) | Renderer::Xhtml(backend) => {
            render(backend, markdown, title_block, extensions)
        }
        Renderer::VbCode(backend) => render(backend, markdown, title_block, extensions),
    };
    tracing::debug!(
        format = %renderer.format(),
        input_bytes = input.len(),
        output_bytes = output.len(),
        "Converted document"
    );
    output.into_bytes()
}

fn render<B: RenderBackend>(
    backend: &B,
    markdown: &str,
    title_block: Option<String>,
    extensions: &Extensions,
) -> String {
    let parser = Parser::new_ext(markdown, parser_options(extensions)).into_offset_iter();
    let parser = SourceFixups::new(
        parser,
        markdown,
        extensions.contains(Extension::NoIntraEmphasis),
        extensions.contains(Extension::BackslashLineBreak),
    );
    let events = Autolinks::new(
        hard_line_breaks(
            TextMergeStream::new(parser),
            extensions.contains(Extension::HardLineBreak),
        ),
        extensions.contains(Extension::Autolink),
    );
    MarkdownRenderer::new(backend)
        .with_auto_heading_ids(extensions.contains(Extension::AutoHeadingIds))
        .with_title_block(title_block)
        .render(events)
        .output
}

fn parser_options(extensions: &Extensions) -> Options {
    PARSER_OPTIONS
        .iter()
        .filter(|(extension, _)| extensions.contains(*extension))
        .fold(Options::empty(), |options, (_, option)| options | *option)
}
