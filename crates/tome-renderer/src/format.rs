//! Output format names and renderer selection.

use std::fmt;
use std::str::FromStr;

use tome_config::{HtmlFlag, RenderConfig};

use crate::error::RenderError;
use crate::html::HtmlBackend;
use crate::vbcode::VbCodeBackend;

/// Supported output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Xhtml,
    VbCode,
}

impl OutputFormat {
    /// All formats, in the order they are listed to users.
    pub const ALL: &'static [OutputFormat] = &[Self::Html, Self::Xhtml, Self::VbCode];

    /// Name accepted on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Xhtml => "xhtml",
            Self::VbCode => "vb-code",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| RenderError::UnsupportedFormat(s.to_owned()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A configured renderer for one output format.
#[derive(Clone, Debug)]
pub enum Renderer {
    Html(HtmlBackend),
    Xhtml(HtmlBackend),
    VbCode(VbCodeBackend),
}

impl Renderer {
    /// Select and configure the renderer for a format name.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedFormat`] if `format` is not one of
    /// `html`, `xhtml` or `vb-code`.
    pub fn select(format: &str, config: &RenderConfig) -> Result<Self, RenderError> {
        let renderer = match format.parse::<OutputFormat>()? {
            OutputFormat::Html => Self::Html(HtmlBackend::new(
                config.html_flags.clone(),
                config.params.clone(),
            )),
            OutputFormat::Xhtml => Self::Xhtml(HtmlBackend::new(
                config.html_flags.clone().with(HtmlFlag::UseXhtml),
                config.params.clone(),
            )),
            OutputFormat::VbCode => Self::VbCode(VbCodeBackend),
        };
        tracing::debug!(format = %renderer.format(), "Selected renderer");
        Ok(renderer)
    }

    /// The format this renderer produces.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Html(_) => OutputFormat::Html,
            Self::Xhtml(_) => OutputFormat::Xhtml,
            Self::VbCode(_) => OutputFormat::VbCode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tome_config::CliSettings;

    fn config() -> RenderConfig {
        RenderConfig::from_settings(&CliSettings::default())
    }

    #[test]
    fn test_every_supported_name_selects() {
        for format in OutputFormat::ALL {
            let renderer = Renderer::select(format.name(), &config()).unwrap();
            assert_eq!(renderer.format(), *format);
        }
    }

    #[test]
    fn test_unknown_format_is_named_in_error() {
        let err = Renderer::select("pdf", &config()).unwrap_err();
        assert!(matches!(&err, RenderError::UnsupportedFormat(name) if name == "pdf"));
        assert!(err.to_string().contains("pdf"));
    }

    #[test]
    fn test_format_names_are_case_sensitive() {
        assert!("HTML".parse::<OutputFormat>().is_err());
        assert!("".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_xhtml_forces_xhtml_flag() {
        let Renderer::Xhtml(backend) = Renderer::select("xhtml", &config()).unwrap() else {
            panic!("expected xhtml renderer");
        };
        assert!(backend.flags().contains(HtmlFlag::UseXhtml));
    }

    #[test]
    fn test_html_keeps_flags_as_given() {
        let Renderer::Html(backend) = Renderer::select("html", &config()).unwrap() else {
            panic!("expected html renderer");
        };
        assert!(!backend.flags().contains(HtmlFlag::UseXhtml));

        let settings = CliSettings {
            common_html_flags: true,
            ..CliSettings::default()
        };
        let config = RenderConfig::from_settings(&settings);
        let Renderer::Html(backend) = Renderer::select("html", &config).unwrap() else {
            panic!("expected html renderer");
        };
        assert!(backend.flags().contains(HtmlFlag::UseXhtml));
    }

    #[test]
    fn test_display_round_trips_name() {
        assert_eq!(OutputFormat::VbCode.to_string(), "vb-code");
    }
}
