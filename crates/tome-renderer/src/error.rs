//! Error types for renderer selection.

/// Error while choosing an output renderer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Format name outside the supported set.
    #[error(
        "the output format {0} is not supported, try one of the supported formats html, xhtml or vb-code"
    )]
    UnsupportedFormat(String),
}
