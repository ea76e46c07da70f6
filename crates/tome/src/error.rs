//! CLI error types.

use std::io;
use std::path::PathBuf;

use tome_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("error reading from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading from stdin: {0}")]
    ReadStdin(#[source] io::Error),

    #[error("error creating {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing output: {0}")]
    Write(#[source] io::Error),

    #[error("{0}")]
    Render(#[from] RenderError),
}

impl CliError {
    /// Whether the usage text should follow the message.
    pub(crate) fn shows_usage(&self) -> bool {
        matches!(
            self,
            Self::Usage(_) | Self::Render(RenderError::UnsupportedFormat(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_path() {
        let err = CliError::Read {
            path: PathBuf::from("missing.md"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("error reading from missing.md: "));
        assert!(!err.shows_usage());
    }

    #[test]
    fn test_usage_errors_show_usage() {
        assert!(CliError::Usage("too many".to_owned()).shows_usage());
        assert!(CliError::from(RenderError::UnsupportedFormat("pdf".to_owned())).shows_usage());
    }
}
