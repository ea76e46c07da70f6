//! Read, convert, write.
//!
//! The number of positional arguments decides where input comes from and
//! where output goes:
//!
//! | Positionals | Input  | Output      |
//! |-------------|--------|-------------|
//! | 0           | stdin  | stdout      |
//! | 1           | file 1 | stdout      |
//! | 2           | file 1 | file 2      |
//! | more        | usage error, nothing read |

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tome_config::{CliSettings, RenderConfig};
use tome_renderer::{Renderer, convert};

use crate::error::CliError;

/// Where the markdown comes from.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Source<'a> {
    Stdin,
    File(&'a Path),
}

/// Where the rendered document goes.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Sink<'a> {
    Stdout,
    File(&'a Path),
}

/// Route positional arguments to an input source and output sink.
pub(crate) fn route(files: &[PathBuf]) -> Result<(Source<'_>, Sink<'_>), CliError> {
    match files {
        [] => Ok((Source::Stdin, Sink::Stdout)),
        [input] => Ok((Source::File(input), Sink::Stdout)),
        [input, output] => Ok((Source::File(input), Sink::File(output))),
        _ => Err(CliError::Usage(format!(
            "expected at most 2 arguments [inputfile [outputfile]], got {}",
            files.len()
        ))),
    }
}

/// Run one conversion.
///
/// `stdin` and `stdout` are only touched when no input file, respectively
/// no output file, is given.
pub(crate) fn run<R: Read, W: Write>(
    format: &str,
    settings: &CliSettings,
    files: &[PathBuf],
    stdin: R,
    stdout: W,
) -> Result<(), CliError> {
    let config = RenderConfig::from_settings(settings);
    let renderer = Renderer::select(format, &config)?;
    let (source, sink) = route(files)?;

    let input = read_input(&source, stdin)?;
    tracing::info!(bytes = input.len(), source = ?source, "Read input");

    let output = convert(&input, &renderer, &config.extensions);

    write_output(&sink, stdout, &output)?;
    tracing::info!(bytes = output.len(), sink = ?sink, "Wrote output");
    Ok(())
}

fn read_input<R: Read>(source: &Source<'_>, mut stdin: R) -> Result<Vec<u8>, CliError> {
    match source {
        Source::Stdin => {
            let mut input = Vec::new();
            stdin
                .read_to_end(&mut input)
                .map_err(CliError::ReadStdin)?;
            Ok(input)
        }
        Source::File(path) => fs::read(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_output<W: Write>(sink: &Sink<'_>, mut stdout: W, output: &[u8]) -> Result<(), CliError> {
    match sink {
        Sink::Stdout => {
            stdout.write_all(output).map_err(CliError::Write)?;
            stdout.flush().map_err(CliError::Write)
        }
        Sink::File(path) => {
            let file = File::create(path).map_err(|source| CliError::Create {
                path: path.to_path_buf(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            writer.write_all(output).map_err(CliError::Write)?;
            writer.flush().map_err(CliError::Write)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;
    use tempfile::TempDir;
    use tome_renderer::RenderError;

    /// Stdin that must never be read.
    struct UnreadStdin;

    impl Read for UnreadStdin {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            panic!("stdin must not be read");
        }
    }

    fn settings() -> CliSettings {
        CliSettings::default()
    }

    fn write_input(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("input.md");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_route_by_positional_count() {
        let a = PathBuf::from("a.md");
        let b = PathBuf::from("b.html");
        assert_eq!(route(&[]).unwrap(), (Source::Stdin, Sink::Stdout));
        assert_eq!(
            route(std::slice::from_ref(&a)).unwrap(),
            (Source::File(&a), Sink::Stdout)
        );
        assert_eq!(
            route(&[a.clone(), b.clone()]).unwrap(),
            (Source::File(&a), Sink::File(&b))
        );
        assert!(matches!(
            route(&[a.clone(), b, a]),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn test_stdin_to_stdout() {
        let mut stdout = Vec::new();
        run(
            "html",
            &settings(),
            &[],
            "# Hello\n\nWorld\n".as_bytes(),
            &mut stdout,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "<h1>Hello</h1>\n<p>World</p>\n"
        );
    }

    #[test]
    fn test_file_to_stdout() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "*hi*\n");
        let mut stdout = Vec::new();
        run("html", &settings(), &[input], UnreadStdin, &mut stdout).unwrap();
        assert_eq!(String::from_utf8(stdout).unwrap(), "<p><em>hi</em></p>\n");
    }

    #[test]
    fn test_file_to_file_leaves_stdout_empty() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "# Hello\n\nWorld\n");
        let output = dir.path().join("out.txt");
        let mut stdout = Vec::new();
        run(
            "vb-code",
            &settings(),
            &[input, output.clone()],
            UnreadStdin,
            &mut stdout,
        )
        .unwrap();
        assert!(stdout.is_empty());
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, "[size=6][b]Hello[/b][/size]\n\nWorld\n\n");
    }

    #[test]
    fn test_output_file_is_truncated() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "new\n");
        let output = dir.path().join("out.html");
        fs::write(&output, "old content that is longer than the new one").unwrap();
        run(
            "html",
            &settings(),
            &[input, output.clone()],
            UnreadStdin,
            io::sink(),
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "<p>new</p>\n");
    }

    #[test]
    fn test_too_many_arguments_reads_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "text\n");
        let output = dir.path().join("out.html");
        let extra = dir.path().join("extra.html");
        let mut stdout = Vec::new();
        let err = run(
            "html",
            &settings(),
            &[input, output.clone(), extra.clone()],
            UnreadStdin,
            &mut stdout,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert!(!output.exists());
        assert!(!extra.exists());
        assert!(stdout.is_empty());
    }

    #[test]
    fn test_unsupported_format_creates_no_output() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "text\n");
        let output = dir.path().join("out.html");
        let err = run(
            "pdf",
            &settings(),
            &[input, output.clone()],
            UnreadStdin,
            io::sink(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Render(RenderError::UnsupportedFormat(ref name)) if name == "pdf"
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.md");
        let output = dir.path().join("out.html");
        let err = run(
            "html",
            &settings(),
            &[missing.clone(), output.clone()],
            UnreadStdin,
            io::sink(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Read { ref path, .. } if *path == missing));
        assert!(!output.exists());
    }

    #[test]
    fn test_unwritable_output() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "text\n");
        let output = dir.path().join("no-such-dir").join("out.html");
        let err = run(
            "html",
            &settings(),
            &[input, output],
            UnreadStdin,
            io::sink(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Create { .. }));
    }

    #[test]
    fn test_settings_reach_renderer() {
        let settings = CliSettings {
            complete_page: true,
            title: "My Page".to_owned(),
            ..CliSettings::default()
        };
        let mut stdout = Vec::new();
        run("xhtml", &settings, &[], "text\n".as_bytes(), &mut stdout).unwrap();
        let page = String::from_utf8(stdout).unwrap();
        assert!(page.contains("<title>My Page</title>"));
        assert!(page.contains("xmlns=\"http://www.w3.org/1999/xhtml\""));
    }
}
