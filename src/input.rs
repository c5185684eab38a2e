//! Where the report comes from: a named file or piped stdin.
use crate::extract;
use crate::report::BenchResult;
use std::io::{BufReader, IsTerminal};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
pub enum InputError {
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Stdin {
        source: std::io::Error,
    },
    /// No `--file` given and stdin is an interactive terminal.
    NoInput,
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Open { path, source } => {
                write!(f, "failed to open {}: {source}", path.display())
            }
            InputError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            InputError::Stdin { source } => write!(f, "failed to read input from pipe: {source}"),
            InputError::NoInput => {
                write!(f, "no input from pipe and no file specified with -f")
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::Open { source, .. }
            | InputError::Read { source, .. }
            | InputError::Stdin { source } => Some(source),
            InputError::NoInput => None,
        }
    }
}

/// Pick the input source. A file always wins; stdin is only used when
/// something is piped into it.
pub fn resolve_source(
    file: Option<&Path>,
    stdin_is_terminal: bool,
) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(path.to_path_buf())),
        None if stdin_is_terminal => Err(InputError::NoInput),
        None => Ok(InputSource::Stdin),
    }
}

/// [`resolve_source`] against the real process stdin.
pub fn detect_source(file: Option<&Path>) -> Result<InputSource, InputError> {
    resolve_source(file, std::io::stdin().is_terminal())
}

/// Read and parse the whole report from `source`.
pub fn read_report(source: &InputSource) -> Result<BenchResult, InputError> {
    match source {
        InputSource::File(path) => read_file(path),
        InputSource::Stdin => {
            tracing::debug!("reading report from stdin");
            extract::parse_reader(std::io::stdin().lock())
                .map_err(|e| InputError::Stdin { source: e })
        }
    }
}

fn read_file(path: &Path) -> Result<BenchResult, InputError> {
    tracing::debug!(path = %path.display(), "reading report file");
    let file = std::fs::File::open(path).map_err(|e| InputError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    extract::parse_reader(BufReader::new(file)).map_err(|e| InputError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}
