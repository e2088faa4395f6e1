use std::path::PathBuf;

use thiserror::Error;

/// Netlist parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed input at line {line}: {message}")]
    MalformedInput { line: usize, message: String },
    #[error("No net records found in input")]
    EmptyInput,
}

impl ParseError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        ParseError::MalformedInput {
            line,
            message: message.into(),
        }
    }
}

/// Errors of the file handling around the parser
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Cannot access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("File '{path}' is {size} bytes, the limit is {limit} bytes")]
    TooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },
    #[error("No net-list file given and none remembered")]
    NoInput,
    #[error("No free backup name left for '{0}'")]
    RotationExhausted(PathBuf),
    #[error("Config decode error {0}")]
    ConfigDecode(#[from] toml::de::Error),
    #[error("Config encode error {0}")]
    ConfigEncode(#[from] toml::ser::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
