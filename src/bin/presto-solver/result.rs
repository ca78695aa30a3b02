use thiserror::Error;

use presto_solver::model::ParseMachineError;

pub(crate) type PrestoResult<T> = Result<T, PrestoError>;

#[derive(Error, Debug)]
pub(crate) enum PrestoError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Failed to read file {1}, more details: {0}")]
    FileReadingError(std::io::Error, String),
    #[error("line {line}: {source}")]
    InvalidInstance {
        line: usize,
        source: ParseMachineError,
    },
}
