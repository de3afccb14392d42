use std::sync::Arc;
use std::{io, result};

use thiserror::Error as ThisError;

/// A type alias for `Result<T, revlines::Error>`.
///
/// This result type embeds the error type in this crate.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when reading lines in reverse.
///
/// The error is cheaply cloneable so a reader can record it once and
/// re-surface the same value on every later call.
#[derive(Debug, Clone, ThisError)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    /// A crate private constructor for `Error`.
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Returns the specific type of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Unwraps this error into its underlying type.
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns `true` if this error marks the natural end of the reverse
    /// traversal rather than a failure of the underlying stream.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(*self.0, ErrorKind::EndOfStream)
    }
}

/// The specific type of an error.
///
/// This list might grow over time and it is not recommended to
/// exhaustively match against it.
#[derive(Debug, Clone, ThisError)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Represents an I/O error.
    ///
    /// Can occur when seeking or reading the underlying byte stream.
    #[error("{0}")]
    Io(Arc<io::Error>),
    /// The traversal has reached the start of the stream and every line
    /// has already been returned.
    #[error("end of stream")]
    EndOfStream,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::new(ErrorKind::Io(Arc::new(err)))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        io::Error::new(io::ErrorKind::Other, err)
    }
}
