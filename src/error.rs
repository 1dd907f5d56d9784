//! Error types for terrakit

use std::fmt;
use std::io;

/// Result type for terrakit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an operation on the whole file
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Unreadable or non-conforming input file
    MalformedInput(String),

    /// Geo-key directory length is not a multiple of 4
    MalformedGeoKeyDirectory { length: usize },

    /// Reader was already disposed
    UseAfterDispose,

    /// Directory index outside the file's directory sequence
    DirectoryOutOfBounds { index: usize, count: usize },

    /// A per-directory failure surfaced through a single-directory call
    Directory(DirectoryError),
}

/// Per-directory failures; the batch operation records these as failed
/// slots and continues with the remaining directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Pixel format classification matched no supported rule
    UnsupportedPixelFormat(String),

    /// Projection code outside every known UTM range
    UnresolvedProjection { code: u32 },

    /// The projected bounding box could not be computed
    SectorComputation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            Error::MalformedGeoKeyDirectory { length } => {
                write!(f, "Malformed geo-key directory: length {} is not a multiple of 4", length)
            }
            Error::UseAfterDispose => write!(f, "Reader used after dispose"),
            Error::DirectoryOutOfBounds { index, count } => {
                write!(f, "Directory index {} out of bounds (file has {})", index, count)
            }
            Error::Directory(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::UnsupportedPixelFormat(msg) => {
                write!(f, "Unsupported pixel format: {}", msg)
            }
            DirectoryError::UnresolvedProjection { code } => {
                write!(f, "Unresolved projection code: {}", code)
            }
            DirectoryError::SectorComputation(msg) => {
                write!(f, "Sector computation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Directory(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for DirectoryError {}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<DirectoryError> for Error {
    fn from(error: DirectoryError) -> Self {
        Error::Directory(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MalformedInput("empty directory list".to_string());
        assert_eq!(err.to_string(), "Malformed input: empty directory list");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_geo_key_directory_length() {
        let err = Error::MalformedGeoKeyDirectory { length: 33 };
        assert!(err.to_string().contains("33"));
    }

    #[test]
    fn test_directory_error_display() {
        let err = DirectoryError::UnresolvedProjection { code: 99999 };
        assert!(err.to_string().contains("Unresolved projection"));
    }

    #[test]
    fn test_directory_error_wraps() {
        let err: Error = DirectoryError::UnsupportedPixelFormat("64-bit float".to_string()).into();
        assert!(matches!(err, Error::Directory(_)));
    }
}
