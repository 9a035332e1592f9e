use thiserror::Error;

/// Errors that can occur when decoding PLY files.
#[derive(Debug, Error)]
pub enum PlyError {
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The header could not be parsed or lacks required declarations.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    /// The declared format is not decoded by this crate (e.g. `binary_big_endian`).
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    /// A property is declared with a layout the decoder does not handle.
    #[error("Unsupported property: {0}")]
    UnsupportedProperty(String),
    /// The payload does not match what the header promises.
    #[error("Malformed body: {0}")]
    MalformedBody(String),
}

/// A specialized `Result` type for PLY operations.
pub type PlyResult<T> = Result<T, PlyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure_class() {
        let e = PlyError::UnsupportedFormat("binary_big_endian".to_string());
        assert_eq!(e.to_string(), "Unsupported format: binary_big_endian");
        let e = PlyError::MalformedBody("short".to_string());
        assert_eq!(e.to_string(), "Malformed body: short");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let e: PlyError = io.into();
        assert!(matches!(e, PlyError::Io(_)));
    }
}
