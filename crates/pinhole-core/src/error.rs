use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("code not found: {0}")]
    NotFound(String),
    #[error("code collision: {0}")]
    DuplicateCode(String),
    /// One or more log lines could not be parsed during replay.
    ///
    /// This is recoverable: the valid lines are still loaded.
    #[error("invalid format: {count} corrupt log line(s): {}", .lines.join("\n"))]
    InvalidFormat { count: usize, lines: Vec<String> },
    #[error("log i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("record serialization failed: {0}")]
    Serialization(String),
    #[error("store state lock is poisoned")]
    Poisoned,
}

impl StoreError {
    /// Returns `true` for the conditions a caller should report as a plain
    /// negative result rather than a server failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_lists_every_line() {
        let err = StoreError::InvalidFormat {
            count: 2,
            lines: vec!["{bad".to_string(), "nope".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "invalid format: 2 corrupt log line(s): {bad\nnope"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(!err.is_not_found());
    }
}
