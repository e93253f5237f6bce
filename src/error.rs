use std::path::PathBuf;

/// Broad classification of a [`LogSinkError`].
///
/// `Type` and `Value` are validation failures raised before anything is
/// created on disk or attached to a channel. `Io` failures happen while
/// opening or rotating files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An option holds the wrong kind of value (e.g. a string where an
    /// integer is required).
    Type,
    /// An option has the right kind of value but an illegal one.
    Value,
    /// A filesystem operation failed.
    Io,
    /// Internal failure that should not happen with valid input.
    Internal,
}

/// Errors that can occur when configuring channels and sinks.
#[derive(Debug, thiserror::Error)]
pub enum LogSinkError {
    #[error("Option '{option}' must be {expected}, found {found}")]
    Type {
        option: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Invalid value for option '{option}': {reason}")]
    Value { option: String, reason: String },
    #[error("Failed to create directory '{0}': {1}")]
    CreateDirectoryFailed(PathBuf, String),
    #[error("Failed to create file '{0}': {1}")]
    CreateFileFailed(PathBuf, String),
    #[error("Failed to rename file from '{from}' to '{to}': {error}")]
    RenameFileError { from: PathBuf, to: PathBuf, error: String },
    #[error("File IO error: {0}")]
    FileIOError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl LogSinkError {
    pub(crate) fn type_mismatch(option: &str, expected: &'static str, found: &'static str) -> Self {
        LogSinkError::Type {
            option: option.to_string(),
            expected,
            found,
        }
    }

    pub(crate) fn invalid_value(option: &str, reason: impl Into<String>) -> Self {
        LogSinkError::Value {
            option: option.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LogSinkError::Type { .. } => ErrorKind::Type,
            LogSinkError::Value { .. } => ErrorKind::Value,
            LogSinkError::CreateDirectoryFailed(..)
            | LogSinkError::CreateFileFailed(..)
            | LogSinkError::RenameFileError { .. }
            | LogSinkError::FileIOError(_) => ErrorKind::Io,
            LogSinkError::InternalError(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_classified() {
        assert_eq!(LogSinkError::type_mismatch("level", "an integer", "a string").kind(), ErrorKind::Type);
        assert_eq!(LogSinkError::invalid_value("interval", "must be at least 1").kind(), ErrorKind::Value);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(LogSinkError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn messages_name_the_option() {
        let err = LogSinkError::type_mismatch("format", "a string", "an integer");
        assert_eq!(err.to_string(), "Option 'format' must be a string, found an integer");
        let err = LogSinkError::invalid_value("rotation_unit", "'SS' is not a rotation unit");
        assert_eq!(
            err.to_string(),
            "Invalid value for option 'rotation_unit': 'SS' is not a rotation unit"
        );
    }
}
