use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during a search run.
///
/// Only a root-level [`SearchError::PathUnreadable`] or an invalid
/// configuration aborts a run; every other failure is reported and skipped
/// so that partial results are always preferred over none.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("cannot read {path}: {source}")]
    PathUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn path_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathUnreadable {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let err = SearchError::path_unreadable(
            Path::new("test.txt"),
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert!(matches!(err, SearchError::PathUnreadable { .. }));

        let err = SearchError::config_error("bad thread count");
        assert!(matches!(err, SearchError::ConfigError(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::path_unreadable(
            Path::new("test.txt"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "cannot read test.txt: denied");

        let err = SearchError::config_error("thread count must be between 1 and 8");
        assert_eq!(
            err.to_string(),
            "configuration error: thread count must be between 1 and 8"
        );
    }
}
