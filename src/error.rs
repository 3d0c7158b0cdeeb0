//! Error taxonomy shared by the engine, the cache and the collaborators.

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, ReorgError>;

#[derive(Debug, thiserror::Error)]
pub enum ReorgError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{0}")]
    BadRequest(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// A filesystem action failed part-way through a batch. Items before `index`
    /// have already been applied.
    #[error(
        "Item {index} failed ({} -> {}): {error}",
        .source_path.display(),
        .destination.display()
    )]
    Action {
        index: usize,
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        error: Box<ReorgError>,
    },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("{0}")]
    Internal(String),
}

/// Coarse classification used by callers that need to map failures onto a
/// transport (exit codes, HTTP statuses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    BadRequest,
    UpstreamFailure,
    IoFailure,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::PermissionDenied => 403,
            Self::BadRequest => 400,
            Self::UpstreamFailure | Self::IoFailure | Self::Internal => 500,
        }
    }
}

impl ReorgError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Upstream(_) => ErrorKind::UpstreamFailure,
            Self::Action { .. } | Self::Io { .. } => ErrorKind::IoFailure,
            Self::Cache(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Classify an `io::Error` raised while touching `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io { path: path.to_path_buf(), source },
        }
    }
}

/// Attach a path to an `io::Result`.
pub trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|err| ReorgError::from_io(path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_taxonomy() {
        let path = Path::new("/tmp/x");
        let err = ReorgError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = ReorgError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(err.kind().status_code(), 403);

        let err = ReorgError::from_io(path, io::Error::other("disk full"));
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }

    #[test]
    fn action_error_names_the_failing_item() {
        let err = ReorgError::Action {
            index: 2,
            source_path: PathBuf::from("/r/a.txt"),
            destination: PathBuf::from("/r/sub/b.txt"),
            error: Box::new(ReorgError::PermissionDenied(PathBuf::from("/r/sub"))),
        };
        let msg = err.to_string();
        assert!(msg.contains("Item 2"));
        assert!(msg.contains("/r/a.txt"));
        assert!(msg.contains("/r/sub/b.txt"));
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }
}
