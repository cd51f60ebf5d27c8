use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{error::FetchError, ports::LocalStore};

/// Local-filesystem byte source. Relative paths resolve against the storage
/// root; absolute paths are used as-is.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl LocalStore for FsStore {
    async fn read_all(&self, path: &Path) -> Result<Vec<u8>, FetchError> {
        let resolved = self.resolve(path);
        debug!("Reading local file: {}", resolved.display());

        tokio::fs::read(&resolved)
            .await
            .map_err(|e| classify_read_error(&resolved, &e))
    }
}

fn classify_read_error(path: &Path, err: &std::io::Error) -> FetchError {
    let location = path.display().to_string();
    match err.kind() {
        ErrorKind::NotFound => FetchError::NotFound(location),
        ErrorKind::PermissionDenied => FetchError::PermissionDenied(location),
        _ => FetchError::Io(format!("{}: {}", location, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logs.csv"), b"a,b\n1,2\n").unwrap();

        let store = FsStore::new(dir.path());
        let bytes = store.read_all(Path::new("logs.csv")).await.unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");
    }

    #[test]
    fn read_errors_map_to_fetch_variants() {
        let path = Path::new("/srv/uploads/locked.xlsx");

        let denied = std::io::Error::from(ErrorKind::PermissionDenied);
        assert!(matches!(
            classify_read_error(path, &denied),
            FetchError::PermissionDenied(_)
        ));

        let missing = std::io::Error::from(ErrorKind::NotFound);
        assert!(matches!(
            classify_read_error(path, &missing),
            FetchError::NotFound(_)
        ));

        let other = std::io::Error::from(ErrorKind::TimedOut);
        assert!(matches!(classify_read_error(path, &other), FetchError::Io(_)));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        let err = store.read_all(Path::new("missing.xlsx")).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));
    }
}
