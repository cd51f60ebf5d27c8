use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::{
    error::FetchError,
    models::{FileReference, RawBytes},
    ports::{LocalStore, ObjectStore},
};

/// Resolves a `FileReference` to its raw bytes by dispatching on the backend
/// variant. Exactly one fetch attempt per call; no retries.
pub struct SourceFetcher {
    local_store: Arc<dyn LocalStore>,
    object_store: Arc<dyn ObjectStore>,
}

impl SourceFetcher {
    pub fn new(local_store: Arc<dyn LocalStore>, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            local_store,
            object_store,
        }
    }

    pub async fn fetch(&self, reference: &FileReference) -> Result<RawBytes, FetchError> {
        let file_name = reference.file_name();

        let bytes = match reference {
            FileReference::Local { path } => {
                debug!("Fetching from local storage: {}", path.display());
                self.local_store.read_all(path).await.map_err(|e| {
                    error!("Local fetch failed for {}: {}", path.display(), e);
                    e
                })?
            }
            FileReference::ObjectStorage { bucket, key } => {
                debug!("Fetching from object storage: s3://{}/{}", bucket, key);
                self.object_store.get_object(bucket, key).await.map_err(|e| {
                    error!("Object fetch failed for s3://{}/{}: {}", bucket, key, e);
                    e
                })?
            }
        };

        info!("Fetched {} ({} bytes)", file_name, bytes.len());
        Ok(RawBytes::new(file_name, bytes))
    }
}
