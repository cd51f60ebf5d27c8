use std::path::Path;

use async_trait::async_trait;

use crate::domain::{
    error::{DecodeError, FetchError},
    models::{RawBytes, Sheet},
};

#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn read_all(&self, path: &Path) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError>;
}

/// Decoding is CPU-bound and never suspends, so this port stays synchronous.
pub trait WorkbookDecoder: Send + Sync {
    fn decode(&self, raw: &RawBytes) -> Result<Vec<Sheet>, DecodeError>;
}
