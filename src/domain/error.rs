use thiserror::Error;

/// Failures while resolving a `FileReference` to bytes. One fetch attempt per
/// call; retry policy belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("source not found: {0}")]
    NotFound(String),
    #[error("permission denied reading source: {0}")]
    PermissionDenied(String),
    #[error("object storage authentication failed: {0}")]
    Auth(String),
    #[error("invalid object reference: {0}")]
    InvalidReference(String),
    #[error("i/o failure fetching source: {0}")]
    Io(String),
}

/// Failures while turning raw bytes into sheets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("corrupt or unrecognized workbook: {0}")]
    CorruptFormat(String),
    #[error("unsupported workbook format: {0}")]
    UnsupportedFormat(String),
}

/// Caller-facing envelope; the variant tags which stage failed. A failed
/// ingestion never carries partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    #[error("fetch stage failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("decode stage failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("workbook contains no non-empty sheets")]
    EmptyWorkbook,
}
