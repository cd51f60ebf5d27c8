pub mod ingestion_service;
pub mod source_fetcher;
pub mod stats;
