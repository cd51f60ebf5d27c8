pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::ingestion_service::IngestionService;
pub use application::source_fetcher::SourceFetcher;
pub use domain::error::{DecodeError, FetchError, IngestionError};
pub use domain::models::{
    AggregateStats, Cell, FileReference, IngestionResult, RawBytes, Sheet, SheetDetail, SheetStats,
};
