use std::path::PathBuf;
use std::sync::Arc;

use sheet_ingestion::application::{
    ingestion_service::IngestionService, source_fetcher::SourceFetcher,
};
use sheet_ingestion::domain::models::FileReference;
use sheet_ingestion::infrastructure::{
    fs_store::FsStore, parsers::SpreadsheetDecoder, s3_adapter::S3Store,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing with debug level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sheet_ingestion=debug".parse().unwrap())
                .add_directive("aws_sdk=warn".parse().unwrap()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting spreadsheet ingestion");

    let argument = std::env::args().nth(1).ok_or(
        "usage: sheet_ingestion <local path | https://{bucket}.s3.{region}.amazonaws.com/{key}>",
    )?;

    // Object URLs get parsed; anything else is a path under the storage root.
    let reference = if argument.starts_with("https://") {
        FileReference::from_object_url(&argument)?
    } else {
        FileReference::local(PathBuf::from(argument))
    };
    debug!("Resolved reference: {:?}", reference);

    let storage_root = std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "public".to_string());
    info!("Using storage root: {}", storage_root);

    let fetcher = SourceFetcher::new(
        Arc::new(FsStore::new(storage_root)),
        Arc::new(S3Store::from_env().await),
    );
    let service = IngestionService::new(fetcher, Arc::new(SpreadsheetDecoder::new()));

    let result = service.ingest(&reference).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
