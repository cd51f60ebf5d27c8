use std::sync::Arc;

use tracing::{debug, error, info};

use crate::application::{
    source_fetcher::SourceFetcher,
    stats::{compute_stats, reduce},
};
use crate::domain::{
    error::IngestionError,
    models::{FileReference, IngestionResult, SheetDetail},
    ports::WorkbookDecoder,
};

/// The only entry point callers invoke: fetch, decode, per-sheet stats,
/// reduce. Every stage failure short-circuits and surfaces unmodified; no
/// stage is retried here.
pub struct IngestionService {
    fetcher: SourceFetcher,
    decoder: Arc<dyn WorkbookDecoder>,
}

impl IngestionService {
    pub fn new(fetcher: SourceFetcher, decoder: Arc<dyn WorkbookDecoder>) -> Self {
        Self { fetcher, decoder }
    }

    pub async fn ingest(
        &self,
        reference: &FileReference,
    ) -> Result<IngestionResult, IngestionError> {
        info!("Starting ingestion: {:?}", reference);

        debug!("Step 1: Fetching source bytes");
        let raw = self.fetcher.fetch(reference).await?;

        debug!("Step 2: Decoding workbook: {}", raw.file_name);
        let sheets = self.decoder.decode(&raw).map_err(|e| {
            error!("Failed to decode {}: {}", raw.file_name, e);
            e
        })?;
        info!(
            "Decoded {} non-empty sheets from {}",
            sheets.len(),
            raw.file_name
        );

        debug!("Step 3: Computing per-sheet statistics");
        let details: Vec<SheetDetail> = sheets
            .into_iter()
            .map(|sheet| {
                let stats = compute_stats(&sheet);
                debug!(
                    "Sheet '{}': {} rows, {} columns",
                    sheet.name, stats.row_count, stats.column_count
                );
                SheetDetail {
                    name: sheet.name,
                    headers: sheet.headers,
                    rows: sheet.rows,
                    stats,
                }
            })
            .collect();

        debug!("Step 4: Reducing {} sheets into aggregate", details.len());
        let aggregate = reduce(&details).map_err(|e| {
            error!("Aggregation failed for {}: {}", raw.file_name, e);
            e
        })?;

        info!(
            "Successfully ingested {} - {} sheets, {} total rows",
            raw.file_name, aggregate.sheet_count, aggregate.row_count
        );
        Ok(IngestionResult {
            file_name: raw.file_name,
            sheets: details,
            aggregate,
        })
    }
}
