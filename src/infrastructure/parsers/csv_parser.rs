use csv::ReaderBuilder;
use tracing::{debug, error, info};

use crate::domain::{
    error::DecodeError,
    models::{Cell, Sheet},
};

/// Delimited text has no tab concept, so the single decoded sheet gets the
/// conventional name.
pub const CSV_SHEET_NAME: &str = "Sheet1";

pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Sheet>, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        error!("CSV input is not valid UTF-8: {}", e);
        DecodeError::CorruptFormat(format!("not valid utf-8 text: {}", e))
    })?;

    debug!("Creating CSV reader, flexible records, first record as header");
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header_record = match records.next() {
        Some(record) => record.map_err(|e| {
            error!("Failed to read CSV header record: {}", e);
            DecodeError::CorruptFormat(e.to_string())
        })?,
        // No records at all: the one synthetic sheet is empty and dropped.
        None => {
            debug!("CSV input contains no records");
            return Ok(Vec::new());
        }
    };

    let headers: Vec<String> = header_record.iter().map(|field| field.to_string()).collect();
    debug!("CSV headers: {:?}", headers);
    info!("Found {} columns in CSV", headers.len());

    let mut rows = Vec::new();
    let mut row_count = 0;

    for record in records {
        let record = record.map_err(|e| {
            error!("Failed to read CSV record at row {}: {}", row_count + 1, e);
            DecodeError::CorruptFormat(e.to_string())
        })?;

        row_count += 1;
        rows.push(record.iter().map(coerce_field).collect());

        if row_count % 1000 == 0 {
            debug!("Processed {} CSV rows", row_count);
        }
    }

    info!("Parsed {} rows from CSV", row_count);
    Ok(vec![Sheet {
        name: CSV_SHEET_NAME.to_string(),
        headers,
        rows,
    }])
}

// Best-effort typing: empty fields are null, recognizable booleans and finite
// numbers keep their type, everything else stays text.
fn coerce_field(field: &str) -> Cell {
    if field.is_empty() {
        return Cell::Null;
    }
    if field.eq_ignore_ascii_case("true") {
        return Cell::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return Cell::Bool(false);
    }
    if let Ok(number) = field.parse::<f64>() {
        if number.is_finite() {
            return Cell::Number(number);
        }
    }
    Cell::Text(field.to_string())
}
