use std::io::Cursor;

use calamine::{DataType, Reader, Xls, Xlsx};
use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::debug;

use crate::domain::{
    error::DecodeError,
    models::{Cell, Sheet},
};

pub fn parse_xlsx(bytes: &[u8]) -> Result<Vec<Sheet>, DecodeError> {
    let workbook = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| DecodeError::CorruptFormat(format!("xlsx: {}", e)))?;
    read_sheets(workbook)
}

pub fn parse_xls(bytes: &[u8]) -> Result<Vec<Sheet>, DecodeError> {
    let workbook = Xls::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| DecodeError::CorruptFormat(format!("xls: {}", e)))?;
    read_sheets(workbook)
}

// Workbook order is preserved; sheets with no cells at all are dropped here.
fn read_sheets<R>(mut workbook: R) -> Result<Vec<Sheet>, DecodeError>
where
    R: Reader,
    R::Error: std::fmt::Display,
{
    let names: Vec<String> = workbook.sheet_names().to_vec();
    debug!("Workbook lists {} sheets", names.len());

    let mut sheets = Vec::new();
    for name in names {
        let range = match workbook.worksheet_range(&name) {
            Some(Ok(range)) => range,
            Some(Err(e)) => {
                return Err(DecodeError::CorruptFormat(format!("sheet '{}': {}", name, e)))
            }
            None => continue,
        };

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            debug!("Dropping empty sheet '{}'", name);
            continue;
        };

        let headers: Vec<String> = header_row.iter().map(header_cell).collect();
        let body: Vec<Vec<Cell>> = rows
            .map(|row| row.iter().map(body_cell).collect())
            .collect();

        debug!("Sheet '{}': {} columns, {} data rows", name, headers.len(), body.len());
        sheets.push(Sheet {
            name,
            headers,
            rows: body,
        });
    }

    Ok(sheets)
}

// The first row is the header no matter what it contains; blanks become the
// empty string, never null.
fn header_cell(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => format_number(*f),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(serial) => date_serial_to_iso(*serial),
        DataType::Error(e) => e.to_string(),
    }
}

fn body_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Null,
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Float(f) => Cell::Number(*f),
        DataType::Bool(b) => Cell::Bool(*b),
        DataType::DateTime(serial) => Cell::Text(date_serial_to_iso(*serial)),
        DataType::Error(e) => Cell::Text(e.to_string()),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// Excel serial dates count days from 1899-12-30, fraction is time of day.
// Anything out of range falls back to the raw serial's text form.
fn date_serial_to_iso(serial: f64) -> String {
    let mut days = serial.trunc() as i64;
    let mut seconds = (serial.fract() * 86_400.0).round() as i64;
    // Negative serials carry a negative fraction; borrow a day so the
    // time-of-day stays in 0..86_400.
    if seconds < 0 {
        seconds += 86_400;
        days -= 1;
    }
    if seconds >= 86_400 {
        seconds -= 86_400;
        days += 1;
    }

    let Some(base) = NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return serial.to_string();
    };
    let Some(delta) = Duration::try_days(days) else {
        return serial.to_string();
    };
    let Some(date) = base.checked_add_signed(delta) else {
        return serial.to_string();
    };

    if seconds == 0 {
        return date.format("%Y-%m-%d").to_string();
    }
    match NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0) {
        Some(time) => date.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string(),
        None => date.format("%Y-%m-%d").to_string(),
    }
}
