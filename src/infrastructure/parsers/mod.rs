pub mod csv_parser;
pub mod excel_parser;

use tracing::debug;

use crate::domain::{
    error::DecodeError,
    models::{RawBytes, Sheet},
    ports::WorkbookDecoder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Xlsx,
    Xls,
    Csv,
}

/// Format detection plus dispatch to the matching parser. Extension wins when
/// the file name has one; otherwise the leading bytes decide.
pub struct SpreadsheetDecoder;

impl SpreadsheetDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpreadsheetDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookDecoder for SpreadsheetDecoder {
    fn decode(&self, raw: &RawBytes) -> Result<Vec<Sheet>, DecodeError> {
        let format = detect_format(&raw.file_name, &raw.bytes)?;
        debug!("Detected format {:?} for {}", format, raw.file_name);

        match format {
            SourceFormat::Xlsx => excel_parser::parse_xlsx(&raw.bytes),
            SourceFormat::Xls => excel_parser::parse_xls(&raw.bytes),
            SourceFormat::Csv => csv_parser::parse_csv(&raw.bytes),
        }
    }
}

fn extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

fn detect_format(file_name: &str, bytes: &[u8]) -> Result<SourceFormat, DecodeError> {
    match extension(file_name).as_deref() {
        Some("xlsx") | Some("xlsm") => return Ok(SourceFormat::Xlsx),
        Some("xls") => return Ok(SourceFormat::Xls),
        Some("csv") | Some("txt") => return Ok(SourceFormat::Csv),
        Some(ext @ ("ods" | "xlsb")) => {
            return Err(DecodeError::UnsupportedFormat(format!(
                ".{} workbooks are not supported",
                ext
            )))
        }
        _ => {}
    }

    sniff_format(bytes).ok_or_else(|| {
        DecodeError::CorruptFormat(format!(
            "{}: not a recognized spreadsheet format",
            file_name
        ))
    })
}

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];
const CFB_MAGIC: [u8; 4] = [0xd0, 0xcf, 0x11, 0xe0];

fn sniff_format(bytes: &[u8]) -> Option<SourceFormat> {
    if bytes.starts_with(&ZIP_MAGIC) {
        return Some(SourceFormat::Xlsx);
    }
    if bytes.starts_with(&CFB_MAGIC) {
        return Some(SourceFormat::Xls);
    }
    if !bytes.is_empty() && !bytes.contains(&0) && std::str::from_utf8(bytes).is_ok() {
        return Some(SourceFormat::Csv);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_drives_detection() {
        assert_eq!(detect_format("a.xlsx", b"").unwrap(), SourceFormat::Xlsx);
        assert_eq!(detect_format("a.XLSM", b"").unwrap(), SourceFormat::Xlsx);
        assert_eq!(detect_format("a.xls", b"").unwrap(), SourceFormat::Xls);
        assert_eq!(detect_format("a.csv", b"").unwrap(), SourceFormat::Csv);
    }

    #[test]
    fn magic_bytes_cover_missing_extensions() {
        assert_eq!(
            detect_format("upload", &[0x50, 0x4b, 0x03, 0x04, 0x00]).unwrap(),
            SourceFormat::Xlsx
        );
        assert_eq!(
            detect_format("upload", &[0xd0, 0xcf, 0x11, 0xe0, 0x00]).unwrap(),
            SourceFormat::Xls
        );
        assert_eq!(
            detect_format("upload", b"a,b\n1,2\n").unwrap(),
            SourceFormat::Csv
        );
    }

    #[test]
    fn recognized_but_unimplemented_formats_are_unsupported() {
        let err = detect_format("sheet.ods", b"PK\x03\x04").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }

    #[test]
    fn arbitrary_binary_is_corrupt() {
        let err = detect_format("blob.bin", &[0x00, 0x01, 0x02, 0xff]).unwrap_err();
        assert!(matches!(err, DecodeError::CorruptFormat(_)));
    }

    #[test]
    fn corrupt_decode_never_panics_or_succeeds() {
        let decoder = SpreadsheetDecoder::new();
        let raw = RawBytes::new("logs.xlsx", vec![0x13, 0x37, 0x00, 0xff]);
        let err = decoder.decode(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::CorruptFormat(_)));
    }
}
