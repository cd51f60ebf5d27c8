use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::FetchError;

/// Where the spreadsheet bytes live. Adding a backend means adding a variant
/// here and one fetch implementation behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FileReference {
    Local { path: PathBuf },
    ObjectStorage { bucket: String, key: String },
}

fn virtual_hosted_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https://([a-z0-9][a-z0-9.-]*)\.s3\.([a-z0-9-]+)\.amazonaws\.com/(.+)$")
            .unwrap()
    })
}

impl FileReference {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    pub fn object_storage(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ObjectStorage {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parses a virtual-hosted-style object URL,
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`. The query string is
    /// dropped and the key percent-decoded. Any other host shape is rejected.
    pub fn from_object_url(url: &str) -> Result<Self, FetchError> {
        let without_query = url.split('?').next().unwrap_or(url);
        let captures = virtual_hosted_url()
            .captures(without_query)
            .ok_or_else(|| FetchError::InvalidReference(url.to_string()))?;

        Ok(Self::ObjectStorage {
            bucket: captures[1].to_string(),
            key: percent_decode(&captures[3]),
        })
    }

    /// Last path/key segment; this is the `fileName` reported in the result.
    pub fn file_name(&self) -> String {
        match self {
            Self::Local { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            Self::ObjectStorage { key, .. } => {
                key.rsplit('/').next().unwrap_or(key.as_str()).to_string()
            }
        }
    }
}

// Percent-decoding only; '+' stays literal since S3 object keys treat it as a
// plain character outside the query string.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        // Hex digits are ASCII, so the slice below cannot split a multibyte
        // character; anything else falls through as literal text.
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            if let Ok(byte) = u8::from_str_radix(&input[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Fetched file content plus the file name derived from the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBytes {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl RawBytes {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Best-effort typed spreadsheet cell. Typing is advisory: anything the
/// decoder cannot classify lands in `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetStats {
    pub row_count: usize,
    pub column_count: usize,
    pub column_names: Vec<String>,
    pub first_row: Option<Vec<Cell>>,
    pub last_row: Option<Vec<Cell>>,
}

/// Cross-sheet summary. The reduction is deliberately asymmetric: `row_count`
/// sums over every sheet, but `column_count`, `column_names` and `first_row`
/// come from the first sheet only and `last_row` from the last sheet, so
/// consumers must not assume a uniform schema across sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub row_count: usize,
    pub column_count: usize,
    pub column_names: Vec<String>,
    pub first_row: Option<Vec<Cell>>,
    pub last_row: Option<Vec<Cell>>,
    pub sheet_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDetail {
    #[serde(rename = "sheetName")]
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub stats: SheetStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionResult {
    pub file_name: String,
    pub sheets: Vec<SheetDetail>,
    pub aggregate: AggregateStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_virtual_hosted_url() {
        let reference = FileReference::from_object_url(
            "https://campaign-logs.s3.eu-west-1.amazonaws.com/uploads/site%20a/logs.xlsx?X-Amz-Expires=3600",
        )
        .unwrap();
        assert_eq!(
            reference,
            FileReference::object_storage("campaign-logs", "uploads/site a/logs.xlsx")
        );
        assert_eq!(reference.file_name(), "logs.xlsx");
    }

    #[test]
    fn malformed_percent_escapes_stay_literal() {
        let reference = FileReference::from_object_url(
            "https://campaign-logs.s3.eu-west-1.amazonaws.com/uploads/%aé.xlsx",
        )
        .unwrap();
        assert_eq!(
            reference,
            FileReference::object_storage("campaign-logs", "uploads/%aé.xlsx")
        );

        let reference = FileReference::from_object_url(
            "https://campaign-logs.s3.eu-west-1.amazonaws.com/site%zz/logs%4a.csv",
        )
        .unwrap();
        assert_eq!(
            reference,
            FileReference::object_storage("campaign-logs", "site%zz/logsJ.csv")
        );
    }

    #[test]
    fn rejects_wrong_host_suffix() {
        let err = FileReference::from_object_url("https://bucket.storage.example.com/key.xlsx")
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidReference(_)));

        let err =
            FileReference::from_object_url("https://bucket.s3.eu-west-1.amazonaws.com/").unwrap_err();
        assert!(matches!(err, FetchError::InvalidReference(_)));
    }

    #[test]
    fn local_file_name_is_last_segment() {
        let reference = FileReference::local("uploads/2024/file-123.xlsx");
        assert_eq!(reference.file_name(), "file-123.xlsx");
    }

    #[test]
    fn cell_serializes_to_native_json_scalars() {
        let row = vec![
            Cell::Text("ana".to_string()),
            Cell::Number(3.0),
            Cell::Bool(true),
            Cell::Null,
        ];
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"["ana",3.0,true,null]"#
        );
    }
}
