//! Tabular loader with format, encoding and delimiter auto-detection.
//!
//! Accepts either a delimited text file (CSV/TSV, any common encoding) or an
//! XLSX workbook, and turns it into a [`Table`]. Empty cells become `null`.
//! No flight-specific logic lives here.

use calamine::{Data, DataType as _, Reader, Xlsx};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::io::Cursor;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::table::Table;

/// ZIP local file header, the first bytes of every XLSX file.
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Kind of file that was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

/// Metadata about a loaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadInfo {
    pub format: SourceFormat,
    /// Detected text encoding (delimited files only)
    pub encoding: Option<String>,
    /// Detected delimiter (delimited files only)
    pub delimiter: Option<char>,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// A loaded table with its metadata.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub info: LoadInfo,
}

/// Guess the format from the leading bytes.
pub fn detect_format(bytes: &[u8]) -> SourceFormat {
    if bytes.starts_with(ZIP_SIGNATURE) {
        SourceFormat::Xlsx
    } else {
        SourceFormat::Csv
    }
}

/// Load a file from disk, auto-detecting its format.
pub fn load_file<P: AsRef<Path>>(path: P) -> LoadResult<LoadedTable> {
    let bytes = std::fs::read(path.as_ref())?;
    load_bytes(&bytes)
}

/// Load raw bytes, auto-detecting format, encoding and delimiter.
pub fn load_bytes(bytes: &[u8]) -> LoadResult<LoadedTable> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyFile);
    }

    match detect_format(bytes) {
        SourceFormat::Xlsx => load_xlsx(bytes),
        SourceFormat::Csv => {
            let encoding = detect_encoding(bytes);
            let content = decode_content(bytes, &encoding)?;
            let delimiter = detect_delimiter(&content);
            let table = parse_delimited(&content, delimiter)?;

            Ok(LoadedTable {
                info: LoadInfo {
                    format: SourceFormat::Csv,
                    encoding: Some(encoding),
                    delimiter: Some(delimiter),
                    headers: table.columns().to_vec(),
                    row_count: table.len(),
                },
                table,
            })
        }
    }
}

// =============================================================================
// Delimited text
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Unknown encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(bytes);

    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.to_string())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        other => {
            let (decoded, _, had_errors) = encoding_rs::Encoding::for_label(other.as_bytes())
                .unwrap_or(encoding_rs::UTF_8)
                .decode(bytes);
            if had_errors && decoded.trim().is_empty() {
                return Err(LoadError::EncodingError(format!(
                    "could not decode content as {other}"
                )));
            }
            Ok(decoded.to_string())
        }
    }
}

/// Detect the delimiter by counting occurrences in the header line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text with an explicit delimiter.
///
/// The first line is the header. Short rows are padded with `null`, extra
/// cells are ignored, blank lines are skipped.
pub fn parse_delimited(content: &str, delimiter: char) -> LoadResult<Table> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let mut delimiter_buf = [0u8; 4];
    let delimiter_byte = match delimiter.encode_utf8(&mut delimiter_buf).as_bytes() {
        [b] => *b,
        _ => {
            return Err(LoadError::CsvError {
                line: 1,
                message: format!("delimiter '{delimiter}' is not a single byte"),
            })
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::CsvError {
            line: 1,
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeaders);
    }

    let mut table = Table::new(headers.clone());
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::CsvError {
            line: e.position().map(|p| p.line() as usize).unwrap_or(idx + 2),
            message: e.to_string(),
        })?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let row: Map<String, Value> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).map(text_cell).unwrap_or(Value::Null)))
            .collect();
        table.push_record(row);
    }

    Ok(table)
}

/// Trimmed text, or `null` when blank.
fn text_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

// =============================================================================
// XLSX workbooks
// =============================================================================

/// Load the first sheet of an XLSX workbook. The first row is the header.
pub fn load_xlsx(bytes: &[u8]) -> LoadResult<LoadedTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| LoadError::WorkbookError(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::WorkbookError("workbook has no sheets".to_string()))?
        .map_err(|e| LoadError::WorkbookError(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(LoadError::EmptyFile)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeaders);
    }

    let mut table = Table::new(headers.clone());
    for cells in rows {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let row: Map<String, Value> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), cells.get(i).map(workbook_cell).unwrap_or(Value::Null)))
            .collect();
        table.push_record(row);
    }

    Ok(LoadedTable {
        info: LoadInfo {
            format: SourceFormat::Xlsx,
            encoding: None,
            delimiter: None,
            headers,
            row_count: table.len(),
        },
        table,
    })
}

/// Convert a workbook cell. Date cells become `D/M/Y` text and time-only
/// cells `H:M` text, matching the layout of text-typed values.
fn workbook_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => text_cell(s),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Value::Number((*f as i64).into())
            } else {
                Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        // Serial values below one day are clock times
        Data::DateTime(dt) if dt.as_f64() < 1.0 => cell
            .as_time()
            .map(|t| Value::String(t.format("%H:%M").to_string()))
            .unwrap_or(Value::Null),
        Data::DateTime(_) => cell
            .as_date()
            .map(|d| Value::String(d.format("%d/%m/%Y").to_string()))
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s),
        Data::Error(_) => Value::Null,
    }
}
