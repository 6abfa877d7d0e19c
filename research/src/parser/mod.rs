//! CSV loading with encoding and delimiter auto-detection.
//!
//! Inputs are read into a loosely typed [`Table`]: one header row and rows of
//! optional text cells. Blank cells become `None`; typing happens later, per
//! column, in the transform stage.

use crate::error::{CsvError, CsvResult};
use std::path::Path;

/// A loosely typed in-memory table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Short name used in error messages (usually the file name)
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column the caller cannot do without.
    pub fn require_column(&self, name: &str) -> CsvResult<usize> {
        self.find_column(name).ok_or_else(|| CsvError::MissingColumn {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    /// Cell at `(row, col)`; short rows read as missing.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(col).and_then(|c| c.as_deref()))
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding. Never fails: unknown
/// encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match encoding.to_lowercase().as_str() {
        // Latin-1 is decoded as its Windows-1252 superset
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [b',', b';', b'\t', b'|'];
    let mut best_sep = b',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep as char).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text into a [`Table`] with an explicit delimiter.
pub fn parse_table(name: &str, content: &str, delimiter: u8) -> CsvResult<Table> {
    parse_table_inner(name, content, delimiter, None)
}

/// Parse CSV text keeping only `columns`, in the given order.
///
/// Fails with [`CsvError::MissingColumn`] if any of them is absent.
pub fn parse_table_columns(
    name: &str,
    content: &str,
    delimiter: u8,
    columns: &[&str],
) -> CsvResult<Table> {
    parse_table_inner(name, content, delimiter, Some(columns))
}

fn parse_table_inner(
    name: &str,
    content: &str,
    delimiter: u8,
    columns: Option<&[&str]>,
) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile(name.to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let all_headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    // Source index of every kept column
    let (headers, keep): (Vec<String>, Vec<usize>) = match columns {
        None => (all_headers.clone(), (0..all_headers.len()).collect()),
        Some(wanted) => {
            let mut keep = Vec::with_capacity(wanted.len());
            for column in wanted {
                let idx = all_headers
                    .iter()
                    .position(|h| h == column)
                    .ok_or_else(|| CsvError::MissingColumn {
                        table: name.to_string(),
                        column: column.to_string(),
                    })?;
                keep.push(idx);
            }
            (wanted.iter().map(|c| c.to_string()).collect(), keep)
        }
    };

    let mut table = Table::new(name, headers);
    for record in reader.records() {
        let record = record?;
        let row = keep
            .iter()
            .map(|&idx| match record.get(idx) {
                Some(cell) if !cell.trim().is_empty() => Some(cell.to_string()),
                _ => None,
            })
            .collect();
        table.rows.push(row);
    }

    Ok(table)
}

fn load_content(path: &Path) -> CsvResult<(String, String, u8)> {
    let bytes = std::fs::read(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, content, delimiter))
}

/// Load a CSV file, detecting its encoding and delimiter.
pub fn read_table<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
    let (name, content, delimiter) = load_content(path.as_ref())?;
    parse_table(&name, &content, delimiter)
}

/// Load only `columns` from a CSV file; see [`parse_table_columns`].
pub fn read_table_columns<P: AsRef<Path>>(path: P, columns: &[&str]) -> CsvResult<Table> {
    let (name, content, delimiter) = load_content(path.as_ref())?;
    parse_table_columns(&name, &content, delimiter, columns)
}
