//! CSV codec: bytes or text to [`Table`] and back.
//!
//! Parsing follows the conventions of common dataframe readers: comma
//! delimiter, first record is the header, blank lines skipped, the usual NA
//! tokens read as empty cells and numeric-looking cells read as numbers.

use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{Table, Value};

/// Tokens read as an empty cell.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Decoded input text with the encoding it was read as.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub content: String,
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to text.
///
/// Valid UTF-8 is taken as-is. Anything else goes through charset detection,
/// with a lossy UTF-8 decode as the last resort.
pub fn decode_bytes(bytes: &[u8]) -> Decoded {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Decoded {
            content: text.to_string(),
            encoding: "utf-8".to_string(),
        };
    }

    let encoding = detect_encoding(bytes);
    let content = decode_as(bytes, &encoding)
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned());

    Decoded { content, encoding }
}

/// Decode with the WHATWG encoding registered under `label`.
///
/// `iso-8859-1` and `latin1` resolve to windows-1252, which agrees with
/// Latin-1 on every printable byte.
pub fn decode_as(bytes: &[u8], label: &str) -> Option<String> {
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes())?;
    let (content, _) = encoding.decode_without_bom_handling(bytes);
    Some(content.into_owned())
}

/// Infer a typed cell from its raw text.
pub fn infer_value(raw: &str) -> Value {
    if NA_VALUES.contains(&raw) {
        return Value::Empty;
    }

    if let Ok(n) = raw.parse::<i64>() {
        // "007" or "+5" stay text so identifiers survive unchanged
        if n.to_string() == raw {
            return Value::Integer(n);
        }
        return Value::Text(raw.to_string());
    }

    let looks_decimal = raw.contains(['.', 'e', 'E'])
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'));
    if looks_decimal {
        if let Ok(x) = raw.parse::<f64>() {
            if x.is_finite() {
                return Value::Float(x);
            }
        }
    }

    Value::Text(raw.to_string())
}

/// Parse CSV from any reader.
pub fn parse_reader<R: Read>(reader: R) -> CsvResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(CsvError::Empty),
    };
    let columns: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    let mut table = Table::new(columns)?;

    for record in records {
        let record = record?;
        if record.len() > table.columns().len() {
            return Err(CsvError::RowLength {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: table.columns().len(),
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(infer_value).collect());
    }

    Ok(table)
}

/// Parse CSV text.
///
/// # Example
/// ```ignore
/// use csvconv::parse_str;
///
/// let table = parse_str("Name,Price\nMug,12.5\n").unwrap();
/// assert_eq!(table.columns(), ["Name", "Price"]);
/// assert_eq!(table.len(), 1);
/// ```
pub fn parse_str(content: &str) -> CsvResult<Table> {
    parse_reader(content.as_bytes())
}

/// Decode and parse raw CSV bytes.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<Table> {
    let decoded = decode_bytes(bytes);
    parse_str(&decoded.content)
}

/// Read and parse a CSV file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}

/// Serialize a table to CSV text (comma, `\n`, minimal quoting).
pub fn to_csv_string(table: &Table) -> CsvResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| CsvError::Io(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| CsvError::Encoding(e.to_string()))
}

/// Serialize a table and write it to `path`.
pub fn write_file<P: AsRef<Path>>(table: &Table, path: P) -> CsvResult<()> {
    let content = to_csv_string(table)?;
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}
