//! Error types for the SK/WP conversion service.
//!
//! - [`CsvError`] - CSV decoding and parsing errors
//! - [`ConvertError`] - Column mapping errors
//! - [`ReferenceError`] - Reference table loading errors
//! - [`ConfigError`] - Environment configuration errors
//! - [`ConverterError`] - Top-level conversion errors
//! - [`ServerError`] - HTTP boundary errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. The one exception is
//! [`ConverterError::Input`]: a [`CsvError`] can come from the caller's payload
//! or from a reference file, so the pipeline picks the variant explicitly.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::SchemaKind;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while decoding or parsing CSV.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read or write a file.
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded to text.
    #[error("Failed to decode input: {0}")]
    Encoding(String),

    /// Invalid CSV syntax.
    #[error("Invalid CSV format: {0}")]
    Parse(String),

    /// No header line.
    #[error("No columns to parse from input")]
    Empty,

    /// Same header name used twice.
    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),

    /// A data row has more fields than the header.
    #[error("Line {line}: expected {expected} fields, saw {found}")]
    RowLength {
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CsvError::Io(io),
            csv::ErrorKind::Utf8 { pos, err } => {
                let line = pos.map(|p| p.line()).unwrap_or(0);
                CsvError::Encoding(format!("line {}: {}", line, err))
            }
            kind => CsvError::Parse(format!("{:?}", kind)),
        }
    }
}

// =============================================================================
// Conversion Errors
// =============================================================================

/// Errors from the column mapping procedures.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input lacks columns the target schema requires.
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The reference table has no row to take defaults from.
    #[error("{schema} reference table has no rows to take default values from")]
    EmptyReference { schema: SchemaKind },

    /// Numbering `rows` rows from `initial_id` runs past `i64::MAX`.
    #[error("Cannot number {rows} rows starting at ID {initial_id}: IDs would overflow")]
    IdOverflow { initial_id: i64, rows: usize },
}

// =============================================================================
// Reference Errors
// =============================================================================

/// Errors while loading a reference table.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Reference file could not be read.
    #[error("Cannot read {schema} reference '{}': {source}", .path.display())]
    Io {
        schema: SchemaKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reference content is not valid CSV.
    #[error("Invalid {schema} reference: {source}")]
    Csv {
        schema: SchemaKind,
        #[source]
        source: CsvError,
    },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but its value does not parse.
    #[error("Invalid value '{value}' for {name}: {message}")]
    InvalidVar {
        name: String,
        value: String,
        message: String,
    },
}

// =============================================================================
// Converter Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the error type returned by [`crate::transform::pipeline::Converter`].
#[derive(Debug, Error)]
pub enum ConverterError {
    /// The caller's CSV payload is malformed.
    #[error("CSV error: {0}")]
    Input(CsvError),

    /// Reference table unavailable.
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Column mapping failed.
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Writing the converted table failed.
    #[error("Output error: {0}")]
    Output(CsvError),
}

impl ConverterError {
    /// Whether the failure was caused by the caller's input rather than the
    /// service configuration.
    pub fn is_client_error(&self) -> bool {
        match self {
            ConverterError::Input(_) => true,
            ConverterError::Convert(ConvertError::MissingColumns(_)) => true,
            ConverterError::Convert(ConvertError::EmptyReference { .. }) => false,
            ConverterError::Convert(ConvertError::IdOverflow { .. }) => false,
            ConverterError::Reference(_) | ConverterError::Output(_) => false,
        }
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Conversion error.
    #[error("{0}")]
    Conversion(#[from] ConverterError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Unknown resource, such as a direction other than `sk-to-wp`/`wp-to-sk`.
    #[error("Not found: {0}")]
    NotFound(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type for reference loading.
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Result type for top-level conversions.
pub type ConverterResult<T> = Result<T, ConverterError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ConvertError -> ConverterError
        let convert_err = ConvertError::MissingColumns(vec!["Name".into()]);
        let err: ConverterError = convert_err.into();
        assert!(err.to_string().contains("Name"));
        assert!(err.is_client_error());

        // ConverterError -> ServerError keeps the message
        let server_err: ServerError = err.into();
        assert!(server_err.to_string().contains("Missing required column(s): Name"));
    }

    #[test]
    fn test_client_vs_server_classification() {
        assert!(ConverterError::Input(CsvError::Empty).is_client_error());

        let empty_ref: ConverterError = ConvertError::EmptyReference {
            schema: SchemaKind::Wp,
        }
        .into();
        assert!(!empty_ref.is_client_error());

        let missing_file: ConverterError = ReferenceError::Io {
            schema: SchemaKind::Sk,
            path: PathBuf::from("missing.csv"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert!(!missing_file.is_client_error());
        assert!(missing_file.to_string().contains("missing.csv"));

        let overflow: ConverterError = ConvertError::IdOverflow {
            initial_id: i64::MAX,
            rows: 2,
        }
        .into();
        assert!(!overflow.is_client_error());
    }

    #[test]
    fn test_missing_columns_lists_all() {
        let err = ConvertError::MissingColumns(vec!["SKU".into(), "Stock".into()]);
        assert_eq!(err.to_string(), "Missing required column(s): SKU, Stock");
    }

    #[test]
    fn test_row_length_format() {
        let err = CsvError::RowLength {
            line: 3,
            expected: 2,
            found: 4,
        };
        assert_eq!(err.to_string(), "Line 3: expected 2 fields, saw 4");
    }
}
