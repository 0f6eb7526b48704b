//! # csvconv - SK ⇄ WP CSV conversion
//!
//! Converts product CSV exports between two fixed schemas. Each schema is
//! defined by a bundled reference table whose header gives the columns and
//! whose first row gives default values.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV input  │────▶│   Parser    │────▶│   Mapping   │────▶│ CSV output  │
//! │ (file/text) │     │  (Table)    │     │ (reference) │     │ (file/JSON) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csvconv::{Converter, ConverterConfig, Direction};
//!
//! let converter = Converter::new(ConverterConfig::default());
//! let wp_csv = converter.convert_text(Direction::SkToWp, "SKU,Name\nSK-1,Mug\n").unwrap();
//! println!("{}", wp_csv);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Table, cell values, schemas, directions
//! - [`parser`] - CSV decoding, parsing and writing
//! - [`reference`] - Bundled and on-disk reference tables
//! - [`transform`] - Column mapping and the conversion pipeline
//! - [`config`] - Environment configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Schemas
pub mod reference;

// Transformation
pub mod transform;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConvertError, ConverterError, CsvError, ReferenceError, ServerError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Direction, SchemaKind, Table, Value};

// =============================================================================
// Re-exports - CSV
// =============================================================================

pub use parser::{
    decode_bytes, detect_encoding, infer_value, parse_bytes, parse_file, parse_reader, parse_str,
    to_csv_string, write_file, Decoded,
};

// =============================================================================
// Re-exports - References
// =============================================================================

pub use reference::{ReferenceSet, ReferenceSource, SK_REFERENCE_FILE, WP_REFERENCE_FILE};

// =============================================================================
// Re-exports - Conversion
// =============================================================================

pub use transform::{
    default_output_path, sk_to_wp, sk_to_wp_from, wp_columns, wp_to_sk, ConversionSummary,
    Converter, ID_COLUMN, INITIAL_ID,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{AppConfig, ConverterConfig};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ConvertResponse, ErrorResponse, HealthResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
