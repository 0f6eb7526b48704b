//! High-level conversion API shared by the HTTP handlers and the CLI.
//!
//! Each call loads the target reference table, parses the input, runs the
//! column mapping and serializes the result. Nothing is cached between calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use csvconv::{Converter, ConverterConfig, Direction};
//!
//! let converter = Converter::new(ConverterConfig::default());
//! let csv = converter.convert_text(Direction::SkToWp, "Name\nMug\n")?;
//! assert!(csv.starts_with("ID,"));
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::mapping::{sk_to_wp_from, wp_to_sk};
use crate::api::logs::{log_error, log_info, log_success};
use crate::config::ConverterConfig;
use crate::error::{ConverterError, ConverterResult};
use crate::models::{Direction, SchemaKind, Table};
use crate::parser::{parse_bytes, parse_file, parse_str, to_csv_string, write_file};

/// Summary of a file conversion.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub direction: Direction,
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Runs conversions against a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Load the reference table for `schema`.
    pub fn reference(&self, schema: SchemaKind) -> ConverterResult<Table> {
        let source = self.config.references.source(schema);
        log_info(format!("Loading {} reference ({})", schema, source.describe(schema)));
        Ok(self.config.references.load(schema)?)
    }

    /// Convert an already-parsed table.
    pub fn convert_table(&self, direction: Direction, input: Table) -> ConverterResult<Table> {
        let reference = self.reference(direction.target())?;
        let converted = match direction {
            Direction::SkToWp => sk_to_wp_from(input, &reference, self.config.initial_id),
            Direction::WpToSk => wp_to_sk(&input, &reference),
        };
        converted.map_err(|e| {
            log_error(format!("{} failed: {}", direction, e));
            e.into()
        })
    }

    /// Convert CSV text and return CSV text.
    pub fn convert_text(&self, direction: Direction, csv: &str) -> ConverterResult<String> {
        log_info(format!("📖 {} - reading {} bytes of text", direction, csv.len()));
        let input = parse_str(csv).map_err(ConverterError::Input)?;
        self.convert_parsed(direction, input)
    }

    /// Convert raw CSV bytes (uploaded file content) and return CSV text.
    pub fn convert_bytes(&self, direction: Direction, bytes: &[u8]) -> ConverterResult<String> {
        log_info(format!("📖 {} - reading {} bytes", direction, bytes.len()));
        let input = parse_bytes(bytes).map_err(ConverterError::Input)?;
        self.convert_parsed(direction, input)
    }

    /// Convert a CSV file and write the result to `output`.
    pub fn convert_file(
        &self,
        direction: Direction,
        input: &Path,
        output: &Path,
    ) -> ConverterResult<ConversionSummary> {
        log_info(format!("📄 {} - {}", direction, input.display()));
        let table = parse_file(input).map_err(ConverterError::Input)?;
        let converted = self.convert_table(direction, table)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConverterError::Output(e.into()))?;
        }
        write_file(&converted, output).map_err(ConverterError::Output)?;
        log_success(format!("💾 Saved to {}", output.display()));

        Ok(ConversionSummary {
            direction,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            rows: converted.len(),
            columns: converted.columns().to_vec(),
        })
    }

    fn convert_parsed(&self, direction: Direction, input: Table) -> ConverterResult<String> {
        log_info(format!(
            "Read {} rows, columns: {}",
            input.len(),
            input.columns().join(", ")
        ));
        let converted = self.convert_table(direction, input)?;
        to_csv_string(&converted).map_err(ConverterError::Output)
    }
}

/// Timestamp-derived output path: `<dir>/output_<direction>_<YYYY-MM-DDTHH-MM-SS>.csv`.
pub fn default_output_path(dir: &Path, direction: Direction, now: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "output_{}_{}.csv",
        direction,
        now.format("%Y-%m-%dT%H-%M-%S")
    ))
}
