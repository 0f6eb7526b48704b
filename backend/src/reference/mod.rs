//! Reference tables - the samples that define the SK and WP schemas.
//!
//! Both reference files are embedded at compile time from `resources/`:
//! - `sk-reference.csv`
//! - `wp-reference.csv`
//!
//! A deployment can point either schema at a file on disk instead. Overrides
//! are re-read on every load so edits apply without a restart.

use std::path::PathBuf;

use crate::error::{ReferenceError, ReferenceResult};
use crate::models::{SchemaKind, Table};
use crate::parser::{parse_bytes, parse_str};

/// File name of the SK reference table.
pub const SK_REFERENCE_FILE: &str = "sk-reference.csv";

/// File name of the WP reference table.
pub const WP_REFERENCE_FILE: &str = "wp-reference.csv";

const BUNDLED_SK: &str = include_str!("../../resources/sk-reference.csv");
const BUNDLED_WP: &str = include_str!("../../resources/wp-reference.csv");

/// Where a reference table comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReferenceSource {
    /// The copy embedded in the binary.
    #[default]
    Bundled,
    /// A CSV file read at load time.
    File(PathBuf),
}

impl ReferenceSource {
    /// `Bundled` when `path` is `None`.
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(ReferenceSource::File).unwrap_or_default()
    }

    pub fn describe(&self, schema: SchemaKind) -> String {
        match self {
            ReferenceSource::Bundled => format!("bundled {}", schema.reference_file()),
            ReferenceSource::File(path) => path.display().to_string(),
        }
    }
}

/// Reference sources for both schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    pub sk: ReferenceSource,
    pub wp: ReferenceSource,
}

impl ReferenceSet {
    pub fn new(sk: ReferenceSource, wp: ReferenceSource) -> Self {
        Self { sk, wp }
    }

    pub fn source(&self, schema: SchemaKind) -> &ReferenceSource {
        match schema {
            SchemaKind::Sk => &self.sk,
            SchemaKind::Wp => &self.wp,
        }
    }

    /// Load and parse the reference table for `schema`.
    pub fn load(&self, schema: SchemaKind) -> ReferenceResult<Table> {
        let parsed = match self.source(schema) {
            ReferenceSource::Bundled => parse_str(bundled(schema)),
            ReferenceSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| ReferenceError::Io {
                    schema,
                    path: path.clone(),
                    source,
                })?;
                parse_bytes(&bytes)
            }
        };
        parsed.map_err(|source| ReferenceError::Csv { schema, source })
    }
}

fn bundled(schema: SchemaKind) -> &'static str {
    match schema {
        SchemaKind::Sk => BUNDLED_SK,
        SchemaKind::Wp => BUNDLED_WP,
    }
}
