//! Transformation module.
//!
//! - Mapping: the SK ⇄ WP column procedures
//! - Pipeline: parse, convert and serialize against configured references

pub mod mapping;
pub mod pipeline;

pub use mapping::{sk_to_wp, sk_to_wp_from, wp_columns, wp_to_sk, ID_COLUMN, INITIAL_ID};
pub use pipeline::{default_output_path, ConversionSummary, Converter};
