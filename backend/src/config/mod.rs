//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is loaded first when
//! present) and can be overridden by command-line flags.
//!
//! | Variable               | Default    |
//! |------------------------|------------|
//! | `CSVCONV_PORT`         | `8001`     |
//! | `CSVCONV_INITIAL_ID`   | `20000`    |
//! | `CSVCONV_SK_REFERENCE` | bundled    |
//! | `CSVCONV_WP_REFERENCE` | bundled    |
//! | `CSVCONV_OUTPUT_DIR`   | `outputs`  |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::reference::{ReferenceSet, ReferenceSource};
use crate::transform::mapping::INITIAL_ID;

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Settings for a [`crate::Converter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    pub references: ReferenceSet,
    /// First ID assigned when converting SK to WP.
    pub initial_id: i64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            references: ReferenceSet::default(),
            initial_id: INITIAL_ID,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub converter: ConverterConfig,
    /// Where the CLI writes outputs when no path is given.
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            converter: ConverterConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_var(&lookup, "CSVCONV_PORT")?.unwrap_or(defaults.port);
        let initial_id =
            parse_var(&lookup, "CSVCONV_INITIAL_ID")?.unwrap_or(defaults.converter.initial_id);
        let sk = lookup("CSVCONV_SK_REFERENCE").map(PathBuf::from);
        let wp = lookup("CSVCONV_WP_REFERENCE").map(PathBuf::from);
        let output_dir = lookup("CSVCONV_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        Ok(Self {
            port,
            converter: ConverterConfig {
                references: ReferenceSet::new(
                    ReferenceSource::from_path(sk),
                    ReferenceSource::from_path(wp),
                ),
                initial_id,
            },
            output_dir,
        })
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidVar {
                name: name.to_string(),
                value,
                message: e.to_string(),
            }),
    }
}
