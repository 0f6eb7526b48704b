//! csvconv CLI - Convert CSV files between the SK and WP schemas
//!
//! ```bash
//! csvconv sk-to-wp sk.csv wp.csv      # SK file to WP file
//! csvconv wp-to-sk wp.csv             # output path derived from the current time
//! csvconv serve --port 8001           # Start HTTP server
//! csvconv schema wp                   # Show a schema's columns and defaults
//! ```

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use csvconv::{
    default_output_path, AppConfig, Converter, Direction, ReferenceSource, SchemaKind,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csvconv")]
#[command(about = "Convert CSV files between SK and WP formats", long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Flags that override environment configuration.
#[derive(Args)]
struct Overrides {
    /// SK reference CSV (default: bundled)
    #[arg(long, global = true)]
    sk_reference: Option<PathBuf>,

    /// WP reference CSV (default: bundled)
    #[arg(long, global = true)]
    wp_reference: Option<PathBuf>,

    /// First ID assigned when converting SK to WP
    #[arg(long, global = true)]
    initial_id: Option<i64>,

    /// Directory for generated output names
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an SK file to the WP schema
    SkToWp(ConvertArgs),

    /// Convert a WP file to the SK schema
    WpToSk(ConvertArgs),

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: CSVCONV_PORT or 8001)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the columns and default values of a schema
    Schema {
        /// sk or wp
        schema: SchemaKind,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Input CSV file
    input_file: PathBuf,

    /// Output CSV file (default: <output-dir>/output_<direction>_<timestamp>.csv)
    output_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match load_config(cli.overrides) {
        Ok(config) => match cli.command {
            Commands::SkToWp(args) => cmd_convert(&config, Direction::SkToWp, args),
            Commands::WpToSk(args) => cmd_convert(&config, Direction::WpToSk, args),
            Commands::Serve { port } => cmd_serve(config, port).await,
            Commands::Schema { schema } => cmd_schema(&config, schema),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(overrides: Overrides) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;

    if let Some(path) = overrides.sk_reference {
        config.converter.references.sk = ReferenceSource::File(path);
    }
    if let Some(path) = overrides.wp_reference {
        config.converter.references.wp = ReferenceSource::File(path);
    }
    if let Some(id) = overrides.initial_id {
        config.converter.initial_id = id;
    }
    if let Some(dir) = overrides.output_dir {
        config.output_dir = dir;
    }

    Ok(config)
}

fn cmd_convert(
    config: &AppConfig,
    direction: Direction,
    args: ConvertArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = args
        .output_file
        .unwrap_or_else(|| default_output_path(&config.output_dir, direction, Local::now()));

    let converter = Converter::new(config.converter.clone());
    let summary = converter.convert_file(direction, &args.input_file, &output)?;

    eprintln!(
        "   {} rows, {} columns",
        summary.rows,
        summary.columns.len()
    );
    println!("Converted file saved to {}", summary.output.display());
    Ok(())
}

async fn cmd_serve(config: AppConfig, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let port = port.unwrap_or(config.port);
    csvconv::server::start_server(port, Converter::new(config.converter)).await
}

fn cmd_schema(config: &AppConfig, schema: SchemaKind) -> Result<(), Box<dyn std::error::Error>> {
    let source = config.converter.references.source(schema);
    let table = config.converter.references.load(schema)?;

    println!("📋 {} schema ({})", schema, source.describe(schema));
    println!("   {} columns, {} sample rows\n", table.columns().len(), table.len());

    let defaults = table.first_row();
    for (i, col) in table.columns().iter().enumerate() {
        match defaults.map(|row| &row[i]) {
            Some(value) if !value.is_empty() => println!("  [{:2}] {} = {}", i + 1, col, value),
            _ => println!("  [{:2}] {}", i + 1, col),
        }
    }
    Ok(())
}
