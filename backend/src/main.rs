//! Flightprep CLI - clean and encode flight listings
//!
//! # Commands
//!
//! ```bash
//! flightprep clean Data_Train.xlsx -o cleaned.csv     # Cleaned table as CSV
//! flightprep encode Data_Train.xlsx -c Airline        # One-hot block as CSV
//! flightprep report Data_Train.xlsx --json            # Run summary
//! flightprep stages                                   # List cleaning stages
//! flightprep serve                                    # Start HTTP server (port 3000)
//! ```

use clap::{Parser, Subcommand};
use flightprep::models::columns;
use flightprep::table::cell_text;
use flightprep::{build_summary, describe_stages, process_file, PipelineOptions, Table};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "flightprep")]
#[command(about = "Clean and one-hot encode flight-fare listings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every cleaning stage and output the cleaned table as CSV
    Clean {
        /// Input CSV or XLSX file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the one-hot block as CSV
        #[arg(long)]
        encoded: Option<PathBuf>,
    },

    /// Clean, then output only the one-hot block as CSV
    Encode {
        /// Input CSV or XLSX file
        input: PathBuf,

        /// Columns to encode (default: Airline, Source, Destination)
        #[arg(short, long = "column")]
        columns: Vec<String>,
    },

    /// Print previews, distributions and price statistics
    Report {
        /// Input CSV or XLSX file
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Rows shown in each preview
        #[arg(long, default_value = "5")]
        preview_rows: usize,
    },

    /// Show the cleaning stages in execution order
    Stages,

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "FLIGHTPREP_PORT", default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input,
            output,
            encoded,
        } => cmd_clean(&input, output.as_deref(), encoded.as_deref()),

        Commands::Encode { input, columns } => cmd_encode(&input, columns),

        Commands::Report {
            input,
            json,
            preview_rows,
        } => cmd_report(&input, json, preview_rows),

        Commands::Stages => cmd_stages(),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_clean(
    input: &Path,
    output: Option<&Path>,
    encoded_output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = process_file(input, &PipelineOptions::default())?;

    write_table(&result.cleaned, output)?;

    if let Some(path) = encoded_output {
        write_table(&result.encoded.to_table(), Some(path))?;
    }

    eprintln!("✨ Done: {} rows", result.cleaned.len());
    Ok(())
}

fn cmd_encode(input: &Path, encode_columns: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = PipelineOptions::default();
    if !encode_columns.is_empty() {
        options.encode_columns = encode_columns;
    }

    let result = process_file(input, &options)?;
    eprintln!(
        "📦 {} indicator columns from {}",
        result.encoded.width(),
        options.encode_columns.join(", ")
    );
    write_table(&result.encoded.to_table(), None)
}

fn cmd_report(input: &Path, json: bool, preview_rows: usize) -> Result<(), Box<dyn std::error::Error>> {
    let options = PipelineOptions {
        preview_rows,
        ..Default::default()
    };
    let result = process_file(input, &options)?;
    let summary = build_summary(&result, preview_rows)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render_text());
    }
    Ok(())
}

fn cmd_stages() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", describe_stages());
    eprintln!("\nRequired input columns: {}", columns::REQUIRED.join(", "));
    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    flightprep::server::start_server(port).await?;
    Ok(())
}

/// Write a table as CSV to `path`, or stdout. Nulls become empty cells.
fn write_table(table: &Table, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let sink: Box<dyn Write> = match path {
        Some(p) => Box::new(fs::File::create(p)?),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(table.columns())?;
    for row in table.records() {
        writer.write_record(
            table
                .columns()
                .iter()
                .map(|c| row.get(c).and_then(cell_text).unwrap_or_default()),
        )?;
    }
    writer.flush()?;

    if let Some(p) = path {
        eprintln!("💾 Output written to: {}", p.display());
    }
    Ok(())
}
