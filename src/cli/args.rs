use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "campus-energy")]
#[command(about = "Campus electricity meter ingestion and consumption dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and errors")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: campus-energy.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every meter CSV, aggregate and write all outputs
    Run {
        #[arg(short, long, help = "Directory containing per-building CSV files")]
        data_dir: Option<PathBuf>,

        #[arg(short, long, help = "Directory for generated outputs")]
        output_dir: Option<PathBuf>,

        #[arg(long, help = "Skip the SVG dashboard")]
        no_chart: bool,

        #[arg(long, help = "Also export the cleaned dataset as Parquet")]
        parquet: bool,

        #[arg(short, long, help = "Parquet compression (snappy, gzip, lz4, zstd, none)")]
        compression: Option<String>,

        #[arg(long, help = "Keep negative kWh readings")]
        allow_negative: bool,
    },

    /// Load the data directory and report per-file issues without writing outputs
    Validate {
        #[arg(short, long, help = "Directory containing per-building CSV files")]
        data_dir: Option<PathBuf>,
    },

    /// Print the campus summary to stdout without writing outputs
    Summary {
        #[arg(short, long, help = "Directory containing per-building CSV files")]
        data_dir: Option<PathBuf>,
    },
}
