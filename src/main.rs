use anyhow::{Context, Result};
use campus_energy::cli::{run, Cli};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).context("campus-energy run failed")
}
