//! Raster Comparison CLI Tool
//!
//! A command-line utility that reports distortion metrics between a
//! reference image and a test image.

use clap::Parser;
use rastercmp::cli::{run, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
