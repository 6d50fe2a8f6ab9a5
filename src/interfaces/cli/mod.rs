//! Command-line interface for `ccpop`.

use std::path::PathBuf;

use clap::Parser;

use crate::io::format::{ccpop_output, log_title};

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs a nicely formatted `ccpop` heading to the `ccpop-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    log_title(&format!("ccpop {version}: overlap population analysis"));
    ccpop_output!("");
}

/// Command-line arguments of the `ccpop` binary.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to the main output file. If not given, the main output is written to the standard
    /// output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
