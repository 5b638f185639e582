use std::path::PathBuf;
use std::process::ExitCode;

use calicon::config::{self, Overrides};
use calicon::{export, logger};
use clap::Parser;
use log::{debug, error};

#[derive(Debug, Parser)]
#[command(name = "mkiconset", about = "Resample an existing icon to every required size")]
struct Args {
    /// Source image (any size or colour mode; default: source_image from the config file).
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// Output directory (default: resized_dir from the config file).
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Keep going after a size fails instead of aborting the batch.
    #[arg(long)]
    continue_on_error: bool,

    /// Write a JSON report of every file to this path.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Read settings from this file instead of the default locations.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut cfg = match config::read_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: cannot read config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    cfg.apply(
        Overrides {
            output_dir: args.out,
            source_image: args.source,
            continue_on_error: args.continue_on_error,
            ..Overrides::default()
        },
        true,
    );
    logger::init(args.verbose, cfg.log_file.as_deref());
    debug!("effective config: {}", serde_json::to_string(&cfg).unwrap_or_default());

    match export::export_resized(&cfg.source_image, &cfg.resized_dir, cfg.batch_policy()) {
        Ok(report) => {
            if export::conclude(&report, args.report.as_deref()) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("icon resampling failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
