use std::path::PathBuf;
use std::process::ExitCode;

use calicon::config::{self, Overrides};
use calicon::export;
use calicon::font::Font;
use calicon::{logger, IconComposer, Softening};
use clap::Parser;
use log::{debug, error};

#[derive(Debug, Parser)]
#[command(name = "genicon", about = "Draw the app icon at every required size")]
struct Args {
    /// Output directory (default: generated_dir from the config file).
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// TrueType/OpenType file for the badge text.
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// System font family for the badge text when no font file is given.
    #[arg(long, value_name = "NAME")]
    family: Option<String>,

    /// Background softening: gradient or stacked.
    #[arg(long, value_name = "MODE")]
    softening: Option<Softening>,

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
            font_path: args.font,
            font_family: args.family,
            softening: args.softening,
            continue_on_error: args.continue_on_error,
            ..Overrides::default()
        },
        false,
    );
    logger::init(args.verbose, cfg.log_file.as_deref());
    debug!("effective config: {}", serde_json::to_string(&cfg).unwrap_or_default());

    let composer = IconComposer::new(Font::resolve(&cfg.font_spec()), cfg.softening);
    match export::export_generated(&composer, &cfg.generated_dir, cfg.batch_policy()) {
        Ok(report) => {
            if export::conclude(&report, args.report.as_deref()) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("icon generation failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
