//! Annograph CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, info};

use annograph_cli::{Args, error_adapter::ErrorAdapter};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Annograph");
    debug!(args:?; "Parsed arguments");

    match annograph_cli::run(&args) {
        Ok(report) => {
            info!(
                rendered = report.documents_rendered,
                failed = report.documents_failed,
                skipped_files = report.files_skipped;
                "Completed"
            );
        }
        Err(err) => {
            let reporter = miette::GraphicalReportHandler::new();
            let mut writer = String::new();
            reporter
                .render_report(&mut writer, &ErrorAdapter(&err))
                .expect("Writing to String buffer is infallible");

            // Fatal errors are reported even when logging is turned off.
            eprintln!("{writer}");
            process::exit(1);
        }
    }
}
