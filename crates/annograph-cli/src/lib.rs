//! CLI logic for the Annograph tool.
//!
//! Loads configuration, applies command-line overrides, starts the
//! lemmatizer and runs the batch over the input directory.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, FormatArg, LemmatizerArg};

use std::path::Path;

use log::info;

use annograph::{
    AnnographError, Batch, BatchReport, DiagramBuilder, GraphvizRenderer,
    batch::ensure_directories, config::AppConfig, create_lemmatizer,
};

/// Run the Annograph CLI application
///
/// Renders every document of every matching file in `args.input` into
/// `args.output`.
///
/// # Errors
///
/// Returns `AnnographError` for:
/// - A missing input directory or an uncreatable output directory
/// - Configuration loading errors
/// - A lemmatizer that cannot be started
/// - The first failing document when fail-fast is enabled
pub fn run(args: &Args) -> Result<BatchReport, AnnographError> {
    info!(
        input_dir = args.input,
        output_dir = args.output;
        "Processing annotations"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args);

    let input_dir = Path::new(&args.input);
    let output_dir = Path::new(&args.output);
    ensure_directories(input_dir, output_dir)?;

    let builder = DiagramBuilder::new(&app_config)?;
    let renderer = GraphvizRenderer::new(app_config.output().format());
    let batch = Batch::new(builder, renderer, app_config.output().clone());

    let mut lemmatizer = create_lemmatizer(app_config.lemmatizer())?;
    batch.run(input_dir, output_dir, lemmatizer.as_mut())
}

/// Command-line flags take precedence over the configuration file.
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(engine) = args.lemmatizer {
        config.lemmatizer_mut().set_engine(engine.into());
    }

    let output = config.output_mut();
    if let Some(format) = args.format {
        output.set_format(format.into());
    }
    if let Some(pattern) = &args.pattern {
        output.set_pattern(pattern.clone());
    }
    if args.emit_dot {
        output.set_emit_dot(true);
    }
    if args.fail_fast {
        output.set_fail_fast(true);
    }
}
