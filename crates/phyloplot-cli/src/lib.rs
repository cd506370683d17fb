//! CLI logic for the phyloplot chart tool.
//!
//! Each subcommand reads the input named in the configuration, runs one
//! pipeline and writes the PNG named in the configuration.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{fs, io, path::Path};

use log::info;

use phyloplot::{PhyloplotError, PlotBuilder};

/// Run the phyloplot CLI application
///
/// # Errors
///
/// Returns `PhyloplotError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Series length and embedding errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), PhyloplotError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let builder = PlotBuilder::new(app_config);

    match args.command {
        Command::Diversity => diversity(&builder),
        Command::TreeSpace => tree_space(&builder),
    }
}

fn diversity(builder: &PlotBuilder) -> Result<(), PhyloplotError> {
    let config = builder.config().diversity();
    info!(
        input_path:? = config.input(),
        output_path:? = config.output();
        "Processing diversity series"
    );

    let source = read_input(config.input())?;
    let parsed = builder.parse_diversity(&source)?;
    error_adapter::report_warnings(parsed.warnings(), &source);

    builder.render_diversity(parsed.value(), config.output())?;

    info!(output_file:? = config.output(); "PNG exported successfully");
    Ok(())
}

fn tree_space(builder: &PlotBuilder) -> Result<(), PhyloplotError> {
    let config = builder.config().tree_space();
    info!(
        input_path:? = config.input(),
        output_path:? = config.output();
        "Processing tree-space distances"
    );

    let source = read_input(config.input())?;
    let parsed = builder.parse_distances(&source)?;
    error_adapter::report_warnings(parsed.warnings(), &source);

    let embedding = builder.embed(parsed.value())?;
    builder.render_tree_space(&embedding, config.output())?;

    info!(output_file:? = config.output(); "PNG exported successfully");
    Ok(())
}

fn read_input(path: &Path) -> Result<String, PhyloplotError> {
    fs::read_to_string(path).map_err(|err| {
        PhyloplotError::Io(io::Error::new(
            err.kind(),
            format!("{}: {err}", path.display()),
        ))
    })
}
