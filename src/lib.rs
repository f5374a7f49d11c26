pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Command;
use crate::config::Config;
use crate::error::CompileError;
use crate::model::{CollisionArray, ObjectModel, Slope};

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_tracing(args.verbose);
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Objects {
            input,
            project_dir,
            header,
            container,
            dump_model,
        } => {
            // 1. ── Parse + process ────────────────────────────────────────
            let doc = read_map(&input)?;
            let container = container
                .unwrap_or_else(|| config.objects.container.clone());
            let model = compile_objects(&doc, &container)
                .with_context(|| format!("Compiling objects of {}", input.display()))?;

            // 2. ── Write outputs ──────────────────────────────────────────
            let written = writer::c::emit(&model, &config.objects, &project_dir, &header)
                .with_context(|| "Writing C artifacts")?;
            if let Some(path) = dump_model {
                let json = serde_json::to_string_pretty(&model)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Writing {}", path.display()))?;
            }
            info!(
                header = %written[0].display(),
                source = %written[1].display(),
                "object files generated"
            );
        }
        Command::Collision {
            input,
            out_dir,
            header,
            rle,
            layer,
        } => {
            let doc = read_map(&input)?;
            let layer = layer.unwrap_or_else(|| config.collision.layer.clone());
            let grid = compile_collision(&doc, &layer, rle)
                .with_context(|| format!("Compiling layer `{layer}` of {}", input.display()))?;

            let written =
                writer::collision::emit(&grid, &config.collision.includes, &out_dir, &header)
                    .with_context(|| "Writing collision header")?;
            info!(header = %written.display(), compressed = rle, "collision header generated");
        }
        Command::Slopes {
            input,
            output,
            container,
        } => {
            let doc = read_map(&input)?;
            let container = container
                .unwrap_or_else(|| config.slopes.container.clone());
            let slopes = compile_slopes(&doc, &container)
                .with_context(|| format!("Exporting slopes of {}", input.display()))?;

            writer::slopes::emit(&slopes, &config.slopes, &output)
                .with_context(|| format!("Writing {}", output.display()))?;
            info!(output = %output.display(), count = slopes.len(), "slopes exported");
        }
    }

    Ok(())
}

/// Object container → grouped, typed model.
pub fn compile_objects(doc: &str, container: &str) -> Result<ObjectModel, CompileError> {
    let objects = parser::load_objects(doc, container)?;
    processor::run(objects)
}

/// Collision layer → array ready for the header writer.
pub fn compile_collision(
    doc: &str,
    layer: &str,
    compress: bool,
) -> Result<CollisionArray, CompileError> {
    let grid = parser::load_grid(doc, layer)?;
    Ok(processor::pack_grid(grid, compress))
}

pub fn compile_slopes(doc: &str, container: &str) -> Result<Vec<Slope>, CompileError> {
    parser::load_slopes(doc, container)
}

fn read_map(path: &Path) -> anyhow::Result<String> {
    let doc = std::fs::read_to_string(path)
        .with_context(|| format!("Reading {}", path.display()))?;
    info!(path = %path.display(), bytes = doc.len(), "map loaded");
    Ok(doc)
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    // keeps an already installed subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
