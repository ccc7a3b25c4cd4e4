// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fieldpress — command-line front end.
//
// Entry point. Initialises logging, loads the engine configuration, and runs
// one document operation per invocation.

mod commands;
mod fonts;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fieldpress_core::{EngineConfig, FieldpressError, Result, WatermarkOptions};

use commands::RenderArgs;

#[derive(Parser)]
#[command(
    name = "fieldpress",
    version,
    about = "Compose form fields onto PDFs, restructure pages, and render pages to PNG"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON engine configuration; missing keys take their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Flate-compress output streams
    #[arg(long, global = true)]
    compress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the fields described in a JSON file onto a PDF
    Compose {
        input: PathBuf,
        /// Array of tagged placements, or an object grouped by category
        fields: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Concatenate PDFs in the given order
    Merge {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Copy selected pages (zero-based, comma separated) into a new PDF
    Extract {
        input: PathBuf,
        #[arg(long, value_delimiter = ',', required = true)]
        pages: Vec<usize>,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Turn one page clockwise
    Rotate {
        input: PathBuf,
        #[arg(long)]
        page: usize,
        #[arg(long, default_value_t = 90, allow_negative_numbers = true)]
        degrees: i64,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Stamp diagonal text across every page
    Watermark {
        input: PathBuf,
        text: String,
        #[arg(long)]
        font_size: Option<f32>,
        #[arg(long)]
        opacity: Option<f32>,
        #[arg(long, allow_negative_numbers = true)]
        rotation: Option<f32>,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Append a completion certificate page
    Certificate {
        input: PathBuf,
        /// Certificate metadata and signers as JSON
        info: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Paint form widgets into the page and remove the interactive form
    Flatten {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Drop unreachable objects and compress every stream
    Optimize {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render one page to PNG
    Render {
        input: PathBuf,
        #[arg(long, default_value_t = 0)]
        page: usize,
        /// Pixels per point (defaults to the configured render scale)
        #[arg(long)]
        scale: Option<f32>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render page 0 as a PNG thumbnail
    Thumbnail {
        input: PathBuf,
        #[arg(long)]
        max_width: Option<u32>,
        #[arg(long)]
        max_height: Option<u32>,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print page count, geometry, and SHA-256 as JSON
    Info { input: PathBuf },
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    config.compress_output |= cli.compress;
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Commands::Compose {
            input,
            fields,
            output,
        } => commands::compose(&config, &input, &fields, &output),
        Commands::Merge { inputs, output } => commands::merge(&config, &inputs, &output),
        Commands::Extract {
            input,
            pages,
            output,
        } => commands::extract(&config, &input, &pages, &output),
        Commands::Rotate {
            input,
            page,
            degrees,
            output,
        } => commands::rotate(&config, &input, page, degrees, &output),
        Commands::Watermark {
            input,
            text,
            font_size,
            opacity,
            rotation,
            output,
        } => {
            let defaults = WatermarkOptions::default();
            let options = WatermarkOptions {
                font_size: font_size.unwrap_or(defaults.font_size),
                opacity: opacity.unwrap_or(defaults.opacity),
                rotation_deg: rotation.unwrap_or(defaults.rotation_deg),
                color: defaults.color,
            };
            commands::watermark(&config, &input, &text, &options, &output)
        }
        Commands::Certificate {
            input,
            info,
            output,
        } => commands::certificate(&config, &input, &info, &output),
        Commands::Flatten { input, output } => commands::flatten(&config, &input, &output),
        Commands::Optimize { input, output } => commands::optimize(&input, &output),
        Commands::Render {
            input,
            page,
            scale,
            width,
            height,
            output,
        } => {
            let args = RenderArgs {
                page,
                scale,
                width,
                height,
            };
            commands::render(&config, &input, args, &output)
        }
        Commands::Thumbnail {
            input,
            max_width,
            max_height,
            output,
        } => commands::thumbnail(&config, &input, max_width, max_height, &output),
        Commands::Info { input } => {
            let summary = commands::info(&input)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

/// 2 when the input was at fault, 1 when the engine failed.
fn exit_status(err: &FieldpressError) -> u8 {
    if err.is_caller_error() { 2 } else { 1 }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.code(), "{err}");
            ExitCode::from(exit_status(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_pages_split_on_commas() {
        let cli = Cli::parse_from(["fieldpress", "extract", "in.pdf", "--pages", "0,2", "-o", "out.pdf"]);
        match cli.command {
            Commands::Extract { pages, .. } => assert_eq!(pages, vec![0, 2]),
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn bad_input_and_engine_failures_exit_differently() {
        let missing = FieldpressError::PageNotFound {
            page: 3,
            page_count: 1,
        };
        assert_eq!(exit_status(&missing), 2);
        assert_eq!(exit_status(&FieldpressError::Serialization("disk full".into())), 1);
    }

    #[test]
    fn compress_flag_overrides_config() {
        let cli = Cli::parse_from(["fieldpress", "--compress", "optimize", "a.pdf", "-o", "b.pdf"]);
        assert!(load_config(&cli).unwrap().compress_output);
    }
}
