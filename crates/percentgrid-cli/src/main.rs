//! percentgrid CLI - compute percent layouts from description files.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::needless_raw_string_hashes
)]

mod config;
mod error;
mod report;

use clap::{ArgAction, Parser, Subcommand};
use config::LayoutDescription;
use error::CliResult;
use percentgrid_core::{Insets, Size};
use report::{LayoutReport, SizeReport};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "percentgrid")]
#[command(about = "Compute cell based layouts from TOML or YAML descriptions")]
#[command(version)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the preferred and minimum container size
    Size {
        /// Layout description (.toml, .yaml or .yml)
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Lay out every component and print its bounds
    Layout {
        /// Layout description (.toml, .yaml or .yml)
        file: PathBuf,

        /// Container width (default: from the description, else preferred)
        #[arg(short = 'W', long)]
        width: Option<i32>,

        /// Container height (default: from the description, else preferred)
        #[arg(short = 'H', long)]
        height: Option<i32>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check a description without laying it out
    Check {
        /// Layout description (.toml, .yaml or .yml)
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Size { file, json } => size(&file, json),
        Commands::Layout {
            file,
            width,
            height,
            json,
        } => layout(&file, width, height, json),
        Commands::Check { file } => check(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` applies unless `-v` is given.
fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}

fn emit<T: Serialize + Display>(value: &T, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn compute_size(desc: &LayoutDescription) -> CliResult<SizeReport> {
    let mut prepared = desc.prepare()?;
    let preferred = prepared.layout.preferred_layout_size(&prepared.platform)?;
    let minimum = prepared.layout.minimum_layout_size(&prepared.platform)?;
    Ok(SizeReport { preferred, minimum })
}

fn size(file: &Path, json: bool) -> CliResult<()> {
    let desc = LayoutDescription::load(file)?;
    emit(&compute_size(&desc)?, json)
}

/// Resolve the container: explicit arguments win over the description,
/// missing dimensions fall back to the preferred size plus insets.
fn compute_layout(
    desc: &LayoutDescription,
    width: Option<i32>,
    height: Option<i32>,
) -> CliResult<LayoutReport> {
    let mut prepared = desc.prepare()?;
    let insets = desc.container.map_or(Insets::ZERO, |c| c.insets);
    let preferred = prepared.layout.preferred_layout_size(&prepared.platform)?;

    let container = Size::new(
        width
            .or(desc.container.map(|c| c.width))
            .unwrap_or(preferred.width + insets.horizontal()),
        height
            .or(desc.container.map(|c| c.height))
            .unwrap_or(preferred.height + insets.vertical()),
    );
    log::debug!(
        "laying out {} components in {}x{}",
        prepared.names.len(),
        container.width,
        container.height
    );

    let cells = prepared
        .layout
        .perform_layout(&mut prepared.platform, insets, container)?;
    Ok(LayoutReport::new(&prepared, container, cells))
}

fn layout(file: &Path, width: Option<i32>, height: Option<i32>, json: bool) -> CliResult<()> {
    let desc = LayoutDescription::load(file)?;
    emit(&compute_layout(&desc, width, height)?, json)
}

fn check(file: &Path) -> CliResult<()> {
    let desc = LayoutDescription::load(file)?;
    let mut prepared = desc.prepare()?;
    prepared.layout.cell_grid()?.validate()?;
    println!("{}: ok ({} components)", file.display(), prepared.names.len());
    Ok(())
}
