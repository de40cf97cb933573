//! Terrain Raster command line
//!
//! Renders a delimited height grid (or the reference cube) to a PNG.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use terrain_raster::rasterizer::{DepthInterpolation, Vec4};
use terrain_raster::terrain::{build_terrain, reference_cube, render_quads, HeightGrid, Quad};
use terrain_raster::{load_config, save_config, RenderConfig};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "terrain-raster", version = VERSION)]
#[command(about = "Render height-field terrain with a software rasterizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Only report warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Report per-pass details
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a height grid file to PNG
    Render {
        /// Delimited text file of height samples
        input: PathBuf,

        /// Output PNG
        #[arg(short, long, default_value = "graph.png")]
        output: PathBuf,

        /// RON render configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Image width in pixels
        #[arg(long)]
        width: Option<usize>,

        /// Image height in pixels
        #[arg(long)]
        height: Option<usize>,

        /// Field separator of the input file
        #[arg(long)]
        delimiter: Option<char>,

        /// Use the legacy per-pixel depth formula
        #[arg(long)]
        legacy_depth: bool,
    },
    /// Render the reference cube centred on the origin
    Cube {
        /// Output PNG
        #[arg(short, long, default_value = "cube.png")]
        output: PathBuf,

        /// RON render configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Half extent of the cube on every axis
        #[arg(long, default_value = "1.0")]
        size: f64,
    },
    /// Write the default configuration as RON
    InitConfig {
        /// Destination file
        path: PathBuf,
    },
}

fn init_logging(quiet: bool, verbose: bool) {
    let default_filter = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn read_config(path: Option<&PathBuf>) -> anyhow::Result<RenderConfig> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(RenderConfig::default()),
    }
}

fn render_to_file(config: &RenderConfig, quads: &[Quad], output: &Path, progress: bool) -> anyhow::Result<()> {
    let mut renderer = config.build_renderer().context("invalid render setup")?;
    render_quads(&mut renderer, quads, progress);
    renderer
        .framebuffer
        .save_png(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!(
        "wrote {} ({}x{})",
        output.display(),
        config.image.width,
        config.image.height
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            width,
            height,
            delimiter,
            legacy_depth,
        } => {
            let mut config = read_config(config.as_ref())?;
            if let Some(width) = width {
                config.image.width = width;
            }
            if let Some(height) = height {
                config.image.height = height;
            }
            if let Some(delimiter) = delimiter {
                config.terrain.delimiter = delimiter;
            }
            if legacy_depth {
                config.raster.depth = DepthInterpolation::Legacy;
            }

            let grid = HeightGrid::load(&input, config.terrain.delimiter)
                .with_context(|| format!("failed to load height grid {}", input.display()))?;
            let quads = build_terrain(&grid.normalized(), config.terrain.elevation);
            log::info!("{} rows -> {} quads", grid.rows.len(), quads.len());

            render_to_file(&config, &quads, &output, !cli.quiet)
        }
        Commands::Cube { output, config, size } => {
            let mut config = read_config(config.as_ref())?;
            config.camera.focus = Vec4::point(0.0, 0.0, 0.0);
            let quads = reference_cube(size, size, size);
            render_to_file(&config, &quads, &output, !cli.quiet)
        }
        Commands::InitConfig { path } => {
            save_config(&RenderConfig::default(), &path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote default config to {}", path.display());
            Ok(())
        }
    }
}
