use anyhow::Context;
use clap::{Parser, Subcommand};
use driftscape_common::SceneConfig;
use driftscape_input::normalize;
use driftscape_render::{DebugTextRenderer, Renderer, Viewport};
use driftscape_scene::Cityscape;
use driftscape_tools::{CityscapeSummary, SceneInspector};
use driftscape_waves::Sea;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "driftscape-cli", about = "CLI tool for driftscape scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default scene sizes
    Info,
    /// Run the voxel cityscape headless and print the result
    Cityscape {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Simulated frame duration in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        /// RNG seed for the initial grid and mutations
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// YAML scene configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Rows of the height map to print
        #[arg(long, default_value = "0")]
        map: u32,
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Tick the sea wave field and report displacement
    Waves {
        /// Number of wave ticks
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// RNG seed for per-vertex wave parameters
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// YAML scene configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Clamp a value into [vmin, vmax] and map it onto [tmin, tmax]
    #[command(allow_negative_numbers = true)]
    Normalize {
        v: f32,
        vmin: f32,
        vmax: f32,
        tmin: f32,
        tmax: f32,
    },
    /// Write the default scene configuration as YAML
    Config {
        /// Output path
        #[arg(short, long, default_value = "driftscape.yaml")]
        out: PathBuf,
    },
}

/// Report for one headless cityscape run.
#[derive(Debug, Serialize)]
struct CityscapeRun {
    seed: u64,
    frames: u64,
    frame_ms: u64,
    mutations: usize,
    summary: CityscapeSummary,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load_yaml(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            let config = SceneConfig::default();
            println!("driftscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "cityscape: grid {0}x{0}, {1} slots per column, {2} instances",
                config.voxel.grid_size,
                config.voxel.max_column_height,
                config.voxel.instance_count()
            );
            println!(
                "sea: radius {}, length {}, {}x{} segments",
                config.wave.radius,
                config.wave.length,
                config.wave.radial_segments,
                config.wave.length_segments
            );
            println!("sky: {} clouds", config.flight.cloud_count);
        }
        Commands::Cityscape {
            frames,
            frame_ms,
            seed,
            config,
            map,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let mut scene = Cityscape::new(&config.voxel, seed)?;
            let dt = Duration::from_millis(frame_ms);
            let mut mutations = 0;
            for _ in 0..frames {
                mutations += scene.advance(dt).mutations;
            }
            scene.teardown();
            tracing::debug!(frames, mutations, "cityscape run finished");

            if json {
                let run = CityscapeRun {
                    seed,
                    frames,
                    frame_ms,
                    mutations,
                    summary: SceneInspector::cityscape(&scene),
                };
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                let renderer = DebugTextRenderer::with_map(map);
                print!("{}", renderer.render_cityscape(&scene, &Viewport::default()));
                println!("Mutations applied: {mutations}");
                println!("{}", SceneInspector::cityscape(&scene));
            }
        }
        Commands::Waves {
            ticks,
            seed,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let mut rng = StdRng::seed_from_u64(seed);
            let mut sea = Sea::new(&config.wave, &mut rng);
            for _ in 0..ticks {
                sea.move_waves();
            }

            let max_offset = sea
                .field
                .vertices()
                .iter()
                .map(|v| (v.displaced() - v.base).length())
                .fold(0.0_f32, f32::max);
            println!("Sea: vertices={} triangles={}", sea.field.len(), sea.indices.len() / 3);
            println!(
                "After {} ticks: rotation={:.4} max_offset={:.3}",
                sea.field.ticks(),
                sea.rotation_z,
                max_offset
            );
            for (i, v) in sea.field.vertices().iter().take(3).enumerate() {
                let p = v.displaced();
                println!(
                    "  vertex {i}: phase={:.4} pos=({:.2}, {:.2}, {:.2})",
                    v.phase, p.x, p.y, p.z
                );
            }
        }
        Commands::Normalize {
            v,
            vmin,
            vmax,
            tmin,
            tmax,
        } => {
            println!("{}", normalize(v, vmin, vmax, tmin, tmax));
        }
        Commands::Config { out } => {
            SceneConfig::default()
                .save_yaml(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Default config written to {}", out.display());
        }
    }

    Ok(())
}
