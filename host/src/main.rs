use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use host::{load_maze_file, render_maze_png, run_generate, ExitEdge, MazeConfig, MazeSummary};

/// Generate, store and render grid mazes
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a maze, render it to PNG and save its binary data
    Generate {
        /// JSON file with default settings; flags override it
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Maze width in cells
        #[arg(long)]
        width: Option<usize>,

        /// Maze height in cells
        #[arg(long)]
        height: Option<usize>,

        /// Seed for reproducible generation
        #[arg(long)]
        seed: Option<u32>,

        /// Pixels per cell in the image
        #[arg(long, value_name = "PIXELS")]
        grid_size: Option<usize>,

        /// Exit edge relative to the entrance (same|opposite)
        #[arg(long, value_name = "EDGE")]
        exit_edge: Option<ExitEdge>,

        /// PNG output file
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,

        /// Binary maze output file
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
    },

    /// Render a saved maze to PNG
    Render {
        /// Binary maze file
        data: PathBuf,

        /// Pixels per cell in the image
        #[arg(long, value_name = "PIXELS", default_value_t = 11)]
        grid_size: usize,

        /// PNG output file; defaults to `restored_<data file name>.png`
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },

    /// Describe a saved maze
    Info {
        /// Binary maze file
        data: PathBuf,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate {
            config,
            width,
            height,
            seed,
            grid_size,
            exit_edge,
            image,
            data,
        } => {
            let mut settings = match config {
                Some(path) => MazeConfig::from_file(&path).unwrap_or_else(|e| {
                    eprintln!("❌ Error loading config {}: {}", path.display(), e);
                    std::process::exit(1);
                }),
                None => MazeConfig::default(),
            };
            if let Some(width) = width {
                settings.width = width;
            }
            if let Some(height) = height {
                settings.height = height;
            }
            if seed.is_some() {
                settings.seed = seed;
            }
            if let Some(grid_size) = grid_size {
                settings.grid_size = grid_size;
            }
            if let Some(exit_edge) = exit_edge {
                settings.exit_edge = exit_edge;
            }
            if let Some(image) = image {
                settings.image_path = image;
            }
            if let Some(data) = data {
                settings.data_path = data;
            }
            generate_command(&settings)
        }
        Command::Render { data, grid_size, image } => render_command(&data, grid_size, image),
        Command::Info { data, json } => info_command(&data, json),
    };

    if let Err(e) = result {
        eprintln!();
        eprintln!("❌ Error: {}", e);
        eprintln!("{}", "=".repeat(70));
        std::process::exit(1);
    }
}

fn generate_command(config: &MazeConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("📋 Generating a {}-by-{} maze", config.width, config.height);
    match config.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: (random)"),
    }
    println!("  Exit edge: {}", config.exit_edge);
    println!();

    let start = Instant::now();
    let (_maze, summary) = run_generate(config)?;

    println!("✅ Maze generated in {:.2}s", start.elapsed().as_secs_f64());
    print_summary(&summary);
    println!(
        "🖼  Image written to: {} (grid size {})",
        config.image_path.display(),
        config.grid_size
    );
    println!("💾 Maze data saved to: {}", config.data_path.display());
    println!("{}", "=".repeat(70));
    Ok(())
}

fn render_command(
    data: &Path,
    grid_size: usize,
    image: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = image.unwrap_or_else(|| {
        let name = data
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "maze".to_string());
        data.with_file_name(format!("restored_{}.png", name))
    });

    println!("📦 Reading maze data from {}", data.display());
    let maze = load_maze_file(data)?;

    render_maze_png(&maze, &image, grid_size)?;
    println!("🖼  Restored image written to: {} (grid size {})", image.display(), grid_size);
    Ok(())
}

fn info_command(data: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let maze = load_maze_file(data)?;
    let summary = MazeSummary::of(&maze, None);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("📦 {}", data.display());
    print_summary(&summary);
    println!();
    print!("{}", maze);
    Ok(())
}

fn print_summary(summary: &MazeSummary) {
    println!("  Size: {}x{} cells", summary.width, summary.height);
    match (summary.entrance, summary.exit) {
        (Some(entrance), Some(exit)) => {
            println!("  Entrance: ({}, {})", entrance.col, entrance.row);
            println!("  Exit: ({}, {})", exit.col, exit.row);
        }
        _ => println!("  Entrance/exit: not set"),
    }
    println!("  Open passages: {}", summary.open_passages);
}
