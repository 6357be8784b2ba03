use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use worldpaint::cli::commands;
use worldpaint::config::EditorConfig;
use worldpaint::world::tile::TileCoord;

#[derive(Parser)]
#[command(name = "worldpaint")]
#[command(about = "A tile-based world editor: paint, generate, and snapshot layered grids")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "worldpaint.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a seeded world and store it as a snapshot
    Generate {
        /// Numeric or text seed. Omit for a non-reproducible world
        #[arg(short, long)]
        seed: Option<String>,

        /// Snapshot name
        #[arg(short, long, default_value = "Generated world")]
        name: String,

        /// Embed a PNG preview in the snapshot
        #[arg(long)]
        preview: bool,
    },

    /// Inspect a stored snapshot or one of its tiles
    Inspect {
        /// Snapshot id (defaults to the newest)
        #[arg(short, long)]
        id: Option<String>,

        /// Tile index to inspect
        #[arg(short, long, conflicts_with = "at")]
        tile: Option<usize>,

        /// Grid coordinate to inspect, as `x,y`
        #[arg(long, value_parser = parse_coord, allow_hyphen_values = true)]
        at: Option<TileCoord>,
    },

    /// Render a stored snapshot to a PNG file
    Preview {
        /// Snapshot id (defaults to the newest)
        #[arg(short, long)]
        id: Option<String>,

        /// Output PNG path
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        /// Pixels per tile
        #[arg(long, default_value_t = 8)]
        scale: u32,
    },

    /// Manage stored snapshots
    Snapshots {
        #[command(subcommand)]
        action: SnapshotAction,
    },
}

#[derive(Subcommand)]
enum SnapshotAction {
    /// List stored snapshots, newest first
    List,

    /// Restore a snapshot and print its contents
    Restore {
        /// Snapshot id
        id: String,
    },

    /// Rename a snapshot
    Rename {
        /// Snapshot id
        id: String,
        /// New name
        name: String,
    },

    /// Delete a snapshot
    Delete {
        /// Snapshot id
        id: String,
    },

    /// Delete all but the newest snapshots
    Prune {
        /// How many to keep (defaults to max_snapshots from config)
        #[arg(short, long)]
        keep: Option<usize>,
    },
}

fn parse_coord(value: &str) -> Result<TileCoord, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{}'", value))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid x '{}': {}", x, e))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid y '{}': {}", y, e))?;
    Ok(TileCoord::new(x, y))
}

fn init_logging(config: &EditorConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match EditorConfig::load_or_default(Path::new(&cli.config)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Commands::Generate {
            seed,
            name,
            preview,
        } => commands::generate(&config, seed.as_deref(), &name, preview),

        Commands::Inspect { id, tile, at } => commands::inspect(&config, id.as_deref(), tile, at),

        Commands::Preview { id, output, scale } => {
            commands::preview(&config, id.as_deref(), &output, scale)
        }

        Commands::Snapshots { action } => match action {
            SnapshotAction::List => commands::list_snapshots(&config),
            SnapshotAction::Restore { id } => commands::restore_snapshot(&config, &id),
            SnapshotAction::Rename { id, name } => commands::rename_snapshot(&config, &id, &name),
            SnapshotAction::Delete { id } => commands::delete_snapshot(&config, &id),
            SnapshotAction::Prune { keep } => commands::prune_snapshots(&config, keep),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
