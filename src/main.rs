//! Binary entrypoint for the Manor CLI.
//!
//! Commands:
//! - `play [--world <path>]` - play a world file in the terminal
//! - `init` - write a starter `config.toml` and the sample world
//! - `check [--world <path>]` - validate a world file without playing
//!
//! See the library crate docs for module-level details: `manor::`.
use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use manor::config::Config;
use manor::game::{console, CommandRegistry, FinishReason, GameController, Notifier, WorldData};

const SAMPLE_WORLD: &str = include_str!("../data/manor.json");

#[derive(Parser)]
#[command(name = "manor")]
#[command(about = "A text adventure engine with timed status effects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a world in the terminal
    Play {
        /// World file (overrides `game.world_file`)
        #[arg(short, long)]
        world: Option<String>,
    },
    /// Write a default config file and the sample world
    Init,
    /// Load and validate a world file
    Check {
        /// World file (overrides `game.world_file`)
        #[arg(short, long)]
        world: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init writes the config, so it starts from defaults.
    let loaded = match cli.command {
        Commands::Init => Ok(None),
        _ => Config::load_if_present(&cli.config).await,
    };
    init_logging(loaded.as_ref().ok().and_then(Option::as_ref), cli.verbose);
    let config = match loaded {
        Ok(Some(config)) => config,
        Ok(None) => {
            if !matches!(cli.command, Commands::Init) {
                warn!("No config at {}; using defaults", cli.config);
            }
            Config::default()
        }
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };

    match cli.command {
        Commands::Play { world } => {
            let path = config.world_path(world.as_deref());
            info!("Starting Manor v{}", env!("CARGO_PKG_VERSION"));
            let world = WorldData::load(&path)
                .await
                .map_err(|e| anyhow!("Failed to load world {}: {}", path, e))?;
            info!("Loaded world {} ({} rooms)", path, world.rooms.len());

            let (notifier, output) = Notifier::channel();
            let printer = console::spawn_printer(output);
            let mut game =
                GameController::new(world, CommandRegistry::with_base_commands(), notifier)
                    .with_prompt(&config.game.prompt)
                    .with_help_hint(config.game.show_help_hint);

            let outcome = match game.start() {
                Ok(()) => game.run(console::spawn_stdin_reader()).await,
                Err(e) => Err(e),
            };
            drop(game);
            let _ = printer.await;

            match outcome {
                Ok(Some(FinishReason::Died)) => info!("Session over: player died"),
                Ok(Some(FinishReason::ReachedExit)) => info!("Session over: exit reached"),
                Ok(None) => info!("Session over: input closed"),
                Err(e) => {
                    error!("Session aborted: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Init => {
            info!("Initializing new Manor configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);

            let world_path = Path::new(&config.game.world_file);
            if world_path.exists() {
                info!("World file {} already exists; leaving it", world_path.display());
            } else {
                if let Some(parent) = world_path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(world_path, SAMPLE_WORLD).await?;
                info!("Sample world written to {}", world_path.display());
            }
        }
        Commands::Check { world } => {
            let path = config.world_path(world.as_deref());
            match WorldData::load(&path).await {
                Ok(world) => {
                    println!(
                        "{}: ok ({} rooms, {} items, start room '{}', base hp {})",
                        path,
                        world.rooms.len(),
                        world.rooms.item_count(),
                        world.start_room,
                        world.basehp
                    );
                }
                Err(e) => {
                    error!("{}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: Option<&Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity wins over the configured level
    let base_level = match verbosity {
        0 => config
            .map(|cfg| cfg.logging.level_filter())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    // stdout carries the game itself; logs stay on stderr
    builder.target(env_logger::Target::Stderr);

    let log_file = config
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Mirror to the console only when someone is watching stderr
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
