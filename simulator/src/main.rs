use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use luckywheel_execution::{rng_from_seed, Engine, EngineError};
use luckywheel_simulator::{media::read_data_uri, Config, Session, SqliteStore, ValidatedConfig};
use luckywheel_types::MediaSlot;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};

fn init_tracing(level: Level) {
    // Stdout carries the JSON output.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Prize wheel draw host")]
struct Args {
    /// YAML config file (defaults apply when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite file holding the draw state.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Seed for a reproducible ticket mapping and draw order.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print the current state as JSON.
    Status,
    /// Spin the wheel and print each winner.
    Draw {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Start a new epoch with a fresh ticket mapping.
    Reset,
    /// Store a file in a media slot: `bg`, `music`, or a tier for its win sound.
    Media {
        slot: MediaSlot,
        file: PathBuf,
        /// MIME type, if it cannot be inferred from the file extension.
        #[arg(long)]
        mime: Option<String>,
    },
    /// Empty a media slot.
    ClearMedia { slot: MediaSlot },
    /// Forget everything, custom media included, and start a new epoch.
    Defaults,
}

fn build_config(args: &Args) -> Result<ValidatedConfig> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(store) = &args.store {
        config.store_path = store.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.validate().context("invalid config")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("encode output")?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;
    init_tracing(config.log_level);

    let store = SqliteStore::open(&config.store_path)?;
    let mut engine = Engine::open(
        config.catalog,
        config.engine,
        store,
        rng_from_seed(config.seed),
    )?;
    info!(store = %config.store_path.display(), "draw store opened");

    match args.command {
        Command::Status => print_json(&engine.snapshot())?,
        Command::Draw { count } => {
            let mut session = Session::new(engine);
            for _ in 0..count {
                match session.draw().await {
                    Ok(Some(reveal)) => print_json(&reveal)?,
                    Ok(None) => {}
                    Err(EngineError::Draw(err)) => {
                        info!(%err, "no more draws");
                        break;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
        Command::Reset => {
            engine.request_reset()?;
            print_json(&engine.snapshot())?;
        }
        Command::Media { slot, file, mime } => {
            let uri = read_data_uri(&file, mime.as_deref())?;
            engine.set_media(slot, uri)?;
            info!(?slot, file = %file.display(), "media stored");
        }
        Command::ClearMedia { slot } => engine.clear_media(slot)?,
        Command::Defaults => {
            engine.restore_defaults()?;
            print_json(&engine.snapshot())?;
        }
    }
    Ok(())
}
