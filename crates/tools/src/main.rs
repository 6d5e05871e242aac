use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use story::{CallbackTable, StoryConfig};
use tools::{ReplayStep, chapter_row, logging_callbacks, parse_layer, replay};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate and replay scroll-driven map stories")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a story config and report its chapters
    Check {
        config: PathBuf,

        /// Callback name the page registers (repeatable)
        #[arg(long = "callback")]
        callbacks: Vec<String>,
    },

    /// Run step events through the story and print the map commands as JSON
    Replay {
        config: PathBuf,

        /// Style layer as ID=TYPE, e.g. water=fill (repeatable)
        #[arg(long = "layer")]
        layers: Vec<String>,

        /// Callback name the page registers (repeatable)
        #[arg(long = "callback")]
        callbacks: Vec<String>,

        /// enter:<id>, exit:<id>, up-enter:<id>, up-exit:<id> or settle
        #[arg(required = true)]
        steps: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    match Args::parse().command {
        Command::Check { config, callbacks } => cmd_check(&config, &callbacks),
        Command::Replay {
            config,
            layers,
            callbacks,
            steps,
        } => cmd_replay(&config, &layers, &callbacks, &steps),
    }
}

fn load_config(path: &Path) -> Result<StoryConfig, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    StoryConfig::from_json(&json).map_err(|e| format!("{path:?}: {e}"))
}

fn cmd_check(path: &Path, callbacks: &[String]) -> Result<(), String> {
    let config = load_config(path)?;
    let registry = config.registry().map_err(|e| e.to_string())?;
    let table: CallbackTable = logging_callbacks(callbacks.iter().map(String::as_str));
    table.validate(&registry).map_err(|e| e.to_string())?;

    info!(chapters = registry.len(), "config ok");
    for (i, chapter) in registry.iter().enumerate() {
        println!("{}", chapter_row(i, chapter));
    }
    let layers: Vec<_> = registry.layer_ids().into_iter().collect();
    if !layers.is_empty() {
        println!("layers: {}", layers.join(", "));
    }
    Ok(())
}

fn cmd_replay(
    path: &Path,
    layers: &[String],
    callbacks: &[String],
    steps: &[String],
) -> Result<(), String> {
    let config = load_config(path)?;
    let style = layers
        .iter()
        .map(|l| parse_layer(l))
        .collect::<Result<Vec<_>, _>>()?;
    let steps = steps
        .iter()
        .map(|s| ReplayStep::parse(s))
        .collect::<Result<Vec<_>, _>>()?;

    let report = replay(&config, style, callbacks, &steps).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&report).map_err(|e| format!("encode report: {e}"))?;
    println!("{json}");
    Ok(())
}
