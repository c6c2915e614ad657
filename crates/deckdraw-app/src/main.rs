//! Headless editor driver: replays a script of editor events and prints the
//! resulting scene as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use deckdraw_app::{ShortcutRegistry, load_config, run_script};
use std::path::PathBuf;

/// Replay editor events against a fresh slide
#[derive(Parser)]
#[command(name = "deckdraw")]
#[command(about = "Headless driver for the DeckDraw slide editor")]
struct Cli {
    /// Editor config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the final scene here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print keyboard shortcuts and exit
    #[arg(long)]
    shortcuts: bool,

    /// Script of editor events (JSON array)
    #[arg(required_unless_present = "shortcuts")]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.shortcuts {
        ShortcutRegistry::print_all();
        return Ok(());
    }

    log::info!("Starting DeckDraw");
    let config = load_config(cli.config.as_deref())?;

    let Some(script_path) = cli.script else {
        anyhow::bail!("No script given");
    };
    let script = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;

    let (editor, summary) = run_script(config, &script)?;
    log::info!(
        "{} objects on canvas, history at {:?} of {}",
        editor.scene().len(),
        editor.history().cursor(),
        editor.history().len()
    );

    let json = editor.scene().to_json()?;
    match cli.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Replayed {} events ({} changes) into {}",
                summary.events,
                summary.changes,
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
