//! DeckDraw Application
//!
//! Headless host for the editor core: keyboard shortcut mapping and
//! scripted event replay.

pub mod script;
pub mod shortcuts;

pub use script::{ReplaySummary, ScriptEvent, parse_script, replay};
pub use shortcuts::{EditorAction, KeyChord, Shortcut, ShortcutRegistry};

use anyhow::{Context, Result};
use deckdraw_core::{Editor, EditorConfig};
use std::path::Path;

/// Load the config file, or fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

/// Replay a script against a fresh editor.
pub fn run_script(config: EditorConfig, script: &str) -> Result<(Editor, ReplaySummary)> {
    let events = parse_script(script).context("Failed to parse script")?;
    let mut editor = Editor::new(config);
    let summary = replay(&mut editor, &events);
    Ok((editor, summary))
}
