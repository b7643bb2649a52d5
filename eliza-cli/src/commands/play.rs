//! Play command implementation.

use anyhow::{Context, Result};
use eliza_core::{Console, ConversationEngine, EngineConfig, ScriptedConsole, StdConsole};
use std::fs;
use std::path::{Path, PathBuf};

use super::scripts::load_script;

pub struct PlayOptions {
    pub script: String,
    pub file: Option<PathBuf>,
    pub recap: bool,
}

/// Converse over stdin/stdout until a blank line or end of input
pub fn play(config_path: Option<&Path>, opts: PlayOptions) -> Result<()> {
    let config = load_config(config_path)?;
    let script = load_script(&opts.script)?;
    let mut engine = ConversationEngine::with_config(script, config);

    let mut console: Box<dyn Console> = match &opts.file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {:?}", path))?;
            let console = ScriptedConsole::new(text.lines())
                .with_echo(true)
                .with_fallback(StdConsole::stdio());
            tracing::debug!(lines = console.remaining(), "queued input lines");
            Box::new(console)
        }
        None => Box::new(StdConsole::stdio()),
    };

    let transcript = engine
        .run(console.as_mut())
        .context("Conversation aborted")?;

    if opts.recap {
        println!();
        print!("{}", transcript);
    }
    Ok(())
}

/// Engine configuration from `path`, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => Ok(EngineConfig::default()),
    }
}
