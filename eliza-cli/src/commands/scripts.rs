//! Builtin script catalogue and script resolution.

use anyhow::{Context, Result};
use eliza_core::{Script, ScriptError};
use eliza_slip::ErrorContext;
use include_dir::{include_dir, Dir};
use std::fs;
use std::path::Path;

/// Scripts compiled into the binary, addressed by file stem
static BUILTIN_SCRIPTS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../scripts");

pub const DEFAULT_SCRIPT: &str = "doctor";

/// Source text of a builtin script
pub fn builtin(name: &str) -> Option<&'static str> {
    BUILTIN_SCRIPTS
        .files()
        .find(|file| file.path().file_stem().is_some_and(|stem| stem == name))
        .and_then(|file| file.contents_utf8())
}

fn builtin_names() -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_SCRIPTS
        .files()
        .filter_map(|file| file.path().file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Load a script by builtin name, or else from a file path
pub fn load_script(name: &str) -> Result<Script> {
    let source = match builtin(name) {
        Some(source) => {
            tracing::debug!(script = name, "using builtin script");
            source.to_string()
        }
        None => {
            let path = Path::new(name);
            fs::read_to_string(path).with_context(|| {
                format!(
                    "No builtin script named {:?} and failed to read {:?} (builtin: {})",
                    name,
                    path,
                    builtin_names().join(", ")
                )
            })?
        }
    };
    Script::load(&source)
        .map_err(|err| describe(err, &source))
        .with_context(|| format!("Failed to load script {:?}", name))
}

/// Attach the offending script line to reader errors
fn describe(err: ScriptError, source: &str) -> anyhow::Error {
    match err {
        ScriptError::Reader(reader) => {
            let context = ErrorContext::new(source, &reader).to_string();
            anyhow::anyhow!("{}", context.trim_end())
        }
        other => other.into(),
    }
}

/// Print each builtin script with its greeting
pub fn list_scripts() -> Result<()> {
    for name in builtin_names() {
        let greeting = builtin(&name)
            .and_then(|source| Script::load(source).ok())
            .map(|script| script.greeting.to_text())
            .unwrap_or_default();
        println!("{:<12} {}", name, greeting);
    }
    Ok(())
}
