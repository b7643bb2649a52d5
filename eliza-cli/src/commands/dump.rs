//! Dump a script's keyword table.

use anyhow::Result;

use super::scripts::load_script;

/// Print bucket layout, fallback and memory keyword of a script
pub fn dump_script(script: &str, json: bool) -> Result<()> {
    let dump = load_script(script)?.dump();
    if json {
        println!("{}", serde_json::to_string_pretty(&dump)?);
    } else {
        print!("{}", dump);
    }
    Ok(())
}
