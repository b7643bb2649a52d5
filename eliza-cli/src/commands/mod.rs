//! CLI command implementations.

pub mod dump;
pub mod play;
pub mod scripts;

pub use dump::dump_script;
pub use play::{play, PlayOptions};
pub use scripts::{list_scripts, DEFAULT_SCRIPT};
