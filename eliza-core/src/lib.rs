//! # eliza-core
//!
//! The conversational core: a script is loaded into a [`KeywordTable`],
//! and a [`ConversationEngine`] answers one line at a time by picking the
//! most salient keyword, decomposing the input with that keyword's rules
//! and reassembling a reply.
//!
//! ## Example
//!
//! ```
//! use eliza_core::{ConversationEngine, Script};
//!
//! let script = Script::load(
//!     "(HELLO) (YOU ((0 YOU 0) (WHY DO YOU SAY 3))) (NONE ((0) (GO ON))) ()",
//! )
//! .unwrap();
//! let mut engine = ConversationEngine::new(script);
//! assert_eq!(engine.respond("because you bother me"), ["WHY DO YOU SAY BOTHER ME"]);
//! assert_eq!(engine.respond(""), ["ELIZA ENDS..."]);
//! ```

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod keyword;
pub mod pattern;
pub mod rules;
pub mod script;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, EngineConfig};
pub use console::{Console, Direction, IoConsole, ScriptedConsole, StdConsole, Transcript};
pub use engine::{ConversationEngine, State};
pub use error::{EngineError, Result, ScriptError};
pub use keyword::{KeywordTable, RuleRef};
pub use pattern::{decompose, keyword_substitution_match, reassemble, Captures, KeywordMatch};
pub use rules::{
    DecompositionRule, KeywordEntry, MemoryRules, PatternToken, Reassembly, RuleItem,
    TemplateToken,
};
pub use script::{Script, ScriptDump};
