//! Loading a script into a keyword table.
//!
//! A script is a sequence of top-level lists:
//!
//! ```text
//! (HOW DO YOU DO.  PLEASE TELL ME YOUR PROBLEM)    greeting
//! (SORRY ((0) (PLEASE DON'T APOLOGIZE)))            keyword entries...
//! (MEMORY MY (0 YOUR 0 = BUT YOUR 3) ...)           memory rules
//! (NONE ((0) (PLEASE GO ON)))                       fallback rule set
//! ()                                                terminator
//! ```

use eliza_slip::{List, ScriptReader};
use eliza_types::Word;
use serde::Serialize;
use std::fmt;

use crate::error::{Result, ScriptError};
use crate::keyword::{KeywordTable, FALLBACK_BUCKET};
use crate::rules::{KeywordEntry, MemoryRules};

#[derive(Debug, Clone)]
pub struct Script {
    pub greeting: List,
    pub table: KeywordTable,
    pub memory: Option<MemoryRules>,
}

impl Script {
    /// Parse script text
    pub fn load(source: &str) -> Result<Self> {
        Self::from_reader(ScriptReader::new(source)?)
    }

    /// Build a script from the reader's top-level lists, up to the `()`
    /// terminator. Anything after the terminator is not read.
    pub fn from_reader(mut reader: ScriptReader) -> Result<Self> {
        let greeting = match reader.read_list()? {
            Some(list) if !list.is_empty() => list.with_name("GREETING"),
            _ => return Err(ScriptError::Empty),
        };

        let mut table = KeywordTable::new();
        let mut memory = None;

        loop {
            let Some(list) = reader.read_list()? else {
                return Err(ScriptError::MissingTerminator);
            };
            if list.is_empty() {
                break;
            }

            let head = list.first().and_then(|d| d.as_word()).map(Word::to_uppercase);
            match head.as_ref().map(Word::as_str) {
                Some("NONE") => table.set_fallback(KeywordEntry::from_list(&list)?),
                Some("MEMORY") => {
                    if memory.is_some() {
                        tracing::warn!("second MEMORY entry replaces the first");
                    }
                    memory = Some(MemoryRules::from_list(&list)?);
                }
                _ => {
                    let entry = KeywordEntry::from_list(&list)?;
                    tracing::trace!(
                        keyword = %entry.keyword,
                        items = entry.items.len(),
                        "loaded keyword"
                    );
                    table.insert(entry);
                }
            }
        }

        if !table.fallback().is_some_and(KeywordEntry::has_rules) {
            tracing::warn!("script has no NONE rules; unmatched input will only be acknowledged");
        }
        if let Some(memory) = &memory {
            if table.lookup(memory.keyword.as_str()).is_none() {
                tracing::warn!(
                    keyword = %memory.keyword,
                    "memory keyword has no entry and will never fire"
                );
            }
        }
        tracing::debug!(keywords = table.len(), "script loaded");

        Ok(Self {
            greeting,
            table,
            memory,
        })
    }

    /// Bucket layout of the keyword table
    pub fn dump(&self) -> ScriptDump {
        let buckets = self
            .table
            .buckets()
            .filter(|(index, _)| *index != FALLBACK_BUCKET)
            .map(|(index, entries)| BucketDump {
                index,
                keywords: entries.iter().map(|e| e.keyword.to_string()).collect(),
            })
            .collect();

        ScriptDump {
            greeting: self.greeting.to_text(),
            buckets,
            fallback: self.table.fallback().map(|e| e.items.len()),
            memory: self.memory.as_ref().map(|m| m.keyword.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketDump {
    pub index: usize,
    pub keywords: Vec<String>,
}

/// Serializable summary of a loaded script, as printed by `eliza dump`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptDump {
    pub greeting: String,
    pub buckets: Vec<BucketDump>,
    /// Number of fallback rules, if the script has a NONE entry
    pub fallback: Option<usize>,
    pub memory: Option<String>,
}

impl fmt::Display for ScriptDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GREETING {}", self.greeting)?;
        for bucket in &self.buckets {
            writeln!(f, "KEY({}) {}", bucket.index, bucket.keywords.join(" "))?;
        }
        match self.fallback {
            Some(rules) => writeln!(f, "KEY({FALLBACK_BUCKET}) NONE [{rules} rules]")?,
            None => writeln!(f, "KEY({FALLBACK_BUCKET}) -")?,
        }
        match &self.memory {
            Some(keyword) => writeln!(f, "MEMORY {keyword}"),
            None => writeln!(f, "MEMORY -"),
        }
    }
}
