//! Conversational constants, loadable from YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Number of acknowledgement phrases, one per rotation counter value
pub const ACKNOWLEDGEMENT_COUNT: usize = 4;

/// Engine configuration matching the `eliza.yml` schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Words that split the input into clauses
    #[serde(default = "default_delimiters")]
    pub delimiters: Vec<String>,

    #[serde(default = "default_edit_marker")]
    pub edit_marker: String,

    #[serde(default = "default_insert_marker")]
    pub insert_marker: String,

    /// Reply to a line starting with either marker
    #[serde(default = "default_unsupported_reply")]
    pub unsupported_reply: String,

    /// NoMatch phrases, indexed by the rotation counter
    #[serde(default = "default_acknowledgements")]
    pub acknowledgements: Vec<String>,

    #[serde(default = "default_closing")]
    pub closing: String,

    /// Emitted in place of a capture reference with no matching group
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Keyword-link hops allowed inside one turn before giving up
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_delimiters() -> Vec<String> {
    vec![".".into(), ",".into(), "BUT".into()]
}

fn default_edit_marker() -> String {
    String::from("+")
}

fn default_insert_marker() -> String {
    String::from("*")
}

fn default_unsupported_reply() -> String {
    String::from("THAT COMMAND IS NOT SUPPORTED")
}

fn default_acknowledgements() -> Vec<String> {
    vec![
        "PLEASE CONTINUE".into(),
        "HMMM".into(),
        "GO ON , PLEASE".into(),
        "I SEE".into(),
    ]
}

fn default_closing() -> String {
    String::from("ELIZA ENDS...")
}

fn default_placeholder() -> String {
    String::from("?????")
}

fn default_max_redirects() -> usize {
    16
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delimiters: default_delimiters(),
            edit_marker: default_edit_marker(),
            insert_marker: default_insert_marker(),
            unsupported_reply: default_unsupported_reply(),
            acknowledgements: default_acknowledgements(),
            closing: default_closing(),
            placeholder: default_placeholder(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.acknowledgements.len() != ACKNOWLEDGEMENT_COUNT {
            return Err(ConfigError::Invalid {
                field: "acknowledgements".into(),
                message: format!(
                    "expected exactly {} phrases, found {}",
                    ACKNOWLEDGEMENT_COUNT,
                    self.acknowledgements.len()
                ),
            });
        }
        if self.edit_marker.trim().is_empty() || self.insert_marker.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "edit_marker".into(),
                message: "markers must not be blank".into(),
            });
        }
        Ok(())
    }

    /// True if `word` is one of the clause delimiters (case-insensitive)
    pub fn is_delimiter(&self, word: &str) -> bool {
        self.delimiters.iter().any(|d| d.eq_ignore_ascii_case(word))
    }

    /// True if `word` is the edit or insert marker
    pub fn is_command_marker(&self, word: &str) -> bool {
        word == self.edit_marker || word == self.insert_marker
    }

    /// Acknowledgement for a rotation counter value in `1..=4`
    pub fn acknowledgement(&self, rotation: u8) -> &str {
        let index = usize::from(rotation.clamp(1, 4)) - 1;
        self.acknowledgements
            .get(index)
            .map(String::as_str)
            .unwrap_or(&self.placeholder)
    }
}
