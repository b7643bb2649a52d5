use eliza_slip::SlipError;
use thiserror::Error;

/// Load-time failures. These are fatal: a session cannot start from a
/// script that fails to load.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error(transparent)]
    Reader(#[from] SlipError),

    #[error("Script is empty; expected a greeting list")]
    Empty,

    #[error("Script ends without the terminating empty list '()'")]
    MissingTerminator,

    #[error("Malformed entry for {keyword}: {message}")]
    Malformed { keyword: String, message: String },
}

impl ScriptError {
    pub(crate) fn malformed(keyword: impl ToString, message: impl Into<String>) -> Self {
        ScriptError::Malformed {
            keyword: keyword.to_string(),
            message: message.into(),
        }
    }
}

/// Errors a running conversation can surface. Lookup misses never land
/// here; only the console can fail.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScriptError>;
