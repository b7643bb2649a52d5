use std::fmt;

// Re-export Span from shared types
pub use eliza_types::Span;

/// Errors raised by the list runtime and the script reader
#[derive(Debug, thiserror::Error)]
pub enum SlipError {
    #[error("Lexer error at {span:?}: {message}")]
    LexerError { span: Span, message: String },

    #[error("Parser error at {span:?}: {message}")]
    ParserError { span: Span, message: String },

    #[error("Index {index} out of range for list of length {len}")]
    OutOfRange { index: isize, len: usize },
}

pub type Result<T> = std::result::Result<T, SlipError>;

/// Display context for reader errors
pub struct ErrorContext<'a> {
    pub source: &'a str,
    pub error: &'a SlipError,
}

impl<'a> ErrorContext<'a> {
    pub fn new(source: &'a str, error: &'a SlipError) -> Self {
        Self { source, error }
    }

    /// Get the source line containing the error
    pub fn source_line(&self) -> Option<&'a str> {
        let start = self.span()?.start.min(self.source.len());

        let line_start = self.source[..start]
            .rfind('\n')
            .map(|pos| pos + 1)
            .unwrap_or(0);

        let line_end = self.source[start..]
            .find('\n')
            .map(|pos| start + pos)
            .unwrap_or(self.source.len());

        Some(&self.source[line_start..line_end])
    }

    /// Get line and column numbers (1-indexed)
    pub fn line_col(&self) -> Option<(usize, usize)> {
        let start = self.span()?.start.min(self.source.len());

        let line = self.source[..start].matches('\n').count() + 1;
        let line_start = self.source[..start]
            .rfind('\n')
            .map(|pos| pos + 1)
            .unwrap_or(0);
        let col = start - line_start + 1;

        Some((line, col))
    }

    fn span(&self) -> Option<Span> {
        match self.error {
            SlipError::LexerError { span, .. } => Some(*span),
            SlipError::ParserError { span, .. } => Some(*span),
            SlipError::OutOfRange { .. } => None,
        }
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((line, col)) = self.line_col() else {
            return writeln!(f, "{}", self.error);
        };
        writeln!(f, "Error at line {}, column {}:", line, col)?;
        writeln!(f, "  {}", self.error)?;

        if let (Some(source_line), Some(span)) = (self.source_line(), self.span()) {
            writeln!(f)?;
            writeln!(f, "  {}", source_line)?;
            let col_start = (col - 1).min(source_line.len());
            let width = span.len().min(source_line.len() - col_start).max(1);
            writeln!(f, "  {}{}", " ".repeat(col_start), "^".repeat(width))?;
        }

        Ok(())
    }
}
