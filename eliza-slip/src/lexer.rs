use crate::error::{Result, SlipError, Span};
use logos::Logos;

/// Tokens of the parenthesised script notation
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    /// Substitution and link marker; always its own token so `(=WHAT)` reads
    /// the same as `(= WHAT)`
    #[token("=")]
    Eq,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok(), priority = 5)]
    Number(Option<u32>),

    #[regex(r"[^\s()=]+", |lex| lex.slice().to_string())]
    Word(String),

    // End of file
    Eof,
}

/// A token with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl SpannedToken {
    pub fn new(token: Token, span: Span) -> Self {
        Self { token, span }
    }
}

/// Lexer for script source
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenize the entire source, terminated by [`Token::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>> {
        let mut lex = Token::lexer(self.source);
        let mut tokens = Vec::new();

        while let Some(token_result) = lex.next() {
            let span = Span::new(lex.span().start, lex.span().end);

            match token_result {
                Ok(token) => tokens.push(SpannedToken::new(token, span)),
                Err(_) => {
                    return Err(SlipError::LexerError {
                        span,
                        message: format!("Invalid token: {}", &self.source[span.start..span.end]),
                    });
                }
            }
        }

        tokens.push(SpannedToken::new(
            Token::Eof,
            Span::new(self.source.len(), self.source.len()),
        ));
        Ok(tokens)
    }
}

/// Helper to tokenize a script
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>> {
    Lexer::new(source).tokenize()
}

/// Tokens of one line of user input
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r#"[\s?!;:"]+"#)]
pub enum SentenceToken {
    #[token(".")]
    Period,
    #[token(",")]
    Comma,
    #[regex(r#"[^\s.,?!;:"]+"#)]
    Word,
}

/// Split a line of user input into upper-cased words.
///
/// Periods and commas become words of their own so they can act as clause
/// delimiters; `? ! ; :` and double quotes are dropped.
pub fn split_sentence(line: &str) -> Vec<String> {
    let mut lex = SentenceToken::lexer(line);
    let mut words = Vec::new();
    while let Some(token) = lex.next() {
        match token {
            Ok(SentenceToken::Period) => words.push(".".to_string()),
            Ok(SentenceToken::Comma) => words.push(",".to_string()),
            Ok(SentenceToken::Word) => words.push(lex.slice().to_uppercase()),
            Err(_) => tracing::trace!(slice = lex.slice(), "skipping unlexable input"),
        }
    }
    words
}
