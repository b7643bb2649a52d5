use crate::datum::Datum;
use crate::error::{Result, SlipError, Span};
use crate::lexer::{split_sentence, tokenize, SpannedToken, Token};
use crate::list::List;

/// Reads a script one top-level list at a time.
///
/// Each call to [`ScriptReader::read_list`] yields the next parenthesised
/// "sentence" as a nested [`List`]; `Ok(None)` means the source is exhausted.
pub struct ScriptReader {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl ScriptReader {
    pub fn new(source: &str) -> Result<Self> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    /// Peek at current token
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    /// Advance to next token
    fn advance(&mut self) -> Option<&SpannedToken> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if at end of input
    pub fn is_eof(&self) -> bool {
        self.peek()
            .map(|t| matches!(t.token, Token::Eof))
            .unwrap_or(true)
    }

    /// Span of the token about to be read
    pub fn span(&self) -> Span {
        self.peek().map(|t| t.span).unwrap_or_default()
    }

    /// Read the next top-level list
    pub fn read_list(&mut self) -> Result<Option<List>> {
        if self.is_eof() {
            return Ok(None);
        }
        match self.peek().map(|t| &t.token) {
            Some(Token::LParen) => self.parse_list().map(Some),
            _ => Err(SlipError::ParserError {
                span: self.span(),
                message: "Expected '(' to start a list".to_string(),
            }),
        }
    }

    /// Read every remaining top-level list
    pub fn read_all(&mut self) -> Result<Vec<List>> {
        let mut lists = Vec::new();
        while let Some(list) = self.read_list()? {
            lists.push(list);
        }
        Ok(lists)
    }

    fn parse_list(&mut self) -> Result<List> {
        let open = self.span();
        self.advance();
        let mut cells = Vec::new();

        loop {
            let Some(token) = self.advance().cloned() else {
                return Err(unclosed(open));
            };
            let datum = match token.token {
                Token::RParen => break,
                Token::Eof => return Err(unclosed(open)),
                Token::LParen => {
                    self.pos -= 1;
                    Datum::List(self.parse_list()?)
                }
                Token::Eq => Datum::word("="),
                Token::Word(w) => Datum::word(w),
                Token::Number(Some(n)) => Datum::Number(n),
                Token::Number(None) => {
                    return Err(SlipError::ParserError {
                        span: token.span,
                        message: "Invalid number".to_string(),
                    });
                }
            };
            cells.push(datum);
        }

        Ok(List::from_data(cells))
    }
}

fn unclosed(open: Span) -> SlipError {
    SlipError::ParserError {
        span: open,
        message: "Missing ')' for this list".to_string(),
    }
}

impl Iterator for ScriptReader {
    type Item = Result<List>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_list().transpose()
    }
}

/// Read a line of user input as a list of upper-cased words
pub fn read_sentence(line: &str) -> List {
    List::from_words(split_sentence(line)).with_name("INPUT")
}

/// Parse a single parenthesised list, e.g. a rule written inline in a test
pub fn parse_list(source: &str) -> Result<List> {
    let mut reader = ScriptReader::new(source)?;
    let list = reader.read_list()?.ok_or_else(|| SlipError::ParserError {
        span: Span::default(),
        message: "Expected a list".to_string(),
    })?;
    if !reader.is_eof() {
        return Err(SlipError::ParserError {
            span: reader.span(),
            message: "Unexpected input after list".to_string(),
        });
    }
    Ok(list)
}
