use crate::list::List;
use eliza_types::Word;
use std::fmt;

/// A single list cell: a word, a number, or a nested list
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Word(Word),
    Number(u32),
    List(List),
}

impl Datum {
    pub fn word(text: impl Into<String>) -> Self {
        Datum::Word(Word::new(text))
    }

    pub fn as_word(&self) -> Option<&Word> {
        match self {
            Datum::Word(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            Datum::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Datum::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<List> {
        match self {
            Datum::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Datum::List(_))
    }

    /// True if this is the word `text` (case-insensitive)
    pub fn is_word(&self, text: &str) -> bool {
        matches!(self, Datum::Word(w) if w == text)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Word(w) => write!(f, "{}", w),
            Datum::Number(n) => write!(f, "{}", n),
            Datum::List(l) => write!(f, "{}", l),
        }
    }
}

impl From<Word> for Datum {
    fn from(word: Word) -> Self {
        Datum::Word(word)
    }
}

impl From<&str> for Datum {
    fn from(text: &str) -> Self {
        Datum::word(text)
    }
}

impl From<u32> for Datum {
    fn from(n: u32) -> Self {
        Datum::Number(n)
    }
}

impl From<List> for Datum {
    fn from(list: List) -> Self {
        Datum::List(list)
    }
}
