//! Decomposition and reassembly over word sequences.
//!
//! Both operations are stateless. [`decompose`] either accounts for every
//! pattern token and every input word or fails outright; there is no
//! partial match.

use eliza_types::Word;

use crate::rules::{PatternToken, TemplateToken};

/// Capture groups of a successful decomposition, one per pattern token
pub type Captures = Vec<Vec<Word>>;

/// Match `pattern` against `input`.
///
/// A zero wildcard that is not the last token takes words up to the first
/// one that satisfies the next literal (or choice) token after it; with no
/// such token ahead it takes everything that is left.
pub fn decompose(pattern: &[PatternToken], input: &[Word]) -> Option<Captures> {
    let mut captures = Vec::with_capacity(pattern.len());
    let mut rest = input;

    for (i, token) in pattern.iter().enumerate() {
        let taken = match token {
            PatternToken::Literal(literal) => match rest.first() {
                Some(word) if word == literal => 1,
                _ => return None,
            },
            PatternToken::Choice(alternatives) => match rest.first() {
                Some(word) if alternatives.contains(word) => 1,
                _ => return None,
            },
            PatternToken::Tag(_) => return None,
            PatternToken::Wildcard(0) => {
                match pattern[i + 1..].iter().find(|t| t.is_anchor()) {
                    Some(anchor) => rest
                        .iter()
                        .position(|word| anchor.anchors(word))
                        .unwrap_or(rest.len()),
                    None => rest.len(),
                }
            }
            PatternToken::Wildcard(k) => {
                let k = *k as usize;
                if rest.len() < k {
                    return None;
                }
                k
            }
        };
        let (group, tail) = rest.split_at(taken);
        captures.push(group.to_vec());
        rest = tail;
    }

    if captures.len() == pattern.len() && rest.is_empty() {
        Some(captures)
    } else {
        None
    }
}

/// Expand `template`, replacing each capture reference with its group.
///
/// A reference with no matching group becomes `placeholder`, so the turn
/// still produces a reply.
pub fn reassemble(
    template: &[TemplateToken],
    captures: &[Vec<Word>],
    placeholder: &str,
) -> Vec<Word> {
    let mut output = Vec::new();
    for token in template {
        match token {
            TemplateToken::Literal(word) => output.push(word.clone()),
            TemplateToken::Capture(index) => {
                match index.checked_sub(1).and_then(|i| captures.get(i)) {
                    Some(group) => output.extend(group.iter().cloned()),
                    None => {
                        tracing::debug!(index, groups = captures.len(), "capture out of range");
                        output.push(Word::new(placeholder));
                    }
                }
            }
        }
    }
    output
}

/// Outcome of testing a scanned input word against a keyword candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordMatch<'a> {
    /// Not this keyword
    Miss,
    /// This keyword, input left untouched
    Hit,
    /// This keyword; rewrite the scanned word to the replacement
    Substitute(&'a Word),
}

impl<'a> KeywordMatch<'a> {
    pub fn is_hit(&self) -> bool {
        !matches!(self, KeywordMatch::Miss)
    }
}

/// Decide whether `scanned` is `keyword`, and whether the candidate's
/// `KEYWORD = REPLACEMENT` head asks for the input to be rewritten.
pub fn keyword_substitution_match<'a>(
    keyword: &Word,
    scanned: &Word,
    substitution: Option<&'a Word>,
) -> KeywordMatch<'a> {
    if keyword != scanned {
        return KeywordMatch::Miss;
    }
    match substitution {
        Some(replacement) => KeywordMatch::Substitute(replacement),
        None => KeywordMatch::Hit,
    }
}
