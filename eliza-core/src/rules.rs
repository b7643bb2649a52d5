//! Typed transformation rules read out of a script's nested lists.

use eliza_slip::{Datum, List};
use eliza_types::Word;
use serde::Serialize;
use std::fmt;

use crate::error::{Result, ScriptError};

/// One token of a decomposition pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PatternToken {
    /// Exactly this word
    Literal(Word),
    /// `0` is "any number of words", `k > 0` is "exactly k words"
    Wildcard(u32),
    /// `(* A B C)`: exactly one word, equal to any alternative
    Choice(Vec<Word>),
    /// `(/TAG ...)`: a tag match. Tags are not tracked, so this never matches.
    Tag(Vec<Word>),
}

impl PatternToken {
    /// True if this token can stop a preceding zero-wildcard
    pub fn is_anchor(&self) -> bool {
        matches!(self, PatternToken::Literal(_) | PatternToken::Choice(_))
    }

    /// True if `word` satisfies this token as an anchor
    pub fn anchors(&self, word: &Word) -> bool {
        match self {
            PatternToken::Literal(literal) => literal == word,
            PatternToken::Choice(alternatives) => alternatives.contains(word),
            _ => false,
        }
    }
}

/// One token of a reassembly template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TemplateToken {
    Literal(Word),
    /// 1-based capture group reference
    Capture(usize),
}

/// What to do once a decomposition rule has matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reassembly {
    Template(Vec<TemplateToken>),
    /// `(=KEYWORD)`: continue with another keyword's rules
    Link(Word),
    /// `(PRE (template) (=KEYWORD))`: rebuild the input, then link
    Pre {
        template: Vec<TemplateToken>,
        link: Word,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecompositionRule {
    pub pattern: Vec<PatternToken>,
    pub reassemblies: Vec<Reassembly>,
    /// Round-robin position of the next reassembly to use
    #[serde(skip)]
    pub next: usize,
}

impl DecompositionRule {
    pub fn new(pattern: Vec<PatternToken>, reassemblies: Vec<Reassembly>) -> Self {
        Self {
            pattern,
            reassemblies,
            next: 0,
        }
    }

    /// Take the next reassembly in rotation, wrapping after the last one
    pub fn rotate(&mut self) -> Option<&Reassembly> {
        if self.reassemblies.is_empty() {
            return None;
        }
        let index = self.next % self.reassemblies.len();
        self.next = (index + 1) % self.reassemblies.len();
        self.reassemblies.get(index)
    }
}

/// One element of a keyword's rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleItem {
    Decomposition(DecompositionRule),
    /// `(=KEYWORD)` standing in place of a decomposition rule
    Link(Word),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordEntry {
    pub keyword: Word,
    /// `KEYWORD = REPLACEMENT`: rewrite the keyword in the input when scanned
    pub substitution: Option<Word>,
    pub precedence: Option<u32>,
    pub items: Vec<RuleItem>,
}

impl KeywordEntry {
    pub fn new(keyword: impl Into<Word>) -> Self {
        Self {
            keyword: keyword.into(),
            substitution: None,
            precedence: None,
            items: Vec::new(),
        }
    }

    /// Substitution-only entries have nothing to decompose with
    pub fn has_rules(&self) -> bool {
        !self.items.is_empty()
    }

    /// Declared precedence, with an undeclared one ranking as zero
    pub fn rank(&self) -> u32 {
        self.precedence.unwrap_or(0)
    }

    /// Read an entry from its script list:
    /// `(KEYWORD [= REPLACEMENT] [DLIST (...)] [PRECEDENCE] ITEM...)`
    pub fn from_list(list: &List) -> Result<Self> {
        let mut cells = list.iter().peekable();
        let keyword = match cells.next() {
            Some(Datum::Word(word)) => word.clone(),
            Some(other) => {
                return Err(ScriptError::malformed(other, "entry must start with a keyword"))
            }
            None => return Err(ScriptError::malformed("()", "empty entry")),
        };
        let mut entry = KeywordEntry::new(keyword.clone());

        while let Some(&datum) = cells.peek() {
            match datum {
                Datum::Word(word) if word == "=" => {
                    cells.next();
                    match cells.next() {
                        Some(Datum::Word(replacement)) => {
                            entry.substitution = Some(replacement.clone())
                        }
                        _ => {
                            return Err(ScriptError::malformed(
                                &keyword,
                                "'=' must be followed by a replacement word",
                            ))
                        }
                    }
                }
                Datum::Word(word) if word == "DLIST" => {
                    cells.next();
                    let tags = match cells.next() {
                        Some(Datum::List(tags)) => tags.to_string(),
                        _ => String::new(),
                    };
                    tracing::warn!(keyword = %keyword, tags = %tags, "ignoring DLIST annotation");
                }
                Datum::Number(n) => {
                    if entry.precedence.is_some() {
                        return Err(ScriptError::malformed(&keyword, "precedence given twice"));
                    }
                    entry.precedence = Some(*n);
                    cells.next();
                }
                Datum::Word(word) => {
                    return Err(ScriptError::malformed(
                        &keyword,
                        format!("unexpected word {word} before the rules"),
                    ))
                }
                Datum::List(_) => break,
            }
        }

        for datum in cells {
            let Some(item) = datum.as_list() else {
                return Err(ScriptError::malformed(
                    &keyword,
                    format!("expected a rule list, found {datum}"),
                ));
            };
            entry.items.push(parse_item(&keyword, item)?);
        }

        Ok(entry)
    }
}

/// The `MEMORY` entry: the keyword that triggers a memory and the four
/// rules that shape it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryRules {
    pub keyword: Word,
    pub rules: Vec<DecompositionRule>,
}

/// Number of rules a `MEMORY` entry must carry
pub const MEMORY_RULE_COUNT: usize = 4;

impl MemoryRules {
    /// Read `(MEMORY KEYWORD (pattern = template) x4)`
    pub fn from_list(list: &List) -> Result<Self> {
        let mut cells = list.iter().skip(1);
        let keyword = match cells.next() {
            Some(Datum::Word(word)) => word.clone(),
            _ => return Err(ScriptError::malformed("MEMORY", "missing memory keyword")),
        };

        let mut rules = Vec::new();
        for datum in cells {
            let rule = datum
                .as_list()
                .and_then(|rule| parse_flat_rule(&keyword, rule))
                .transpose()?
                .ok_or_else(|| {
                    ScriptError::malformed("MEMORY", format!("expected (pattern = template), found {datum}"))
                })?;
            if !matches!(rule.reassemblies.first(), Some(Reassembly::Template(_))) {
                return Err(ScriptError::malformed("MEMORY", "memory rules need a plain template"));
            }
            rules.push(rule);
        }

        if rules.len() != MEMORY_RULE_COUNT {
            return Err(ScriptError::malformed(
                "MEMORY",
                format!("expected {MEMORY_RULE_COUNT} rules, found {}", rules.len()),
            ));
        }
        Ok(Self { keyword, rules })
    }

    /// Rule selected by a 1-based index in `1..=4`
    pub fn rule(&self, index: usize) -> Option<&DecompositionRule> {
        index.checked_sub(1).and_then(|i| self.rules.get(i))
    }
}

fn parse_item(keyword: &Word, item: &List) -> Result<RuleItem> {
    if let Some(target) = parse_link(item) {
        return Ok(RuleItem::Link(target));
    }
    if let Some(rule) = parse_flat_rule(keyword, item).transpose()? {
        return Ok(RuleItem::Decomposition(rule));
    }

    let mut cells = item.iter();
    let pattern = match cells.next() {
        Some(Datum::List(pattern)) => parse_pattern(keyword, pattern)?,
        _ => {
            return Err(ScriptError::malformed(
                keyword,
                format!("rule {item} must start with a pattern list"),
            ))
        }
    };
    let reassemblies = cells
        .map(|datum| match datum.as_list() {
            Some(list) => parse_reassembly(keyword, list),
            None => Err(ScriptError::malformed(
                keyword,
                format!("expected a reassembly list, found {datum}"),
            )),
        })
        .collect::<Result<Vec<_>>>()?;
    if reassemblies.is_empty() {
        return Err(ScriptError::malformed(
            keyword,
            format!("rule {item} has no reassembly"),
        ));
    }

    Ok(RuleItem::Decomposition(DecompositionRule::new(pattern, reassemblies)))
}

/// `(= KEYWORD)`
fn parse_link(list: &List) -> Option<Word> {
    match list.cells() {
        [Datum::Word(eq), Datum::Word(target)] if eq == "=" => Some(target.clone()),
        _ => None,
    }
}

/// `(0 YOU 0 = WHY DO YOU SAY 3)`: a rule written without nesting.
/// Returns `None` when the list is not in this form.
fn parse_flat_rule(keyword: &Word, list: &List) -> Option<Result<DecompositionRule>> {
    let split = list.iter().position(|d| d.is_word("="))?;
    if split == 0 || list.iter().any(Datum::is_list) {
        return None;
    }
    let cells = list.cells();
    let rule = parse_pattern_cells(keyword, &cells[..split]).and_then(|pattern| {
        let template = parse_template(keyword, &cells[split + 1..])?;
        Ok(DecompositionRule::new(
            pattern,
            vec![Reassembly::Template(template)],
        ))
    });
    Some(rule)
}

fn parse_pattern(keyword: &Word, pattern: &List) -> Result<Vec<PatternToken>> {
    parse_pattern_cells(keyword, pattern.cells())
}

fn parse_pattern_cells(keyword: &Word, cells: &[Datum]) -> Result<Vec<PatternToken>> {
    if cells.is_empty() {
        return Err(ScriptError::malformed(keyword, "empty decomposition pattern"));
    }
    cells
        .iter()
        .map(|datum| match datum {
            Datum::Number(k) => Ok(PatternToken::Wildcard(*k)),
            Datum::Word(word) => Ok(PatternToken::Literal(word.clone())),
            Datum::List(list) => parse_pattern_group(keyword, list),
        })
        .collect()
}

fn parse_pattern_group(keyword: &Word, list: &List) -> Result<PatternToken> {
    let words = list.words();
    match words.first().map(Word::as_str) {
        Some("*") if words.len() > 1 && words.len() == list.len() => {
            Ok(PatternToken::Choice(words[1..].to_vec()))
        }
        Some(tag) if tag.starts_with('/') => {
            tracing::warn!(keyword = %keyword, tag = %list, "tag patterns never match");
            Ok(PatternToken::Tag(words))
        }
        _ => Err(ScriptError::malformed(
            keyword,
            format!("unrecognised pattern group {list}"),
        )),
    }
}

fn parse_reassembly(keyword: &Word, list: &List) -> Result<Reassembly> {
    if let Some(target) = parse_link(list) {
        return Ok(Reassembly::Link(target));
    }
    if list.first().is_some_and(|d| d.is_word("PRE")) {
        return match list.cells() {
            [_, Datum::List(template), Datum::List(link)] => {
                let link = parse_link(link).ok_or_else(|| {
                    ScriptError::malformed(keyword, "PRE must end with a (=KEYWORD) link")
                })?;
                Ok(Reassembly::Pre {
                    template: parse_template(keyword, template.cells())?,
                    link,
                })
            }
            _ => Err(ScriptError::malformed(
                keyword,
                format!("expected (PRE (template) (=KEYWORD)), found {list}"),
            )),
        };
    }
    Ok(Reassembly::Template(parse_template(keyword, list.cells())?))
}

fn parse_template(keyword: &Word, cells: &[Datum]) -> Result<Vec<TemplateToken>> {
    cells
        .iter()
        .map(|datum| match datum {
            Datum::Word(word) => Ok(TemplateToken::Literal(word.clone())),
            Datum::Number(n) => Ok(TemplateToken::Capture(*n as usize)),
            Datum::List(list) => Err(ScriptError::malformed(
                keyword,
                format!("nested list {list} inside a template"),
            )),
        })
        .collect()
}

impl fmt::Display for PatternToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternToken::Literal(word) => write!(f, "{word}"),
            PatternToken::Wildcard(k) => write!(f, "{k}"),
            PatternToken::Choice(words) => write!(f, "(* {})", join(words)),
            PatternToken::Tag(words) => write!(f, "({})", join(words)),
        }
    }
}

fn join(words: &[Word]) -> String {
    words
        .iter()
        .map(Word::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use eliza_slip::parse_list;

    fn entry(source: &str) -> KeywordEntry {
        KeywordEntry::from_list(&parse_list(source).unwrap()).unwrap()
    }

    #[test]
    fn test_entry_with_substitution_and_precedence() {
        let entry = entry("(MY = YOUR 2 ((0 YOUR 0) (YOUR 3) (WHY DO YOU SAY YOUR 3)))");
        assert_eq!(entry.keyword, "MY");
        assert_eq!(entry.substitution, Some(Word::new("YOUR")));
        assert_eq!(entry.precedence, Some(2));
        assert_eq!(entry.items.len(), 1);

        let RuleItem::Decomposition(rule) = &entry.items[0] else {
            panic!("expected a decomposition rule");
        };
        assert_eq!(
            rule.pattern,
            vec![
                PatternToken::Wildcard(0),
                PatternToken::Literal(Word::new("YOUR")),
                PatternToken::Wildcard(0),
            ]
        );
        assert_eq!(rule.reassemblies.len(), 2);
        assert_eq!(
            rule.reassemblies[0],
            Reassembly::Template(vec![
                TemplateToken::Literal(Word::new("YOUR")),
                TemplateToken::Capture(3),
            ])
        );
    }

    #[test]
    fn test_substitution_only_entry() {
        let entry = entry("(DONT = DON'T)");
        assert!(!entry.has_rules());
        assert_eq!(entry.rank(), 0);
    }

    #[test]
    fn test_link_items() {
        let how = entry("(HOW (=WHAT))");
        assert_eq!(how.items, vec![RuleItem::Link(Word::new("WHAT"))]);

        let why = entry("(WHY ((0 WHY 0) (=WHAT)) (= WHAT))");
        assert!(matches!(&why.items[0], RuleItem::Decomposition(rule)
            if rule.reassemblies == vec![Reassembly::Link(Word::new("WHAT"))]));
        assert_eq!(why.items[1], RuleItem::Link(Word::new("WHAT")));
    }

    #[test]
    fn test_flat_rule() {
        let you = entry("(YOU (0 YOU 0 = WHY DO YOU SAY 3))");
        let RuleItem::Decomposition(rule) = &you.items[0] else {
            panic!("expected a decomposition rule");
        };
        assert_eq!(rule.pattern.len(), 3);
        assert_eq!(rule.reassemblies.len(), 1);
    }

    #[test]
    fn test_choice_and_pre() {
        let entry = entry(
            "(YOU'RE = I'M ((0 I'M 0) (PRE (I ARE 3) (=YOU))) ((0 (* WANT NEED) 0) (WHY 2)))",
        );
        let RuleItem::Decomposition(pre) = &entry.items[0] else {
            panic!("expected a decomposition rule");
        };
        assert_eq!(
            pre.reassemblies[0],
            Reassembly::Pre {
                template: vec![
                    TemplateToken::Literal(Word::new("I")),
                    TemplateToken::Literal(Word::new("ARE")),
                    TemplateToken::Capture(3),
                ],
                link: Word::new("YOU"),
            }
        );
        let RuleItem::Decomposition(choice) = &entry.items[1] else {
            panic!("expected a decomposition rule");
        };
        assert_eq!(
            choice.pattern[1],
            PatternToken::Choice(vec![Word::new("WANT"), Word::new("NEED")])
        );
        assert_eq!(choice.pattern[1].to_string(), "(* WANT NEED)");
    }

    #[test]
    fn test_dlist_is_ignored() {
        let entry = entry("(FEEL DLIST(/BELIEF))");
        assert_eq!(entry.keyword, "FEEL");
        assert!(!entry.has_rules());
    }

    #[test]
    fn test_malformed_entries() {
        for source in [
            "((0) (HI))",
            "(X =)",
            "(X 1 2 ((0) (HI)))",
            "(X ((0)))",
            "(X ((0) HI))",
            "(X (() (HI)))",
            "(X ((0 (A B)) (HI)))",
            "(X STRAY ((0) (HI)))",
        ] {
            let list = parse_list(source).unwrap();
            assert!(
                matches!(KeywordEntry::from_list(&list), Err(ScriptError::Malformed { .. })),
                "{source} should be rejected"
            );
        }
    }

    #[test]
    fn test_memory_rules() {
        let list = parse_list(
            "(MEMORY MY (0 YOUR 0 = LETS DISCUSS FURTHER WHY YOUR 3) (0 YOUR 0 = EARLIER YOU SAID YOUR 3) (0 YOUR 0 = BUT YOUR 3) (0 YOUR 0 = DOES THAT HAVE ANYTHING TO DO WITH THE FACT THAT YOUR 3))",
        )
        .unwrap();
        let memory = MemoryRules::from_list(&list).unwrap();
        assert_eq!(memory.keyword, "MY");
        assert!(memory.rule(0).is_none());
        assert!(memory.rule(4).is_some());
        assert!(memory.rule(5).is_none());

        let short = parse_list("(MEMORY MY (0 YOUR 0 = BUT YOUR 3))").unwrap();
        assert!(MemoryRules::from_list(&short).is_err());
    }

    #[test]
    fn test_rotate_wraps() {
        let mut rule = DecompositionRule::new(
            vec![PatternToken::Wildcard(0)],
            vec![
                Reassembly::Link(Word::new("A")),
                Reassembly::Link(Word::new("B")),
            ],
        );
        let picks: Vec<_> = (0..3)
            .map(|_| match rule.rotate() {
                Some(Reassembly::Link(w)) => w.to_string(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(picks, ["A", "B", "A"]);
    }
}
