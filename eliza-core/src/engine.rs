//! The conversation driver.
//!
//! A turn is a walk through [`State`]: each call to the transition function
//! consumes one state and returns the next, until the engine is back in
//! [`State::AwaitInput`] with no line pending (the only suspension point) or
//! has finished.

use eliza_slip::{hash, read_sentence, Datum, List, SlipError};
use eliza_types::Word;

use crate::config::EngineConfig;
use crate::console::{Console, Transcript};
use crate::error::EngineError;
use crate::keyword::{KeywordTable, RuleRef};
use crate::pattern::{decompose, keyword_substitution_match, reassemble, Captures, KeywordMatch};
use crate::rules::{MemoryRules, Reassembly, RuleItem};
use crate::script::Script;

/// First value of the rotation counter; the first turn advances it to 2
pub const ROTATION_START: u8 = 1;
const ROTATION_LIMIT: u8 = 4;
/// Bits of the last input word used to pick a memory rule
const MEMORY_HASH_BITS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Take the pending line, if there is one
    AwaitInput,
    /// Reject command markers, advance the rotation counter
    Preprocess,
    /// Walk the input for keywords, trimming at delimiters
    ScanKeywords,
    /// No keyword: replay a memory or use the NONE rules
    Fallback,
    /// A keyword was selected; make a memory if it is the memory keyword
    Dispatch,
    /// Try the items of `rules` starting at `item`
    Decompose { rules: RuleRef, item: usize },
    /// Item `item` of `rules` matched with `captures`
    Reassemble {
        rules: RuleRef,
        item: usize,
        captures: Captures,
    },
    /// Nothing applied; acknowledge
    NoMatch,
    /// Blank line or end of input; say goodbye
    End,
    /// The session is over
    Halted,
}

/// Keyword chosen by the scan, with the precedence it was chosen at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
    rules: RuleRef,
    precedence: u32,
}

pub struct ConversationEngine {
    config: EngineConfig,
    greeting: List,
    table: KeywordTable,
    memory_rules: Option<MemoryRules>,
    /// Queued memories, oldest first; each cell is one assembled sentence
    memories: List,
    input: List,
    pending: Option<String>,
    selection: Option<Selection>,
    rotation: u8,
    redirects: usize,
    outbox: Vec<String>,
    finished: bool,
}

impl ConversationEngine {
    pub fn new(script: Script) -> Self {
        Self::with_config(script, EngineConfig::default())
    }

    pub fn with_config(script: Script, config: EngineConfig) -> Self {
        Self {
            config,
            greeting: script.greeting,
            table: script.table,
            memory_rules: script.memory,
            memories: List::named("MYLIST"),
            input: List::named("INPUT"),
            pending: None,
            selection: None,
            rotation: ROTATION_START,
            redirects: 0,
            outbox: Vec::new(),
            finished: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The script's opening line
    pub fn greeting(&self) -> String {
        self.greeting.to_text()
    }

    /// Current rotation counter, always in `1..=4`
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Number of memories waiting to be replayed
    pub fn memory_len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run one turn on `line` and return what was said. A blank line ends
    /// the session with the closing message; after that every call returns
    /// nothing.
    pub fn respond(&mut self, line: &str) -> Vec<String> {
        if self.finished {
            return Vec::new();
        }
        self.pending = Some(line.to_string());
        let mut state = State::AwaitInput;
        loop {
            state = self.transition(state);
            match state {
                State::AwaitInput if self.pending.is_none() => break,
                State::Halted => break,
                _ => {}
            }
        }
        std::mem::take(&mut self.outbox)
    }

    /// Converse over `console` until a blank line or end of input. The
    /// greeting is written first.
    pub fn run<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<Transcript, EngineError> {
        let mut transcript = Transcript::new();
        let greeting = self.greeting();
        console.write_line(&greeting)?;
        transcript.record_output(greeting);

        while !self.finished {
            let line = console.read_line()?.unwrap_or_default();
            transcript.record_input(line.as_str());
            for reply in self.respond(&line) {
                console.write_line(&reply)?;
                transcript.record_output(reply);
            }
        }
        Ok(transcript)
    }

    /// Consume one state and produce the next
    pub fn transition(&mut self, state: State) -> State {
        tracing::trace!(?state, "transition");
        match state {
            State::AwaitInput => self.await_input(),
            State::Preprocess => self.preprocess(),
            State::ScanKeywords => self.scan_keywords(),
            State::Fallback => self.fallback(),
            State::Dispatch => self.dispatch(),
            State::Decompose { rules, item } => self.decompose(rules, item),
            State::Reassemble {
                rules,
                item,
                captures,
            } => self.reassemble(rules, item, captures),
            State::NoMatch => {
                let phrase = self.config.acknowledgement(self.rotation).to_string();
                self.emit(phrase);
                State::AwaitInput
            }
            State::End => {
                let closing = self.config.closing.clone();
                self.emit(closing);
                self.finished = true;
                State::Halted
            }
            State::Halted => State::Halted,
        }
    }

    fn await_input(&mut self) -> State {
        let Some(line) = self.pending.take() else {
            return State::AwaitInput;
        };
        if line.trim().is_empty() {
            return State::End;
        }
        // A line of dropped punctuation is still a turn, with empty input
        self.input = read_sentence(&line);
        self.selection = None;
        self.redirects = 0;
        State::Preprocess
    }

    fn preprocess(&mut self) -> State {
        let is_command = self
            .input
            .first()
            .and_then(Datum::as_word)
            .is_some_and(|word| self.config.is_command_marker(word.as_str()));
        if is_command {
            let reply = self.config.unsupported_reply.clone();
            self.emit(reply);
            return State::AwaitInput;
        }
        self.rotation = self.rotation % ROTATION_LIMIT + 1;
        tracing::debug!(rotation = self.rotation, input = %self.input, "turn");
        State::ScanKeywords
    }

    /// Walk the input once, left to right. A substitution rewrites the cell
    /// under the cursor only, so every occurrence is rewritten as the scan
    /// reaches it rather than all at once when the keyword is first seen.
    /// Rewritten cells are never scanned again, which keeps mutual pairs
    /// such as `I = YOU` and `YOU = I` from undoing each other.
    fn scan_keywords(&mut self) -> State {
        let mut cursor = self.input.cursor();

        loop {
            let (datum, end) = cursor.step_forward(&self.input);
            if !end.is_element() {
                break;
            }
            let Some(word) = datum.and_then(Datum::as_word).cloned() else {
                continue;
            };
            let Some(index) = cursor.index(&self.input) else {
                break;
            };

            if self.config.is_delimiter(word.as_str()) {
                if self.selection.is_none() {
                    let dropped = self.input.pop_front_n(index + 1);
                    tracing::trace!(dropped = dropped.len(), "clause before delimiter dropped");
                    cursor.rewind(&self.input);
                    continue;
                }
                self.input.truncate_from(index);
                break;
            }

            let Some(found) = self.table.locate(word.as_str()) else {
                continue;
            };
            let Some(entry) = self.table.entry(found) else {
                continue;
            };

            match keyword_substitution_match(&entry.keyword, &word, entry.substitution.as_ref()) {
                KeywordMatch::Miss => continue,
                KeywordMatch::Hit => {}
                KeywordMatch::Substitute(replacement) => {
                    tracing::trace!(from = %word, to = %replacement, "substitution");
                    match cursor.address(&mut self.input) {
                        Ok(mut address) => {
                            address.replace(Datum::Word(replacement.clone()));
                        }
                        Err(err) => invariant_violation(&err),
                    }
                }
            }

            if !entry.has_rules() {
                continue;
            }
            let precedence = entry.rank();
            let replace = match self.selection {
                None => true,
                Some(current) => precedence > current.precedence,
            };
            if replace {
                tracing::debug!(keyword = %entry.keyword, precedence, "keyword selected");
                self.selection = Some(Selection {
                    rules: found,
                    precedence,
                });
            }
        }

        if self.selection.is_some() {
            State::Dispatch
        } else {
            State::Fallback
        }
    }

    fn fallback(&mut self) -> State {
        if self.rotation == ROTATION_LIMIT {
            if let Some(memory) = self.memories.pop_front() {
                let text = match memory {
                    Datum::List(sentence) => sentence.to_text(),
                    other => other.to_string(),
                };
                tracing::debug!(remaining = self.memories.len(), "replaying memory");
                self.emit(text);
                return State::AwaitInput;
            }
        }
        if self.table.fallback().is_some_and(|entry| entry.has_rules()) {
            State::Decompose {
                rules: RuleRef::FALLBACK,
                item: 0,
            }
        } else {
            State::NoMatch
        }
    }

    fn dispatch(&mut self) -> State {
        let Some(selection) = self.selection else {
            return State::Fallback;
        };
        let is_memory_keyword = match (&self.memory_rules, self.table.entry(selection.rules)) {
            (Some(memory), Some(entry)) => memory.keyword == entry.keyword,
            _ => false,
        };
        if is_memory_keyword {
            self.remember();
        }
        State::Decompose {
            rules: selection.rules,
            item: 0,
        }
    }

    /// Shape the current input with the memory rule picked by its last word
    /// and queue the result for later replay.
    fn remember(&mut self) {
        let Some(memory) = &self.memory_rules else {
            return;
        };
        let last = match self.input.last() {
            Some(Datum::Word(word)) => word.as_str(),
            _ => "",
        };
        let index = hash(last, MEMORY_HASH_BITS) + 1;
        let Some(rule) = memory.rule(index) else {
            return;
        };
        let Some(Reassembly::Template(template)) = rule.reassemblies.first() else {
            return;
        };

        let words = self.input.words();
        match decompose(&rule.pattern, &words) {
            Some(captures) => {
                let sentence = reassemble(template, &captures, &self.config.placeholder);
                tracing::debug!(rule = index, "memory queued");
                self.memories.push_back(List::from_words(sentence));
            }
            None => tracing::debug!(rule = index, "memory rule did not match"),
        }
    }

    fn decompose(&mut self, rules: RuleRef, item: usize) -> State {
        let Some(entry) = self.table.entry(rules) else {
            return State::NoMatch;
        };
        let words = self.input.words();

        for (index, rule_item) in entry.items.iter().enumerate().skip(item) {
            match rule_item {
                RuleItem::Link(target) => {
                    let target = target.clone();
                    return self.redirect(&target);
                }
                RuleItem::Decomposition(rule) => {
                    if let Some(captures) = decompose(&rule.pattern, &words) {
                        tracing::debug!(
                            keyword = %entry.keyword,
                            rule = index,
                            groups = captures.len(),
                            "decomposition matched"
                        );
                        return State::Reassemble {
                            rules,
                            item: index,
                            captures,
                        };
                    }
                }
            }
        }
        tracing::debug!(keyword = %entry.keyword, "decomposition rules exhausted");
        State::NoMatch
    }

    fn reassemble(&mut self, rules: RuleRef, item: usize, captures: Captures) -> State {
        let rule = match self
            .table
            .entry_mut(rules)
            .and_then(|entry| entry.items.get_mut(item))
        {
            Some(RuleItem::Decomposition(rule)) => rule,
            _ => return State::NoMatch,
        };
        let Some(reassembly) = rule.rotate().cloned() else {
            return State::NoMatch;
        };

        match reassembly {
            Reassembly::Template(template) => {
                let output = reassemble(&template, &captures, &self.config.placeholder);
                self.emit(join(&output));
                State::AwaitInput
            }
            Reassembly::Link(target) => self.redirect(&target),
            Reassembly::Pre { template, link } => {
                let rebuilt = reassemble(&template, &captures, &self.config.placeholder);
                self.input
                    .assign(rebuilt.into_iter().map(Datum::Word).collect());
                tracing::debug!(input = %self.input, "input rebuilt");
                self.redirect(&link)
            }
        }
    }

    /// Continue with `target`'s rules, or give up if it is unknown or the
    /// turn has already followed too many links
    fn redirect(&mut self, target: &Word) -> State {
        self.redirects += 1;
        if self.redirects > self.config.max_redirects {
            tracing::warn!(target = %target, limit = self.config.max_redirects, "too many redirects");
            return State::NoMatch;
        }
        match self.table.locate(target.as_str()) {
            Some(rules) => {
                tracing::debug!(target = %target, "redirect");
                State::Decompose { rules, item: 0 }
            }
            None => {
                tracing::debug!(target = %target, "redirect to unknown keyword");
                State::NoMatch
            }
        }
    }

    fn emit(&mut self, line: String) {
        tracing::trace!(line = %line, "emit");
        self.outbox.push(line);
    }
}

fn join(words: &[Word]) -> String {
    words
        .iter()
        .map(Word::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A list access that cannot fail did. Loud in debug builds, logged and
/// skipped in release builds.
fn invariant_violation(err: &SlipError) {
    tracing::error!(%err, "list invariant violated");
    debug_assert!(false, "list invariant violated: {err}");
}
