//! Owned, mutable, ordered lists of [`Datum`] cells.
//!
//! A [`List`] tracks a structural generation that is bumped by every
//! insertion or removal. [`Cursor`]s remember the generation they were
//! positioned against and assert on it, so traversal state that outlives a
//! structural mutation is caught in debug builds.

use crate::address::Address;
use crate::cursor::Cursor;
use crate::datum::Datum;
use crate::error::{Result, SlipError};
use eliza_types::Word;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct List {
    name: Option<String>,
    cells: Vec<Datum>,
    generation: u64,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list identified by `name` (used in traces and dumps)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn from_data(cells: Vec<Datum>) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    pub fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<Word>,
    {
        Self::from_data(words.into_iter().map(|w| Datum::Word(w.into())).collect())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first(&self) -> Option<&Datum> {
        self.cells.first()
    }

    pub fn last(&self) -> Option<&Datum> {
        self.cells.last()
    }

    /// Cell at `index`; out-of-range access is an error, never a panic
    pub fn at(&self, index: usize) -> Result<&Datum> {
        self.cells.get(index).ok_or(SlipError::OutOfRange {
            index: index as isize,
            len: self.cells.len(),
        })
    }

    pub fn cells(&self) -> &[Datum] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Datum> {
        self.cells.iter()
    }

    pub fn push_front(&mut self, datum: impl Into<Datum>) {
        self.cells.insert(0, datum.into());
        self.bump();
    }

    pub fn push_back(&mut self, datum: impl Into<Datum>) {
        self.cells.push(datum.into());
        self.bump();
    }

    pub fn pop_front(&mut self) -> Option<Datum> {
        if self.cells.is_empty() {
            return None;
        }
        self.bump();
        Some(self.cells.remove(0))
    }

    /// Remove and return the first `n` cells (fewer if the list is shorter)
    pub fn pop_front_n(&mut self, n: usize) -> Vec<Datum> {
        let n = n.min(self.cells.len());
        if n == 0 {
            return Vec::new();
        }
        self.bump();
        self.cells.drain(..n).collect()
    }

    pub fn pop_back(&mut self) -> Option<Datum> {
        let popped = self.cells.pop();
        if popped.is_some() {
            self.bump();
        }
        popped
    }

    /// Drop every cell from `index` onward
    pub fn truncate_from(&mut self, index: usize) {
        if index < self.cells.len() {
            self.cells.truncate(index);
            self.bump();
        }
    }

    pub fn clear(&mut self) {
        if !self.cells.is_empty() {
            self.cells.clear();
            self.bump();
        }
    }

    /// Replace the whole contents, keeping the name
    pub fn assign(&mut self, cells: Vec<Datum>) {
        self.cells = cells;
        self.bump();
    }

    /// A cursor positioned on the header of this list
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }

    /// Mutation handle for the cell at `index`
    pub fn address(&mut self, index: usize) -> Result<Address<'_>> {
        Address::new(self, index)
    }

    /// The top-level words, skipping numbers and nested lists
    pub fn words(&self) -> Vec<Word> {
        self.cells
            .iter()
            .filter_map(|d| d.as_word().cloned())
            .collect()
    }

    /// Space-separated rendering of the cells, without the outer parentheses
    pub fn to_text(&self) -> String {
        self.cells
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn insert(&mut self, index: usize, datum: Datum) {
        self.cells.insert(index, datum);
        self.bump();
    }

    pub(crate) fn replace(&mut self, index: usize, datum: Datum) -> Datum {
        std::mem::replace(&mut self.cells[index], datum)
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.to_text())
    }
}

impl FromIterator<Datum> for List {
    fn from_iter<I: IntoIterator<Item = Datum>>(iter: I) -> Self {
        Self::from_data(iter.into_iter().collect())
    }
}

impl IntoIterator for List {
    type Item = Datum;
    type IntoIter = std::vec::IntoIter<Datum>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Datum;
    type IntoIter = std::slice::Iter<'a, Datum>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &List) -> Vec<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_push_and_pop_both_ends() {
        let mut list = List::named("JUNK");
        list.push_back("B");
        list.push_front("A");
        list.push_back("C");
        assert_eq!(words(&list), ["A", "B", "C"]);

        assert_eq!(list.pop_front(), Some(Datum::word("A")));
        assert_eq!(list.pop_back(), Some(Datum::word("C")));
        assert_eq!(list.len(), 1);
        assert_eq!(list.name(), Some("JUNK"));
    }

    #[test]
    fn test_pop_front_n() {
        let mut list = List::from_words(["A", "B", "C", "D"]);
        let popped = list.pop_front_n(3);
        assert_eq!(popped.len(), 3);
        assert_eq!(words(&list), ["D"]);

        let rest = list.pop_front_n(10);
        assert_eq!(rest, vec![Datum::word("D")]);
        assert!(list.is_empty());
        assert!(list.pop_front().is_none());
    }

    #[test]
    fn test_truncate_from() {
        let mut list = List::from_words(["I", "AM", ",", "SAD"]);
        list.truncate_from(2);
        assert_eq!(words(&list), ["I", "AM"]);

        let generation = list.generation();
        list.truncate_from(5);
        assert_eq!(list.generation(), generation);
    }

    #[test]
    fn test_at_out_of_range() {
        let list = List::from_words(["ONLY"]);
        assert!(list.at(0).is_ok());
        assert!(matches!(
            list.at(1),
            Err(SlipError::OutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_first_last_and_words() {
        let mut list = List::from_words(["HELLO", "THERE"]);
        list.push_back(Datum::Number(3));
        list.push_back(List::from_words(["NESTED"]));
        assert_eq!(list.first(), Some(&Datum::word("hello")));
        assert!(list.last().is_some_and(Datum::is_list));
        assert_eq!(list.words(), vec![Word::new("HELLO"), Word::new("THERE")]);
    }

    #[test]
    fn test_display_nested() {
        let mut list = List::from_words(["0", "YOU"]);
        list.push_back(List::from_words(["WHY", "NOT"]));
        assert_eq!(list.to_string(), "(0 YOU (WHY NOT))");
        assert_eq!(list.to_text(), "0 YOU (WHY NOT)");
    }

    #[test]
    fn test_equality_ignores_name() {
        let a = List::from_words(["X"]).with_name("A");
        let b = List::from_words(["x"]).with_name("B");
        assert_eq!(a, b);
    }
}
