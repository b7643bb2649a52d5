//! Bidirectional traversal over a [`List`].
//!
//! A cursor is detached from the list it walks: it holds a signed position
//! and is handed the list on every step. Position `-1` is the header
//! sentinel (before the first cell) and any position `>= len` is the end
//! sentinel.

use crate::address::Address;
use crate::datum::Datum;
use crate::error::{Result, SlipError};
use crate::list::List;

/// What a cursor step landed on.
///
/// The three states are not a boolean: [`EndState::flag`] keeps the signed
/// encoding (`0` element, `>0` end, `<0` header) for call sites that branch
/// on sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndState {
    /// A real cell was read
    Element,
    /// Past the last cell, no more elements
    End,
    /// On the header sentinel before the first cell
    Header,
}

impl EndState {
    pub fn flag(self) -> i32 {
        match self {
            EndState::Element => 0,
            EndState::End => 1,
            EndState::Header => -1,
        }
    }

    pub fn is_element(self) -> bool {
        self == EndState::Element
    }

    pub fn is_end(self) -> bool {
        self == EndState::End
    }

    pub fn is_header(self) -> bool {
        self == EndState::Header
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    position: isize,
    generation: u64,
}

impl Cursor {
    /// A cursor on the header of `list`
    pub fn new(list: &List) -> Self {
        Self {
            position: -1,
            generation: list.generation(),
        }
    }

    pub fn position(&self) -> isize {
        self.position
    }

    /// Index of the current cell, if the cursor is on one
    pub fn index(&self, list: &List) -> Option<usize> {
        usize::try_from(self.position)
            .ok()
            .filter(|&i| i < list.len())
    }

    /// True while no structural mutation happened since the cursor was positioned
    pub fn is_valid_for(&self, list: &List) -> bool {
        self.generation == list.generation()
    }

    /// Move forward one cell, then read it
    pub fn step_forward<'a>(&mut self, list: &'a List) -> (Option<&'a Datum>, EndState) {
        self.check(list);
        if self.position < list.len() as isize {
            self.position += 1;
        }
        self.read(list)
    }

    /// Read the current cell, then move back one
    pub fn step_backward<'a>(&mut self, list: &'a List) -> (Option<&'a Datum>, EndState) {
        self.check(list);
        let read = self.read(list);
        if self.position > -1 {
            self.position = self.position.min(list.len() as isize) - 1;
        }
        read
    }

    /// Read the current cell without moving
    pub fn current<'a>(&self, list: &'a List) -> (Option<&'a Datum>, EndState) {
        self.check(list);
        self.read(list)
    }

    /// Back to the header, re-synchronised with the list's current structure
    pub fn rewind(&mut self, list: &List) {
        *self = Cursor::new(list);
    }

    /// Mutation handle on the cell under the cursor.
    ///
    /// The address borrows the list mutably, so it cannot be held across
    /// another cursor step.
    pub fn address<'a>(&self, list: &'a mut List) -> Result<Address<'a>> {
        self.check(list);
        match self.index(list) {
            Some(index) => Address::new(list, index),
            None => Err(SlipError::OutOfRange {
                index: self.position,
                len: list.len(),
            }),
        }
    }

    /// Re-synchronise after a structural mutation made through an [`Address`]
    /// obtained from this cursor, moving onto `index`.
    pub fn reposition(&mut self, list: &List, index: usize) {
        self.generation = list.generation();
        self.position = (index as isize).min(list.len() as isize);
    }

    fn read<'a>(&self, list: &'a List) -> (Option<&'a Datum>, EndState) {
        if self.position < 0 {
            return (None, EndState::Header);
        }
        match list.cells().get(self.position as usize) {
            Some(datum) => (Some(datum), EndState::Element),
            None => (None, EndState::End),
        }
    }

    fn check(&self, list: &List) {
        debug_assert!(
            self.is_valid_for(list),
            "cursor used on {:?} after a structural mutation",
            list.name().unwrap_or("<anonymous>")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_walk_reads_head_first() {
        let list = List::from_words(["A", "B"]);
        let mut cursor = list.cursor();
        assert_eq!(cursor.position(), -1);
        assert!(cursor.current(&list).1.is_header());

        let (datum, state) = cursor.step_forward(&list);
        assert_eq!(datum, Some(&Datum::word("A")));
        assert_eq!(state.flag(), 0);

        cursor.step_forward(&list);
        let (datum, state) = cursor.step_forward(&list);
        assert!(datum.is_none());
        assert!(state.flag() > 0);

        // Stays parked on the end sentinel
        let (_, state) = cursor.step_forward(&list);
        assert!(state.is_end());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_backward_walk_reads_then_moves() {
        let list = List::from_words(["A", "B"]);
        let mut cursor = list.cursor();
        cursor.step_forward(&list);
        cursor.step_forward(&list);

        let (datum, state) = cursor.step_backward(&list);
        assert_eq!(datum, Some(&Datum::word("B")));
        assert!(state.is_element());
        assert_eq!(cursor.position(), 0);

        cursor.step_backward(&list);
        let (datum, state) = cursor.step_backward(&list);
        assert!(datum.is_none());
        assert!(state.flag() < 0);
        assert_eq!(cursor.position(), -1);
    }

    #[test]
    fn test_backward_from_end_sentinel() {
        let list = List::from_words(["A", "B"]);
        let mut cursor = list.cursor();
        for _ in 0..3 {
            cursor.step_forward(&list);
        }
        let (_, state) = cursor.step_backward(&list);
        assert!(state.is_end());
        let (datum, _) = cursor.step_backward(&list);
        assert_eq!(datum, Some(&Datum::word("B")));
    }

    #[test]
    fn test_empty_list() {
        let list = List::new();
        let mut cursor = list.cursor();
        let (datum, state) = cursor.step_forward(&list);
        assert!(datum.is_none());
        assert!(state.is_end());
    }

    #[test]
    fn test_address_requires_element() {
        let mut list = List::from_words(["A"]);
        let cursor = list.cursor();
        assert!(matches!(
            cursor.address(&mut list),
            Err(SlipError::OutOfRange { index: -1, .. })
        ));
    }

    #[test]
    fn test_rewind_after_mutation() {
        let mut list = List::from_words(["A", ",", "B"]);
        let mut cursor = list.cursor();
        cursor.step_forward(&list);
        cursor.step_forward(&list);
        list.pop_front_n(2);
        assert!(!cursor.is_valid_for(&list));

        cursor.rewind(&list);
        let (datum, _) = cursor.step_forward(&list);
        assert_eq!(datum, Some(&Datum::word("B")));
    }
}
