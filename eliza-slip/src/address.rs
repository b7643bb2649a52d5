use crate::datum::Datum;
use crate::error::{Result, SlipError};
use crate::list::List;

/// A short-lived mutation handle on one cell of a [`List`].
///
/// An address exclusively borrows its list, so nothing else can change the
/// list while the address exists. Structural edits (`insert_before`,
/// `insert_after`) consume the address and hand back one for the new cell;
/// `replace` leaves the structure alone and keeps the address usable.
#[derive(Debug)]
pub struct Address<'a> {
    list: &'a mut List,
    position: usize,
}

impl<'a> Address<'a> {
    pub(crate) fn new(list: &'a mut List, position: usize) -> Result<Self> {
        if position >= list.len() {
            return Err(SlipError::OutOfRange {
                index: position as isize,
                len: list.len(),
            });
        }
        Ok(Self { list, position })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn get(&self) -> &Datum {
        &self.list.cells()[self.position]
    }

    /// Insert `datum` in front of this cell; the new cell takes this position
    pub fn insert_before(self, datum: impl Into<Datum>) -> Address<'a> {
        let position = self.position;
        self.list.insert(position, datum.into());
        Address {
            list: self.list,
            position,
        }
    }

    /// Insert `datum` right after this cell
    pub fn insert_after(self, datum: impl Into<Datum>) -> Address<'a> {
        let position = self.position + 1;
        self.list.insert(position, datum.into());
        Address {
            list: self.list,
            position,
        }
    }

    /// Overwrite this cell, returning what was there
    pub fn replace(&mut self, datum: impl Into<Datum>) -> Datum {
        self.list.replace(self.position, datum.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_in_place() {
        let mut list = List::from_words(["MY", "DOG"]);
        let generation = list.generation();
        {
            let mut addr = list.address(0).unwrap();
            let old = addr.replace("YOUR");
            assert_eq!(old, Datum::word("MY"));
            assert_eq!(addr.get(), &Datum::word("YOUR"));
        }
        assert_eq!(list.to_text(), "YOUR DOG");
        assert_eq!(list.generation(), generation);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut list = List::from_words(["B"]);
        let addr = list.address(0).unwrap();
        let addr = addr.insert_before("A");
        assert_eq!(addr.position(), 0);
        let addr = addr.insert_after("A2");
        assert_eq!(addr.position(), 1);
        assert_eq!(addr.get(), &Datum::word("A2"));
        assert_eq!(list.to_text(), "A A2 B");
    }

    #[test]
    fn test_insert_invalidates_cursor() {
        let mut list = List::from_words(["X", "Y"]);
        let mut cursor = list.cursor();
        cursor.step_forward(&list);
        cursor.address(&mut list).unwrap().insert_after("Z");
        assert!(!cursor.is_valid_for(&list));

        cursor.reposition(&list, 1);
        assert_eq!(cursor.current(&list).0, Some(&Datum::word("Z")));
    }

    #[test]
    fn test_address_out_of_range() {
        let mut list = List::new();
        assert!(list.address(0).is_err());
    }
}
