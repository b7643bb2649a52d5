//! # eliza-slip
//!
//! A small symmetric list processing runtime in the spirit of SLIP:
//! - [`List`]: owned, ordered, mutable cells of words, numbers and sublists
//! - [`Cursor`]: a detached, bidirectional traversal position with header
//!   and end sentinels
//! - [`Address`]: a borrow-checked handle for editing the cell under a cursor
//! - [`hash`]: the stable word hash used to bucket keywords
//! - [`ScriptReader`]: reads parenthesised scripts one list at a time
//!
//! ## Example
//!
//! ```
//! use eliza_slip::{read_sentence, Datum};
//!
//! let mut input = read_sentence("my mother hates me");
//! let mut cursor = input.cursor();
//! cursor.step_forward(&input);
//! cursor.address(&mut input).unwrap().replace(Datum::word("YOUR"));
//! assert_eq!(input.to_text(), "YOUR MOTHER HATES ME");
//! ```

pub mod address;
pub mod cursor;
pub mod datum;
pub mod error;
pub mod hash;
pub mod lexer;
pub mod list;
pub mod reader;


pub use address::Address;
pub use cursor::{Cursor, EndState};
pub use datum::Datum;
pub use error::{ErrorContext, Result, SlipError};
pub use hash::hash;
pub use lexer::{split_sentence, tokenize, SpannedToken, Token};
pub use list::List;
pub use reader::{parse_list, read_sentence, ScriptReader};

// Re-export shared types from eliza-types
pub use eliza_types::{Span, Word};
