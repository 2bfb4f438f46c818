//! Log message decoration.
//!
//! Turns plain-text tokens of an event log message into markup:
//!
//! - `a1b2c3d` - commit hashes, linked to the search endpoint
//! - `T1234`, `D56`, `P7#12` - tasks, reviews and pastes
//! - `rOPS` - repository callsigns
//! - `rOPS1234abc` - commits qualified by their repository callsign
//! - `` `code` `` - inline code spans
//!
//! Hexadecimal-looking English words ("faced", "decade") and tokens that are
//! not a mix of digits and letters are never linked as hashes.

mod hash;
mod rules;

pub use hash::{KNOWN_HEX_WORDS, is_hash, is_hexadecimal_known_word};
pub use rules::{
    DEFAULT_SEARCH_URL, DEFAULT_SOURCE_URL, DecoratorRule, LinkTargets, MessageDecorator,
    Replacement, RuleContext, decorate,
};
