//! Hash-likelihood heuristic for hexadecimal tokens.

use std::collections::HashSet;
use std::sync::LazyLock;

/// English words spelled only with hexadecimal digits.
static HEX_WORDS: &[&str] = &[
    "abaca", "accede", "acceded", "added", "baaed", "babe", "baffed", "bead", "beaded", "bedded",
    "bedead", "beef", "beefed", "cabbed", "cafe", "ceded", "dabbed", "dace", "dead", "deaf",
    "decade", "decaf", "deed", "deface", "defaced", "effaced", "efface", "facade", "face",
    "faced", "fade", "faded", "feed",
];

/// Known hexadecimal words, never treated as commit hash candidates.
pub static KNOWN_HEX_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HEX_WORDS.iter().copied().collect());

/// Whether the token is one of the known hexadecimal English words.
pub fn is_hexadecimal_known_word(token: &str) -> bool {
    KNOWN_HEX_WORDS.contains(token)
}

/// Decide whether a hexadecimal-looking token is probably a commit hash.
///
/// A token is rejected when it is a known word, or when it is made only of
/// digits or only of letters: a hash fragment long enough to be ambiguous
/// mixes both.
pub fn is_hash(token: &str, known_words: &HashSet<&'static str>) -> bool {
    if known_words.contains(token) {
        return false;
    }

    let all_digits = token.chars().all(|c| c.is_ascii_digit());
    let all_letters = token.chars().all(|c| c.is_ascii_alphabetic());

    !(all_digits || all_letters)
}
