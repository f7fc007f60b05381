//! Locale-style ordering for handles.
//!
//! Approximates root collation for the characters handles use:
//! - punctuation and spaces sort before digits, digits before letters;
//! - punctuation follows root collation rank (`_` before `-` before `.`);
//! - letters compare case-insensitively first;
//! - on a case-insensitive tie, lowercase sorts before uppercase;
//! - remaining ties fall back to code point order.

use std::cmp::Ordering;

/// Punctuation and symbols in root collation order. Anything missing sorts
/// after these, by code point.
const PUNCTUATION_ORDER: &str = " _-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Compares two handles for alphabetical listing.
pub fn compare_handles(left: &str, right: &str) -> Ordering {
    primary_keys(left)
        .cmp(primary_keys(right))
        .then_with(|| case_keys(left).cmp(case_keys(right)))
        .then_with(|| left.cmp(right))
}

fn primary_keys(value: &str) -> impl Iterator<Item = (u8, usize, char)> + '_ {
    value.chars().flat_map(char::to_lowercase).map(|ch| {
        if ch.is_alphabetic() {
            (2, 0, ch)
        } else if ch.is_numeric() {
            (1, 0, ch)
        } else {
            (0, punctuation_rank(ch), ch)
        }
    })
}

fn punctuation_rank(ch: char) -> usize {
    PUNCTUATION_ORDER
        .chars()
        .position(|candidate| candidate == ch)
        .unwrap_or(PUNCTUATION_ORDER.len())
}

fn case_keys(value: &str) -> impl Iterator<Item = bool> + '_ {
    value.chars().map(char::is_uppercase)
}
