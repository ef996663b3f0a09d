//! Locale-aware string comparison.
//!
//! Strings are compared in three passes, like a collation table:
//!
//! 1. base letters, ignoring case and diacritics, with whitespace and
//!    punctuation before digits and digits before letters;
//! 2. diacritics (`a` before `á`);
//! 3. case (lowercase before uppercase).
//!
//! Whitespace and the ASCII punctuation marks follow the root collation order
//! (`_` and `-` before `.`, currency signs last). Other symbols sort after
//! those by code point. Strings that are equal on all three passes fall back
//! to code point order, so the result is a total order.

use std::cmp::Ordering;

/// Compares two strings in locale-aware order.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    primary_keys(a)
        .cmp(primary_keys(b))
        .then_with(|| secondary_keys(a).cmp(secondary_keys(b)))
        .then_with(|| tertiary_keys(a).cmp(tertiary_keys(b)))
        .then_with(|| a.cmp(b))
}

/// ASCII punctuation and symbols in root collation order.
const PUNCTUATION: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

fn primary_keys(s: &str) -> impl Iterator<Item = (u8, u32)> + '_ {
    s.chars().map(|c| {
        let base = fold(c);
        (class(base), weight(base))
    })
}

fn weight(c: char) -> u32 {
    if c.is_whitespace() {
        return 0;
    }
    PUNCTUATION
        .chars()
        .zip(1..)
        .find_map(|(mark, weight)| (mark == c).then_some(weight))
        .unwrap_or_else(|| 0x40 + u32::from(c))
}

fn secondary_keys(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(|c| fold(c) != lower(c))
}

fn tertiary_keys(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(char::is_uppercase)
}

fn class(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

fn lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Lowercases and strips the diacritic from Latin letters.
fn fold(c: char) -> char {
    match lower(c) {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("ALVAREZ", "SAAVEDRA", Ordering::Less; "plain letters")]
    #[test_case("estación", "Estacion", Ordering::Greater; "accent outweighs case")]
    #[test_case("Zona 2", "zona 10", Ordering::Greater; "digits compare as characters")]
    #[test_case("a", "A", Ordering::Less; "lowercase first")]
    #[test_case("ÁREA", "AZUL", Ordering::Less; "accent ignored on first pass")]
    #[test_case("Zona 1", "Zona 1", Ordering::Equal; "identical")]
    #[test_case("DIV. B", "DIVA", Ordering::Less; "punctuation before letters")]
    #[test_case("Zona", "Zona 1", Ordering::Less; "prefix first")]
    #[test_case("A_B", "A.B", Ordering::Less; "underscore before period")]
    #[test_case("A-B", "A.B", Ordering::Less; "hyphen before period")]
    #[test_case("A B", "A_B", Ordering::Less; "space before underscore")]
    #[test_case("A$", "A1", Ordering::Less; "currency before digits")]
    #[test_case("A~", "A$", Ordering::Less; "currency after other symbols")]
    fn compares(a: &str, b: &str, expected: Ordering) {
        assert_eq!(locale_cmp(a, b), expected);
    }
}
