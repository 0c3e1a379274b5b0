//! The symbol alphabet and its inverse.
//!
//! A symbol is a 5-bit value. Every symbol is rendered as one character of
//! [`ALPHABET`]; when reading, the uppercase form of a character maps to the
//! same symbol as the lowercase one. Whether a whole string mixes cases is the
//! decoder's concern, not this module's.

use crate::error::DecodeError;

/// The characters symbols are rendered as, indexed by symbol value.
pub const ALPHABET: [u8; 32] = *b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Marks ASCII codes in [`REVERSE`] that have no symbol.
const NO_SYMBOL: u8 = 0xFF;

/// Maps ASCII codes to symbol values, for both cases.
///
/// Computed at compile time, so it is never observed partially built.
const REVERSE: [u8; 128] = build_reverse();

#[allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    reason = "const context, alphabet has 32 entries"
)]
const fn build_reverse() -> [u8; 128] {
    let mut map = [NO_SYMBOL; 128];
    let mut index = 0;
    while index < ALPHABET.len() {
        let c = ALPHABET[index];
        map[c as usize] = index as u8;
        map[c.to_ascii_uppercase() as usize] = index as u8;
        index += 1;
    }

    map
}

/// Gets the alphabet, indexed by symbol value.
#[must_use]
pub const fn alphabet() -> &'static [u8; 32] {
    &ALPHABET
}

/// Gets the symbol value of a character.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidCharacter`] if the character is not in the
/// [`ALPHABET`] in either case. This includes everything outside 7-bit ASCII.
pub fn value_of(c: char) -> Result<u8, DecodeError> {
    let symbol = u8::try_from(c)
        .ok()
        .and_then(|b| REVERSE.get(usize::from(b)).copied());

    match symbol {
        Some(symbol) if symbol != NO_SYMBOL => Ok(symbol),
        _ => Err(DecodeError::InvalidCharacter(c)),
    }
}

/// Gets the lowercase character a symbol is rendered as.
///
/// Only the low 5 bits of `symbol` are considered.
#[must_use]
pub fn char_of(symbol: u8) -> char {
    char::from(ALPHABET[usize::from(symbol & 0x1F)])
}
