//! Encodes binary data as checksummed, human-friendly strings in the Bech32
//! and Bech32m formats, and decodes such strings back.
//!
//! An encoded string consists of a human-readable part, the separator `1`,
//! and a data part. The data part holds the payload as 5-bit symbols followed
//! by a 6 symbol checksum. The checksum covers the human-readable part too, so
//! a string cannot be moved to a different prefix without being noticed.
//!
//! ```
//! use bech32_codec::Variant;
//!
//! let encoded = bech32_codec::to_string("a", &[], Variant::Bech32).unwrap();
//! assert_eq!(encoded, "a12uel5l");
//!
//! let decoded = bech32_codec::from_str("A12UEL5L").unwrap();
//! assert_eq!(decoded.hrp, "a");
//! assert_eq!(decoded.variant, Variant::Bech32);
//! assert!(decoded.data.is_empty());
//! ```
//!
//! Like other string/data formats in this repo, each direction comes as a
//! pair: [`encode`] and [`decode`] write into a buffer, while [`to_string`] and
//! [`from_str`] return owned values.
//!
//! Decoding accepts strings that are entirely uppercase or entirely lowercase.
//! Encoding always produces lowercase output unless [`Case::Upper`] is
//! requested. The codec does not interpret the payload and does not enforce a
//! maximum string length; consumers with such rules must apply them.

use std::str::FromStr;
use std::{fmt, io};

use smallvec::SmallVec;

// for benchmarks
#[cfg(test)]
use criterion as _;

pub mod charset;
pub mod checksum;
pub mod convert;
mod error;

pub use error::{DecodeError, EncodeError, ParseVariantError};

use crate::checksum::CHECKSUM_LEN;

/// Separates the human-readable part from the data part.
///
/// The human-readable part may contain this character itself. The last
/// occurrence in a string is the separator.
pub const SEPARATOR: char = '1';

/// Inline capacity for symbols and bytes buffered during en-/decoding.
///
/// This fits typical address payloads without a heap allocation.
const INLINE: usize = 96;

/// The checksum scheme of an encoded string.
///
/// The two variants only differ in the constant the checksum remainder must
/// equal. Decoding reports which variant a string uses; encoding requires the
/// caller to pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Variant {
    /// The original checksum, as specified by BIP-173.
    Bech32,
    /// The modified checksum, as specified by BIP-350.
    Bech32m,
}

impl Variant {
    /// The constant the checksum remainder equals for this variant.
    #[must_use]
    pub const fn target(self) -> u32 {
        match self {
            Self::Bech32 => 1,
            Self::Bech32m => 0x2BC8_30A3,
        }
    }

    /// Finds the variant whose target constant is `residue`, if any.
    #[must_use]
    pub const fn from_residue(residue: u32) -> Option<Self> {
        if residue == Self::Bech32.target() {
            Some(Self::Bech32)
        } else if residue == Self::Bech32m.target() {
            Some(Self::Bech32m)
        } else {
            None
        }
    }

    /// The lowercase name of the variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bech32 => "bech32",
            Self::Bech32m => "bech32m",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::Bech32.name()) {
            Ok(Self::Bech32)
        } else if s.eq_ignore_ascii_case(Self::Bech32m.name()) {
            Ok(Self::Bech32m)
        } else {
            Err(ParseVariantError(()))
        }
    }
}

/// The letter case of an encoded string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Case {
    /// All lowercase. This is the canonical form.
    #[default]
    Lower,
    /// All uppercase.
    Upper,
}

/// The parts of a decoded string besides its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// The human-readable part, in lowercase.
    pub hrp: String,
    /// The variant the checksum is valid for.
    pub variant: Variant,
}

/// A fully decoded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The human-readable part, in lowercase.
    pub hrp: String,
    /// The payload bytes.
    pub data: Vec<u8>,
    /// The variant the checksum is valid for.
    pub variant: Variant,
}

impl FromStr for Decoded {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::from_str(s)
    }
}

/// The length of the string that encoding `data_len` bytes with a
/// human-readable part of `hrp_len` characters produces.
///
/// This can be used to reserve space in a buffer.
#[must_use]
pub const fn encoded_len(hrp_len: usize, data_len: usize) -> usize {
    hrp_len + 1 + (data_len * 8).div_ceil(5) + CHECKSUM_LEN
}

/// The maximum byte length a string of `char_count` characters may decode to.
///
/// This can be used to reserve space in a buffer.
#[must_use]
pub const fn max_data_len(char_count: usize) -> usize {
    // at least 1 char for the hrp and the separator
    char_count.saturating_sub(2 + CHECKSUM_LEN) * 5 / 8
}

/// Encodes bytes, returning a lowercase [`String`] with the result.
///
/// This is equivalent to using [`encode`] with a [`String`].
///
/// Use [`from_str`] to reverse the operation.
///
/// # Errors
///
/// Returns [`Err`] if `hrp` is empty or contains characters outside printable
/// ASCII.
pub fn to_string(hrp: &str, data: &[u8], variant: Variant) -> Result<String, EncodeError> {
    to_string_with_case(hrp, data, variant, Case::Lower)
}

/// Encodes bytes, returning a [`String`] in the requested letter case.
///
/// # Errors
///
/// Returns [`Err`] if `hrp` is empty or contains characters outside printable
/// ASCII.
pub fn to_string_with_case(
    hrp: &str,
    data: &[u8],
    variant: Variant,
    case: Case,
) -> Result<String, EncodeError> {
    let mut result = String::with_capacity(encoded_len(hrp.len(), data.len()));
    encode(&mut result, hrp, data, variant)?;

    if case == Case::Upper {
        result.make_ascii_uppercase();
    }

    Ok(result)
}

/// Encodes bytes, writing the lowercase result to a buffer.
///
/// The human-readable part is lowercased before use.
///
/// Use [`decode`] to reverse the operation.
///
/// # Errors
///
/// Returns [`Err`] if `hrp` is empty, contains characters outside printable
/// ASCII, or `writer` returns [`Err`].
pub fn encode<W: fmt::Write>(
    mut writer: W,
    hrp: &str,
    data: &[u8],
    variant: Variant,
) -> Result<(), EncodeError> {
    if hrp.is_empty() {
        return Err(EncodeError::HrpTooShort);
    }

    if let Some(c) = find_invalid_hrp_char(hrp) {
        return Err(EncodeError::InvalidCharacter(c));
    }

    let hrp = hrp.to_ascii_lowercase();

    let mut symbols = <SmallVec<[u8; INLINE]>>::new();
    convert::convert_bits(&mut symbols, data.iter().copied(), 8, 5, true)
        .expect("padded regrouping of bytes cannot fail");

    let checksum = checksum::create_checksum(&hrp, &symbols, variant);

    writer.write_str(&hrp)?;
    writer.write_char(SEPARATOR)?;
    for &symbol in symbols.iter().chain(&checksum) {
        writer.write_char(charset::char_of(symbol))?;
    }

    Ok(())
}

/// Decodes a string, returning the human-readable part, payload, and variant.
///
/// Either checksum variant is accepted. Use [`from_str_as`] if only one is
/// acceptable.
///
/// # Errors
///
/// Returns [`Err`] if the string is malformed or its checksum is invalid.
pub fn from_str(input: &str) -> Result<Decoded, DecodeError> {
    from_str_inner(input, None)
}

/// Decodes a string whose checksum must be of the `expected` variant.
///
/// # Errors
///
/// Returns [`Err`] if the string is malformed or its checksum is invalid.
/// If the checksum is valid for the other variant,
/// [`DecodeError::WrongVariant`] is returned.
pub fn from_str_as(input: &str, expected: Variant) -> Result<Decoded, DecodeError> {
    from_str_inner(input, Some(expected))
}

/// Decodes a string, writing the payload to a buffer.
///
/// Either checksum variant is accepted. Use [`decode_as`] if only one is
/// acceptable.
///
/// Nothing is written if the string is invalid.
///
/// # Errors
///
/// Returns [`Err`] if the string is malformed, its checksum is invalid, or
/// `writer` returns [`Err`].
pub fn decode<W: io::Write>(writer: W, input: &str) -> Result<Header, DecodeError> {
    decode_inner(writer, input, None)
}

/// Decodes a string whose checksum must be of the `expected` variant, writing
/// the payload to a buffer.
///
/// # Errors
///
/// Returns [`Err`] if the string is malformed, its checksum is invalid, or
/// `writer` returns [`Err`]. If the checksum is valid for the other variant,
/// [`DecodeError::WrongVariant`] is returned.
pub fn decode_as<W: io::Write>(
    writer: W,
    input: &str,
    expected: Variant,
) -> Result<Header, DecodeError> {
    decode_inner(writer, input, Some(expected))
}

fn from_str_inner(input: &str, expected: Option<Variant>) -> Result<Decoded, DecodeError> {
    let mut data = Vec::with_capacity(max_data_len(input.len()));
    let Header { hrp, variant } = decode_inner(&mut data, input, expected)?;
    Ok(Decoded { hrp, data, variant })
}

fn decode_inner<W: io::Write>(
    mut writer: W,
    input: &str,
    expected: Option<Variant>,
) -> Result<Header, DecodeError> {
    let has_upper = input.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = input.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower {
        return Err(DecodeError::MixedCase);
    }

    let (hrp, data) = input
        .rsplit_once(SEPARATOR)
        .ok_or(DecodeError::NoSeparator)?;

    if hrp.is_empty() {
        return Err(DecodeError::HrpTooShort);
    }

    if data.chars().count() < CHECKSUM_LEN {
        return Err(DecodeError::DataTooShort);
    }

    if let Some(c) = find_invalid_hrp_char(hrp) {
        return Err(DecodeError::InvalidCharacter(c));
    }

    let hrp = hrp.to_ascii_lowercase();
    let symbols = data
        .chars()
        .map(charset::value_of)
        .collect::<Result<SmallVec<[u8; INLINE]>, _>>()?;

    let variant = checksum::verify(&hrp, &symbols).ok_or(DecodeError::ChecksumMismatch)?;
    match expected {
        Some(expected) if expected != variant => {
            return Err(DecodeError::WrongVariant {
                expected,
                found: variant,
            });
        },
        _ => {},
    }

    // the length check above ensures the checksum is present
    let (payload, _) = symbols.split_at(symbols.len() - CHECKSUM_LEN);

    let mut bytes = <SmallVec<[u8; INLINE]>>::new();
    convert::convert_bits(&mut bytes, payload.iter().copied(), 5, 8, false)?;
    writer.write_all(&bytes)?;

    Ok(Header { hrp, variant })
}

/// Finds the first character that may not be part of a human-readable part.
///
/// Only printable ASCII, excluding the space, is allowed.
fn find_invalid_hrp_char(hrp: &str) -> Option<char> {
    hrp.chars().find(|c| !matches!(c, '!'..='~'))
}
