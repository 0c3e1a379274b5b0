use std::{fmt, io};

use crate::Variant;

/// Error decoding a string.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// A character is not allowed at its position.
    ///
    /// In the data part, only characters of the
    /// [`ALPHABET`](crate::charset::ALPHABET) are allowed. The human-readable
    /// part allows printable ASCII.
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
    /// The string contains both upper- and lowercase letters.
    #[error("string mixes upper- and lowercase letters")]
    MixedCase,
    /// The string does not contain the separator `1`.
    #[error("missing separator '1'")]
    NoSeparator,
    /// The separator was at an invalid position.
    #[error("separator at invalid position")]
    #[deprecated = "not returned, a leading separator is reported as `HrpTooShort`"]
    InvalidSeparatorPosition,
    /// The human-readable part is empty.
    #[error("human-readable part is empty")]
    HrpTooShort,
    /// The data part is too short to hold a checksum.
    #[error("data part is shorter than the checksum")]
    DataTooShort,
    /// The checksum is valid, but for a variant the caller did not accept.
    #[error("checksum is {found}, but {expected} was expected")]
    WrongVariant {
        /// The variant the caller asked for.
        expected: Variant,
        /// The variant the checksum is valid for.
        found: Variant,
    },
    /// The checksum is not valid for either variant.
    #[error("checksum mismatch")]
    ChecksumMismatch,
    /// The data part does not regroup into whole bytes, or its padding bits
    /// are non-zero.
    #[error("invalid padding in data part")]
    InvalidPadding,
    /// The written buffer returned an error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Error encoding data.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// The human-readable part is empty.
    #[error("human-readable part is empty")]
    HrpTooShort,
    /// The human-readable part contains a character outside printable ASCII.
    #[error("invalid character {0:?} in human-readable part")]
    InvalidCharacter(char),
    /// The written buffer returned an error.
    #[error(transparent)]
    Fmt(#[from] fmt::Error),
}

/// Error parsing a [`Variant`] from its name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown checksum variant, expected `bech32` or `bech32m`")]
pub struct ParseVariantError(pub(crate) ());
