//! The BCH checksum shared by both [`Variant`]s.
//!
//! The checksum treats the symbols as coefficients of a polynomial over
//! GF(32) and reduces it modulo a fixed generator, much like a CRC. The 30-bit
//! remainder is held in a `u32`. A string is valid if the remainder of its
//! expanded human-readable part followed by all data and checksum symbols
//! equals the target constant of a variant.

use std::iter;

use crate::Variant;

/// Amount of symbols the checksum occupies at the end of the data part.
pub const CHECKSUM_LEN: usize = 6;

/// Generator constants, one for each of the top 5 bits of the remainder.
const GENERATORS: [u32; 5] = [
    0x3B6A_57B2,
    0x2650_8E6D,
    0x1EA1_19FA,
    0x3D42_33DD,
    0x2A14_62B3,
];

/// Mask of the bits that remain in the remainder after shifting in a symbol.
const LOW_25_BITS: u32 = 0x1FF_FFFF;

/// Expands a human-readable part into symbols to feed into [`polymod`].
///
/// This yields the high 3 bits of every byte, a zero, and then the low 5 bits
/// of every byte. `hrp` is expected to already be lowercase.
pub fn hrp_expand(hrp: &str) -> impl Iterator<Item = u8> + Clone {
    let bytes = hrp.bytes();
    bytes
        .clone()
        .map(|b| b >> 5)
        .chain(iter::once(0))
        .chain(bytes.map(|b| b & 0x1F))
}

/// Computes the checksum remainder of a symbol sequence.
///
/// Symbols are expected to be 5-bit values; higher bits leak into the
/// remainder and will make the result meaningless.
pub fn polymod<I>(symbols: I) -> u32
where
    I: IntoIterator<Item = u8>,
{
    let mut chk = 1u32;
    for symbol in symbols {
        let top = chk >> 25;
        chk = ((chk & LOW_25_BITS) << 5) ^ u32::from(symbol);
        for (index, generator) in GENERATORS.iter().enumerate() {
            if (top >> index) & 1 != 0 {
                chk ^= generator;
            }
        }
    }

    chk
}

/// Verifies the checksum at the end of `data`.
///
/// Returns the [`Variant`] whose checksum matches, or [`None`] if neither does.
#[must_use]
pub fn verify(hrp: &str, data: &[u8]) -> Option<Variant> {
    let residue = polymod(hrp_expand(hrp).chain(data.iter().copied()));
    Variant::from_residue(residue)
}

/// Creates the checksum symbols to append to `data`.
///
/// The result is what makes [`verify`] return `variant` for the concatenation.
#[must_use]
#[expect(clippy::cast_possible_truncation)]
pub fn create_checksum(hrp: &str, data: &[u8], variant: Variant) -> [u8; CHECKSUM_LEN] {
    let symbols = hrp_expand(hrp)
        .chain(data.iter().copied())
        .chain([0; CHECKSUM_LEN]);

    let residue = polymod(symbols) ^ variant.target();

    let mut checksum = [0u8; CHECKSUM_LEN];
    for (index, symbol) in checksum.iter_mut().enumerate() {
        // most significant group first
        let shift = 5 * (CHECKSUM_LEN - 1 - index);
        *symbol = ((residue >> shift) & 0x1F) as u8;
    }

    checksum
}
