//! Regrouping of bit sequences between group widths.
//!
//! Encoding turns 8-bit bytes into 5-bit symbols and decoding does the
//! inverse. Both go through [`convert_bits`], which handles any pair of group
//! widths up to 8 bits. Groups are big-endian: the first input value provides
//! the most significant bits of the first output value.

use std::iter;

use crate::error::DecodeError;

/// Regroups a sequence of `from`-bit values into `to`-bit values.
///
/// Completed groups are appended to `out` as they become available.
///
/// If `pad` is set, leftover bits at the end are filled up with zeros into one
/// final group. Otherwise, fewer than `from` bits may be left over and all of
/// them must be zero. This rejects any input that isn't the canonical
/// encoding of its output.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidPadding`] if a value in `data` needs more than
/// `from` bits, or if `pad` is unset and the leftover bits are non-zero or
/// make up a whole input group.
///
/// # Panics
///
/// Panics if `from` or `to` is not in the range `1..=8`.
pub fn convert_bits<E, I>(
    out: &mut E,
    data: I,
    from: u32,
    to: u32,
    pad: bool,
) -> Result<(), DecodeError>
where
    E: Extend<u8>,
    I: IntoIterator<Item = u8>,
{
    assert!(
        (1..=8).contains(&from) && (1..=8).contains(&to),
        "group widths must be between 1 and 8 bits"
    );

    let max_value = (1u32 << to) - 1;
    // bits that were already emitted are dropped from the accumulator
    let max_acc = (1u32 << (from + to - 1)) - 1;

    let mut acc = 0u32;
    let mut bits = 0u32;
    for value in data {
        let value = u32::from(value);
        if value >> from != 0 {
            return Err(DecodeError::InvalidPadding);
        }

        acc = ((acc << from) | value) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.extend(iter::once(to_group(acc >> bits, max_value)));
        }
    }

    if pad {
        if bits > 0 {
            out.extend(iter::once(to_group(acc << (to - bits), max_value)));
        }
    } else if bits >= from || (acc << (to - bits)) & max_value != 0 {
        return Err(DecodeError::InvalidPadding);
    }

    Ok(())
}

#[expect(clippy::cast_possible_truncation)]
fn to_group(value: u32, max_value: u32) -> u8 {
    (value & max_value) as u8
}
