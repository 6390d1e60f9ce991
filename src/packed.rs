//! Native packed transition values
//!
//! A table entry carries, least-significant bit first:
//! ```text
//! bit 0            validity
//! bits 1..=G       capture group i starts on this transition
//! bits G+1..=2G    capture group i participates in this transition
//! ```
//! The in-circuit decoder lives in `gadgets::packed`; this module is the host
//! side used to populate tables and to cross-check witnesses.

use ark_ff::{BigInteger, PrimeField};

use crate::error::{Error, Result};

/// Largest group count whose packed layout fits in a `u64`.
pub const MAX_CAPTURE_GROUPS: usize = 31;

/// Number of bits a packed value occupies for `G` groups.
pub const fn packed_bits(num_groups: usize) -> usize {
    2 * num_groups + 1
}

pub fn ensure_group_count(num_groups: usize) -> Result<()> {
    if num_groups > MAX_CAPTURE_GROUPS {
        return Err(Error::TooManyCaptureGroups { groups: num_groups });
    }
    Ok(())
}

/// Decoded table entry for an automaton with `G` capture groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedTransition<const G: usize> {
    pub is_valid: bool,
    pub starts: [bool; G],
    pub participations: [bool; G],
}

impl<const G: usize> Default for PackedTransition<G> {
    fn default() -> Self {
        Self {
            is_valid: false,
            starts: [false; G],
            participations: [false; G],
        }
    }
}

impl<const G: usize> PackedTransition<G> {
    /// A valid transition that touches no capture group.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }

    pub fn pack(&self) -> u64 {
        debug_assert!(G <= MAX_CAPTURE_GROUPS);
        let mut value = self.is_valid as u64;
        for i in 0..G {
            value |= (self.starts[i] as u64) << (i + 1);
            value |= (self.participations[i] as u64) << (i + G + 1);
        }
        value
    }

    /// Inverse of [`pack`](Self::pack). Returns `None` when `value` has bits
    /// set above the layout.
    pub fn unpack(value: u64) -> Option<Self> {
        if G > MAX_CAPTURE_GROUPS || (value >> packed_bits(G)) != 0 {
            return None;
        }
        let bit = |i: usize| (value >> i) & 1 == 1;
        Some(Self {
            is_valid: bit(0),
            starts: array_init::array_init(|i| bit(i + 1)),
            participations: array_init::array_init(|i| bit(i + G + 1)),
        })
    }

    /// Balanced-ternary accumulator of the differences between this entry and
    /// the declared capture bits, as a signed integer.
    ///
    /// Zero iff the entry is valid and every declared bit matches.
    pub fn capture_error(&self, participations: &[bool; G], starts: &[bool; G]) -> i128 {
        let mut error = 1 - self.is_valid as i128;
        let mut power: i128 = 3;
        for i in 0..G {
            error += (self.participations[i] as i128 - participations[i] as i128) * power;
            power *= 3;
            error += (self.starts[i] as i128 - starts[i] as i128) * power;
            power *= 3;
        }
        error
    }
}

/// Low 64 bits of a field element, or `None` when the element is larger.
pub fn field_to_u64<F: PrimeField>(value: F) -> Option<u64> {
    let bigint = value.into_bigint();
    let bits = bigint.num_bits();
    if bits > 64 {
        return None;
    }
    Some(bigint.as_ref()[0])
}
