//! Transition key composition
//!
//! `key = current_state + byte · R + next_state · R²` with `R = 257`, one past
//! the largest byte. With `current_state < R` the three components sit in
//! disjoint base-`R` digits, so distinct triples never share a key.
//! Callers keep states below `R` (see `automaton::MAX_STATE`).

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;

pub const KEY_RADIX: u64 = 257;

pub fn compose_key_native(current_state: u64, byte: u8, next_state: u64) -> u64 {
    current_state + byte as u64 * KEY_RADIX + next_state * KEY_RADIX * KEY_RADIX
}

pub fn compose_key<F: PrimeField>(
    current_state: &FpVar<F>,
    haystack_byte: &FpVar<F>,
    next_state: &FpVar<F>,
) -> FpVar<F> {
    let radix = F::from(KEY_RADIX);
    current_state + haystack_byte * radix + next_state * (radix * radix)
}
