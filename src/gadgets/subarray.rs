//! Bounded subarray copy
//!
//! `output[i] = input[start_index + i]` for `i < length`, zero afterwards, with
//! `start_index + length <= N` enforced. A `length` above `M` keeps the first
//! `M` elements.

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

use super::alloc::{alloc_hint_array, combined_cs, field_to_index, field_values};
use super::range::{enforce_bit_size, index_bits, prefix_mask, shift_left_by_bits};
use crate::hints;

pub fn select_subarray<F: PrimeField, const N: usize, const M: usize>(
    input: &[FpVar<F>; N],
    start_index: &FpVar<F>,
    length: &FpVar<F>,
) -> Result<[FpVar<F>; M], SynthesisError> {
    let cs = combined_cs(input).or(start_index.cs()).or(length.cs());
    let hint = field_values(input).and_then(|values| {
        let start = field_to_index(start_index.value()?);
        let len = field_to_index(length.value()?);
        Ok(hints::select_subarray(&values, start, len, M))
    });
    let output = alloc_hint_array::<F, M>(&cs, &hint)?;

    let start_bits = enforce_bit_size(start_index, index_bits(N))?;
    // N - start - length must be a small non-negative number
    let slack = FpVar::constant(F::from(N as u64)) - start_index - length;
    enforce_bit_size(&slack, index_bits(N))?;
    // length <= N from here on, so the mask spans the whole input
    let keep = prefix_mask::<F, N>(length)?;

    let shifted = shift_left_by_bits(input, &start_bits)?;
    for (i, slot) in output.iter().enumerate() {
        let expected = match shifted.get(i) {
            Some(value) => FpVar::from(keep[i].clone()) * value,
            None => FpVar::zero(),
        };
        slot.enforce_equal(&expected)?;
    }
    Ok(output)
}
