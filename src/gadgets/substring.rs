//! Capture substring extraction
//!
//! The captured bytes are an advisory copy of the masked haystack. The copy is
//! verified against a window of the masked haystack starting at
//! `start_index`, reached with a barrel shifter over the index bits:
//! ```text
//! storage[i] == mask[start + i] · haystack[start + i]
//! len        == Σ_i mask[start + i]            (len != 0)
//! mask[start - 1] == 0, mask[start + len] == 0, mask[start + len - 1] == 1
//! ```
//! For a mask that is one contiguous interval (as produced by the capture
//! pipeline) these pin the window to exactly that interval. Out-of-range
//! boundary positions read as zero, which makes the left check vacuous at
//! `start == 0` and the right check vacuous at the haystack end.

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

use super::alloc::{alloc_hint, alloc_hint_array, bit_values, combined_cs, field_values};
use super::capture::{
    build_capture_end_mask, build_capture_mask, build_capture_start_mask, build_is_capture,
};
use super::range::{enforce_bit_size, index_bits, select_at, shift_left_by_bits};
use crate::hints;

/// Fixed-capacity sequence with an explicit occupied length. Slots at or past
/// `len` hold zero.
#[derive(Clone, Debug)]
pub struct BoundedVecVar<F: PrimeField, const MAX: usize> {
    pub storage: [FpVar<F>; MAX],
    pub len: FpVar<F>,
}

impl<F: PrimeField, const MAX: usize> BoundedVecVar<F, MAX> {
    /// Occupied prefix of the assigned storage.
    pub fn value(&self) -> Result<Vec<F>, SynthesisError> {
        let len = super::alloc::field_to_index(self.len.value()?);
        let mut values = field_values(&self.storage)?;
        values.truncate(len.min(MAX));
        Ok(values)
    }

    /// Bind every slot and the length to `other`.
    pub fn enforce_equal(&self, other: &Self) -> Result<(), SynthesisError> {
        for (mine, theirs) in self.storage.iter().zip(&other.storage) {
            mine.enforce_equal(theirs)?;
        }
        self.len.enforce_equal(&other.len)
    }
}

/// `mask[start_index - 1] == 0`.
pub fn enforce_left_boundary<F: PrimeField>(
    mask: &[FpVar<F>],
    start_index: &FpVar<F>,
) -> Result<(), SynthesisError> {
    let before = start_index - FpVar::one();
    select_at(mask, &before)?.enforce_equal(&FpVar::zero())
}

/// `mask[start_index + len] == 0` and `mask[start_index + len - 1] == 1`.
pub fn enforce_right_boundary<F: PrimeField>(
    mask: &[FpVar<F>],
    start_index: &FpVar<F>,
    len: &FpVar<F>,
) -> Result<(), SynthesisError> {
    let after = start_index + len;
    select_at(mask, &after)?.enforce_equal(&FpVar::zero())?;
    let last = &after - FpVar::one();
    select_at(mask, &last)?.enforce_equal(&FpVar::one())
}

/// Extract the bytes under `mask` into a bounded sequence of capacity `M`.
///
/// `mask` must be a single contiguous interval; captures longer than `M`
/// leave `mask[start_index + M]` set and fail the right boundary.
pub fn extract_substring<F: PrimeField, const N: usize, const M: usize>(
    haystack: &[FpVar<F>; N],
    mask: &[Boolean<F>; N],
    start_index: &FpVar<F>,
) -> Result<BoundedVecVar<F, M>, SynthesisError> {
    let cs = combined_cs(haystack)
        .or(combined_cs(mask))
        .or(start_index.cs());

    let hint = field_values(haystack).and_then(|bytes| {
        let selected = bit_values(mask)?;
        Ok(hints::extract_substring(&bytes, &selected, M))
    });
    let storage = alloc_hint_array::<F, M>(&cs, &hint)?;
    let len = alloc_hint(&cs, || match &hint {
        Ok(bytes) => Ok(F::from(bytes.len() as u64)),
        Err(_) => Err(SynthesisError::AssignmentMissing),
    })?;

    let mask_fp: Vec<FpVar<F>> = mask.iter().map(|m| FpVar::from(m.clone())).collect();
    let masked: Vec<FpVar<F>> = mask_fp
        .iter()
        .zip(haystack)
        .map(|(m, byte)| m * byte)
        .collect();

    let start_bits = enforce_bit_size(start_index, index_bits(N))?;
    let window_bytes = shift_left_by_bits(&masked, &start_bits)?;
    let window_mask = shift_left_by_bits(&mask_fp, &start_bits)?;

    let mut window_len = FpVar::zero();
    for (i, slot) in storage.iter().enumerate() {
        match window_bytes.get(i) {
            Some(byte) => {
                slot.enforce_equal(byte)?;
                window_len += &window_mask[i];
            }
            None => slot.enforce_equal(&FpVar::zero())?,
        }
    }
    window_len.enforce_equal(&len)?;
    len.is_eq(&FpVar::zero())?
        .enforce_equal(&Boolean::constant(false))?;

    enforce_left_boundary(&mask_fp, start_index)?;
    enforce_right_boundary(&mask_fp, start_index, &len)?;

    tracing::debug!(
        haystack = N,
        capacity = M,
        constraints = cs.num_constraints(),
        "substring extraction synthesized"
    );
    Ok(BoundedVecVar { storage, len })
}

/// Full single-group pipeline: filter, boundary masks, intersection and
/// bounded extraction.
pub fn capture_substring<F: PrimeField, const N: usize, const M: usize, const CAPTURE_GROUP: u64>(
    haystack: &[FpVar<F>; N],
    capture_ids: &[FpVar<F>; N],
    capture_starts: &[FpVar<F>; N],
    capture_start_index: &FpVar<F>,
) -> Result<BoundedVecVar<F, M>, SynthesisError> {
    let is_capture = build_is_capture::<F, N, CAPTURE_GROUP>(capture_ids)?;
    let start_mask = build_capture_start_mask(&is_capture, capture_starts)?;
    let end_mask = build_capture_end_mask(&is_capture, capture_starts)?;
    let mask = build_capture_mask(&start_mask, &end_mask)?;
    extract_substring::<F, N, M>(haystack, &mask, capture_start_index)
}
