//! Capture masks for a single target group
//!
//! From per-position capture ids and start flags:
//! - `is_capture[i]`: position `i` carries the target group id
//! - `start[i]`: on or after the group's start (non-decreasing)
//! - `end[i]`: on or before the group's end (non-increasing)
//! - `capture_mask[i] = start[i] · end[i]`: the captured interval
//!
//! The masks are advisory witnesses; each position is then tied to its
//! neighbour by the OR recurrence `1 - mask[i] = (1 - local[i])(1 - mask[i∓1])`.

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::alloc::{alloc_bit_hint_array, bit_values, combined_cs};
use crate::hints;

/// `is_capture[i] = (capture_ids[i] == CAPTURE_GROUP)`.
///
/// The equality gadget constrains both directions: a tagged position is forced
/// to 1 and an untagged one to 0.
pub fn build_is_capture<F: PrimeField, const N: usize, const CAPTURE_GROUP: u64>(
    capture_ids: &[FpVar<F>; N],
) -> Result<[Boolean<F>; N], SynthesisError> {
    let group = FpVar::constant(F::from(CAPTURE_GROUP));
    array_init::try_array_init(|i| capture_ids[i].is_eq(&group))
}

/// `capture_starts[i] == 1` as a boolean.
fn start_flags<F: PrimeField, const N: usize>(
    capture_starts: &[FpVar<F>; N],
) -> Result<[Boolean<F>; N], SynthesisError> {
    array_init::try_array_init(|i| capture_starts[i].is_eq(&FpVar::one()))
}

/// `capture_starts[i] == 0` as a boolean.
fn unstarted_flags<F: PrimeField, const N: usize>(
    capture_starts: &[FpVar<F>; N],
) -> Result<[Boolean<F>; N], SynthesisError> {
    array_init::try_array_init(|i| capture_starts[i].is_eq(&FpVar::zero()))
}

fn mask_cs<F: PrimeField>(is_capture: &[Boolean<F>], capture_starts: &[FpVar<F>]) -> ConstraintSystemRef<F> {
    combined_cs(is_capture).or(combined_cs(capture_starts))
}

/// `1 - mask = (1 - local)(1 - previous)`, i.e. `mask = local OR previous`.
fn enforce_or<F: PrimeField>(
    mask: &Boolean<F>,
    local: &Boolean<F>,
    previous: Option<&Boolean<F>>,
) -> Result<(), SynthesisError> {
    let one = FpVar::one();
    let not_mask = &one - FpVar::from(mask.clone());
    let not_local = &one - FpVar::from(local.clone());
    match previous {
        Some(previous) => {
            let not_previous = &one - FpVar::from(previous.clone());
            not_local.mul_equals(&not_previous, &not_mask)
        }
        None => not_local.enforce_equal(&not_mask),
    }
}

/// Forward scan from position 0: set from the first tagged start onwards.
pub fn build_capture_start_mask<F: PrimeField, const N: usize>(
    is_capture: &[Boolean<F>; N],
    capture_starts: &[FpVar<F>; N],
) -> Result<[Boolean<F>; N], SynthesisError> {
    let cs = mask_cs(is_capture, capture_starts);
    let hint = bit_values(is_capture).and_then(|tagged| {
        let starts = capture_starts
            .iter()
            .map(|s| s.value().map(|v| v.is_one()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hints::capture_start_mask(&tagged, &starts))
    });
    let mask = alloc_bit_hint_array::<F, N>(&cs, &hint)?;

    let flags = start_flags(capture_starts)?;
    for i in 0..N {
        let local = &is_capture[i] & &flags[i];
        enforce_or(&mask[i], &local, i.checked_sub(1).map(|p| &mask[p]))?;
    }
    Ok(mask)
}

/// Backward scan from position `N - 1`: set up to the last tagged non-start.
pub fn build_capture_end_mask<F: PrimeField, const N: usize>(
    is_capture: &[Boolean<F>; N],
    capture_starts: &[FpVar<F>; N],
) -> Result<[Boolean<F>; N], SynthesisError> {
    let cs = mask_cs(is_capture, capture_starts);
    let hint = bit_values(is_capture).and_then(|tagged| {
        let starts = capture_starts
            .iter()
            .map(|s| s.value().map(|v| !v.is_zero()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hints::capture_end_mask(&tagged, &starts))
    });
    let mask = alloc_bit_hint_array::<F, N>(&cs, &hint)?;

    let unstarted = unstarted_flags(capture_starts)?;
    for j in (0..N).rev() {
        let local = &is_capture[j] & &unstarted[j];
        let next = if j + 1 < N { Some(&mask[j + 1]) } else { None };
        enforce_or(&mask[j], &local, next)?;
    }
    Ok(mask)
}

/// `capture_mask[i] = start_mask[i] · end_mask[i]`.
pub fn build_capture_mask<F: PrimeField, const N: usize>(
    start_mask: &[Boolean<F>; N],
    end_mask: &[Boolean<F>; N],
) -> Result<[Boolean<F>; N], SynthesisError> {
    let cs = combined_cs(start_mask).or(combined_cs(end_mask));
    let hint = bit_values(start_mask)
        .and_then(|start| Ok(hints::capture_mask(&start, &bit_values(end_mask)?)));
    let mask = alloc_bit_hint_array::<F, N>(&cs, &hint)?;
    for i in 0..N {
        FpVar::from(start_mask[i].clone())
            .mul_equals(&FpVar::from(end_mask[i].clone()), &FpVar::from(mask[i].clone()))?;
    }
    Ok(mask)
}
