//! Per-step transition checks
//!
//! Each step is checked on its own; steps are linked only through the state
//! values the caller passes in. Once `reached_end_state` is set the step is
//! padding and every check is switched off by multiplying with
//! `1 - reached_end_state`.
//!
//! Neither checker range-checks its inputs. The key composer is injective only
//! for states below the radix, so callers that allocate states as free
//! witnesses bound them first (see `circuit`).

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

use super::key::compose_key;
use super::packed::unpack_transition_value;
use crate::table::TransitionTable;

/// Require `table.get(key) == 1` unless the end state has been reached.
pub fn check_transition<F: PrimeField, T: TransitionTable<F>>(
    table: &T,
    haystack_byte: &FpVar<F>,
    current_state: &FpVar<F>,
    next_state: &FpVar<F>,
    reached_end_state: &Boolean<F>,
) -> Result<(), SynthesisError> {
    let key = compose_key(current_state, haystack_byte, next_state);
    let value = table.get(&key)?;
    let active = FpVar::from(!reached_end_state.clone());
    (value - FpVar::one()).mul_equals(&active, &FpVar::zero())
}

/// Capture-aware variant: the table value is unpacked and its validity,
/// start and participation bits are compared with the declared ones.
///
/// All differences are folded into one balanced-ternary accumulator
/// ```text
/// error = (1 - is_valid) + Σ_k (participation_diff_k · 3^(2k+1) + start_diff_k · 3^(2k+2))
/// ```
/// Every difference lies in {-1, 0, 1} and sits at its own power of three, so
/// no combination of non-zero terms cancels: `error == 0` iff all match.
/// Declared values are normalised to `value != 0`.
pub fn check_transition_with_captures<F: PrimeField, T: TransitionTable<F>, const G: usize>(
    table: &T,
    haystack_byte: &FpVar<F>,
    current_state: &FpVar<F>,
    next_state: &FpVar<F>,
    capture_participations: &[FpVar<F>; G],
    capture_starts: &[FpVar<F>; G],
    reached_end_state: &Boolean<F>,
) -> Result<(), SynthesisError> {
    let key = compose_key(current_state, haystack_byte, next_state);
    let value = table.get(&key)?;
    let unpacked = unpack_transition_value::<F, G>(&value)?;

    let error = capture_error(
        &unpacked.is_valid,
        &unpacked.participations,
        &unpacked.starts,
        capture_participations,
        capture_starts,
    )?;
    let active = FpVar::from(!reached_end_state.clone());
    error.mul_equals(&active, &FpVar::zero())
}

/// Balanced-ternary accumulator over the table bits and the declared bits.
pub fn capture_error<F: PrimeField, const G: usize>(
    is_valid: &Boolean<F>,
    table_participations: &[Boolean<F>; G],
    table_starts: &[Boolean<F>; G],
    capture_participations: &[FpVar<F>; G],
    capture_starts: &[FpVar<F>; G],
) -> Result<FpVar<F>, SynthesisError> {
    let three = F::from(3u64);
    let mut error = FpVar::one() - FpVar::from(is_valid.clone());
    let mut power = three;
    for k in 0..G {
        let declared = FpVar::from(capture_participations[k].is_neq(&FpVar::zero())?);
        error += (FpVar::from(table_participations[k].clone()) - declared) * power;
        power *= three;

        let declared = FpVar::from(capture_starts[k].is_neq(&FpVar::zero())?);
        error += (FpVar::from(table_starts[k].clone()) - declared) * power;
        power *= three;
    }
    Ok(error)
}
