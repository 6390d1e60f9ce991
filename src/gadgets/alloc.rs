//! Hint allocation helpers
//!
//! Advisory values are computed on the host from the `.value()` of their
//! inputs and allocated as witnesses. In setup mode the inputs carry no
//! assignment and the closures are never evaluated. When every input is a
//! constant there is no constraint system to allocate into and the hint
//! becomes a constant itself.

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::packed::field_to_u64;

/// Allocate a field hint.
pub fn alloc_hint<F: PrimeField>(
    cs: &ConstraintSystemRef<F>,
    f: impl FnOnce() -> Result<F, SynthesisError>,
) -> Result<FpVar<F>, SynthesisError> {
    if cs.is_none() {
        return Ok(FpVar::constant(f()?));
    }
    FpVar::new_witness(cs.clone(), f)
}

/// Allocate a bit hint. The witness is constrained to be boolean.
pub fn alloc_bit_hint<F: PrimeField>(
    cs: &ConstraintSystemRef<F>,
    f: impl FnOnce() -> Result<bool, SynthesisError>,
) -> Result<Boolean<F>, SynthesisError> {
    if cs.is_none() {
        return Ok(Boolean::constant(f()?));
    }
    Boolean::new_witness(cs.clone(), f)
}

/// Allocate a whole array of field hints computed in one advisory pass.
pub fn alloc_hint_array<F: PrimeField, const N: usize>(
    cs: &ConstraintSystemRef<F>,
    hint: &Result<Vec<F>, SynthesisError>,
) -> Result<[FpVar<F>; N], SynthesisError> {
    array_init::try_array_init(|i| alloc_hint(cs, || hint_at(hint, i)))
}

/// Allocate a whole array of bit hints computed in one advisory pass.
pub fn alloc_bit_hint_array<F: PrimeField, const N: usize>(
    cs: &ConstraintSystemRef<F>,
    hint: &Result<Vec<bool>, SynthesisError>,
) -> Result<[Boolean<F>; N], SynthesisError> {
    array_init::try_array_init(|i| alloc_bit_hint(cs, || hint_at(hint, i)))
}

fn hint_at<T: Copy + Default>(hint: &Result<Vec<T>, SynthesisError>, i: usize) -> Result<T, SynthesisError> {
    match hint {
        Ok(values) => Ok(values.get(i).copied().unwrap_or_default()),
        Err(_) => Err(SynthesisError::AssignmentMissing),
    }
}

/// The constraint system shared by a group of variables, `None` when all of
/// them are constants.
pub fn combined_cs<F: PrimeField, T: R1CSVar<F>>(vars: &[T]) -> ConstraintSystemRef<F> {
    vars.iter()
        .fold(ConstraintSystemRef::None, |acc, var| acc.or(var.cs()))
}

/// Assigned values of a slice of variables.
pub fn field_values<F: PrimeField>(vars: &[FpVar<F>]) -> Result<Vec<F>, SynthesisError> {
    vars.iter().map(|v| v.value()).collect()
}

pub fn bit_values<F: PrimeField>(vars: &[Boolean<F>]) -> Result<Vec<bool>, SynthesisError> {
    vars.iter().map(|v| v.value()).collect()
}

/// Host view of an index-like field element; anything that does not fit maps
/// to `usize::MAX` so advisory passes treat it as out of range.
pub fn field_to_index<F: PrimeField>(value: F) -> usize {
    field_to_u64(value)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(usize::MAX)
}

/// Allocate bytes as range-checked field elements.
pub fn alloc_bytes<F: PrimeField, const N: usize>(
    cs: ConstraintSystemRef<F>,
    bytes: Option<&[u8; N]>,
    mode: AllocationMode,
) -> Result<[FpVar<F>; N], SynthesisError> {
    array_init::try_array_init(|i| {
        let byte = UInt8::new_variable(
            cs.clone(),
            || bytes.map(|b| b[i]).ok_or(SynthesisError::AssignmentMissing),
            mode,
        )?;
        byte.to_fp()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_relations::r1cs::ConstraintSystem;

    #[test]
    fn constant_inputs_give_constant_hints() {
        let hint = alloc_hint(&ConstraintSystemRef::<Fr>::None, || Ok(Fr::from(7u64))).unwrap();
        assert!(hint.is_constant());
        assert_eq!(hint.value().unwrap(), Fr::from(7u64));
    }

    #[test]
    fn bit_hints_are_boolean_constrained() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let bits = alloc_bit_hint_array::<Fr, 3>(&cs, &Ok(vec![true, false, true])).unwrap();
        assert_eq!(bit_values(&bits).unwrap(), vec![true, false, true]);
        assert!(cs.num_constraints() >= 3);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn bytes_round_trip() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let vars = alloc_bytes::<Fr, 4>(cs.clone(), Some(&[0, 1, 128, 255]), AllocationMode::Witness)
            .unwrap();
        let values = field_values(&vars).unwrap();
        assert_eq!(values[3], Fr::from(255u64));
        assert_eq!(field_to_index(values[2]), 128);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn oversized_index_maps_to_max() {
        assert_eq!(field_to_index(-Fr::from(1u64)), usize::MAX);
    }
}
