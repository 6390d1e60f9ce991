//! Bit-size checks and dynamic indexing
//!
//! Circuits cannot branch on a witness index. Positions are reached either
//! through a logarithmic barrel shifter driven by the index bits, or through a
//! one-hot sum over every position.

use ark_ff::{BigInteger, PrimeField};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

use super::alloc::alloc_bit_hint;

/// Number of bits needed to write every index in `0..=len`.
pub const fn index_bits(len: usize) -> usize {
    (usize::BITS - len.leading_zeros()) as usize
}

/// Little-endian recomposition `Σ bits[i] · 2^i`.
pub fn recompose_le<F: PrimeField>(bits: &[Boolean<F>]) -> FpVar<F> {
    let mut acc = FpVar::zero();
    let mut power = F::one();
    for bit in bits {
        acc += FpVar::from(bit.clone()) * power;
        power.double_in_place();
    }
    acc
}

/// Enforce `0 <= value < 2^num_bits` and return its little-endian bits.
pub fn enforce_bit_size<F: PrimeField>(
    value: &FpVar<F>,
    num_bits: usize,
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    let cs = value.cs();
    let native = value.value().map(|v| v.into_bigint().to_bits_le());
    let bits = (0..num_bits)
        .map(|i| {
            alloc_bit_hint(&cs, || match &native {
                Ok(bits) => Ok(bits.get(i).copied().unwrap_or(false)),
                Err(_) => Err(SynthesisError::AssignmentMissing),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    recompose_le(&bits).enforce_equal(value)?;
    Ok(bits)
}

/// `out[j] = values[j + shift]`, zero once `j + shift` runs past the end.
/// `shift_bits` is the little-endian decomposition of `shift`.
pub fn shift_left_by_bits<F: PrimeField>(
    values: &[FpVar<F>],
    shift_bits: &[Boolean<F>],
) -> Result<Vec<FpVar<F>>, SynthesisError> {
    let mut current = values.to_vec();
    for (k, bit) in shift_bits.iter().enumerate() {
        let step = 1usize.checked_shl(k as u32).unwrap_or(usize::MAX);
        current = current
            .iter()
            .enumerate()
            .map(|(j, stay)| {
                let moved = j
                    .checked_add(step)
                    .and_then(|src| current.get(src))
                    .cloned()
                    .unwrap_or_else(FpVar::zero);
                FpVar::conditionally_select(bit, &moved, stay)
            })
            .collect::<Result<Vec<_>, _>>()?;
    }
    Ok(current)
}

/// `values[index]`, or zero when `index` names no position of `values`.
pub fn select_at<F: PrimeField>(
    values: &[FpVar<F>],
    index: &FpVar<F>,
) -> Result<FpVar<F>, SynthesisError> {
    let mut acc = FpVar::zero();
    for (j, value) in values.iter().enumerate() {
        let hit = index.is_eq(&FpVar::constant(F::from(j as u64)))?;
        acc += FpVar::from(hit) * value;
    }
    Ok(acc)
}

/// Booleans `(i < length)` for `i < M`. Unsatisfiable when `length > M`.
pub fn prefix_mask<F: PrimeField, const M: usize>(
    length: &FpVar<F>,
) -> Result<[Boolean<F>; M], SynthesisError> {
    let cs = length.cs();
    let native = length.value().map(super::alloc::field_to_index);
    let mask: [Boolean<F>; M] = array_init::try_array_init(|i| {
        alloc_bit_hint(&cs, || {
            native
                .as_ref()
                .map(|len| i < *len)
                .map_err(|_| SynthesisError::AssignmentMissing)
        })
    })?;
    // once off, stays off
    for i in 1..M {
        (&mask[i] & &!mask[i - 1].clone()).enforce_equal(&Boolean::constant(false))?;
    }
    let count = mask
        .iter()
        .fold(FpVar::zero(), |acc, bit| acc + FpVar::from(bit.clone()));
    count.enforce_equal(length)?;
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gadgets::alloc::field_values;
    use ark_bls12_381::Fr;
    use ark_relations::r1cs::ConstraintSystem;

    fn witness(cs: &ark_relations::r1cs::ConstraintSystemRef<Fr>, v: u64) -> FpVar<Fr> {
        FpVar::new_witness(cs.clone(), || Ok(Fr::from(v))).unwrap()
    }

    #[test]
    fn index_bits_covers_len() {
        assert_eq!(index_bits(1), 1);
        assert_eq!(index_bits(8), 4);
        assert_eq!(index_bits(10), 4);
        assert_eq!(index_bits(16), 5);
    }

    #[test]
    fn bit_size_accepts_and_rejects() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let bits = enforce_bit_size(&witness(&cs, 13), 4).unwrap();
        assert_eq!(bits.len(), 4);
        assert!(cs.is_satisfied().unwrap());

        let cs = ConstraintSystem::<Fr>::new_ref();
        enforce_bit_size(&witness(&cs, 16), 4).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn negative_values_fail_bit_size() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let v = FpVar::new_witness(cs.clone(), || Ok(-Fr::from(1u64))).unwrap();
        enforce_bit_size(&v, 8).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn barrel_shift_matches_slice() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let values: Vec<_> = (10..16).map(|v| witness(&cs, v)).collect();
        for shift in 0..8u64 {
            let bits = enforce_bit_size(&witness(&cs, shift), 3).unwrap();
            let out = field_values(&shift_left_by_bits(&values, &bits).unwrap()).unwrap();
            let expected: Vec<Fr> = (0..6u64)
                .map(|j| if j + shift < 6 { Fr::from(10 + j + shift) } else { Fr::from(0u64) })
                .collect();
            assert_eq!(out, expected, "shift {shift}");
        }
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn select_at_out_of_range_is_zero() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let values: Vec<_> = (1..5).map(|v| witness(&cs, v)).collect();
        let inside = select_at(&values, &witness(&cs, 2)).unwrap();
        assert_eq!(inside.value().unwrap(), Fr::from(3u64));
        let minus_one = witness(&cs, 0) - FpVar::one();
        assert_eq!(select_at(&values, &minus_one).unwrap().value().unwrap(), Fr::from(0u64));
        assert_eq!(select_at(&values, &witness(&cs, 4)).unwrap().value().unwrap(), Fr::from(0u64));
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn prefix_mask_counts_length() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let mask = prefix_mask::<Fr, 5>(&witness(&cs, 3)).unwrap();
        let bits: Vec<bool> = mask.iter().map(|b| b.value().unwrap()).collect();
        assert_eq!(bits, vec![true, true, true, false, false]);
        assert!(cs.is_satisfied().unwrap());

        let cs = ConstraintSystem::<Fr>::new_ref();
        prefix_mask::<Fr, 5>(&witness(&cs, 6)).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }
}
