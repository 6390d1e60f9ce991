//! In-circuit decoding of packed transition values
//!
//! The decomposition is advisory: bits are read off the assigned value on the
//! host, allocated as boolean witnesses, and then tied back to the value by
//! ```text
//! value == is_valid + Σ starts[i]·2^(i+1) + Σ participations[i]·2^(i+G+1)
//! ```
//! With every digit boolean and all weights distinct powers of two, the only
//! witness that satisfies this is the binary expansion of `value`.

use ark_ff::{BigInteger, PrimeField};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

use super::alloc::alloc_bit_hint;
use crate::packed::{packed_bits, PackedTransition};

#[derive(Clone, Debug)]
pub struct PackedTransitionVar<F: PrimeField, const G: usize> {
    pub is_valid: Boolean<F>,
    pub starts: [Boolean<F>; G],
    pub participations: [Boolean<F>; G],
}

impl<F: PrimeField, const G: usize> PackedTransitionVar<F, G> {
    /// `is_valid + Σ starts[i]·2^(i+1) + Σ participations[i]·2^(i+G+1)`
    pub fn recompose(&self) -> FpVar<F> {
        let two = F::from(2u64);
        let mut acc = FpVar::from(self.is_valid.clone());
        let mut power = two;
        for start in &self.starts {
            acc += FpVar::from(start.clone()) * power;
            power *= two;
        }
        for participation in &self.participations {
            acc += FpVar::from(participation.clone()) * power;
            power *= two;
        }
        acc
    }

    pub fn value(&self) -> Result<PackedTransition<G>, SynthesisError> {
        let mut starts = [false; G];
        let mut participations = [false; G];
        for i in 0..G {
            starts[i] = self.starts[i].value()?;
            participations[i] = self.participations[i].value()?;
        }
        Ok(PackedTransition {
            is_valid: self.is_valid.value()?,
            starts,
            participations,
        })
    }
}

/// Decode a table value into its validity, start and participation bits.
pub fn unpack_transition_value<F: PrimeField, const G: usize>(
    value: &FpVar<F>,
) -> Result<PackedTransitionVar<F, G>, SynthesisError> {
    let cs = value.cs();
    let bits = value.value().map(|v| {
        let bits = v.into_bigint().to_bits_le();
        if bits.iter().skip(packed_bits(G)).any(|b| *b) {
            tracing::warn!(groups = G, "table value does not fit the packed layout");
        }
        bits
    });
    let bit = |i: usize| {
        alloc_bit_hint(&cs, || match &bits {
            Ok(bits) => Ok(bits.get(i).copied().unwrap_or(false)),
            Err(_) => Err(SynthesisError::AssignmentMissing),
        })
    };

    let unpacked = PackedTransitionVar {
        is_valid: bit(0)?,
        starts: array_init::try_array_init(|i| bit(i + 1))?,
        participations: array_init::try_array_init(|i| bit(i + G + 1))?,
    };
    unpacked.recompose().enforce_equal(value)?;
    Ok(unpacked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_relations::r1cs::ConstraintSystem;

    #[test]
    fn decodes_every_well_formed_value() {
        for raw in 0..(1u64 << packed_bits(2)) {
            let cs = ConstraintSystem::<Fr>::new_ref();
            let value = FpVar::new_witness(cs.clone(), || Ok(Fr::from(raw))).unwrap();
            let unpacked = unpack_transition_value::<Fr, 2>(&value).unwrap();
            assert_eq!(unpacked.value().unwrap(), PackedTransition::<2>::unpack(raw).unwrap());
            assert!(cs.is_satisfied().unwrap(), "value {raw}");
        }
    }

    #[test]
    fn value_above_layout_fails_decomposition() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let value = FpVar::new_witness(cs.clone(), || Ok(Fr::from(1u64 << packed_bits(2)))).unwrap();
        unpack_transition_value::<Fr, 2>(&value).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn tampered_bit_fails_recomposition() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let value = FpVar::new_witness(cs.clone(), || Ok(Fr::from(0b101u64))).unwrap();
        let unpacked = unpack_transition_value::<Fr, 1>(&value).unwrap();
        assert!(cs.is_satisfied().unwrap());

        // a prover claiming different bits cannot rebuild the same value
        let forged = PackedTransitionVar::<Fr, 1> {
            is_valid: Boolean::new_witness(cs.clone(), || Ok(true)).unwrap(),
            starts: [Boolean::new_witness(cs.clone(), || Ok(true)).unwrap()],
            participations: [unpacked.participations[0].clone()],
        };
        forged.recompose().enforce_equal(&value).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn constant_value_decodes_without_constraints() {
        let value = FpVar::<Fr>::constant(Fr::from(0b11u64));
        let unpacked = unpack_transition_value::<Fr, 1>(&value).unwrap();
        assert!(unpacked.is_valid.value().unwrap());
        assert!(unpacked.starts[0].value().unwrap());
        assert!(!unpacked.participations[0].value().unwrap());
    }
}
