//! Regex match with one extracted capture group
//!
//! Statement: some haystack of at most `N` bytes is accepted by the automaton,
//! and capture group `CAPTURE_GROUP` of that match is the public byte string
//! (zero-padded to `M`) of the public length. The haystack and the walk stay
//! private.
//!
//! Per position `i`, with `active[i] = 1 - reached_end[i]`:
//! - `reached_end[0] = 0` and `reached_end` never falls back to 0
//! - `current_state[0]` is the initial state; inside the active region
//!   `current_state[i] == next_state[i - 1]`
//! - `next_state[i] < 256` so transition keys stay injective
//! - the capture-aware transition check holds (vacuous once inactive)
//! - the last active `next_state` is an accept state
//!
//! The single-group capture metadata handed to the substring gadget is
//! derived from the checked bits rather than allocated freely.

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::automaton::RegexAutomaton;
use crate::error::{Error, Result};
use crate::gadgets::alloc::alloc_bytes;
use crate::gadgets::range::enforce_bit_size;
use crate::gadgets::substring::{capture_substring, BoundedVecVar};
use crate::gadgets::transition::check_transition_with_captures;
use crate::table::SparseTransitionTable;
use crate::witness::RegexWitness;

const STATE_BITS: usize = 8;

#[derive(Clone, Debug)]
pub struct RegexCaptureCircuit<
    F: PrimeField,
    const N: usize,
    const M: usize,
    const G: usize,
    const CAPTURE_GROUP: u64,
> {
    table: SparseTransitionTable<F>,
    initial_state: u64,
    accept_states: Vec<u64>,
    witness: Option<RegexWitness<N, G>>,
}

impl<F: PrimeField, const N: usize, const M: usize, const G: usize, const CAPTURE_GROUP: u64>
    RegexCaptureCircuit<F, N, M, G, CAPTURE_GROUP>
{
    /// Circuit shape for `automaton`, without a witness (setup).
    pub fn new(automaton: &RegexAutomaton) -> Result<Self> {
        if CAPTURE_GROUP == 0 || CAPTURE_GROUP > G as u64 {
            return Err(Error::InvalidAutomaton(format!(
                "capture group {CAPTURE_GROUP} out of range 1..={G}"
            )));
        }
        Ok(Self {
            table: SparseTransitionTable::from_automaton::<G>(automaton)?,
            initial_state: automaton.initial_state,
            accept_states: automaton.accept_states.clone(),
            witness: None,
        })
    }

    /// Attach the walk of `automaton` over `haystack` (proving).
    pub fn with_witness(mut self, automaton: &RegexAutomaton, haystack: &[u8]) -> Result<Self> {
        let witness = RegexWitness::<N, G>::generate(automaton, haystack)?;
        let captured = witness.captured(CAPTURE_GROUP);
        if captured.is_empty() {
            return Err(Error::CaptureNotFound { group: CAPTURE_GROUP });
        }
        if captured.len() > M {
            return Err(Error::CaptureTooLong { len: captured.len(), max: M });
        }
        self.witness = Some(witness);
        Ok(self)
    }

    pub fn witness(&self) -> Option<&RegexWitness<N, G>> {
        self.witness.as_ref()
    }

    /// Captured bytes zero-padded to `M`, followed by the capture length.
    pub fn public_inputs(&self) -> Result<Vec<F>> {
        let witness = self
            .witness
            .as_ref()
            .ok_or(Error::Synthesis(SynthesisError::AssignmentMissing))?;
        Ok(public_inputs_for::<F, M>(&witness.captured(CAPTURE_GROUP)))
    }

    fn assigned<T>(&self, f: impl FnOnce(&RegexWitness<N, G>) -> T) -> core::result::Result<T, SynthesisError> {
        self.witness.as_ref().map(f).ok_or(SynthesisError::AssignmentMissing)
    }
}

/// Public input vector for a captured byte string.
pub fn public_inputs_for<F: PrimeField, const M: usize>(captured: &[u8]) -> Vec<F> {
    let mut inputs: Vec<F> = (0..M)
        .map(|i| F::from(captured.get(i).copied().unwrap_or(0) as u64))
        .collect();
    inputs.push(F::from(captured.len() as u64));
    inputs
}

impl<F: PrimeField, const N: usize, const M: usize, const G: usize, const CAPTURE_GROUP: u64>
    ConstraintSynthesizer<F> for RegexCaptureCircuit<F, N, M, G, CAPTURE_GROUP>
{
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> core::result::Result<(), SynthesisError> {
        let group = CAPTURE_GROUP
            .checked_sub(1)
            .and_then(|g| usize::try_from(g).ok())
            .filter(|g| *g < G)
            .ok_or(SynthesisError::Unsatisfiable)?;

        // public statement
        let captured = self.assigned(|w| w.captured(CAPTURE_GROUP));
        let captured_at = |i: usize| match &captured {
            Ok(bytes) => Ok(F::from(bytes.get(i).copied().unwrap_or(0) as u64)),
            Err(_) => Err(SynthesisError::AssignmentMissing),
        };
        let expected = BoundedVecVar::<F, M> {
            storage: array_init::try_array_init(|i| {
                FpVar::new_input(ark_relations::ns!(cs, "captured_byte"), || captured_at(i))
            })?,
            len: FpVar::new_input(ark_relations::ns!(cs, "captured_len"), || match &captured {
                Ok(bytes) => Ok(F::from(bytes.len() as u64)),
                Err(_) => Err(SynthesisError::AssignmentMissing),
            })?,
        };

        let haystack = alloc_bytes::<F, N>(
            ark_relations::ns!(cs, "haystack").cs(),
            self.witness.as_ref().map(|w| &w.haystack),
            AllocationMode::Witness,
        )?;
        let current_states: [FpVar<F>; N] = array_init::try_array_init(|i| {
            FpVar::new_witness(ark_relations::ns!(cs, "current_state"), || {
                self.assigned(|w| F::from(w.current_states[i]))
            })
        })?;
        let next_states: [FpVar<F>; N] = array_init::try_array_init(|i| {
            FpVar::new_witness(ark_relations::ns!(cs, "next_state"), || {
                self.assigned(|w| F::from(w.next_states[i]))
            })
        })?;
        let reached_end: [Boolean<F>; N] = array_init::try_array_init(|i| {
            Boolean::new_witness(ark_relations::ns!(cs, "reached_end"), || {
                self.assigned(|w| w.reached_end[i])
            })
        })?;
        let participations: [[Boolean<F>; G]; N] = array_init::try_array_init(|i| {
            array_init::try_array_init(|k| {
                Boolean::new_witness(ark_relations::ns!(cs, "participation"), || {
                    self.assigned(|w| w.capture_participations[i][k])
                })
            })
        })?;
        let starts: [[Boolean<F>; G]; N] = array_init::try_array_init(|i| {
            array_init::try_array_init(|k| {
                Boolean::new_witness(ark_relations::ns!(cs, "start"), || {
                    self.assigned(|w| w.capture_starts[i][k])
                })
            })
        })?;
        let start_index = FpVar::new_witness(ark_relations::ns!(cs, "capture_start_index"), || {
            self.assigned(|w| w.capture_start_index(CAPTURE_GROUP).unwrap_or(0))
                .map(|index| F::from(index as u64))
        })?;

        let active: Vec<Boolean<F>> = reached_end.iter().map(|r| !r.clone()).collect();

        // walk shape
        reached_end[0].enforce_equal(&Boolean::constant(false))?;
        for i in 1..N {
            (&reached_end[i - 1] & &active[i]).enforce_equal(&Boolean::constant(false))?;
        }
        current_states[0].enforce_equal(&FpVar::constant(F::from(self.initial_state)))?;
        for i in 1..N {
            (&current_states[i] - &next_states[i - 1])
                .mul_equals(&FpVar::from(active[i].clone()), &FpVar::zero())?;
        }
        for next in &next_states {
            enforce_bit_size(next, STATE_BITS)?;
        }

        for i in 0..N {
            let participation_fp: [FpVar<F>; G] =
                array_init::array_init(|k| FpVar::from(participations[i][k].clone()));
            let start_fp: [FpVar<F>; G] = array_init::array_init(|k| FpVar::from(starts[i][k].clone()));
            check_transition_with_captures(
                &self.table,
                &haystack[i],
                &current_states[i],
                &next_states[i],
                &participation_fp,
                &start_fp,
                &reached_end[i],
            )?;
        }

        // the last active step lands in an accept state
        for i in 0..N {
            let is_last = match reached_end.get(i + 1) {
                Some(next_end) => &active[i] & next_end,
                None => active[i].clone(),
            };
            let mut distance = FpVar::one();
            for &state in &self.accept_states {
                distance *= &next_states[i] - FpVar::constant(F::from(state));
            }
            distance.mul_equals(&FpVar::from(is_last), &FpVar::zero())?;
        }

        // single-group metadata from the checked bits
        let participating: Vec<Boolean<F>> = (0..N)
            .map(|i| &participations[i][group] & &active[i])
            .collect();
        let capture_start_flags: [Boolean<F>; N] =
            array_init::array_init(|i| &starts[i][group] & &active[i]);
        let group_fp = F::from(CAPTURE_GROUP);
        let capture_ids: [FpVar<F>; N] = array_init::array_init(|i| {
            let is_end = match participating.get(i + 1) {
                Some(next) => &participating[i] & &!next.clone(),
                None => participating[i].clone(),
            };
            (FpVar::from(capture_start_flags[i].clone()) + FpVar::from(is_end)) * group_fp
        });
        let capture_starts: [FpVar<F>; N] =
            array_init::array_init(|i| FpVar::from(capture_start_flags[i].clone()));

        capture_substring::<F, N, M, CAPTURE_GROUP>(
            &haystack,
            &capture_ids,
            &capture_starts,
            &start_index,
        )?
        .enforce_equal(&expected)?;

        tracing::debug!(
            haystack = N,
            capacity = M,
            groups = G,
            group = CAPTURE_GROUP,
            table_entries = self.table.len(),
            constraints = cs.num_constraints(),
            "regex capture circuit synthesized"
        );
        Ok(())
    }
}
