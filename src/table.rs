//! Sparse transition table
//!
//! Maps composed transition keys to field values; absent keys read as the
//! default (0, i.e. "invalid"). The table is fixed per circuit, so its keys and
//! values enter the constraint system as constants and an in-circuit lookup is
//! a one-hot sum over the entries.

use ark_std::collections::BTreeMap;

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

use crate::automaton::RegexAutomaton;
use crate::error::{Error, Result};
use crate::gadgets::key::compose_key_native;

/// Lookup seam used by the transition checkers.
pub trait TransitionTable<F: PrimeField> {
    /// In-circuit `get(key)`, returning the default for absent keys.
    fn get(&self, key: &FpVar<F>) -> core::result::Result<FpVar<F>, SynthesisError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseTransitionTable<F: PrimeField> {
    entries: BTreeMap<u64, F>,
    default: F,
}

impl<F: PrimeField> Default for SparseTransitionTable<F> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            default: F::zero(),
        }
    }
}

impl<F: PrimeField> SparseTransitionTable<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table whose absent keys read as `default`.
    pub fn with_default(default: F) -> Self {
        Self {
            entries: BTreeMap::new(),
            default,
        }
    }

    /// Table for the capture-aware checker: every `(from, byte, to)` of every
    /// rule maps to the rule's packed value.
    pub fn from_automaton<const G: usize>(automaton: &RegexAutomaton) -> Result<Self> {
        automaton.validate()?;
        if automaton.num_capture_groups != G {
            return Err(Error::InvalidAutomaton(format!(
                "automaton has {} capture groups, table layout expects {G}",
                automaton.num_capture_groups
            )));
        }
        Self::populate(automaton, |rule| rule.packed::<G>().pack())
    }

    /// Table for the plain checker: every transition maps to 1.
    pub fn plain_from_automaton(automaton: &RegexAutomaton) -> Result<Self> {
        automaton.validate()?;
        Self::populate(automaton, |_| 1)
    }

    fn populate(
        automaton: &RegexAutomaton,
        value_of: impl Fn(&crate::automaton::TransitionRule) -> u64,
    ) -> Result<Self> {
        let mut table = Self::new();
        for rule in &automaton.transitions {
            let value = F::from(value_of(rule));
            for byte in rule.byte_values() {
                let key = compose_key_native(rule.from, byte, rule.to);
                match table.entries.get(&key) {
                    Some(existing) if *existing != value => {
                        return Err(Error::ConflictingTransition {
                            key,
                            from: rule.from,
                            byte,
                            to: rule.to,
                        });
                    }
                    Some(_) => {}
                    None => {
                        table.entries.insert(key, value);
                    }
                }
            }
        }
        tracing::debug!(entries = table.entries.len(), "populated transition table");
        Ok(table)
    }

    pub fn insert(&mut self, key: u64, value: F) -> Option<F> {
        self.entries.insert(key, value)
    }

    /// Host-side lookup.
    pub fn lookup(&self, key: u64) -> F {
        self.entries.get(&key).copied().unwrap_or(self.default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: PrimeField> TransitionTable<F> for SparseTransitionTable<F> {
    fn get(&self, key: &FpVar<F>) -> core::result::Result<FpVar<F>, SynthesisError> {
        let mut value = FpVar::zero();
        let mut hits = FpVar::zero();
        // keys are distinct, so at most one hit
        for (&k, &v) in &self.entries {
            let hit = FpVar::from(key.is_eq(&FpVar::constant(F::from(k)))?);
            value += &hit * v;
            hits += hit;
        }
        if !self.default.is_zero() {
            value += (FpVar::one() - hits) * self.default;
        }
        Ok(value)
    }
}
