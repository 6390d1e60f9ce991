//! Regex matching with capture groups as R1CS constraints
//!
//! A compiled automaton becomes a sparse transition table keyed by
//! `(current_state, byte, next_state)`. Every step of a walk over a bounded
//! haystack is checked against that table, and the bytes of one capture group
//! are extracted into a bounded public output.
//!
//! Layout:
//! - `automaton`, `table`, `packed`: host-side description and table encoding
//! - `gadgets`: the in-circuit checks, generic over `F: PrimeField`
//! - `hints`: advisory host computations re-verified by the gadgets
//! - `witness`, `circuit`: witness generation and a complete Groth16-ready circuit

pub mod automaton;
pub mod circuit;
pub mod error;
pub mod gadgets;
pub mod hints;
pub mod packed;
pub mod table;
pub mod witness;

pub use automaton::{CaptureTag, RegexAutomaton, TransitionRule, MAX_STATE};
pub use circuit::{public_inputs_for, RegexCaptureCircuit};
pub use error::{Error, Result};
pub use gadgets::subarray::select_subarray;
pub use gadgets::substring::{capture_substring, extract_substring, BoundedVecVar};
pub use gadgets::transition::{check_transition, check_transition_with_captures};
pub use packed::{PackedTransition, MAX_CAPTURE_GROUPS};
pub use table::{SparseTransitionTable, TransitionTable};
pub use witness::RegexWitness;
