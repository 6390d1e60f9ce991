// src/error.rs

use ark_relations::r1cs::SynthesisError;

/// Host-side failures: automaton loading, table population and witness
/// generation. In-circuit violations never surface here; they leave the
/// constraint system unsatisfied.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),
    #[error("conflicting table entries for key {key} ({from} -> {to} on byte {byte})")]
    ConflictingTransition { key: u64, from: u64, byte: u8, to: u64 },
    #[error("{groups} capture groups do not fit in a packed table value")]
    TooManyCaptureGroups { groups: usize },
    #[error("haystack of {len} bytes exceeds capacity {max}")]
    HaystackTooLong { len: usize, max: usize },
    #[error("automaton does not accept the haystack")]
    NoMatch,
    #[error("capture group {group} has no start and end position in the match")]
    CaptureNotFound { group: u64 },
    #[error("captured substring of {len} bytes exceeds capacity {max}")]
    CaptureTooLong { len: usize, max: usize },
    #[error("malformed automaton description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),
}

pub type Result<T> = core::result::Result<T, Error>;
