//! Automaton description
//!
//! The regex compiler is not part of this crate. It hands over an already
//! compiled automaton as JSON:
//! ```text
//! {
//!   "initial_state": 0,
//!   "accept_states": [5],
//!   "num_capture_groups": 1,
//!   "transitions": [
//!     { "from": 3, "to": 4, "bytes": [[48, 57]], "captures": [{ "group": 1, "start": true }] }
//!   ]
//! }
//! ```
//! Capture groups are numbered from 1; 0 is reserved for "no group".

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::packed::{ensure_group_count, PackedTransition};

/// States are packed into a single key digit below the composer radix.
pub const MAX_STATE: u64 = 255;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureTag {
    pub group: u64,
    #[serde(default)]
    pub start: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub from: u64,
    pub to: u64,
    /// Inclusive byte ranges accepted by this rule.
    pub bytes: Vec<(u8, u8)>,
    #[serde(default)]
    pub captures: Vec<CaptureTag>,
}

impl TransitionRule {
    pub fn accepts(&self, byte: u8) -> bool {
        self.bytes.iter().any(|&(lo, hi)| lo <= byte && byte <= hi)
    }

    pub fn byte_values(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes.iter().flat_map(|&(lo, hi)| lo..=hi)
    }

    /// Table entry for this rule; participation is implied by any tag.
    pub fn packed<const G: usize>(&self) -> PackedTransition<G> {
        let mut entry = PackedTransition::<G>::valid();
        for tag in &self.captures {
            let idx = (tag.group - 1) as usize;
            entry.participations[idx] = true;
            entry.starts[idx] |= tag.start;
        }
        entry
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexAutomaton {
    pub initial_state: u64,
    pub accept_states: Vec<u64>,
    #[serde(default)]
    pub num_capture_groups: usize,
    pub transitions: Vec<TransitionRule>,
}

impl RegexAutomaton {
    pub fn from_json(json: &str) -> Result<Self> {
        let automaton: Self = serde_json::from_str(json)?;
        automaton.validate()?;
        Ok(automaton)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_group_count(self.num_capture_groups)?;
        if self.transitions.is_empty() {
            return Err(Error::InvalidAutomaton("no transitions".into()));
        }
        if self.accept_states.is_empty() {
            return Err(Error::InvalidAutomaton("no accept states".into()));
        }
        let states = core::iter::once(self.initial_state)
            .chain(self.accept_states.iter().copied())
            .chain(self.transitions.iter().flat_map(|t| [t.from, t.to]));
        for state in states {
            if state > MAX_STATE {
                return Err(Error::InvalidAutomaton(format!(
                    "state {state} exceeds {MAX_STATE}"
                )));
            }
        }
        for rule in &self.transitions {
            if rule.bytes.is_empty() {
                return Err(Error::InvalidAutomaton(format!(
                    "transition {} -> {} accepts no bytes",
                    rule.from, rule.to
                )));
            }
            if let Some(&(lo, hi)) = rule.bytes.iter().find(|(lo, hi)| lo > hi) {
                return Err(Error::InvalidAutomaton(format!("empty byte range [{lo}, {hi}]")));
            }
            for tag in &rule.captures {
                if tag.group == 0 || tag.group as usize > self.num_capture_groups {
                    return Err(Error::InvalidAutomaton(format!(
                        "capture group {} out of range 1..={}",
                        tag.group, self.num_capture_groups
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_accepting(&self, state: u64) -> bool {
        self.accept_states.contains(&state)
    }

    /// Rules leaving `state` on `byte`.
    pub fn rules_from(&self, state: u64, byte: u8) -> impl Iterator<Item = &TransitionRule> {
        self.transitions
            .iter()
            .filter(move |rule| rule.from == state && rule.accepts(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGITS: &str = r#"{
        "initial_state": 0,
        "accept_states": [2],
        "num_capture_groups": 1,
        "transitions": [
            { "from": 0, "to": 1, "bytes": [[48, 57]], "captures": [{ "group": 1, "start": true }] },
            { "from": 1, "to": 1, "bytes": [[48, 57]], "captures": [{ "group": 1 }] },
            { "from": 1, "to": 2, "bytes": [[59, 59]] }
        ]
    }"#;

    #[test]
    fn parses_and_validates() {
        let automaton = RegexAutomaton::from_json(DIGITS).unwrap();
        assert_eq!(automaton.transitions.len(), 3);
        assert!(automaton.is_accepting(2));
        assert_eq!(automaton.rules_from(1, b'7').count(), 1);
        assert_eq!(automaton.rules_from(1, b';').next().unwrap().to, 2);

        let entry = automaton.transitions[0].packed::<1>();
        assert!(entry.is_valid && entry.starts[0] && entry.participations[0]);
        assert_eq!(automaton.transitions[2].packed::<1>().pack(), 1);
    }

    #[test]
    fn rejects_unknown_group() {
        let json = DIGITS.replace(r#""group": 1 }"#, r#""group": 2 }"#);
        assert!(matches!(
            RegexAutomaton::from_json(&json),
            Err(Error::InvalidAutomaton(_))
        ));
    }

    #[test]
    fn rejects_large_state() {
        let json = DIGITS.replace(r#""accept_states": [2]"#, r#""accept_states": [300]"#);
        assert!(RegexAutomaton::from_json(&json).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(RegexAutomaton::from_json("{"), Err(Error::Json(_))));
    }
}
