//! Native witness generation
//!
//! Runs the automaton over the haystack on the host and lays the accepting
//! walk out in the fixed-size shape the circuit expects. Rules may be
//! non-deterministic: the walk is found by a forward reachability pass
//! followed by a backward reconstruction from an accepting state.

use ark_std::collections::BTreeSet;

use crate::automaton::{RegexAutomaton, TransitionRule};
use crate::error::{Error, Result};
use crate::hints;

/// Per-position trace of one accepting walk. Positions at or past
/// `match_length` are padding: zero bytes, zero states, `reached_end` set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegexWitness<const N: usize, const G: usize> {
    pub haystack: [u8; N],
    pub match_length: usize,
    pub current_states: [u64; N],
    pub next_states: [u64; N],
    pub reached_end: [bool; N],
    pub capture_participations: [[bool; G]; N],
    pub capture_starts: [[bool; G]; N],
}

impl<const N: usize, const G: usize> RegexWitness<N, G> {
    pub fn generate(automaton: &RegexAutomaton, input: &[u8]) -> Result<Self> {
        automaton.validate()?;
        if automaton.num_capture_groups != G {
            return Err(Error::InvalidAutomaton(format!(
                "automaton has {} capture groups, witness layout expects {G}",
                automaton.num_capture_groups
            )));
        }
        if input.len() > N {
            return Err(Error::HaystackTooLong { len: input.len(), max: N });
        }
        if input.is_empty() {
            return Err(Error::NoMatch);
        }

        let walk = accepting_walk(automaton, input).ok_or(Error::NoMatch)?;

        let mut witness = Self {
            haystack: [0; N],
            match_length: input.len(),
            current_states: [0; N],
            next_states: [0; N],
            reached_end: [true; N],
            capture_participations: [[false; G]; N],
            capture_starts: [[false; G]; N],
        };
        witness.haystack[..input.len()].copy_from_slice(input);
        for (i, rule) in walk.iter().enumerate() {
            let entry = rule.packed::<G>();
            witness.current_states[i] = rule.from;
            witness.next_states[i] = rule.to;
            witness.reached_end[i] = false;
            witness.capture_participations[i] = entry.participations;
            witness.capture_starts[i] = entry.starts;
        }
        tracing::trace!(
            len = input.len(),
            end_state = witness.next_states[input.len() - 1],
            "reconstructed accepting walk"
        );
        Ok(witness)
    }

    fn group_index(group: u64) -> Option<usize> {
        group
            .checked_sub(1)
            .and_then(|g| usize::try_from(g).ok())
            .filter(|g| *g < G)
    }

    fn participates(&self, g: usize, i: usize) -> bool {
        i < N && !self.reached_end[i] && self.capture_participations[i][g]
    }

    /// Positions whose transition opens `group`.
    pub fn capture_start_flags(&self, group: u64) -> [bool; N] {
        let mut flags = [false; N];
        if let Some(g) = Self::group_index(group) {
            for (i, flag) in flags.iter_mut().enumerate() {
                *flag = !self.reached_end[i] && self.capture_starts[i][g];
            }
        }
        flags
    }

    /// Last position of each participating run of `group`.
    pub fn capture_end_flags(&self, group: u64) -> [bool; N] {
        let mut flags = [false; N];
        if let Some(g) = Self::group_index(group) {
            for (i, flag) in flags.iter_mut().enumerate() {
                *flag = self.participates(g, i) && !self.participates(g, i + 1);
            }
        }
        flags
    }

    /// Single-group capture ids: `group` at start and end positions, 0
    /// elsewhere. A position that is both reads `2 · group`.
    pub fn capture_ids(&self, group: u64) -> [u64; N] {
        let starts = self.capture_start_flags(group);
        let ends = self.capture_end_flags(group);
        let mut ids = [0; N];
        for i in 0..N {
            ids[i] = group * (starts[i] as u64 + ends[i] as u64);
        }
        ids
    }

    pub fn capture_mask(&self, group: u64) -> Vec<bool> {
        hints::capture_mask_for(&self.capture_ids(group), &self.capture_start_flags(group), &group)
    }

    pub fn capture_start_index(&self, group: u64) -> Option<usize> {
        hints::first_masked(&self.capture_mask(group))
    }

    /// Bytes captured by `group`, empty when it does not occur.
    pub fn captured(&self, group: u64) -> Vec<u8> {
        hints::extract_substring(&self.haystack, &self.capture_mask(group), N)
    }
}

/// One rule per input byte, leading from the initial state to an accept state.
fn accepting_walk<'a>(automaton: &'a RegexAutomaton, input: &[u8]) -> Option<Vec<&'a TransitionRule>> {
    let mut reachable = Vec::with_capacity(input.len() + 1);
    reachable.push(BTreeSet::from([automaton.initial_state]));
    for &byte in input {
        let next: BTreeSet<u64> = reachable[reachable.len() - 1]
            .iter()
            .flat_map(|&state| automaton.rules_from(state, byte).map(|rule| rule.to))
            .collect();
        if next.is_empty() {
            return None;
        }
        reachable.push(next);
    }

    let mut target = reachable[input.len()]
        .iter()
        .copied()
        .find(|state| automaton.is_accepting(*state))?;
    let mut walk = Vec::with_capacity(input.len());
    for i in (0..input.len()).rev() {
        let rule = automaton.transitions.iter().find(|rule| {
            rule.to == target && reachable[i].contains(&rule.from) && rule.accepts(input[i])
        })?;
        walk.push(rule);
        target = rule.from;
    }
    walk.reverse();
    Some(walk)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_DIGITS: &str = r#"{
        "initial_state": 0,
        "accept_states": [5],
        "num_capture_groups": 1,
        "transitions": [
            { "from": 0, "to": 1, "bytes": [[105, 105]] },
            { "from": 1, "to": 2, "bytes": [[100, 100]] },
            { "from": 2, "to": 3, "bytes": [[58, 58]] },
            { "from": 3, "to": 4, "bytes": [[48, 57]], "captures": [{ "group": 1, "start": true }] },
            { "from": 4, "to": 4, "bytes": [[48, 57]], "captures": [{ "group": 1 }] },
            { "from": 4, "to": 5, "bytes": [[59, 59]] }
        ]
    }"#;

    fn automaton() -> RegexAutomaton {
        RegexAutomaton::from_json(ID_DIGITS).unwrap()
    }

    #[test]
    fn walk_and_padding() {
        let w = RegexWitness::<12, 1>::generate(&automaton(), b"id:123;").unwrap();
        assert_eq!(w.match_length, 7);
        assert_eq!(&w.current_states[..7], &[0, 1, 2, 3, 4, 4, 4]);
        assert_eq!(&w.next_states[..7], &[1, 2, 3, 4, 4, 4, 5]);
        assert!(w.reached_end[..7].iter().all(|r| !r));
        assert!(w.reached_end[7..].iter().all(|r| *r));
        assert_eq!(&w.haystack[7..], &[0; 5]);
    }

    #[test]
    fn capture_metadata() {
        let w = RegexWitness::<12, 1>::generate(&automaton(), b"id:123;").unwrap();
        assert_eq!(w.capture_ids(1), [0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(w.capture_start_index(1), Some(3));
        assert_eq!(w.captured(1), b"123".to_vec());
        assert!(w.captured(2).is_empty());
    }

    #[test]
    fn single_digit_capture_collapses_ids() {
        let w = RegexWitness::<12, 1>::generate(&automaton(), b"id:7;").unwrap();
        assert_eq!(w.capture_ids(1)[3], 2);
        assert!(w.captured(1).is_empty());
    }

    #[test]
    fn rejects_non_matching_input() {
        let a = automaton();
        assert!(matches!(RegexWitness::<12, 1>::generate(&a, b"id:12"), Err(Error::NoMatch)));
        assert!(matches!(RegexWitness::<12, 1>::generate(&a, b"id:x;"), Err(Error::NoMatch)));
        assert!(matches!(RegexWitness::<12, 1>::generate(&a, b""), Err(Error::NoMatch)));
        assert!(matches!(
            RegexWitness::<4, 1>::generate(&a, b"id:1;"),
            Err(Error::HaystackTooLong { len: 5, max: 4 })
        ));
    }

    #[test]
    fn nondeterministic_rules_find_accepting_branch() {
        let json = r#"{
            "initial_state": 0,
            "accept_states": [2],
            "transitions": [
                { "from": 0, "to": 1, "bytes": [[97, 97]] },
                { "from": 0, "to": 3, "bytes": [[97, 97]] },
                { "from": 3, "to": 2, "bytes": [[98, 98]] }
            ]
        }"#;
        let a = RegexAutomaton::from_json(json).unwrap();
        let w = RegexWitness::<4, 0>::generate(&a, b"ab").unwrap();
        assert_eq!(&w.next_states[..2], &[3, 2]);
    }
}
