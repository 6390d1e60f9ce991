#![allow(dead_code)]

use ark_bls12_381::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintLayer, ConstraintSystemRef};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;
use zk_regex_capture::RegexAutomaton;

/// `id:(\d+);` with the digits as capture group 1.
pub const ID_DIGITS: &str = r#"{
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

pub fn id_digits() -> RegexAutomaton {
    RegexAutomaton::from_json(ID_DIGITS).expect("valid automaton")
}

pub fn witness(cs: &ConstraintSystemRef<Fr>, value: u64) -> FpVar<Fr> {
    FpVar::new_witness(cs.clone(), || Ok(Fr::from(value))).expect("alloc witness")
}

pub fn witnesses<const N: usize>(cs: &ConstraintSystemRef<Fr>, values: [u64; N]) -> [FpVar<Fr>; N] {
    array_init::array_init(|i| witness(cs, values[i]))
}

/// Run `f` with constraint namespaces recorded, so `which_is_unsatisfied`
/// names the failing gadget.
pub fn traced<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = Registry::default().with(ConstraintLayer::default());
    tracing::subscriber::with_default(subscriber, f)
}
