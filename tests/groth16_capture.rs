mod common;

use ark_bls12_381::{Bls12_381, Fr};
use ark_groth16::Groth16;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use common::{id_digits, traced};
use zk_regex_capture::{public_inputs_for, RegexCaptureCircuit};

type Circuit = RegexCaptureCircuit<Fr, 16, 8, 1, 1>;

#[test]
fn prove_and_verify_captured_digits() {
    let automaton = id_digits();
    let mut rng = StdRng::seed_from_u64(42);

    let setup = Circuit::new(&automaton).unwrap();
    let (pk, vk) = Groth16::<Bls12_381>::circuit_specific_setup(setup, &mut rng).unwrap();

    let circuit = Circuit::new(&automaton)
        .unwrap()
        .with_witness(&automaton, b"id:12345;")
        .unwrap();
    let public_inputs = circuit.public_inputs().unwrap();
    assert_eq!(public_inputs, public_inputs_for::<Fr, 8>(b"12345"));

    let cs = ConstraintSystem::<Fr>::new_ref();
    traced(|| circuit.clone().generate_constraints(cs.clone()).unwrap());
    assert!(cs.is_satisfied().unwrap(), "{:?}", cs.which_is_unsatisfied());

    let proof = Groth16::<Bls12_381>::prove(&pk, circuit, &mut rng).unwrap();
    assert!(Groth16::<Bls12_381>::verify(&vk, &public_inputs, &proof).unwrap());

    let mut tampered = public_inputs.clone();
    tampered[1] = Fr::from(b'9' as u64);
    assert!(!Groth16::<Bls12_381>::verify(&vk, &tampered, &proof).unwrap());

    let shorter = public_inputs_for::<Fr, 8>(b"1234");
    assert!(!Groth16::<Bls12_381>::verify(&vk, &shorter, &proof).unwrap());
}

#[test]
fn different_haystacks_share_one_setup() {
    let automaton = id_digits();
    let mut rng = StdRng::seed_from_u64(7);
    let (pk, vk) =
        Groth16::<Bls12_381>::circuit_specific_setup(Circuit::new(&automaton).unwrap(), &mut rng)
            .unwrap();

    for haystack in [&b"id:7;"[..], b"id:00;", b"id:31415926;"] {
        let circuit = Circuit::new(&automaton).unwrap().with_witness(&automaton, haystack);
        let circuit = match circuit {
            Ok(circuit) => circuit,
            // a single digit cannot carry distinct start and end tags
            Err(zk_regex_capture::Error::CaptureNotFound { group: 1 }) => continue,
            Err(err) => panic!("{haystack:?}: {err}"),
        };
        let public_inputs = circuit.public_inputs().unwrap();
        let proof = Groth16::<Bls12_381>::prove(&pk, circuit, &mut rng).unwrap();
        assert!(Groth16::<Bls12_381>::verify(&vk, &public_inputs, &proof).unwrap());
    }
}
