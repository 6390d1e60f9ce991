#![no_main]

use libfuzzer_sys::fuzz_target;

use ark_bls12_381::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::ConstraintSystem;

use zk_regex_capture::gadgets::packed::unpack_transition_value;
use zk_regex_capture::packed::{packed_bits, PackedTransition};

const G: usize = 3;

fn take_bytes<const N: usize>(data: &mut &[u8]) -> Option<[u8; N]> {
    if data.len() < N { return None; }
    let (take, rest) = data.split_at(N);
    *data = rest;
    let mut arr = [0u8; N];
    arr.copy_from_slice(take);
    Some(arr)
}

fuzz_target!(|data: &[u8]| {
    let mut data = data;
    let raw = if let Some(b) = take_bytes::<2>(&mut data) { u16::from_le_bytes(b) as u64 } else { return; };
    let declared = if let Some([b]) = take_bytes::<1>(&mut data) { b } else { return; };

    // native codec
    let entry = PackedTransition::<G>::unpack(raw);
    assert_eq!(entry.is_some(), raw >> packed_bits(G) == 0);
    if let Some(entry) = entry {
        assert_eq!(entry.pack(), raw);
        let participations = [declared & 1 != 0, declared & 2 != 0, declared & 4 != 0];
        let starts = [declared & 8 != 0, declared & 16 != 0, declared & 32 != 0];
        let matches = entry.is_valid
            && entry.participations == participations
            && entry.starts == starts;
        assert_eq!(entry.capture_error(&participations, &starts) == 0, matches);
    }

    // the gadget accepts exactly the well-formed values
    let cs = ConstraintSystem::<Fr>::new_ref();
    let value = FpVar::new_witness(cs.clone(), || Ok(Fr::from(raw))).unwrap();
    let unpacked = unpack_transition_value::<Fr, G>(&value).unwrap();
    assert_eq!(cs.is_satisfied().unwrap(), entry.is_some());
    if let Some(entry) = entry {
        assert_eq!(unpacked.value().unwrap(), entry);
    }
});
