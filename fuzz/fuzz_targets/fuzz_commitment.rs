#![no_main]

use libfuzzer_sys::fuzz_target;

use swarm_crypto::{compute_commitment, verify_commitment};
use swarm_types::{Address, ArtifactFlags};

// A commitment opens with its own verdicts and nonce, and with no flipped verdict.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let len = (data[0] as usize % 64) + 1;
    let bits = &data[1..];
    let verdicts = ArtifactFlags::new(
        (0..len)
            .map(|i| bits.get(i / 8).is_some_and(|b| b >> (i % 8) & 1 == 1))
            .collect(),
    );
    let nonce = &bits[bits.len().min(8)..];
    let expert = Address::new("swm_expert");

    let commitment = compute_commitment(&verdicts, nonce, &expert);
    assert!(verify_commitment(&commitment, &verdicts, nonce, &expert));

    let mut flipped = verdicts.as_slice().to_vec();
    flipped[len - 1] = !flipped[len - 1];
    assert!(!verify_commitment(&commitment, &ArtifactFlags::new(flipped), nonce, &expert));
});
