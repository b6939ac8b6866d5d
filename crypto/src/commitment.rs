//! Verdict commitments.
//!
//! An expert binds itself to a verdict before anyone can see it by publishing
//! `H(H(verdict) ^ H(nonce) ^ H(author))`. Revealing the verdict and nonce later
//! lets anyone recompute the commitment. Folding the author in stops a second
//! expert from copying someone else's commitment verbatim.

use crate::hash::digest;
use swarm_types::{Address, ArtifactFlags, Hash256};

/// Compute the commitment for `verdicts` under `nonce`, bound to `author`.
pub fn compute_commitment(verdicts: &ArtifactFlags, nonce: &[u8], author: &Address) -> Hash256 {
    let folded = digest(&verdicts.to_bytes()) ^ digest(nonce) ^ digest(author.as_bytes());
    digest(folded.as_bytes())
}

/// Whether revealing `verdicts` and `nonce` as `author` opens `commitment`.
pub fn verify_commitment(
    commitment: &Hash256,
    verdicts: &ArtifactFlags,
    nonce: &[u8],
    author: &Address,
) -> bool {
    compute_commitment(verdicts, nonce, author) == *commitment
}
