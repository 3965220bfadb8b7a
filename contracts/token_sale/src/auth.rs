//! # Restricted-stage authorization
//!
//! Participants prove membership of `(address, cap)` in the published
//! commitment with a sha256 inclusion proof:
//!
//! ```text
//! leaf = sha256(xdr(address) ‖ cap as 16-byte big-endian)
//! node = sha256(min(left, right) ‖ max(left, right))
//! ```
//!
//! The proof lists sibling hashes from the leaf up to the root.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env, Vec};

use crate::Error;

pub fn leaf_hash(env: &Env, participant: &Address, cap: i128) -> BytesN<32> {
    let mut payload: Bytes = participant.clone().to_xdr(env);
    payload.extend_from_array(&cap.to_be_bytes());
    env.crypto().sha256(&payload).into()
}

pub fn hash_pair(env: &Env, a: &BytesN<32>, b: &BytesN<32>) -> BytesN<32> {
    let (a, b) = (a.to_array(), b.to_array());
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut payload = Bytes::from_array(env, &lo);
    payload.extend_from_array(&hi);
    env.crypto().sha256(&payload).into()
}

pub fn verify_proof(env: &Env, root: &BytesN<32>, proof: &Vec<BytesN<32>>, leaf: BytesN<32>) -> bool {
    let mut node = leaf;
    for sibling in proof.iter() {
        node = hash_pair(env, &node, &sibling);
    }
    &node == root
}

/// Verify eligibility and clip `requested` to what is left under `cap`.
///
/// Fails with [`Error::InvalidProof`] when no commitment is published or the
/// proof does not match it, and with [`Error::CapReached`] when nothing is
/// left under the cap.
pub fn authorized_amount(
    env: &Env,
    commitment: Option<BytesN<32>>,
    participant: &Address,
    proof: &Vec<BytesN<32>>,
    requested: i128,
    cap: i128,
    already_contributed: i128,
) -> Result<i128, Error> {
    let root = commitment.ok_or(Error::InvalidProof)?;
    if !verify_proof(env, &root, proof, leaf_hash(env, participant, cap)) {
        return Err(Error::InvalidProof);
    }

    let headroom = cap.saturating_sub(already_contributed).max(0);
    let allowed = requested.min(headroom);
    if allowed == 0 {
        return Err(Error::CapReached);
    }
    Ok(allowed)
}
