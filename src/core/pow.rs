use crate::core::Block;
use crate::crypto::hash;
use crate::{ChainError, Result};
use num_bigint::BigUint;

/// Proof-of-work puzzle over a block's header bytes. A candidate hash is
/// accepted when, read as a big-endian integer, it falls below
/// `2^(256 - difficulty)`.
pub struct ProofOfWork<'a> {
    block: &'a Block,
    target: BigUint,
    difficulty: u32,
    max_nonce: u64,
}

impl<'a> ProofOfWork<'a> {
    pub fn new(block: &'a Block, difficulty: u32, max_nonce: u64) -> Self {
        let target = BigUint::from(1u8) << (256 - difficulty);

        Self {
            block,
            target,
            difficulty,
            max_nonce,
        }
    }

    /// Brute-force linear nonce search, starting at 0. Deterministic: the
    /// same block contents always yield the same solution. Expected cost is
    /// ~2^difficulty hash trials.
    pub fn run(&self) -> Result<(u64, Vec<u8>)> {
        log::debug!(
            "Mining block with {} transaction(s) at difficulty {}",
            self.block.transactions.len(),
            self.difficulty
        );

        let mut nonce = 0u64;
        loop {
            let candidate = hash::sha256(&self.prepare_data(nonce));
            if BigUint::from_bytes_be(&candidate) < self.target {
                log::debug!("Found nonce {} -> {}", nonce, hex::encode(candidate));
                return Ok((nonce, candidate.to_vec()));
            }

            if nonce == self.max_nonce {
                return Err(ChainError::MiningExhausted);
            }
            nonce += 1;
        }
    }

    /// Recomputes the hash for the block's stored nonce and checks it
    /// against the target, independent of the stored hash field.
    pub fn validate(&self) -> bool {
        let candidate = hash::sha256(&self.prepare_data(self.block.nonce));
        BigUint::from_bytes_be(&candidate) < self.target
    }

    /// Deterministic header encoding: fixed-width big-endian fields, no
    /// delimiters needed.
    fn prepare_data(&self, nonce: u64) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&self.block.prev_hash);
        data.extend_from_slice(&self.block.hash_transactions());
        data.extend_from_slice(&self.block.timestamp.to_be_bytes());
        data.extend_from_slice(&self.difficulty.to_be_bytes());
        data.extend_from_slice(&nonce.to_be_bytes());
        data
    }
}
