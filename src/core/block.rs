use crate::config::Config;
use crate::core::pow::ProofOfWork;
use crate::core::Transaction;
use crate::crypto::hash;
use crate::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A header+body unit of the chain. `prev_hash` is empty only on the
/// genesis block. Fields never change after mining.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub timestamp: i64,
    pub prev_hash: Vec<u8>,
    pub hash: Vec<u8>,
    pub nonce: u64,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Builds a block on top of `prev_hash` and seals it with proof-of-work.
    /// CPU-bound: blocks the calling thread until a nonce is found.
    pub fn new(transactions: Vec<Transaction>, prev_hash: Vec<u8>, config: &Config) -> Result<Self> {
        let mut block = Self {
            timestamp: Utc::now().timestamp(),
            prev_hash,
            hash: Vec::new(),
            nonce: 0,
            transactions,
        };

        let (nonce, hash) = {
            let pow = ProofOfWork::new(&block, config.difficulty, config.max_nonce);
            pow.run()?
        };
        block.nonce = nonce;
        block.hash = hash;

        Ok(block)
    }

    pub fn new_genesis(coinbase: Transaction, config: &Config) -> Result<Self> {
        Self::new(vec![coinbase], Vec::new(), config)
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_empty()
    }

    /// SHA-256 over the concatenated transaction ids, in list order. This is
    /// the transactions digest covered by the block hash.
    pub fn hash_transactions(&self) -> [u8; 32] {
        let mut data = Vec::new();
        for tx in &self.transactions {
            data.extend_from_slice(&tx.id);
        }
        hash::sha256(&data)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn deserialize(data: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;

    fn test_config() -> Config {
        Config {
            difficulty: 4,
            ..Config::default()
        }
    }

    fn raw_block(transactions: Vec<Transaction>) -> Block {
        Block {
            timestamp: 1231006505,
            prev_hash: vec![7; 32],
            hash: vec![9; 32],
            nonce: 42,
            transactions,
        }
    }

    #[test]
    fn test_genesis_block() {
        let coinbase = Transaction::new_coinbase("Alice", "", 10).unwrap();
        let block = Block::new_genesis(coinbase, &test_config()).unwrap();

        assert!(block.is_genesis());
        assert_eq!(block.hash.len(), 32);
        assert_eq!(block.transactions.len(), 1);
    }

    #[test]
    fn test_non_genesis_block() {
        let coinbase = Transaction::new_coinbase("Alice", "", 10).unwrap();
        let block = Block::new(vec![coinbase], vec![1; 32], &test_config()).unwrap();

        assert!(!block.is_genesis());
    }

    #[test]
    fn test_serialize_round_trip_empty() {
        let block = Block {
            timestamp: 0,
            prev_hash: Vec::new(),
            hash: Vec::new(),
            nonce: 0,
            transactions: Vec::new(),
        };

        let restored = Block::deserialize(&block.serialize().unwrap()).unwrap();
        assert_eq!(block, restored);
    }

    #[test]
    fn test_serialize_round_trip_single_tx() {
        let tx = Transaction::new_coinbase("Alice", "", 10).unwrap();
        let block = raw_block(vec![tx]);

        let restored = Block::deserialize(&block.serialize().unwrap()).unwrap();
        assert_eq!(block, restored);
    }

    #[test]
    fn test_serialize_round_trip_many_txs() {
        let txs = (0..5)
            .map(|i| Transaction::new_coinbase(&format!("addr{}", i), "", 10).unwrap())
            .collect();
        let block = raw_block(txs);

        let restored = Block::deserialize(&block.serialize().unwrap()).unwrap();
        assert_eq!(block, restored);
    }

    #[test]
    fn test_hash_transactions_order_sensitive() {
        let tx1 = Transaction::new_coinbase("Alice", "", 10).unwrap();
        let tx2 = Transaction::new_coinbase("Bob", "", 10).unwrap();

        let forward = raw_block(vec![tx1.clone(), tx2.clone()]);
        let reversed = raw_block(vec![tx2, tx1]);

        assert_ne!(forward.hash_transactions(), reversed.hash_transactions());
    }
}
