use crate::core::Block;
use crate::{ChainError, Result};
use sled::transaction::{ConflictableTransactionResult, TransactionError};
use sled::{Db, Tree};
use std::path::Path;

const TREE_BLOCKS: &str = "blocks";
/// Well-known key holding the current tip's block hash.
const TIP_KEY: &[u8] = b"l";

/// Sled-backed block store: one tree mapping block hash to serialized block,
/// plus the tip pointer under `TIP_KEY` in the same tree.
#[derive(Debug, Clone)]
pub struct Database {
    db: Db,
    blocks: Tree,
}

impl Database {
    pub fn exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists()
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| ChainError::Storage(format!("Failed to open database: {}", e)))?;
        let blocks = db.open_tree(TREE_BLOCKS)?;

        Ok(Self { db, blocks })
    }

    pub fn get_block(&self, hash: &[u8]) -> Result<Option<Block>> {
        match self.blocks.get(hash)? {
            Some(data) => Ok(Some(Block::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    pub fn get_tip(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.blocks.get(TIP_KEY)?.map(|v| v.to_vec()))
    }

    /// Inserts the block under its hash and moves the tip to it, as one
    /// indivisible unit: no reader ever observes a tip without its block or
    /// a block with a stale tip.
    pub fn put_block_and_tip(&self, block: &Block) -> Result<()> {
        let data = block.serialize()?;
        let hash = block.hash.clone();

        self.blocks
            .transaction(
                |tree| -> ConflictableTransactionResult<(), ChainError> {
                    tree.insert(hash.as_slice(), data.as_slice())?;
                    tree.insert(TIP_KEY, hash.as_slice())?;
                    Ok(())
                },
            )
            .map_err(|err| match err {
                TransactionError::Abort(e) => e,
                TransactionError::Storage(e) => ChainError::Database(e),
            })?;
        self.db.flush()?;

        log::debug!("Saved block {}", hex::encode(&block.hash));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;
    use tempfile::TempDir;

    fn sample_block(nonce: u64) -> Block {
        let coinbase = Transaction::new_coinbase("Alice", "", 10).unwrap();
        Block {
            timestamp: 1231006505,
            prev_hash: Vec::new(),
            hash: vec![nonce as u8; 32],
            nonce,
            transactions: vec![coinbase],
        }
    }

    #[test]
    fn test_put_and_get_block() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("blocks")).unwrap();

        let block = sample_block(1);
        db.put_block_and_tip(&block).unwrap();

        let restored = db.get_block(&block.hash).unwrap().unwrap();
        assert_eq!(block, restored);
        assert_eq!(db.get_tip().unwrap().unwrap(), block.hash);
    }

    #[test]
    fn test_tip_moves_with_each_insert() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("blocks")).unwrap();

        let first = sample_block(1);
        let second = sample_block(2);
        db.put_block_and_tip(&first).unwrap();
        db.put_block_and_tip(&second).unwrap();

        assert_eq!(db.get_tip().unwrap().unwrap(), second.hash);
        assert!(db.get_block(&first.hash).unwrap().is_some());
    }

    #[test]
    fn test_missing_block_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("blocks")).unwrap();

        assert!(db.get_block(&[0xAB; 32]).unwrap().is_none());
        assert!(db.get_tip().unwrap().is_none());
    }
}
