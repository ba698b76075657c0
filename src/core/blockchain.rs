use crate::config::{Config, GENESIS_COINBASE_DATA};
use crate::core::{Block, Transaction};
use crate::storage::Database;
use crate::{ChainError, Result};
use std::path::Path;

/// The append-only block sequence. Owns the persisted hash-to-block mapping
/// and the single mutable tip pointer.
#[derive(Debug)]
pub struct Blockchain {
    tip: Vec<u8>,
    db: Database,
    config: Config,
}

impl Blockchain {
    /// Creates a new chain at `path`, seeding it with a coinbase-funded
    /// genesis block mined to `miner_address`. Fails if the storage location
    /// already holds a chain.
    pub fn create<P: AsRef<Path>>(path: P, miner_address: &str, config: Config) -> Result<Self> {
        if Database::exists(&path) {
            return Err(ChainError::ChainAlreadyExists);
        }

        let db = Database::open(&path)?;
        let coinbase =
            Transaction::new_coinbase(miner_address, GENESIS_COINBASE_DATA, config.subsidy)?;
        let genesis = Block::new_genesis(coinbase, &config)?;
        db.put_block_and_tip(&genesis)?;

        log::info!("Created blockchain, genesis {}", hex::encode(&genesis.hash));

        Ok(Self {
            tip: genesis.hash.clone(),
            db,
            config,
        })
    }

    /// Opens an existing chain at `path`. Fails if none has been created.
    pub fn open<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        if !Database::exists(&path) {
            return Err(ChainError::ChainNotFound);
        }

        let db = Database::open(&path)?;
        let tip = db
            .get_tip()?
            .ok_or_else(|| ChainError::Storage("Tip key missing from block store".to_string()))?;

        Ok(Self { tip, db, config })
    }

    /// Mines a block holding `transactions` on top of the current tip and
    /// appends it, writing the block and the new tip atomically. Blocks the
    /// calling thread for the proof-of-work search.
    pub fn mine_block(&mut self, transactions: Vec<Transaction>) -> Result<Block> {
        let block = Block::new(transactions, self.tip.clone(), &self.config)?;
        self.db.put_block_and_tip(&block)?;
        self.tip = block.hash.clone();

        log::info!("Appended block {}", hex::encode(&block.hash));
        Ok(block)
    }

    /// A fresh backward iterator positioned at the current tip.
    pub fn iter(&self) -> ChainIterator<'_> {
        ChainIterator {
            current_hash: self.tip.clone(),
            db: &self.db,
        }
    }

    pub fn tip(&self) -> &[u8] {
        &self.tip
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Lazy tip-to-genesis walk. Yields each block once, following `prev_hash`
/// links, and terminates after the genesis block.
pub struct ChainIterator<'a> {
    current_hash: Vec<u8>,
    db: &'a Database,
}

impl Iterator for ChainIterator<'_> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_hash.is_empty() {
            return None;
        }

        match self.db.get_block(&self.current_hash) {
            Ok(Some(block)) => {
                self.current_hash = block.prev_hash.clone();
                Some(Ok(block))
            }
            Ok(None) => {
                let missing = hex::encode(&self.current_hash);
                self.current_hash.clear();
                Some(Err(ChainError::Storage(format!(
                    "Block {} referenced but not stored",
                    missing
                ))))
            }
            Err(e) => {
                self.current_hash.clear();
                Some(Err(e))
            }
        }
    }
}
