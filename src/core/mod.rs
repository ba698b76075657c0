//! Core blockchain components

pub mod block;
pub mod blockchain;
pub mod pow;
pub mod transaction;
pub mod utxo;

pub use block::Block;
pub use blockchain::{Blockchain, ChainIterator};
pub use pow::ProofOfWork;
pub use transaction::{Transaction, TxInput, TxOutput};
pub use utxo::UtxoEntry;
