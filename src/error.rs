use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChainError>;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("No existing blockchain found; create one first")]
    ChainNotFound,

    #[error("A blockchain already exists at the storage location")]
    ChainAlreadyExists,

    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid transaction id: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Proof-of-work nonce space exhausted without a solution")]
    MiningExhausted,

    #[error("Storage error: {0}")]
    Storage(String),
}
