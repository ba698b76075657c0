//! Minichain - a minimal persisted proof-of-work blockchain
//!
//! This library implements a single-node ledger with:
//! - SHA-256 proof-of-work block sealing
//! - UTXO-based balance accounting derived from full chain history
//! - Append-only chain persistence with an atomically moved tip pointer
//! - A complete CLI interface

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod error;
pub mod storage;

pub use error::{ChainError, Result};
