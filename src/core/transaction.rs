use crate::core::Blockchain;
use crate::crypto::hash;
use crate::{ChainError, Result};
use serde::{Deserialize, Serialize};

/// Output index sentinel marking a coinbase input.
pub const COINBASE_VOUT: i32 = -1;

/// A value transfer: inputs spending prior outputs, new outputs locked to
/// addresses. Immutable once its id is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: Vec<u8>,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxInput {
    /// Id of the transaction whose output is being spent; empty for coinbase.
    pub tx_id: Vec<u8>,
    /// Index of the referenced output; COINBASE_VOUT for coinbase.
    pub vout: i32,
    pub script_sig: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxOutput {
    pub value: u64,
    pub script_pubkey: String,
}

impl Transaction {
    /// Creates a subsidy-granting transaction with no real input. An empty
    /// `data` string defaults to a generated reward message.
    pub fn new_coinbase(to: &str, data: &str, subsidy: u64) -> Result<Self> {
        let data = if data.is_empty() {
            format!("Reward to '{}'", to)
        } else {
            data.to_string()
        };

        let input = TxInput {
            tx_id: Vec::new(),
            vout: COINBASE_VOUT,
            script_sig: data,
        };
        let output = TxOutput {
            value: subsidy,
            script_pubkey: to.to_string(),
        };

        let mut tx = Self {
            id: Vec::new(),
            inputs: vec![input],
            outputs: vec![output],
        };
        tx.set_id()?;

        Ok(tx)
    }

    /// Creates a transfer of `amount` from `from` to `to`, spending outputs
    /// selected from the chain's UTXO set. Produces a change output back to
    /// the sender when the selection overshoots.
    pub fn new_transfer(from: &str, to: &str, amount: u64, chain: &Blockchain) -> Result<Self> {
        let (accumulated, selected) = chain.find_spendable_outputs(from, amount)?;

        if accumulated < amount {
            return Err(ChainError::InsufficientFunds {
                required: amount,
                available: accumulated,
            });
        }

        let mut inputs = Vec::new();
        for (txid_hex, vouts) in selected {
            let tx_id = hex::decode(&txid_hex)?;
            for vout in vouts {
                inputs.push(TxInput {
                    tx_id: tx_id.clone(),
                    vout: vout as i32,
                    script_sig: from.to_string(),
                });
            }
        }

        let mut outputs = vec![TxOutput {
            value: amount,
            script_pubkey: to.to_string(),
        }];
        if accumulated > amount {
            // Change back to the sender
            outputs.push(TxOutput {
                value: accumulated - amount,
                script_pubkey: from.to_string(),
            });
        }

        let mut tx = Self {
            id: Vec::new(),
            inputs,
            outputs,
        };
        tx.set_id()?;

        Ok(tx)
    }

    /// Sets the id to the SHA-256 digest of the transaction's encoding. The
    /// id field is cleared before encoding, so the digest never covers its
    /// own final value.
    pub fn set_id(&mut self) -> Result<()> {
        self.id.clear();
        let encoded = bincode::serialize(self)?;
        self.id = hash::sha256(&encoded).to_vec();
        Ok(())
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].tx_id.is_empty() && self.inputs[0].vout == COINBASE_VOUT
    }

    pub fn id_hex(&self) -> String {
        hex::encode(&self.id)
    }
}

impl TxInput {
    /// Whether this input was created by the holder of `unlocking_data`.
    /// Ownership is nominal string equality, not a cryptographic proof.
    pub fn can_unlock_output_with(&self, unlocking_data: &str) -> bool {
        self.script_sig == unlocking_data
    }
}

impl TxOutput {
    /// Whether `unlocking_data` unlocks this output. Nominal string equality.
    pub fn can_be_unlocked_with(&self, unlocking_data: &str) -> bool {
        self.script_pubkey == unlocking_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coinbase_transaction() {
        let tx = Transaction::new_coinbase("Alice", "Genesis block", 10).unwrap();

        assert!(tx.is_coinbase());
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.inputs[0].vout, COINBASE_VOUT);
        assert!(tx.inputs[0].tx_id.is_empty());
        assert_eq!(tx.outputs.len(), 1);
        assert_eq!(tx.outputs[0].value, 10);
        assert!(tx.outputs[0].can_be_unlocked_with("Alice"));
    }

    #[test]
    fn test_coinbase_default_data() {
        let tx = Transaction::new_coinbase("Alice", "", 10).unwrap();
        assert_eq!(tx.inputs[0].script_sig, "Reward to 'Alice'");
    }

    #[test]
    fn test_id_deterministic() {
        let tx1 = Transaction::new_coinbase("Alice", "same data", 10).unwrap();
        let tx2 = Transaction::new_coinbase("Alice", "same data", 10).unwrap();

        assert_eq!(tx1.id, tx2.id);
        assert_eq!(tx1.id.len(), 32);
    }

    #[test]
    fn test_id_differs_per_recipient() {
        let tx1 = Transaction::new_coinbase("Alice", "data", 10).unwrap();
        let tx2 = Transaction::new_coinbase("Bob", "data", 10).unwrap();

        assert_ne!(tx1.id, tx2.id);
    }

    #[test]
    fn test_id_excludes_itself() {
        let mut tx = Transaction::new_coinbase("Alice", "data", 10).unwrap();
        let first = tx.id.clone();

        // Re-deriving the id from a transaction that already carries one
        // must produce the same digest.
        tx.set_id().unwrap();
        assert_eq!(tx.id, first);
    }
}
