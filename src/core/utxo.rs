use crate::core::{Blockchain, TxOutput};
use crate::Result;
use std::collections::{HashMap, HashSet};

/// The unspent outputs of one transaction, paired with their original
/// output indices. Derived on demand, never persisted.
#[derive(Debug, Clone, Default)]
pub struct UtxoEntry {
    pub outputs: Vec<TxOutput>,
    pub indexes: Vec<usize>,
}

impl Blockchain {
    /// Derives the full UTXO set by rescanning the chain tip-to-genesis,
    /// keyed by hex transaction id. Every call visits every block once;
    /// the O(chain length) cost is deliberate (no incremental index).
    ///
    /// Because traversal runs newest to oldest, a spending transaction is
    /// always seen before the transaction that created the spent output, so
    /// recording spends after collecting a transaction's own outputs is
    /// sufficient to mark them spent.
    pub fn find_utxo(&self) -> Result<HashMap<String, UtxoEntry>> {
        let mut unspent: HashMap<String, UtxoEntry> = HashMap::new();
        let mut spent: HashMap<String, HashSet<i32>> = HashMap::new();

        for block in self.iter() {
            let block = block?;
            for tx in &block.transactions {
                let txid = tx.id_hex();

                for (idx, output) in tx.outputs.iter().enumerate() {
                    let spent_here = spent
                        .get(&txid)
                        .map_or(false, |vouts| vouts.contains(&(idx as i32)));
                    if spent_here {
                        continue;
                    }

                    let entry = unspent.entry(txid.clone()).or_default();
                    entry.outputs.push(output.clone());
                    entry.indexes.push(idx);
                }

                if !tx.is_coinbase() {
                    for input in &tx.inputs {
                        spent
                            .entry(hex::encode(&input.tx_id))
                            .or_default()
                            .insert(input.vout);
                    }
                }
            }
        }

        Ok(unspent)
    }

    /// Selects unspent outputs unlockable by `address` until their combined
    /// value reaches `amount`, short-circuiting there. The accumulated value
    /// may come up short; callers must check it, this does not fail.
    pub fn find_spendable_outputs(
        &self,
        address: &str,
        amount: u64,
    ) -> Result<(u64, HashMap<String, Vec<usize>>)> {
        let utxo = self.find_utxo()?;
        let mut accumulated = 0u64;
        let mut selected: HashMap<String, Vec<usize>> = HashMap::new();

        'scan: for (txid, entry) in &utxo {
            for (output, idx) in entry.outputs.iter().zip(&entry.indexes) {
                if output.can_be_unlocked_with(address) {
                    accumulated += output.value;
                    selected.entry(txid.clone()).or_default().push(*idx);

                    if accumulated >= amount {
                        break 'scan;
                    }
                }
            }
        }

        Ok((accumulated, selected))
    }

    /// Total unspent value locked to `address`.
    pub fn get_balance(&self, address: &str) -> Result<u64> {
        let utxo = self.find_utxo()?;
        let balance = utxo
            .values()
            .flat_map(|entry| &entry.outputs)
            .filter(|output| output.can_be_unlocked_with(address))
            .map(|output| output.value)
            .sum();

        Ok(balance)
    }
}
