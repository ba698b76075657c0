use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Data embedded in the genesis coinbase input.
pub const GENESIS_COINBASE_DATA: &str =
    "The Times 03/Jan/2009 Chancellor on brink of second bailout for banks";

/// Mining and ledger parameters, passed explicitly into chain and block
/// constructors. There is no ambient global configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Proof-of-work difficulty in bits; the target is 2^(256 - difficulty).
    pub difficulty: u32,
    /// Value of every coinbase output.
    pub subsidy: u64,
    /// Upper bound on the nonce search; exhausting it fails the mining attempt.
    pub max_nonce: u64,
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let data_dir = PathBuf::from(home_dir).join(".minichain");

        Self {
            difficulty: 16,
            subsidy: 10,
            max_nonce: u64::MAX,
            data_dir,
        }
    }
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("blocks")
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    fn config_path() -> PathBuf {
        let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home_dir).join(".minichain").join("config.json")
    }
}
