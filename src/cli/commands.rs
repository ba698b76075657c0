use crate::config::Config;
use crate::core::{Block, Blockchain, ProofOfWork, Transaction};
use crate::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "minichain")]
#[command(about = "Minichain node - a minimal persisted proof-of-work blockchain")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, help = "Data directory")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Enable debug logging")]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new blockchain, sending the genesis subsidy to ADDRESS
    Init {
        #[arg(long, help = "Address credited by the genesis coinbase")]
        address: String,
    },

    /// Show the unspent balance of ADDRESS
    Balance {
        #[arg(long)]
        address: String,
    },

    /// Transfer AMOUNT between addresses, mining a new block
    Send {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long)]
        amount: u64,
    },

    /// Print every block from the tip back to genesis
    Print,
}

pub fn run_cli(config: Config) -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging once
    let _ = if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .try_init()
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()
    };

    let mut config = config;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir.into();
    }

    match cli.command {
        Commands::Init { address } => {
            let chain = Blockchain::create(config.db_path(), &address, config.clone())?;
            println!("Created blockchain");
            println!("Genesis: {}", hex::encode(chain.tip()));
        }

        Commands::Balance { address } => {
            let chain = Blockchain::open(config.db_path(), config.clone())?;
            let balance = chain.get_balance(&address)?;
            println!("Balance of '{}': {}", address, balance);
        }

        Commands::Send { from, to, amount } => {
            let mut chain = Blockchain::open(config.db_path(), config.clone())?;
            let tx = Transaction::new_transfer(&from, &to, amount, &chain)?;
            let block = chain.mine_block(vec![tx])?;
            println!("Sent {} from '{}' to '{}'", amount, from, to);
            println!("Mined block {}", hex::encode(&block.hash));
        }

        Commands::Print => {
            let chain = Blockchain::open(config.db_path(), config.clone())?;
            for block in chain.iter() {
                print_block(&block?, &config);
                println!();
            }
        }
    }

    Ok(())
}

fn print_block(block: &Block, config: &Config) {
    let pow = ProofOfWork::new(block, config.difficulty, config.max_nonce);

    println!("Hash: {}", hex::encode(&block.hash));
    println!("PrevHash: {}", hex::encode(&block.prev_hash));
    println!("Timestamp: {}", block.timestamp);
    println!("Nonce: {}", block.nonce);
    println!("Transactions: {}", block.transactions.len());
    for tx in &block.transactions {
        println!("  - {}", tx.id_hex());
    }
    println!("PoW: {}", pow.validate());
}
