use minichain::cli::run_cli;
use minichain::config::Config;

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().unwrap_or_default();

    run_cli(config)?;

    Ok(())
}
